//! Typed configuration views over raw key/value entries
//!
//! Raw entries come from command line tokens, mappings, property sets or
//! figment sources. Contracts declared with [`contract!`] describe the typed
//! shape; binding one yields a view that converts entries lazily and caches
//! each conversion for the lifetime of the [`Configuration`].

pub mod binder;
pub mod cache;
pub mod convert;
pub mod loader;
mod macros;
pub mod schema;
pub mod store;

pub use binder::{Configuration, Resolved, View};
pub use cache::{CacheKey, ConversionCache};
pub use convert::TypeConverter;
pub use loader::{environment, SourceLoader};
pub use schema::{Accessor, AccessorKind, ConfigType, Contract, ContractId, ContractSchema, SchemaFn};
pub use store::EntryStore;
pub use types::{
    BindError, ConversionError, EnumLiteral, EnumSchema, RawValue, Result, TypeDescriptor, Value,
};
