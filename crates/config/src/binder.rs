//! Descriptor binder: configurations and the typed views bound from them

use crate::cache::{CacheKey, ConversionCache};
use crate::convert::TypeConverter;
use crate::schema::{Accessor, AccessorKind, ConfigType, Contract, ContractSchema};
use crate::store::EntryStore;
use std::fmt;
use tracing::{debug, trace};
use types::{BindError, ConversionError, RawValue, Result, Value};

/// Owns the raw entries and the conversions cached from them.
///
/// Views borrow the configuration, so entries can only be added while no
/// view is alive. Conversions cached by earlier views are kept across such
/// additions: an accessor that was already read keeps its first value.
#[derive(Debug, Default)]
pub struct Configuration {
    store: EntryStore,
    cache: ConversionCache,
}

impl Configuration {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `--key=value` / `--key` command line tokens
    pub fn add_tokens<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.add_tokens(tokens)
    }

    /// Merge a generic mapping, last write wins
    pub fn add_mapping<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        self.store.add_mapping(entries)
    }

    /// Merge a string property set, last write wins
    pub fn add_properties<I, K, V>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.store.add_properties(properties)
    }

    /// The raw entries
    pub fn entries(&self) -> &EntryStore {
        &self.store
    }

    /// Number of conversions cached so far
    pub fn cached_conversions(&self) -> usize {
        self.cache.len()
    }

    /// Bind a contract's typed view over this configuration
    pub fn bind<'a, C: Contract<'a>>(&'a self) -> C {
        C::from_view(self.bind_schema(C::schema()))
    }

    /// Bind an untyped view for a schema
    pub fn bind_schema(&self, schema: &'static ContractSchema) -> View<'_> {
        View {
            store: &self.store,
            cache: &self.cache,
            schema,
        }
    }
}

/// Result of resolving one accessor
#[derive(Debug, Clone)]
pub enum Resolved<'a> {
    Value(Value),
    Contract(View<'a>),
}

/// Read-through view of a configuration satisfying one contract
#[derive(Clone, Copy)]
pub struct View<'a> {
    store: &'a EntryStore,
    cache: &'a ConversionCache,
    schema: &'static ContractSchema,
}

impl<'a> View<'a> {
    /// Contract this view satisfies
    pub fn schema(&self) -> &'static ContractSchema {
        self.schema
    }

    /// Resolve an accessor by name
    pub fn resolve(&self, accessor: &str) -> Result<Resolved<'a>> {
        let (index, definition) = self.lookup(accessor)?;
        self.resolve_accessor(index, definition)
    }

    /// Resolve a value accessor by name
    pub fn value(&self, accessor: &str) -> Result<Value> {
        let (index, definition) = self.lookup(accessor)?;
        match self.resolve_accessor(index, definition)? {
            Resolved::Value(value) => Ok(value),
            Resolved::Contract(view) => Err(BindError::conversion(
                definition.lookup_key(),
                ConversionError::TypeMismatch {
                    expected: "value".to_string(),
                    found: format!("contract {}", view.schema().name()),
                },
            )),
        }
    }

    /// Resolve a value accessor by name as a Rust type
    pub fn get<T: ConfigType>(&self, accessor: &str) -> Result<T> {
        let (index, definition) = self.lookup(accessor)?;
        let value = match self.resolve_accessor(index, definition)? {
            Resolved::Value(value) => value,
            Resolved::Contract(view) => {
                return Err(BindError::conversion(
                    definition.lookup_key(),
                    ConversionError::TypeMismatch {
                        expected: T::descriptor().to_string(),
                        found: format!("contract {}", view.schema().name()),
                    },
                ))
            }
        };

        T::from_value(value).map_err(|source| BindError::conversion(definition.lookup_key(), source))
    }

    /// Resolve a nested contract accessor by name
    pub fn nested(&self, accessor: &str) -> Result<View<'a>> {
        let (index, definition) = self.lookup(accessor)?;
        match self.resolve_accessor(index, definition)? {
            Resolved::Contract(view) => Ok(view),
            Resolved::Value(value) => Err(BindError::conversion(
                definition.lookup_key(),
                ConversionError::TypeMismatch {
                    expected: "contract".to_string(),
                    found: value.kind().to_string(),
                },
            )),
        }
    }

    /// Bind another contract over the same entries and cache
    pub fn bind<C: Contract<'a>>(&self) -> C {
        C::from_view(self.rebind(C::schema()))
    }

    fn rebind(&self, schema: &'static ContractSchema) -> View<'a> {
        View {
            store: self.store,
            cache: self.cache,
            schema,
        }
    }

    fn lookup(&self, accessor: &str) -> Result<(usize, &'static Accessor)> {
        self.schema
            .find(accessor)
            .ok_or_else(|| BindError::UnknownAccessor {
                contract: self.schema.name().to_string(),
                accessor: accessor.to_string(),
            })
    }

    fn resolve_accessor(&self, index: usize, accessor: &Accessor) -> Result<Resolved<'a>> {
        let (ty, default) = match accessor.kind() {
            // Nested contracts are always present; their accessors resolve on their own
            AccessorKind::Contract(schema) => return Ok(Resolved::Contract(self.rebind(schema()))),
            AccessorKind::Value { ty, default } => (ty, default),
        };

        let key = accessor.lookup_key();
        let Some(raw) = self.store.get(key) else {
            return Ok(Resolved::Value(default.clone()));
        };

        let cache_key = CacheKey {
            contract: self.schema.id(),
            accessor: index,
        };
        if let Some(value) = self.cache.get(&cache_key) {
            trace!(contract = self.schema.name(), key, "Conversion cache hit");
            return Ok(Resolved::Value(value));
        }

        let value = TypeConverter::convert(ty, raw).map_err(|source| {
            debug!(contract = self.schema.name(), key, error = %source, "Conversion failed");
            BindError::conversion(key, source)
        })?;
        trace!(contract = self.schema.name(), key, "Caching conversion");
        self.cache.insert(cache_key, value.clone());

        Ok(Resolved::Value(value))
    }
}

impl fmt::Debug for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("contract", &self.schema.name())
            .field("entries", &self.store.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ContractId;
    use std::sync::OnceLock;
    use types::TypeDescriptor;

    struct Outer;
    struct Inner;

    fn inner_schema() -> &'static ContractSchema {
        static SCHEMA: OnceLock<ContractSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            ContractSchema::new(
                ContractId::of::<Inner>(),
                "Inner",
                vec![Accessor::typed("depth", 5i32)],
            )
        })
    }

    fn outer_schema() -> &'static ContractSchema {
        static SCHEMA: OnceLock<ContractSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            ContractSchema::new(
                ContractId::of::<Outer>(),
                "Outer",
                vec![
                    Accessor::typed("intArg", 1i32),
                    Accessor::typed("name", String::from("Test")),
                    Accessor::value(
                        "timeout",
                        TypeDescriptor::Opaque("Duration"),
                        Value::String("30s".to_string()),
                    ),
                    Accessor::contract("inner", inner_schema),
                ],
            )
        })
    }

    #[test]
    fn test_defaults_on_empty_store() {
        let config = Configuration::new();
        let view = config.bind_schema(outer_schema());

        assert_eq!(view.get::<i32>("intArg"), Ok(1));
        assert_eq!(view.get::<String>("name"), Ok("Test".to_string()));
        assert_eq!(view.value("timeout"), Ok(Value::String("30s".to_string())));
        assert_eq!(view.nested("inner").unwrap().get::<i32>("depth"), Ok(5));
        assert_eq!(config.cached_conversions(), 0);
    }

    #[test]
    fn test_converts_and_caches() {
        let mut config = Configuration::new();
        config.add_tokens(["--intArg=3"]).unwrap();

        let view = config.bind_schema(outer_schema());
        assert_eq!(view.get::<i32>("intArg"), Ok(3));
        assert_eq!(config.cached_conversions(), 1);

        // rebinding shares the cache
        let again = config.bind_schema(outer_schema());
        assert_eq!(again.get::<i32>("intArg"), Ok(3));
        assert_eq!(config.cached_conversions(), 1);
    }

    #[test]
    fn test_cached_value_survives_later_adds() {
        let mut config = Configuration::new();
        config.add_tokens(["--intArg=3", "--name=first"]).unwrap();
        assert_eq!(config.bind_schema(outer_schema()).get::<i32>("intArg"), Ok(3));

        config.add_mapping([("intArg", "4"), ("name", "second")]);

        let view = config.bind_schema(outer_schema());
        assert_eq!(view.get::<i32>("intArg"), Ok(3));
        assert_eq!(view.get::<String>("name"), Ok("second".to_string()));
    }

    #[test]
    fn test_failure_is_not_cached_and_isolated() {
        let mut config = Configuration::new();
        config
            .add_tokens(["--intArg=notanumber", "--name=ok"])
            .unwrap();

        let view = config.bind_schema(outer_schema());
        let err = view.get::<i32>("intArg").unwrap_err();
        assert!(matches!(
            err,
            BindError::Conversion {
                ref key,
                source: ConversionError::InvalidLiteral { .. }
            } if key == "intArg"
        ));
        assert_eq!(view.get::<String>("name"), Ok("ok".to_string()));
        assert_eq!(config.cached_conversions(), 1);
    }

    #[test]
    fn test_opaque_entry_is_unsupported() {
        let mut config = Configuration::new();
        config.add_tokens(["--timeout=5s"]).unwrap();

        let err = config.bind_schema(outer_schema()).value("timeout").unwrap_err();
        assert!(matches!(
            err.conversion_error(),
            Some(ConversionError::UnsupportedConversion { .. })
        ));
    }

    #[test]
    fn test_nested_contract_ignores_raw_entry() {
        let mut config = Configuration::new();
        config.add_tokens(["--inner=whatever", "--depth=9"]).unwrap();

        let view = config.bind_schema(outer_schema());
        match view.resolve("inner").unwrap() {
            Resolved::Contract(inner) => assert_eq!(inner.get::<i32>("depth"), Ok(9)),
            Resolved::Value(value) => panic!("expected a nested view, got {:?}", value),
        }
    }

    #[test]
    fn test_unknown_accessor_and_kind_mismatch() {
        let config = Configuration::new();
        let view = config.bind_schema(outer_schema());

        assert_eq!(
            view.value("missing"),
            Err(BindError::UnknownAccessor {
                contract: "Outer".to_string(),
                accessor: "missing".to_string()
            })
        );
        assert!(view.value("inner").is_err());
        assert!(view.nested("intArg").is_err());
        assert!(matches!(
            view.get::<i64>("intArg").unwrap_err().conversion_error(),
            Some(ConversionError::TypeMismatch { .. })
        ));
    }
}
