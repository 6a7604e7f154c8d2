//! Declarative macros for contracts and configuration enums

/// Declare a configuration enum with its literal names.
///
/// Each variant is matched by its own name unless a literal is given:
///
/// ```
/// cfgbind::config_enum! {
///     #[derive(Debug, Clone, Copy, PartialEq, Eq)]
///     pub enum LogFormat {
///         Json = "json",
///         Pretty = "pretty",
///     }
/// }
///
/// assert_eq!(LogFormat::Json.literal(), "json");
/// ```
#[macro_export]
macro_rules! config_enum {
    (@literal $variant:ident) => {
        stringify!($variant)
    };
    (@literal $variant:ident $literal:literal) => {
        $literal
    };
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident {
            $($variant:ident $(= $literal:literal)?),* $(,)?
        }
    ) => {
        $(#[$attr])*
        $vis enum $name {
            $($variant),*
        }

        impl $name {
            /// Literal names accepted for this enum
            pub const SCHEMA: $crate::EnumSchema = $crate::EnumSchema::new(
                stringify!($name),
                &[$($crate::config_enum!(@literal $variant $($literal)?)),*],
            );

            /// Literal name of this variant
            pub fn literal(&self) -> &'static str {
                match self {
                    $(Self::$variant => $crate::config_enum!(@literal $variant $($literal)?),)*
                }
            }
        }

        impl $crate::ConfigType for $name {
            fn descriptor() -> $crate::TypeDescriptor {
                $crate::TypeDescriptor::Enum(Self::SCHEMA)
            }

            fn from_value(
                value: $crate::Value,
            ) -> ::std::result::Result<Self, $crate::ConversionError> {
                if let $crate::Value::Enum(literal) = &value {
                    if literal.enum_name == Self::SCHEMA.name {
                        $(
                            if literal.literal == $crate::config_enum!(@literal $variant $($literal)?) {
                                return ::std::result::Result::Ok(Self::$variant);
                            }
                        )*
                    }
                }
                ::std::result::Result::Err($crate::ConversionError::TypeMismatch {
                    expected: ::std::string::ToString::to_string(
                        &<Self as $crate::ConfigType>::descriptor(),
                    ),
                    found: ::std::string::ToString::to_string(value.kind()),
                })
            }

            fn into_value(self) -> $crate::Value {
                $crate::Value::Enum($crate::EnumLiteral {
                    enum_name: Self::SCHEMA.name,
                    literal: self.literal(),
                })
            }
        }
    };
}

/// Declare a contract: its typed view, schema and one method per accessor.
///
/// Value accessors name their lookup key, optionally a `rename` key read
/// instead, a return type implementing [`ConfigType`](crate::ConfigType) and
/// a default. `nested fn` accessors return another contract's view bound over
/// the same configuration; they take no `rename` since no entry is read.
///
/// ```
/// cfgbind::contract! {
///     pub struct Server {
///         fn port("port") -> i32 = 8080;
///         fn home("home", rename = "user.home") -> String = String::new();
///         nested fn limits("limits") -> Limits;
///     }
/// }
///
/// cfgbind::contract! {
///     pub struct Limits {
///         fn burst("burst") -> i64 = 10;
///     }
/// }
///
/// let mut config = cfgbind::Configuration::new();
/// config.add_tokens(["--port=9000", "--burst=3"]).unwrap();
///
/// let server: Server = config.bind();
/// assert_eq!(server.port().unwrap(), 9000);
/// assert_eq!(server.limits().burst().unwrap(), 3);
/// ```
#[macro_export]
macro_rules! contract {
    (@munch
        [$($attrs:tt)*] [$vis:vis] $name:ident
        [$($accessors:tt)*] [$($methods:tt)*]
    ) => {
        $($attrs)*
        #[derive(Clone, Copy, Debug)]
        $vis struct $name<'a> {
            view: $crate::View<'a>,
        }

        impl<'a> $name<'a> {
            /// The untyped view behind this contract
            #[allow(dead_code)]
            pub fn view(&self) -> &$crate::View<'a> {
                &self.view
            }

            $($methods)*
        }

        impl<'a> $crate::Contract<'a> for $name<'a> {
            fn schema() -> &'static $crate::ContractSchema {
                static SCHEMA: ::std::sync::OnceLock<$crate::ContractSchema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::ContractSchema::new(
                        $crate::ContractId::of::<$name<'static>>(),
                        stringify!($name),
                        ::std::vec![$($accessors)*],
                    )
                })
            }

            fn from_view(view: $crate::View<'a>) -> Self {
                Self { view }
            }
        }
    };
    (@munch
        [$($attrs:tt)*] [$vis:vis] $name:ident
        [$($accessors:tt)*] [$($methods:tt)*]
        $(#[$meta:meta])*
        fn $method:ident($key:literal $(, rename = $rename:literal)?) -> $ty:ty = $default:expr;
        $($rest:tt)*
    ) => {
        $crate::contract! { @munch
            [$($attrs)*] [$vis] $name
            [
                $($accessors)*
                $crate::Accessor::typed::<$ty>($key, $default) $(.renamed($rename))?,
            ]
            [
                $($methods)*
                $(#[$meta])*
                pub fn $method(&self) -> $crate::Result<$ty> {
                    self.view.get::<$ty>($key)
                }
            ]
            $($rest)*
        }
    };
    (@munch
        [$($attrs:tt)*] [$vis:vis] $name:ident
        [$($accessors:tt)*] [$($methods:tt)*]
        $(#[$meta:meta])*
        nested fn $method:ident($key:literal) -> $nested:ident;
        $($rest:tt)*
    ) => {
        $crate::contract! { @munch
            [$($attrs)*] [$vis] $name
            [
                $($accessors)*
                $crate::Accessor::contract(
                    $key,
                    <$nested<'static> as $crate::Contract<'static>>::schema,
                ),
            ]
            [
                $($methods)*
                $(#[$meta])*
                pub fn $method(&self) -> $nested<'a> {
                    self.view.bind::<$nested<'a>>()
                }
            ]
            $($rest)*
        }
    };
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident {
            $($body:tt)*
        }
    ) => {
        $crate::contract! { @munch
            [$(#[$attr])*] [$vis] $name [] []
            $($body)*
        }
    };
}
