#![doc = include_str!("../README.md")]

mod callbacks;
mod config;
mod value;

pub use self::callbacks::ErrorFormatter;
pub use self::callbacks::ErrorsHandler;
pub use self::callbacks::FieldResolver;
pub use self::callbacks::PersistedQueryLoader;
pub use self::callbacks::RulesFactory;
pub use self::callbacks::ValidationRule;
pub use self::callbacks::ValidationRules;
pub use self::config::ConfigError;
pub use self::config::ConfigOptions;
pub use self::config::ServerConfig;
pub use self::value::ConfigValue;
pub use self::value::OpaqueValue;
