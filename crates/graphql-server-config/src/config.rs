//! The server configuration object.

use std::fmt;
use std::sync::Arc;

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use indexmap::IndexMap;

use crate::callbacks::ErrorFormatter;
use crate::callbacks::ErrorsHandler;
use crate::callbacks::FieldResolver;
use crate::callbacks::PersistedQueryLoader;
use crate::callbacks::ValidationRules;
use crate::value::ConfigValue;
use crate::value::OpaqueValue;

/// An ordered option-name to value mapping for
/// [`ServerConfig::from_options`].
pub type ConfigOptions = IndexMap<String, ConfigValue>;

/// An invalid configuration input.
///
/// Raised synchronously at the point of assignment and propagated unchanged
/// to the caller. A `ConfigError` is a startup-time programming error in the
/// server wiring, not a request failure: it occurs while the configuration
/// is assembled, before any request is served.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A bulk-construction key outside the recognized option set.
    #[error("Unknown server config option \"{0}\"")]
    UnknownOption(String),

    /// A `validationRules` value that is neither a rule sequence nor a
    /// factory producing one.
    #[error("Server config expects array of validation rules or callable returning such array, but got instance of {0}")]
    InvalidValidationRules(&'static str),

    /// A bulk-construction value whose type does not fit the named option.
    #[error("Server config option \"{key}\" expects {expected}, but got instance of {actual}")]
    InvalidOptionValue {
        key: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}

/// All the knobs needed to execute incoming GraphQL requests.
///
/// `ServerConfig` is a passive value holder: it stores what it is given and
/// hands it back unchanged. The only shape checked at assignment time is the
/// `validationRules` option; every other option defers validation to its
/// point of use in the request pipeline.
///
/// Mutators return `&mut Self`, so a configuration can be built fluently:
///
/// ```
/// use graphql_server_config::OpaqueValue;
/// use graphql_server_config::ServerConfig;
///
/// let mut config = ServerConfig::new();
/// config
///     .set_root_value(OpaqueValue::new(Vec::<String>::new()))
///     .set_debug(true)
///     .set_query_batching(true);
///
/// assert!(config.debug());
/// ```
///
/// The config carries no internal synchronization. Configure an instance
/// fully, then share it immutably with concurrent request-handling contexts;
/// mutation after sharing must be serialized externally.
#[derive(Clone, Default)]
pub struct ServerConfig {
    schema: Option<Arc<Valid<Schema>>>,
    context: Option<OpaqueValue>,
    root_value: Option<OpaqueValue>,
    error_formatter: Option<ErrorFormatter>,
    errors_handler: Option<ErrorsHandler>,
    promise_adapter: Option<OpaqueValue>,
    validation_rules: Option<ValidationRules>,
    field_resolver: Option<FieldResolver>,
    persisted_query_loader: Option<PersistedQueryLoader>,
    debug: bool,
    query_batching: bool,
}

impl ServerConfig {
    /// Every option name recognized by [`from_options`][Self::from_options],
    /// in declaration order.
    pub const OPTION_NAMES: [&'static str; 11] = [
        "schema",
        "context",
        "rootValue",
        "errorFormatter",
        "errorsHandler",
        "promiseAdapter",
        "validationRules",
        "fieldResolver",
        "persistentQueryLoader",
        "debug",
        "queryBatching",
    ];

    /// Returns a configuration with every option at its default: absent for
    /// the handle and callback options, `false` for the two flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a configuration from an option mapping.
    ///
    /// Each entry is routed to the matching mutator, applying the same
    /// per-option validation as direct mutator calls. The first entry whose
    /// name is not in [`OPTION_NAMES`][Self::OPTION_NAMES], or whose value
    /// does not fit its option, fails the whole construction.
    ///
    /// An empty mapping is equivalent to [`ServerConfig::new`].
    ///
    /// ```
    /// use graphql_server_config::ConfigOptions;
    /// use graphql_server_config::ConfigValue;
    /// use graphql_server_config::ServerConfig;
    ///
    /// let mut options = ConfigOptions::new();
    /// options.insert("debug".to_owned(), ConfigValue::Bool(true));
    /// let config = ServerConfig::from_options(options).unwrap();
    /// assert!(config.debug());
    ///
    /// let err = ServerConfig::from_options([("missingKey", ConfigValue::Bool(true))]);
    /// assert_eq!(
    ///     err.unwrap_err().to_string(),
    ///     "Unknown server config option \"missingKey\"",
    /// );
    /// ```
    pub fn from_options<K, I>(options: I) -> Result<Self, ConfigError>
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, ConfigValue)>,
    {
        let mut config = Self::new();
        for (key, value) in options {
            config.apply_option(key.as_ref(), value)?;
        }
        Ok(config)
    }

    /// The option-name registry: routes one mapping entry to its mutator.
    fn apply_option(&mut self, key: &str, value: ConfigValue) -> Result<(), ConfigError> {
        match key {
            "schema" => match value {
                ConfigValue::Schema(schema) => {
                    self.set_schema(schema);
                }
                other => return Err(mismatch("schema", "a schema handle", &other)),
            },
            "context" => match value {
                ConfigValue::Opaque(context) => {
                    self.set_context(context);
                }
                other => return Err(mismatch("context", "an opaque value", &other)),
            },
            "rootValue" => match value {
                ConfigValue::Opaque(root_value) => {
                    self.set_root_value(root_value);
                }
                other => return Err(mismatch("rootValue", "an opaque value", &other)),
            },
            "errorFormatter" => match value {
                ConfigValue::ErrorFormatter(formatter) => {
                    self.set_error_formatter(formatter);
                }
                other => return Err(mismatch("errorFormatter", "an error formatter", &other)),
            },
            "errorsHandler" => match value {
                ConfigValue::ErrorsHandler(handler) => {
                    self.set_errors_handler(handler);
                }
                other => return Err(mismatch("errorsHandler", "an errors handler", &other)),
            },
            "promiseAdapter" => match value {
                ConfigValue::Opaque(adapter) => {
                    self.set_promise_adapter(adapter);
                }
                other => return Err(mismatch("promiseAdapter", "an opaque value", &other)),
            },
            "validationRules" => {
                self.set_validation_rules(value)?;
            }
            "fieldResolver" => match value {
                ConfigValue::FieldResolver(resolver) => {
                    self.set_field_resolver(resolver);
                }
                other => return Err(mismatch("fieldResolver", "a field resolver", &other)),
            },
            "persistentQueryLoader" => match value {
                ConfigValue::QueryLoader(loader) => {
                    self.set_persisted_query_loader(loader);
                }
                other => {
                    return Err(mismatch(
                        "persistentQueryLoader",
                        "a persisted-query loader",
                        &other,
                    ))
                }
            },
            "debug" => match value {
                ConfigValue::Bool(flag) => {
                    self.set_debug(flag);
                }
                other => return Err(mismatch("debug", "a bool", &other)),
            },
            "queryBatching" => match value {
                ConfigValue::Bool(flag) => {
                    self.set_query_batching(flag);
                }
                other => return Err(mismatch("queryBatching", "a bool", &other)),
            },
            unknown => return Err(ConfigError::UnknownOption(unknown.to_owned())),
        }
        Ok(())
    }

    /// The schema the server executes against.
    pub fn schema(&self) -> Option<&Arc<Valid<Schema>>> {
        self.schema.as_ref()
    }

    pub fn set_schema(&mut self, schema: Arc<Valid<Schema>>) -> &mut Self {
        self.schema = Some(schema);
        self
    }

    /// The caller-chosen execution context passed to resolvers.
    pub fn context(&self) -> Option<&OpaqueValue> {
        self.context.as_ref()
    }

    pub fn set_context(&mut self, context: OpaqueValue) -> &mut Self {
        self.context = Some(context);
        self
    }

    /// The caller-chosen root value execution starts from.
    pub fn root_value(&self) -> Option<&OpaqueValue> {
        self.root_value.as_ref()
    }

    pub fn set_root_value(&mut self, root_value: OpaqueValue) -> &mut Self {
        self.root_value = Some(root_value);
        self
    }

    pub fn error_formatter(&self) -> Option<&ErrorFormatter> {
        self.error_formatter.as_ref()
    }

    pub fn set_error_formatter(&mut self, formatter: ErrorFormatter) -> &mut Self {
        self.error_formatter = Some(formatter);
        self
    }

    pub fn errors_handler(&self) -> Option<&ErrorsHandler> {
        self.errors_handler.as_ref()
    }

    pub fn set_errors_handler(&mut self, handler: ErrorsHandler) -> &mut Self {
        self.errors_handler = Some(handler);
        self
    }

    /// The concurrency adapter handed to the execution engine. Not
    /// interpreted here: whatever resolution strategy the engine understands.
    pub fn promise_adapter(&self) -> Option<&OpaqueValue> {
        self.promise_adapter.as_ref()
    }

    pub fn set_promise_adapter(&mut self, adapter: OpaqueValue) -> &mut Self {
        self.promise_adapter = Some(adapter);
        self
    }

    /// The configured query-validation rules, in whichever of the two
    /// accepted shapes they were given.
    pub fn validation_rules(&self) -> Option<&ValidationRules> {
        self.validation_rules.as_ref()
    }

    /// Sets the `validationRules` option.
    ///
    /// Accepts [`ConfigValue::Null`] (clears the option), a rule sequence of
    /// any length (stored verbatim), or a factory (stored unevaluated). Any
    /// other value is rejected, leaving the previously stored rules
    /// untouched:
    ///
    /// ```
    /// use graphql_server_config::ConfigValue;
    /// use graphql_server_config::ServerConfig;
    ///
    /// let mut config = ServerConfig::new();
    /// let err = config.set_validation_rules(ConfigValue::Bool(true)).unwrap_err();
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Server config expects array of validation rules or callable returning such array, \
    ///      but got instance of bool",
    /// );
    /// ```
    pub fn set_validation_rules(
        &mut self,
        rules: impl Into<ConfigValue>,
    ) -> Result<&mut Self, ConfigError> {
        match rules.into() {
            ConfigValue::Null => self.validation_rules = None,
            ConfigValue::Rules(rules) => {
                self.validation_rules = Some(ValidationRules::Fixed(rules));
            }
            ConfigValue::RulesFactory(factory) => {
                self.validation_rules = Some(ValidationRules::Lazy(factory));
            }
            other => return Err(ConfigError::InvalidValidationRules(other.type_name())),
        }
        Ok(self)
    }

    /// The fallback resolver for fields without a dedicated one.
    pub fn field_resolver(&self) -> Option<&FieldResolver> {
        self.field_resolver.as_ref()
    }

    pub fn set_field_resolver(&mut self, resolver: FieldResolver) -> &mut Self {
        self.field_resolver = Some(resolver);
        self
    }

    pub fn persisted_query_loader(&self) -> Option<&PersistedQueryLoader> {
        self.persisted_query_loader.as_ref()
    }

    pub fn set_persisted_query_loader(&mut self, loader: PersistedQueryLoader) -> &mut Self {
        self.persisted_query_loader = Some(loader);
        self
    }

    /// Whether error output includes debug detail.
    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn set_debug(&mut self, debug: bool) -> &mut Self {
        self.debug = debug;
        self
    }

    /// Whether the server accepts batched queries in one request.
    pub fn query_batching(&self) -> bool {
        self.query_batching
    }

    pub fn set_query_batching(&mut self, query_batching: bool) -> &mut Self {
        self.query_batching = query_batching;
        self
    }
}

fn mismatch(key: &'static str, expected: &'static str, value: &ConfigValue) -> ConfigError {
    ConfigError::InvalidOptionValue {
        key,
        expected,
        actual: value.type_name(),
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Callback options render as presence markers.
        f.debug_struct("ServerConfig")
            .field("schema", &self.schema.as_ref().map(|_| "Valid<Schema>"))
            .field("context", &self.context)
            .field("root_value", &self.root_value)
            .field("error_formatter", &self.error_formatter.as_ref().map(|_| ".."))
            .field("errors_handler", &self.errors_handler.as_ref().map(|_| ".."))
            .field("promise_adapter", &self.promise_adapter)
            .field("validation_rules", &self.validation_rules)
            .field("field_resolver", &self.field_resolver.as_ref().map(|_| ".."))
            .field(
                "persisted_query_loader",
                &self.persisted_query_loader.as_ref().map(|_| ".."),
            )
            .field("debug", &self.debug)
            .field("query_batching", &self.query_batching)
            .finish()
    }
}
