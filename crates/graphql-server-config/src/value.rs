//! Dynamically-typed option values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;

use crate::callbacks::ErrorFormatter;
use crate::callbacks::ErrorsHandler;
use crate::callbacks::FieldResolver;
use crate::callbacks::PersistedQueryLoader;
use crate::callbacks::RulesFactory;
use crate::callbacks::ValidationRule;

/// A caller-chosen value stored without interpretation.
///
/// The execution context, root value, and promise adapter have no shape this
/// crate cares about: they are handed back to the execution engine exactly
/// as given. The concrete type name is captured at wrap time so that
/// configuration errors and `Debug` output can name it.
#[derive(Clone)]
pub struct OpaqueValue {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl OpaqueValue {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// The [`std::any::type_name`] of the wrapped value.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrows the wrapped value if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Whether two wrappers share the same underlying value.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl fmt::Debug for OpaqueValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpaqueValue({})", self.type_name)
    }
}

/// A dynamically-typed option value, as accepted by
/// [`ServerConfig::from_options`][crate::ServerConfig::from_options] and
/// [`set_validation_rules`][crate::ServerConfig::set_validation_rules].
///
/// One variant exists per semantic option type. `From` impls cover the
/// concrete slot types, so call sites mostly name a variant only for
/// [`Null`][Self::Null] and [`Opaque`][Self::Opaque].
#[derive(Clone)]
pub enum ConfigValue {
    /// Explicit absence: clears the option back to its default.
    Null,
    Schema(Arc<Valid<Schema>>),
    Opaque(OpaqueValue),
    ErrorFormatter(ErrorFormatter),
    ErrorsHandler(ErrorsHandler),
    FieldResolver(FieldResolver),
    QueryLoader(PersistedQueryLoader),
    Rules(Vec<ValidationRule>),
    RulesFactory(RulesFactory),
    Bool(bool),
}

impl ConfigValue {
    /// Wraps an arbitrary caller-chosen value, for the `context`,
    /// `rootValue`, and `promiseAdapter` options.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(OpaqueValue::new(value))
    }

    /// Wraps a closure producing the validation-rule sequence on demand.
    pub fn rules_factory(
        factory: impl Fn() -> Vec<ValidationRule> + Send + Sync + 'static,
    ) -> Self {
        Self::RulesFactory(Arc::new(factory))
    }

    /// The runtime type name reported by configuration errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Schema(_) => "Valid<Schema>",
            Self::Opaque(value) => value.type_name(),
            Self::ErrorFormatter(_) => "ErrorFormatter",
            Self::ErrorsHandler(_) => "ErrorsHandler",
            Self::FieldResolver(_) => "FieldResolver",
            Self::QueryLoader(_) => "PersistedQueryLoader",
            Self::Rules(_) => "Vec<ValidationRule>",
            Self::RulesFactory(_) => "RulesFactory",
            Self::Bool(_) => "bool",
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rules(rules) => write!(f, "Rules({} rules)", rules.len()),
            Self::Bool(flag) => write!(f, "Bool({flag})"),
            Self::Opaque(value) => write!(f, "Opaque({})", value.type_name()),
            other => f.write_str(other.type_name()),
        }
    }
}

impl From<Arc<Valid<Schema>>> for ConfigValue {
    fn from(schema: Arc<Valid<Schema>>) -> Self {
        Self::Schema(schema)
    }
}

impl From<Valid<Schema>> for ConfigValue {
    fn from(schema: Valid<Schema>) -> Self {
        Self::Schema(Arc::new(schema))
    }
}

impl From<OpaqueValue> for ConfigValue {
    fn from(value: OpaqueValue) -> Self {
        Self::Opaque(value)
    }
}

impl From<ErrorFormatter> for ConfigValue {
    fn from(formatter: ErrorFormatter) -> Self {
        Self::ErrorFormatter(formatter)
    }
}

impl From<ErrorsHandler> for ConfigValue {
    fn from(handler: ErrorsHandler) -> Self {
        Self::ErrorsHandler(handler)
    }
}

impl From<FieldResolver> for ConfigValue {
    fn from(resolver: FieldResolver) -> Self {
        Self::FieldResolver(resolver)
    }
}

impl From<PersistedQueryLoader> for ConfigValue {
    fn from(loader: PersistedQueryLoader) -> Self {
        Self::QueryLoader(loader)
    }
}

impl From<Vec<ValidationRule>> for ConfigValue {
    fn from(rules: Vec<ValidationRule>) -> Self {
        Self::Rules(rules)
    }
}

impl From<RulesFactory> for ConfigValue {
    fn from(factory: RulesFactory) -> Self {
        Self::RulesFactory(factory)
    }
}

impl From<bool> for ConfigValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}
