//! Function-reference option types.
//!
//! Every callback the server config carries is an `Arc<dyn Fn …>`: shared,
//! cheap to clone, and identity-comparable with [`Arc::ptr_eq`]. The config
//! stores these unchanged and never invokes them; they belong to the request
//! pipeline.

use std::fmt;
use std::sync::Arc;

use apollo_compiler::execution::GraphQLError;
use apollo_compiler::execution::JsonMap;
use apollo_compiler::execution::JsonValue;
use apollo_compiler::validation::Valid;
use apollo_compiler::ExecutableDocument;
use apollo_compiler::Schema;

/// Formats a single execution error for the `errors` array of a response.
pub type ErrorFormatter = Arc<dyn Fn(&GraphQLError) -> JsonValue + Send + Sync>;

/// Post-processes the full error list of a response, with access to the
/// configured [`ErrorFormatter`].
pub type ErrorsHandler =
    Arc<dyn Fn(&[GraphQLError], &ErrorFormatter) -> Vec<JsonValue> + Send + Sync>;

/// Fallback resolver for fields without a dedicated one.
///
/// Receives the parent value, the field name, and the coerced argument map.
pub type FieldResolver =
    Arc<dyn Fn(&JsonValue, &str, &JsonMap) -> Result<JsonValue, GraphQLError> + Send + Sync>;

/// Resolves a persisted query id to its source text.
pub type PersistedQueryLoader =
    Arc<dyn Fn(&str) -> Result<String, GraphQLError> + Send + Sync>;

/// A single query-validation callback, run against the schema and the parsed
/// request document before execution.
pub type ValidationRule =
    Arc<dyn Fn(&Valid<Schema>, &ExecutableDocument) -> Vec<GraphQLError> + Send + Sync>;

/// Produces the validation-rule sequence on demand.
pub type RulesFactory = Arc<dyn Fn() -> Vec<ValidationRule> + Send + Sync>;

/// The two accepted shapes of the `validationRules` option.
///
/// A fixed sequence is stored verbatim, whatever its length. A factory is
/// stored unevaluated; nothing invokes it at configuration time.
#[derive(Clone)]
pub enum ValidationRules {
    Fixed(Vec<ValidationRule>),
    Lazy(RulesFactory),
}

impl ValidationRules {
    /// Returns the effective rule sequence, invoking the factory if the
    /// rules were configured lazily.
    ///
    /// Meant for the point of use in the request pipeline, not for
    /// configuration-time code.
    pub fn to_rules(&self) -> Vec<ValidationRule> {
        match self {
            Self::Fixed(rules) => rules.clone(),
            Self::Lazy(factory) => factory(),
        }
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Self::Lazy(_))
    }
}

impl fmt::Debug for ValidationRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(rules) => write!(f, "Fixed({} rules)", rules.len()),
            Self::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}
