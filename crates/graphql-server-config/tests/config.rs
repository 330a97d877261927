use std::sync::Arc;

use apollo_compiler::execution::JsonValue;
use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use graphql_server_config::ConfigValue;
use graphql_server_config::ErrorFormatter;
use graphql_server_config::ErrorsHandler;
use graphql_server_config::FieldResolver;
use graphql_server_config::OpaqueValue;
use graphql_server_config::PersistedQueryLoader;
use graphql_server_config::RulesFactory;
use graphql_server_config::ServerConfig;
use graphql_server_config::ValidationRule;
use graphql_server_config::ValidationRules;
use pretty_assertions::assert_eq;

fn test_schema() -> Arc<Valid<Schema>> {
    Arc::new(Schema::parse_and_validate("type Query { a: String }", "schema.graphql").unwrap())
}

fn no_errors() -> ValidationRule {
    Arc::new(|_, _| Vec::new())
}

#[test]
fn defaults() {
    let config = ServerConfig::new();
    assert!(config.schema().is_none());
    assert!(config.context().is_none());
    assert!(config.root_value().is_none());
    assert!(config.error_formatter().is_none());
    assert!(config.errors_handler().is_none());
    assert!(config.promise_adapter().is_none());
    assert!(config.validation_rules().is_none());
    assert!(config.field_resolver().is_none());
    assert!(config.persisted_query_loader().is_none());
    assert!(!config.debug());
    assert!(!config.query_batching());
}

#[test]
fn allows_setting_schema() {
    let schema = test_schema();
    let mut config = ServerConfig::new();
    config.set_schema(Arc::clone(&schema));
    assert!(Arc::ptr_eq(config.schema().unwrap(), &schema));

    let schema2 = test_schema();
    config.set_schema(Arc::clone(&schema2));
    assert!(Arc::ptr_eq(config.schema().unwrap(), &schema2));
}

#[test]
fn allows_setting_context() {
    let mut config = ServerConfig::new();

    let context = OpaqueValue::new(Vec::<String>::new());
    config.set_context(context.clone());
    assert!(config.context().unwrap().ptr_eq(&context));

    // re-assignment overwrites, and the wrapped type may change freely
    let context2 = OpaqueValue::new("session token");
    config.set_context(context2.clone());
    assert!(config.context().unwrap().ptr_eq(&context2));
    assert_eq!(
        config.context().unwrap().downcast_ref::<&str>(),
        Some(&"session token"),
    );
}

#[test]
fn allows_setting_root_value() {
    let mut config = ServerConfig::new();

    let root_value = OpaqueValue::new(Vec::<u32>::new());
    config.set_root_value(root_value.clone());
    assert!(config.root_value().unwrap().ptr_eq(&root_value));

    let root_value2 = OpaqueValue::new(0u32);
    config.set_root_value(root_value2.clone());
    assert!(config.root_value().unwrap().ptr_eq(&root_value2));
}

#[test]
fn allows_setting_error_formatter() {
    let mut config = ServerConfig::new();

    let formatter: ErrorFormatter =
        Arc::new(|error| JsonValue::String(error.message.clone().into()));
    config.set_error_formatter(formatter.clone());
    assert!(Arc::ptr_eq(config.error_formatter().unwrap(), &formatter));

    let formatter2: ErrorFormatter = Arc::new(|_| JsonValue::Null);
    config.set_error_formatter(formatter2.clone());
    assert!(Arc::ptr_eq(config.error_formatter().unwrap(), &formatter2));
}

#[test]
fn allows_setting_errors_handler() {
    let mut config = ServerConfig::new();

    let handler: ErrorsHandler =
        Arc::new(|errors, formatter| errors.iter().map(|error| formatter(error)).collect());
    config.set_errors_handler(handler.clone());
    assert!(Arc::ptr_eq(config.errors_handler().unwrap(), &handler));

    let handler2: ErrorsHandler = Arc::new(|_, _| Vec::new());
    config.set_errors_handler(handler2.clone());
    assert!(Arc::ptr_eq(config.errors_handler().unwrap(), &handler2));
}

struct SyncAdapter;

#[test]
fn allows_setting_promise_adapter() {
    let mut config = ServerConfig::new();

    let adapter = OpaqueValue::new(SyncAdapter);
    config.set_promise_adapter(adapter.clone());
    assert!(config.promise_adapter().unwrap().ptr_eq(&adapter));
    assert!(config
        .promise_adapter()
        .unwrap()
        .downcast_ref::<SyncAdapter>()
        .is_some());

    let adapter2 = OpaqueValue::new(SyncAdapter);
    config.set_promise_adapter(adapter2.clone());
    assert!(config.promise_adapter().unwrap().ptr_eq(&adapter2));
}

#[test]
fn allows_setting_validation_rules() {
    let mut config = ServerConfig::new();

    config
        .set_validation_rules(Vec::<ValidationRule>::new())
        .unwrap();
    match config.validation_rules() {
        Some(ValidationRules::Fixed(rules)) => assert!(rules.is_empty()),
        other => panic!("expected fixed rules, got {other:?}"),
    }

    let rule = no_errors();
    config.set_validation_rules(vec![rule.clone()]).unwrap();
    match config.validation_rules() {
        Some(ValidationRules::Fixed(rules)) => {
            assert_eq!(rules.len(), 1);
            assert!(Arc::ptr_eq(&rules[0], &rule));
        }
        other => panic!("expected fixed rules, got {other:?}"),
    }

    let factory: RulesFactory = Arc::new(|| vec![no_errors()]);
    config
        .set_validation_rules(ConfigValue::RulesFactory(factory.clone()))
        .unwrap();
    match config.validation_rules() {
        Some(ValidationRules::Lazy(stored)) => assert!(Arc::ptr_eq(stored, &factory)),
        other => panic!("expected lazy rules, got {other:?}"),
    }

    // the factory is stored unevaluated; resolving is a point-of-use concern
    assert!(config.validation_rules().unwrap().is_lazy());
    assert_eq!(config.validation_rules().unwrap().to_rules().len(), 1);
}

#[test]
fn clears_validation_rules() {
    let mut config = ServerConfig::new();
    config.set_validation_rules(vec![no_errors()]).unwrap();
    assert!(config.validation_rules().is_some());

    config.set_validation_rules(ConfigValue::Null).unwrap();
    assert!(config.validation_rules().is_none());
}

struct NotRules;

#[test]
fn rejects_invalid_validation_rules() {
    let mut config = ServerConfig::new();
    let rule = no_errors();
    config.set_validation_rules(vec![rule.clone()]).unwrap();

    let err = config
        .set_validation_rules(ConfigValue::opaque(NotRules))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Server config expects array of validation rules or callable \
             returning such array, but got instance of {}",
            std::any::type_name::<NotRules>(),
        ),
    );

    // the failed assignment left the previous value in place
    match config.validation_rules() {
        Some(ValidationRules::Fixed(rules)) => assert!(Arc::ptr_eq(&rules[0], &rule)),
        other => panic!("expected fixed rules, got {other:?}"),
    }
}

#[test]
fn allows_setting_field_resolver() {
    let mut config = ServerConfig::new();

    let resolver: FieldResolver = Arc::new(|_, _, _| Ok(JsonValue::Null));
    config.set_field_resolver(resolver.clone());
    assert!(Arc::ptr_eq(config.field_resolver().unwrap(), &resolver));

    let resolver2: FieldResolver = Arc::new(|parent, _, _| Ok(parent.clone()));
    config.set_field_resolver(resolver2.clone());
    assert!(Arc::ptr_eq(config.field_resolver().unwrap(), &resolver2));
}

#[test]
fn allows_setting_persisted_query_loader() {
    let mut config = ServerConfig::new();

    let loader: PersistedQueryLoader = Arc::new(|_| Ok("{ a }".to_owned()));
    config.set_persisted_query_loader(loader.clone());
    assert!(Arc::ptr_eq(config.persisted_query_loader().unwrap(), &loader));

    let loader2: PersistedQueryLoader = Arc::new(|_| Ok(String::new()));
    config.set_persisted_query_loader(loader2.clone());
    assert!(Arc::ptr_eq(config.persisted_query_loader().unwrap(), &loader2));
}

#[test]
fn allows_toggling_debug() {
    let mut config = ServerConfig::new();

    config.set_debug(true);
    assert!(config.debug());

    config.set_debug(false);
    assert!(!config.debug());
}

#[test]
fn allows_toggling_query_batching() {
    let mut config = ServerConfig::new();

    config.set_query_batching(true);
    assert!(config.query_batching());

    config.set_query_batching(false);
    assert!(!config.query_batching());
}

#[test]
fn mutators_chain_on_the_same_instance() {
    let schema = test_schema();

    let mut chained = ServerConfig::new();
    chained
        .set_schema(Arc::clone(&schema))
        .set_debug(true)
        .set_query_batching(true);

    let mut separate = ServerConfig::new();
    separate.set_schema(Arc::clone(&schema));
    separate.set_debug(true);
    separate.set_query_batching(true);

    assert!(Arc::ptr_eq(chained.schema().unwrap(), separate.schema().unwrap()));
    assert_eq!(chained.debug(), separate.debug());
    assert_eq!(chained.query_batching(), separate.query_batching());
}

#[test]
fn chains_through_validation_rules() {
    let mut config = ServerConfig::new();
    config
        .set_validation_rules(vec![no_errors()])
        .unwrap()
        .set_debug(true);

    assert!(config.validation_rules().is_some());
    assert!(config.debug());
}

#[test]
fn cloning_shares_option_values() {
    let mut config = ServerConfig::new();
    let formatter: ErrorFormatter = Arc::new(|_| JsonValue::Null);
    config.set_error_formatter(formatter.clone());

    let cloned = config.clone();
    assert!(Arc::ptr_eq(cloned.error_formatter().unwrap(), &formatter));

    // but not slot storage: mutating the clone leaves the original alone
    let mut cloned = cloned;
    cloned.set_debug(true);
    assert!(!config.debug());
}

#[test]
fn debug_output_marks_presence() {
    let mut config = ServerConfig::new();
    config.set_debug(true);

    let rendered = format!("{config:?}");
    assert!(rendered.contains("debug: true"));
    assert!(rendered.contains("schema: None"));
}
