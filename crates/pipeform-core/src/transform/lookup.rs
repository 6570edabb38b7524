//! `LOOKUP`: resolve values through an entity store or a static table
//!
//! Lookup is the only transform that performs I/O, so it lives outside the
//! synchronous registry. The entity store and the logger are injected through
//! [`LookupContext`]; every failure is logged at WARN and resolves to `null`.
//!
//! Copyright (c) 2025 Pipeform Team
//! Licensed under the Apache-2.0 license

use super::map::lookup_static;
use super::types::{LookupType, TransformConfig};
use crate::value::{get_nested_value, to_js_string, values_equal};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_FROM_FIELD: &str = "code";
const DEFAULT_TO_FIELD: &str = "id";

/// Entity types the store can resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Product,
    ProductVariant,
    Customer,
    Collection,
    Facet,
    FacetValue,
    Asset,
    CustomerGroup,
}

impl EntityType {
    pub const ALL: [EntityType; 8] = [
        Self::Product,
        Self::ProductVariant,
        Self::Customer,
        Self::Collection,
        Self::Facet,
        Self::FacetValue,
        Self::Asset,
        Self::CustomerGroup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::ProductVariant => "ProductVariant",
            Self::Customer => "Customer",
            Self::Collection => "Collection",
            Self::Facet => "Facet",
            Self::FacetValue => "FacetValue",
            Self::Asset => "Asset",
            Self::CustomerGroup => "CustomerGroup",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| LookupError::UnknownEntityType(s.to_string()))
    }
}

/// Errors raised by entity repositories
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Unknown entity type '{0}'")]
    UnknownEntityType(String),

    #[error("Lookup on {entity_type} failed: {message}")]
    Repository {
        entity_type: EntityType,
        message: String,
    },

    #[error("Invalid entity fixtures: {0}")]
    InvalidFixtures(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Request-scoped data handed through to the repository untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestContext {
    pub channel_token: Option<String>,
    pub language_code: Option<String>,
}

/// Entity store consumed by `LOOKUP`
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Return the first entity of `entity_type` whose fields equal every entry
    /// of `filter`, or `None`.
    async fn find_one(
        &self,
        ctx: &RequestContext,
        entity_type: EntityType,
        filter: &Map<String, Value>,
    ) -> Result<Option<Value>, LookupError>;
}

/// Sink for lookup failures
pub trait LookupLogger: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards lookup warnings to the `log` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLookupLogger;

impl LookupLogger for LogLookupLogger {
    fn warn(&self, message: &str) {
        log::warn!("{}", message);
    }
}

/// Capabilities a lookup needs: the request, the store and the logger
#[derive(Clone)]
pub struct LookupContext {
    pub request: RequestContext,
    pub repository: Arc<dyn EntityRepository>,
    pub logger: Arc<dyn LookupLogger>,
}

impl LookupContext {
    /// Context logging through [`LogLookupLogger`]
    pub fn new(repository: Arc<dyn EntityRepository>) -> Self {
        Self {
            request: RequestContext::default(),
            repository,
            logger: Arc::new(LogLookupLogger),
        }
    }

    pub fn with_request(mut self, request: RequestContext) -> Self {
        self.request = request;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn LookupLogger>) -> Self {
        self.logger = logger;
        self
    }
}

impl fmt::Debug for LookupContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupContext")
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}

/// Resolve `value` through the entity store or the static `values` table.
///
/// - `null` resolves to `null`
/// - `lookupType` forces a branch; otherwise `entityType` selects the entity
///   store and `values` the static table
/// - with neither configured the value passes through
pub async fn perform_lookup(
    value: &Value,
    config: &TransformConfig,
    _record: Option<&Value>,
    lookup: &LookupContext,
) -> Value {
    if value.is_null() {
        return Value::Null;
    }

    let lookup_type = config.lookup_type.or_else(|| {
        if config.entity_type.is_some() {
            Some(LookupType::Entity)
        } else if config.values.is_some() {
            Some(LookupType::Static)
        } else {
            None
        }
    });

    match lookup_type {
        Some(LookupType::Entity) => lookup_entity(value, config, lookup).await,
        Some(LookupType::Static) => lookup_static_value(value, config),
        None => value.clone(),
    }
}

fn lookup_static_value(value: &Value, config: &TransformConfig) -> Value {
    let Some(table) = &config.values else {
        return value.clone();
    };
    let case_sensitive = config.case_sensitive != Some(false);
    lookup_static(table, &to_js_string(value), case_sensitive)
        .cloned()
        .unwrap_or_else(|| config.default_or_null())
}

async fn lookup_entity(value: &Value, config: &TransformConfig, lookup: &LookupContext) -> Value {
    let Some(raw_type) = config.entity_type.as_deref() else {
        lookup.logger.warn("Entity lookup configured without an entityType");
        return Value::Null;
    };
    let entity_type = match raw_type.parse::<EntityType>() {
        Ok(entity_type) => entity_type,
        Err(err) => {
            lookup.logger.warn(&err.to_string());
            return Value::Null;
        }
    };

    let from_field = config.from_field.as_deref().unwrap_or(DEFAULT_FROM_FIELD);
    let to_field = config.to_field.as_deref().unwrap_or(DEFAULT_TO_FIELD);

    let mut filter = Map::new();
    filter.insert(from_field.to_string(), value.clone());

    match lookup
        .repository
        .find_one(&lookup.request, entity_type, &filter)
        .await
    {
        Ok(Some(entity)) => get_nested_value(&entity, to_field),
        Ok(None) => Value::Null,
        Err(err) => {
            lookup.logger.warn(&format!(
                "Lookup of {} by {}={} failed: {}",
                entity_type,
                from_field,
                to_js_string(value),
                err
            ));
            Value::Null
        }
    }
}

/// Entity store backed by in-memory fixtures
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    entities: HashMap<EntityType, Vec<Value>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add entities of one type
    pub fn with_entities(mut self, entity_type: EntityType, entities: Vec<Value>) -> Self {
        self.entities.entry(entity_type).or_default().extend(entities);
        self
    }

    /// Build from `{"Product": [{...}, ...], "Customer": [...]}`
    pub fn from_fixtures(fixtures: &Value) -> Result<Self, LookupError> {
        let groups = fixtures
            .as_object()
            .ok_or_else(|| LookupError::InvalidFixtures("expected an object of entity lists".to_string()))?;

        let mut repository = Self::new();
        for (name, entities) in groups {
            let entity_type = name.parse::<EntityType>()?;
            let entities = entities.as_array().ok_or_else(|| {
                LookupError::InvalidFixtures(format!("'{}' must be an array of entities", name))
            })?;
            repository = repository.with_entities(entity_type, entities.clone());
        }
        Ok(repository)
    }

    pub fn len(&self) -> usize {
        self.entities.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EntityRepository for InMemoryRepository {
    async fn find_one(
        &self,
        _ctx: &RequestContext,
        entity_type: EntityType,
        filter: &Map<String, Value>,
    ) -> Result<Option<Value>, LookupError> {
        let found = self.entities.get(&entity_type).and_then(|entities| {
            entities.iter().find(|entity| {
                filter
                    .iter()
                    .all(|(field, expected)| values_equal(&get_nested_value(entity, field), expected))
            })
        });
        Ok(found.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingLogger {
        messages: Mutex<Vec<String>>,
    }

    impl LookupLogger for CapturingLogger {
        fn warn(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    struct FailingRepository;

    #[async_trait]
    impl EntityRepository for FailingRepository {
        async fn find_one(
            &self,
            _ctx: &RequestContext,
            entity_type: EntityType,
            _filter: &Map<String, Value>,
        ) -> Result<Option<Value>, LookupError> {
            Err(LookupError::Repository {
                entity_type,
                message: "connection refused".to_string(),
            })
        }
    }

    fn products() -> InMemoryRepository {
        InMemoryRepository::new().with_entities(
            EntityType::Product,
            vec![
                json!({"id": 1, "code": "shoe", "sku": "SH-1"}),
                json!({"id": 2, "code": "hat", "sku": "HT-1"}),
            ],
        )
    }

    fn entity_config(entity_type: &str) -> TransformConfig {
        TransformConfig {
            entity_type: Some(entity_type.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_entity_lookup_defaults_code_to_id() {
        let lookup = LookupContext::new(Arc::new(products()));
        let config = entity_config("Product");
        assert_eq!(perform_lookup(&json!("hat"), &config, None, &lookup).await, json!(2));
        assert_eq!(perform_lookup(&json!("boot"), &config, None, &lookup).await, Value::Null);
    }

    #[tokio::test]
    async fn test_entity_lookup_custom_fields() {
        let lookup = LookupContext::new(Arc::new(products()));
        let config = TransformConfig {
            from_field: Some("sku".to_string()),
            to_field: Some("code".to_string()),
            ..entity_config("Product")
        };
        assert_eq!(perform_lookup(&json!("SH-1"), &config, None, &lookup).await, json!("shoe"));
    }

    #[tokio::test]
    async fn test_null_value_short_circuits() {
        let logger = Arc::new(CapturingLogger::default());
        let lookup = LookupContext::new(Arc::new(FailingRepository)).with_logger(logger.clone());
        let result = perform_lookup(&Value::Null, &entity_config("Product"), None, &lookup).await;
        assert_eq!(result, Value::Null);
        assert!(logger.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repository_errors_are_logged_and_swallowed() {
        let logger = Arc::new(CapturingLogger::default());
        let lookup = LookupContext::new(Arc::new(FailingRepository)).with_logger(logger.clone());
        let result = perform_lookup(&json!("shoe"), &entity_config("Customer"), None, &lookup).await;

        assert_eq!(result, Value::Null);
        let messages = logger.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("connection refused"));
        assert!(messages[0].contains("Customer"));
    }

    #[tokio::test]
    async fn test_unknown_entity_type_is_logged() {
        let logger = Arc::new(CapturingLogger::default());
        let lookup = LookupContext::new(Arc::new(products())).with_logger(logger.clone());
        let result = perform_lookup(&json!("shoe"), &entity_config("Order"), None, &lookup).await;

        assert_eq!(result, Value::Null);
        assert!(logger.messages.lock().unwrap()[0].contains("Order"));
    }

    #[tokio::test]
    async fn test_static_lookup_uses_string_form() {
        let lookup = LookupContext::new(Arc::new(InMemoryRepository::new()));
        let config = TransformConfig {
            values: json!({"1": "one", "a": "A"}).as_object().cloned(),
            ..Default::default()
        };
        assert_eq!(perform_lookup(&json!(1), &config, None, &lookup).await, json!("one"));
        assert_eq!(perform_lookup(&json!("b"), &config, None, &lookup).await, Value::Null);
        // Static lookups are exact-case unless caseSensitive is false
        assert_eq!(perform_lookup(&json!("A"), &config, None, &lookup).await, Value::Null);

        let folded = TransformConfig {
            case_sensitive: Some(false),
            ..config
        };
        assert_eq!(perform_lookup(&json!("A"), &folded, None, &lookup).await, json!("A"));
    }

    #[tokio::test]
    async fn test_lookup_type_forces_branch() {
        let lookup = LookupContext::new(Arc::new(products()));
        let config = TransformConfig {
            lookup_type: Some(LookupType::Static),
            values: json!({"hat": "static-hat"}).as_object().cloned(),
            ..entity_config("Product")
        };
        assert_eq!(perform_lookup(&json!("hat"), &config, None, &lookup).await, json!("static-hat"));

        let entity_first = TransformConfig {
            lookup_type: None,
            ..config
        };
        assert_eq!(perform_lookup(&json!("hat"), &entity_first, None, &lookup).await, json!(2));
    }

    #[tokio::test]
    async fn test_unconfigured_lookup_passes_through() {
        let lookup = LookupContext::new(Arc::new(products()));
        let result = perform_lookup(&json!("hat"), &TransformConfig::default(), None, &lookup).await;
        assert_eq!(result, json!("hat"));
    }

    #[test]
    fn test_fixtures_parse() {
        let repository = InMemoryRepository::from_fixtures(&json!({
            "Product": [{"id": 1}],
            "FacetValue": [{"id": 2}, {"id": 3}]
        }))
        .unwrap();
        assert_eq!(repository.len(), 3);

        assert!(matches!(
            InMemoryRepository::from_fixtures(&json!({"Order": []})),
            Err(LookupError::UnknownEntityType(_))
        ));
        assert!(matches!(
            InMemoryRepository::from_fixtures(&json!([1])),
            Err(LookupError::InvalidFixtures(_))
        ));
    }

    #[test]
    fn test_entity_type_names() {
        for entity_type in EntityType::ALL {
            assert_eq!(entity_type.as_str().parse::<EntityType>().unwrap(), entity_type);
            assert_eq!(serde_json::to_value(entity_type).unwrap(), json!(entity_type.as_str()));
        }
    }
}
