//! Custom scalar definitions and the scalar registry.
//!
//! The registry collects scalar implementations discovered among the
//! registered providers. It is built once per bootstrap and read-only
//! afterwards; the map preserves registration order so schema output stays
//! reproducible.

use std::fmt;
use std::sync::{Arc, LazyLock};

use async_graphql::Value;
use indexmap::IndexMap;

use crate::provider::ProviderSource;

/// Validates an input value for a custom scalar.
pub type ScalarValidatorFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Runtime implementation of one custom scalar type.
#[derive(Clone)]
pub struct ScalarDefinition {
    pub name: String,
    pub description: Option<String>,
    pub specified_by_url: Option<String>,
    pub validator: Option<ScalarValidatorFn>,
}

impl ScalarDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            specified_by_url: None,
            validator: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn specified_by_url(mut self, url: impl Into<String>) -> Self {
        self.specified_by_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }
}

impl fmt::Debug for ScalarDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("specified_by_url", &self.specified_by_url)
            .field("has_validator", &self.validator.is_some())
            .finish()
    }
}

/// Name-to-implementation mapping of all discovered custom scalars.
#[derive(Debug, Default)]
pub struct ScalarRegistry {
    scalars: IndexMap<String, ScalarDefinition>,
}

impl ScalarRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registry from all scalar implementations exposed by the
    /// provider source. Later registrations of the same name replace
    /// earlier ones.
    #[must_use]
    pub fn collect(source: &dyn ProviderSource) -> Self {
        let mut registry = Self::new();
        for scalar in source.scalar_definitions() {
            registry.register(scalar);
        }
        registry
    }

    pub fn register(&mut self, scalar: ScalarDefinition) {
        self.scalars.insert(scalar.name.clone(), scalar);
    }

    /// Returns the scalar map in registration order.
    #[must_use]
    pub fn scalars_map(&self) -> IndexMap<String, ScalarDefinition> {
        self.scalars.clone()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ScalarDefinition> {
        self.scalars.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }
}

/// Ready-made scalar implementations.
pub mod presets {
    use super::*;

    /// ISO-8601 date-time: `YYYY-MM-DDThh:mm:ss(.sss)?(Z|±hh:mm)`.
    static DATE_TIME_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
        regex::Regex::new(
            r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[1-2][0-9]|3[0-1])T([01][0-9]|2[0-3]):[0-5][0-9]:[0-5][0-9](\.[0-9]+)?(Z|(\+|-)([01][0-9]|2[0-3]):[0-5][0-9])$",
        )
        .expect("invalid date-time regex")
    });

    /// A `DateTime` scalar accepting ISO-8601 timestamps with timezone.
    #[must_use]
    pub fn date_time() -> ScalarDefinition {
        ScalarDefinition::new("DateTime")
            .description("An ISO-8601 encoded date-time string with timezone")
            .specified_by_url("https://datatracker.ietf.org/doc/html/rfc3339")
            .validator(|value| match value {
                Value::String(s) => DATE_TIME_REGEX.is_match(s),
                _ => false,
            })
    }

    /// A `JSON` scalar accepting any value.
    #[must_use]
    pub fn json() -> ScalarDefinition {
        ScalarDefinition::new("JSON").description("Arbitrary JSON content")
    }
}
