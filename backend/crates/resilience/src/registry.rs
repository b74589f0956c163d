//! Named policies shared across callers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::{ResilienceConfig, ResiliencePolicy};

/// Lazily builds one [`ResiliencePolicy`] per operation name.
///
/// Repeated lookups of the same name return the same policy, so every caller
/// of an operation shares its breaker state.
#[derive(Debug)]
pub struct ResilienceRegistry {
    defaults: ResilienceConfig,
    overrides: HashMap<String, ResilienceConfig>,
    policies: Mutex<HashMap<String, Arc<ResiliencePolicy>>>,
}

impl ResilienceRegistry {
    /// Create a registry applying `defaults` to every operation.
    #[must_use]
    pub fn new(defaults: ResilienceConfig) -> Self {
        Self {
            defaults,
            overrides: HashMap::new(),
            policies: Mutex::new(HashMap::new()),
        }
    }

    /// Use `config` instead of the defaults for `operation`.
    ///
    /// Only affects policies not yet built.
    #[must_use]
    pub fn with_override(mut self, operation: impl Into<String>, config: ResilienceConfig) -> Self {
        self.overrides.insert(operation.into(), config);
        self
    }

    /// Configuration applied to `operation`.
    #[must_use]
    pub fn config_for(&self, operation: &str) -> &ResilienceConfig {
        self.overrides.get(operation).unwrap_or(&self.defaults)
    }

    /// Policy for `operation`, created on first use.
    #[must_use]
    pub fn policy(&self, operation: &str) -> Arc<ResiliencePolicy> {
        let mut policies = self.policies.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = policies.get(operation) {
            return Arc::clone(existing);
        }
        let policy = Arc::new(ResiliencePolicy::new(
            operation,
            self.config_for(operation).clone(),
        ));
        policies.insert(operation.to_owned(), Arc::clone(&policy));
        policy
    }
}
