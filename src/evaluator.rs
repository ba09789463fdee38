use std::sync::Arc;

use crate::{
    configuration_store::ConfigurationStore,
    feature::{eval_feature, FeatureResult, ForcedVariations},
    Attributes, Configuration, Value,
};

/// Configuration for [`Evaluator`].
pub struct EvaluatorConfig {
    /// Where to get the latest configuration from.
    pub configuration_store: Arc<ConfigurationStore>,
    /// Variation overrides applied to every evaluation, keyed by feature key.
    pub forced_variations: ForcedVariations,
}

/// Evaluator simplifies calling into evaluation functions: it picks up the latest configuration
/// snapshot from the store and applies forced variations.
///
/// Until a configuration is set, all features evaluate as unknown.
pub struct Evaluator {
    config: EvaluatorConfig,
}

impl Evaluator {
    #[allow(missing_docs)]
    pub fn new(config: EvaluatorConfig) -> Evaluator {
        Evaluator { config }
    }

    /// Evaluate a feature. See [`eval_feature`].
    pub fn eval_feature(&self, feature_key: &str, attributes: &Attributes) -> FeatureResult {
        let Some(configuration) = self.get_configuration() else {
            log::warn!(target: "growthbook", feature_key; "evaluating a feature before configuration has been loaded");
            return FeatureResult::unknown_feature();
        };
        eval_feature(
            &configuration,
            feature_key,
            attributes,
            &self.config.forced_variations,
        )
    }

    /// Return `true` if the feature resolves to a truthy value.
    pub fn is_on(&self, feature_key: &str, attributes: &Attributes) -> bool {
        self.eval_feature(feature_key, attributes).on
    }

    /// Return `true` if the feature resolves to a falsy value. Unknown features are off.
    pub fn is_off(&self, feature_key: &str, attributes: &Attributes) -> bool {
        self.eval_feature(feature_key, attributes).off
    }

    /// Return the feature value, or `fallback` if it resolves to `null`.
    pub fn get_feature_value(
        &self,
        feature_key: &str,
        attributes: &Attributes,
        fallback: Value,
    ) -> Value {
        match self.eval_feature(feature_key, attributes).value {
            Value::Null => fallback,
            value => value,
        }
    }

    fn get_configuration(&self) -> Option<Arc<Configuration>> {
        self.config.configuration_store.get_configuration()
    }
}
