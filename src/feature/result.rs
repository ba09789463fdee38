use serde::{Deserialize, Serialize};

use crate::{bucket::BucketRange, feature::FeatureRule, Value};

/// Why a feature resolved to its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureSource {
    /// The feature key is not in the configuration.
    UnknownFeature,
    /// The feature (transitively) requires itself.
    CyclicPrerequisite,
    /// A gating prerequisite is off or doesn't match its condition.
    Prerequisite,
    /// A force rule matched.
    Force,
    /// An experiment rule assigned a variation.
    Experiment,
    /// No rule applied.
    DefaultValue,
}

/// The outcome of evaluating a feature for a set of attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResult {
    /// The resolved value. `null` if the feature couldn't be resolved.
    pub value: Value,
    /// Truthiness of `value`.
    pub on: bool,
    /// Always `!on`.
    pub off: bool,
    #[allow(missing_docs)]
    pub source: FeatureSource,
    /// `ruleId` of the matching rule, empty if no rule matched or the rule has no id.
    #[serde(default)]
    pub rule_id: String,
    /// Set for `experiment` results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment: Option<Experiment>,
    /// Index of the assigned variation, set for `experiment` results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation_index: Option<usize>,
}

impl FeatureResult {
    pub(crate) fn new(value: Value, source: FeatureSource) -> FeatureResult {
        let on = value.is_truthy();
        FeatureResult {
            value,
            on,
            off: !on,
            source,
            rule_id: String::new(),
            experiment: None,
            variation_index: None,
        }
    }

    pub(crate) fn from_rule(value: Value, source: FeatureSource, rule: &FeatureRule) -> Self {
        FeatureResult {
            rule_id: rule.rule_id.clone().unwrap_or_default(),
            ..FeatureResult::new(value, source)
        }
    }

    pub(crate) fn unknown_feature() -> FeatureResult {
        FeatureResult::new(Value::Null, FeatureSource::UnknownFeature)
    }
}

/// Experiment descriptor attached to `experiment` results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experiment {
    /// Experiment key. Defaults to the feature key.
    pub key: String,
    #[allow(missing_docs)]
    pub variations: Vec<Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_version: Option<u32>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Value>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<Vec<BucketRange>>,
}
