use serde::{Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DefaultOnNull};

use crate::{bucket::BucketRange, Value};

/// `TryParse` allows the subfield to fail parsing without failing the parsing of the whole
/// structure.
///
/// This can be helpful to isolate errors in a subtree. e.g., if one feature or rule uses a format
/// this SDK doesn't understand, the rest of the features are still usable.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum TryParse<T> {
    /// Successfully parsed.
    Parsed(T),
    /// Parsing failed.
    ParseFailed(serde_json::Value),
}
impl<T> From<T> for TryParse<T> {
    fn from(value: T) -> TryParse<T> {
        TryParse::Parsed(value)
    }
}
impl<T> From<TryParse<T>> for Option<T> {
    fn from(value: TryParse<T>) -> Self {
        match value {
            TryParse::Parsed(v) => Some(v),
            TryParse::ParseFailed(_) => None,
        }
    }
}
impl<'a, T> From<&'a TryParse<T>> for Option<&'a T> {
    fn from(value: &TryParse<T>) -> Option<&T> {
        match value {
            TryParse::Parsed(v) => Some(v),
            TryParse::ParseFailed(_) => None,
        }
    }
}

/// A feature as found in the features payload.
///
/// Any JSON object is a feature [definition](FeatureDefinition). Anything else is a constant
/// value served to everybody.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Feature {
    /// A feature with rules and a default value.
    Definition(FeatureDefinition),
    /// A bare value.
    Constant(Value),
}

impl<'de> Deserialize<'de> for Feature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Deserializing through `serde_json::Value` first, so that only objects are ever
        // interpreted as definitions.
        let json = serde_json::Value::deserialize(deserializer)?;
        if json.is_object() {
            serde_json::from_value(json)
                .map(Feature::Definition)
                .map_err(serde::de::Error::custom)
        } else {
            Ok(Feature::Constant(json.into()))
        }
    }
}

impl From<FeatureDefinition> for Feature {
    fn from(value: FeatureDefinition) -> Self {
        Feature::Definition(value)
    }
}

impl From<Value> for Feature {
    fn from(value: Value) -> Self {
        Feature::Constant(value)
    }
}

#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct FeatureDefinition {
    /// Value served when no rule applies. Missing means `null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Rules, evaluated strictly in order.
    ///
    /// Rules are wrapped in `TryParse` so that a rule we fail to parse is skipped instead of
    /// rejecting the whole feature.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub rules: Vec<TryParse<FeatureRule>>,
}

impl FeatureDefinition {
    /// Iterate over rules that were parsed successfully.
    pub fn parsed_rules(&self) -> impl Iterator<Item = &FeatureRule> {
        self.rules.iter().filter_map(Option::from)
    }
}

/// A single rule of a feature.
///
/// A rule with `force` serves a fixed value, a rule with `variations` runs an experiment. Both may
/// be restricted by `condition`, prerequisites (`parent_conditions`) and hash-based rollout
/// settings.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct FeatureRule {
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub parent_conditions: Vec<ParentCondition>,
    #[serde(default)]
    pub condition: Option<Value>,
    /// Forced value. An explicit `null` is a forced `null`, which is why absence has to be tracked
    /// separately.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub force: Option<Value>,
    #[serde(default)]
    pub variations: Option<Vec<Value>>,
    #[serde(default)]
    pub weights: Option<Vec<f64>>,
    #[serde(default)]
    pub coverage: Option<f64>,
    #[serde(default)]
    pub range: Option<BucketRange>,
    #[serde(default)]
    pub ranges: Option<Vec<BucketRange>>,
    #[serde(default)]
    pub namespace: Option<Namespace>,
    #[serde(default)]
    pub filters: Option<Vec<Filter>>,
    #[serde(default)]
    pub hash_attribute: Option<String>,
    #[serde(default)]
    pub hash_version: Option<u32>,
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub meta: Option<Vec<VariationMeta>>,
}

/// Wrap any present value (including `null`) in `Some`. Combined with `#[serde(default)]`, a
/// missing field stays `None`.
fn deserialize_present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// A prerequisite: another feature that has to be evaluated before the rule applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParentCondition {
    /// Key of the parent feature.
    pub id: String,
    /// If `true`, the whole evaluation stops with `prerequisite` when the parent is off.
    #[serde(default)]
    pub gate: bool,
    /// Condition evaluated against `{"value": <parent value>}`.
    #[serde(default)]
    pub condition: Option<Value>,
}

/// Namespace of mutually exclusive experiments: `[id, start, end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(String, f64, f64)", into = "(String, f64, f64)")]
#[allow(missing_docs)]
pub struct Namespace {
    pub id: String,
    pub range: BucketRange,
}

impl From<(String, f64, f64)> for Namespace {
    fn from((id, start, end): (String, f64, f64)) -> Self {
        Namespace {
            id,
            range: BucketRange::new(start, end),
        }
    }
}

impl From<Namespace> for (String, f64, f64) {
    fn from(namespace: Namespace) -> Self {
        (namespace.id, namespace.range.start, namespace.range.end)
    }
}

/// Hash-based filter of a forced rule. The user passes the filter if their hash lands in any of
/// `ranges`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Filter {
    /// Defaults to the feature key.
    #[serde(default)]
    pub seed: Option<String>,
    #[serde(default)]
    pub ranges: Vec<BucketRange>,
}

/// Per-variation metadata of an experiment rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationMeta {
    /// If `true`, users assigned to this variation continue to the next rule.
    #[serde(default)]
    pub passthrough: bool,
}
