use std::{collections::HashMap, ops::ControlFlow};

use crate::{
    attributes::resolve, condition::evaluate_conditions, configuration::Configuration,
    hashing::gbhash, Attributes, Value,
};

use super::{
    experiment::run_experiment, Experiment, Feature, FeatureDefinition, FeatureResult,
    FeatureRule, FeatureSource, Filter, TryParse,
};

/// Variation index overrides keyed by feature key.
pub type ForcedVariations = HashMap<String, i64>;

/// Evaluate feature `feature_key` for the given attributes.
///
/// This function never fails. Everything that prevents the feature from being resolved is
/// reported through [`FeatureResult::source`].
pub fn eval_feature(
    configuration: &Configuration,
    feature_key: &str,
    attributes: &Attributes,
    forced_variations: &ForcedVariations,
) -> FeatureResult {
    let result = FeatureEvaluation {
        configuration,
        attributes,
        forced_variations,
        stack: Vec::new(),
    }
    .eval(feature_key);

    log::trace!(target: "growthbook",
                feature_key,
                source:serde = result.source,
                rule_id = result.rule_id.as_str(),
                value:serde = result.value;
                "evaluated a feature");

    result
}

/// State of a single top-level evaluation.
///
/// `stack` holds the keys of features currently being resolved and is used to detect
/// prerequisite cycles. It is never shared between evaluations.
struct FeatureEvaluation<'a> {
    configuration: &'a Configuration,
    attributes: &'a Attributes,
    forced_variations: &'a ForcedVariations,
    stack: Vec<&'a str>,
}

impl<'a> FeatureEvaluation<'a> {
    fn eval(&mut self, feature_key: &'a str) -> FeatureResult {
        let configuration = self.configuration;
        let Some(feature) = configuration.features.get(feature_key) else {
            return FeatureResult::unknown_feature();
        };

        if self.stack.contains(&feature_key) {
            log::debug!(target: "growthbook", feature_key, stack:? = self.stack; "cyclic prerequisite detected");
            return FeatureResult::new(Value::Null, FeatureSource::CyclicPrerequisite);
        }

        let feature = match feature {
            TryParse::Parsed(feature) => feature,
            TryParse::ParseFailed(_) => {
                log::trace!(target: "growthbook", feature_key; "feature failed to parse, treating it as unknown");
                return FeatureResult::unknown_feature();
            }
        };

        self.stack.push(feature_key);
        let result = match feature {
            Feature::Constant(value) => {
                FeatureResult::new(value.clone(), FeatureSource::DefaultValue)
            }
            Feature::Definition(definition) => self.eval_definition(feature_key, definition),
        };
        self.stack.pop();

        result
    }

    fn eval_definition(
        &mut self,
        feature_key: &'a str,
        definition: &'a FeatureDefinition,
    ) -> FeatureResult {
        for rule in definition.parsed_rules() {
            if let ControlFlow::Break(result) = self.check_prerequisites(rule) {
                return result;
            }

            if let Some(condition) = &rule.condition {
                if !evaluate_conditions(
                    condition,
                    self.attributes,
                    &self.configuration.saved_groups,
                ) {
                    log::trace!(target: "growthbook", feature_key, rule_id:? = rule.rule_id; "skipping rule: condition did not match");
                    continue;
                }
            }

            if let Some(force) = &rule.force {
                if !rule.is_included_in_rollout(feature_key, self.attributes) {
                    log::trace!(target: "growthbook", feature_key, rule_id:? = rule.rule_id; "skipping force rule: user is not included in rollout");
                    continue;
                }
                return FeatureResult::from_rule(force.clone(), FeatureSource::Force, rule);
            }

            if let Some(variations) = &rule.variations {
                if let Some(result) = self.forced_variation(feature_key, rule, variations) {
                    return result;
                }

                match run_experiment(feature_key, rule, variations, self.attributes) {
                    Some(result) if rule.is_passthrough(result.variation_index) => {
                        log::trace!(target: "growthbook", feature_key, rule_id:? = rule.rule_id; "passthrough variation, continuing to the next rule");
                    }
                    Some(result) => return result,
                    None => {}
                }
            }
        }

        FeatureResult::new(
            definition.default_value.clone().unwrap_or_default(),
            FeatureSource::DefaultValue,
        )
    }

    /// Resolve the parents of `rule`. `Break` carries the result that terminates the whole
    /// evaluation.
    fn check_prerequisites(&mut self, rule: &'a FeatureRule) -> ControlFlow<FeatureResult> {
        for parent in &rule.parent_conditions {
            let parent_result = self.eval(&parent.id);

            if parent_result.source == FeatureSource::CyclicPrerequisite {
                return ControlFlow::Break(FeatureResult::new(
                    Value::Null,
                    FeatureSource::CyclicPrerequisite,
                ));
            }

            if parent.gate && parent_result.off {
                log::trace!(target: "growthbook", parent = parent.id.as_str(); "gating prerequisite is off");
                return ControlFlow::Break(FeatureResult::new(
                    Value::Null,
                    FeatureSource::Prerequisite,
                ));
            }

            if let Some(condition) = &parent.condition {
                let parent_attributes = Attributes::from([("value".to_owned(), parent_result.value)]);
                if !evaluate_conditions(
                    condition,
                    &parent_attributes,
                    &self.configuration.saved_groups,
                ) {
                    log::trace!(target: "growthbook", parent = parent.id.as_str(); "prerequisite condition did not match");
                    return ControlFlow::Break(FeatureResult::new(
                        Value::Null,
                        FeatureSource::Prerequisite,
                    ));
                }
            }
        }

        ControlFlow::Continue(())
    }

    fn forced_variation(
        &self,
        feature_key: &str,
        rule: &FeatureRule,
        variations: &[Value],
    ) -> Option<FeatureResult> {
        let index = *self.forced_variations.get(feature_key)?;
        let index = usize::try_from(index).ok()?;
        let value = variations.get(index)?.clone();

        log::trace!(target: "growthbook", feature_key, variation_index = index; "using forced variation");

        Some(FeatureResult {
            experiment: Some(Experiment {
                key: rule.experiment_key(feature_key).to_owned(),
                variations: variations.to_vec(),
                hash_version: None,
                condition: None,
                ranges: None,
            }),
            variation_index: Some(index),
            ..FeatureResult::from_rule(value, FeatureSource::Experiment, rule)
        })
    }
}

impl FeatureRule {
    /// Attribute used to hash the user. Defaults to `"id"`.
    pub(crate) fn hash_attribute(&self) -> &str {
        non_empty(self.hash_attribute.as_deref()).unwrap_or("id")
    }

    /// Hash version, defaulting to 1.
    pub(crate) fn hash_version(&self) -> u32 {
        self.hash_version.filter(|&version| version != 0).unwrap_or(1)
    }

    /// Hashing seed: `seed`, then `key`, then the feature key.
    pub(crate) fn seed<'a>(&'a self, feature_key: &'a str) -> &'a str {
        non_empty(self.seed.as_deref())
            .or(non_empty(self.key.as_deref()))
            .unwrap_or(feature_key)
    }

    pub(crate) fn experiment_key<'a>(&'a self, feature_key: &'a str) -> &'a str {
        non_empty(self.key.as_deref()).unwrap_or(feature_key)
    }

    /// Stringified hash attribute value. `None` if the attribute is missing, empty or can't be
    /// used for hashing.
    pub(crate) fn hash_value(&self, attributes: &Attributes) -> Option<String> {
        resolve(attributes, self.hash_attribute())?
            .to_hash_string()
            .filter(|s| !s.is_empty())
    }

    fn is_passthrough(&self, variation_index: Option<usize>) -> bool {
        match (&self.meta, variation_index) {
            (Some(meta), Some(index)) => meta.get(index).is_some_and(|meta| meta.passthrough),
            _ => false,
        }
    }

    /// Force rules are only restricted by hashing when they have a rollout setting.
    fn requires_hashing(&self) -> bool {
        self.coverage.is_some()
            || self.range.is_some()
            || self.filters.is_some()
            || self.hash_version() != 1
    }

    fn is_included_in_rollout(&self, feature_key: &str, attributes: &Attributes) -> bool {
        if !self.requires_hashing() {
            return true;
        }

        let Some(hash_value) = self.hash_value(attributes) else {
            return false;
        };
        let hash_version = self.hash_version();

        if let Some(filters) = &self.filters {
            return filters
                .iter()
                .all(|filter| filter.matches(feature_key, &hash_value, hash_version));
        }

        let Some(n) = gbhash(self.seed(feature_key), &hash_value, hash_version) else {
            return false;
        };

        match (&self.range, self.coverage) {
            (Some(range), _) => range.contains(n),
            (None, Some(coverage)) => coverage != 0.0 && n <= coverage,
            (None, None) => true,
        }
    }
}

impl Filter {
    fn matches(&self, feature_key: &str, hash_value: &str, hash_version: u32) -> bool {
        let seed = non_empty(self.seed.as_deref()).unwrap_or(feature_key);
        gbhash(seed, hash_value, hash_version)
            .is_some_and(|n| self.ranges.iter().any(|range| range.contains(n)))
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
