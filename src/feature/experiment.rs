//! Experiment assignment for rules with `variations`.
use crate::{
    bucket::{choose_variation, get_bucket_ranges},
    hashing::gbhash,
    Attributes, Value,
};

use super::{Experiment, FeatureResult, FeatureRule, FeatureSource};

/// Assign the user to one of `variations`.
///
/// Returns `None` when the user is excluded from the experiment: no usable hash attribute, outside
/// of namespace, outside of coverage, or not in any of the variation ranges.
pub(super) fn run_experiment(
    feature_key: &str,
    rule: &FeatureRule,
    variations: &[Value],
    attributes: &Attributes,
) -> Option<FeatureResult> {
    let Some(hash_value) = rule.hash_value(attributes) else {
        log::trace!(target: "growthbook", feature_key, hash_attribute = rule.hash_attribute(); "skipping experiment: hash attribute is missing");
        return None;
    };
    let hash_version = rule.hash_version();

    if let Some(namespace) = &rule.namespace {
        let n = gbhash(&format!("__{}", namespace.id), &hash_value, hash_version)?;
        if !namespace.range.contains(n) {
            log::trace!(target: "growthbook", feature_key, namespace = namespace.id.as_str(); "user is excluded by namespace");
            return None;
        }
    }

    let coverage = rule.coverage.unwrap_or(1.0);
    let n = gbhash(rule.seed(feature_key), &hash_value, hash_version)?;
    if coverage < 1.0 && n > coverage {
        log::trace!(target: "growthbook", feature_key, coverage; "user is excluded by coverage");
        return None;
    }

    let ranges = match &rule.ranges {
        Some(ranges) => ranges.clone(),
        None => get_bucket_ranges(variations.len(), coverage, rule.weights.as_deref()),
    };
    let variation_index = choose_variation(n, &ranges)?;
    let value = variations.get(variation_index)?.clone();

    Some(FeatureResult {
        experiment: Some(Experiment {
            key: rule.experiment_key(feature_key).to_owned(),
            variations: variations.to_vec(),
            hash_version: Some(hash_version),
            condition: rule.condition.clone(),
            ranges: Some(ranges),
        }),
        variation_index: Some(variation_index),
        ..FeatureResult::from_rule(value, FeatureSource::Experiment, rule)
    })
}
