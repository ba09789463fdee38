use std::{collections::HashMap, fs::File};

use serde::Deserialize;
use serde_json::json;

use growthbook_core::{
    choose_variation, eval_feature, evaluate_conditions, gbhash, get_bucket_ranges,
    padded_version_string, Attributes, BucketRange, Configuration, FeatureSource,
    ForcedVariations, SavedGroups, Value,
};

const CASES_PATH: &str = "tests/data/cases.json";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Cases {
    eval_condition: Vec<serde_json::Value>,
    hash: Vec<(String, String, u32, Option<f64>)>,
    get_bucket_range: Vec<(String, (usize, f64, Option<Vec<f64>>), Vec<(f64, f64)>)>,
    choose_variation: Vec<(String, f64, Vec<BucketRange>, i64)>,
    feature: Vec<(String, FeatureContext, String, ExpectedResult)>,
    version_compare: HashMap<String, Vec<(String, String, bool)>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureContext {
    #[serde(default)]
    attributes: Attributes,
    #[serde(default)]
    features: serde_json::Value,
    #[serde(default)]
    saved_groups: SavedGroups,
    #[serde(default)]
    forced_variations: ForcedVariations,
}

#[derive(Debug, Deserialize)]
struct ExpectedResult {
    value: Value,
    on: bool,
    off: bool,
    source: FeatureSource,
}

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn load_cases() -> Cases {
    serde_json::from_reader(File::open(CASES_PATH).unwrap()).unwrap()
}

#[test]
fn eval_condition() {
    init();
    let cases = load_cases();
    for case in cases.eval_condition {
        let case = case.as_array().unwrap();
        let name = case[0].as_str().unwrap();
        let condition = Value::from(case[1].clone());
        let attributes: Attributes = serde_json::from_value(case[2].clone()).unwrap();
        let expected = case[3].as_bool().unwrap();
        let saved_groups: SavedGroups = case
            .get(4)
            .map(|groups| serde_json::from_value(groups.clone()).unwrap())
            .unwrap_or_default();

        assert_eq!(
            evaluate_conditions(&condition, &attributes, &saved_groups),
            expected,
            "{name}"
        );
    }
}

#[test]
fn hash() {
    init();
    for (seed, value, version, expected) in load_cases().hash {
        let actual = gbhash(&seed, &value, version);
        match (actual, expected) {
            (Some(actual), Some(expected)) => assert!(
                (actual - expected).abs() < 1e-9,
                "gbhash({seed:?}, {value:?}, {version}) = {actual}, expected {expected}"
            ),
            (None, None) => {}
            _ => panic!("gbhash({seed:?}, {value:?}, {version}) = {actual:?}, expected {expected:?}"),
        }
    }
}

#[test]
fn get_bucket_range() {
    init();
    for (name, (num_variations, coverage, weights), expected) in load_cases().get_bucket_range {
        let actual = get_bucket_ranges(num_variations, coverage, weights.as_deref());
        assert_eq!(actual.len(), expected.len(), "{name}");
        for (actual, expected) in actual.iter().zip(&expected) {
            assert!(
                (actual.start - expected.0).abs() < 0.001 && (actual.end - expected.1).abs() < 0.001,
                "{name}: {actual:?} != {expected:?}"
            );
        }
    }
}

#[test]
fn choose_variation_cases() {
    init();
    for (name, n, ranges, expected) in load_cases().choose_variation {
        let expected = usize::try_from(expected).ok();
        assert_eq!(choose_variation(n, &ranges), expected, "{name}");
    }
}

#[test]
fn feature() {
    init();
    for (name, context, feature_key, expected) in load_cases().feature {
        let configuration = Configuration::from_json(
            json!({ "features": context.features, "savedGroups": context.saved_groups })
                .to_string(),
        )
        .unwrap();

        let result = eval_feature(
            &configuration,
            &feature_key,
            &context.attributes,
            &context.forced_variations,
        );

        assert_eq!(result.value, expected.value, "{name}");
        assert_eq!(result.on, expected.on, "{name}");
        assert_eq!(result.off, expected.off, "{name}");
        assert_eq!(result.source, expected.source, "{name}");
    }
}

#[test]
fn version_compare() {
    init();
    for (op, cases) in load_cases().version_compare {
        for (a, b, expected) in cases {
            let a_padded = padded_version_string(Some(&a.as_str().into()));
            let b_padded = padded_version_string(Some(&b.as_str().into()));
            let actual = match op.as_str() {
                "lt" => a_padded < b_padded,
                "gt" => a_padded > b_padded,
                "eq" => a_padded == b_padded,
                _ => panic!("unexpected version comparison: {op}"),
            };
            assert_eq!(actual, expected, "{a} {op} {b}");
        }
    }
}
