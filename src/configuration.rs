//! Immutable snapshot of everything needed to evaluate features.
use std::{collections::HashMap, io::Read};

use serde::{Deserialize, Serialize};

use crate::{
    condition::SavedGroups,
    feature::{Feature, TryParse},
    Result,
};

/// Feature definitions and saved groups, as delivered by the GrowthBook API.
///
/// A configuration is never mutated while evaluations are running. To refresh it, build a new
/// one and swap it in [`ConfigurationStore`](crate::ConfigurationStore).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Features keyed by feature key. Features that fail to parse are kept (and logged) but
    /// evaluate as unknown.
    #[serde(default)]
    pub features: HashMap<String, TryParse<Feature>>,
    /// Saved groups keyed by group id, used by `$inGroup` and `$notInGroup`.
    #[serde(default)]
    pub saved_groups: SavedGroups,
}

impl Configuration {
    /// Parse configuration from a JSON payload.
    ///
    /// ```
    /// # use growthbook_core::Configuration;
    /// let configuration = Configuration::from_json(r#"{"features": {"dark-mode": true}}"#).unwrap();
    /// assert!(configuration.feature_keys().any(|key| key == "dark-mode"));
    /// ```
    pub fn from_json(json: impl AsRef<[u8]>) -> Result<Configuration> {
        let configuration: Configuration = serde_json::from_slice(json.as_ref())?;
        configuration.report_parse_failures();
        Ok(configuration)
    }

    /// Parse configuration from a reader, e.g., a file.
    pub fn from_reader(reader: impl Read) -> Result<Configuration> {
        let configuration: Configuration = serde_json::from_reader(reader)?;
        configuration.report_parse_failures();
        Ok(configuration)
    }

    /// Build configuration from already parsed features.
    pub fn from_features(
        features: impl IntoIterator<Item = (String, Feature)>,
        saved_groups: SavedGroups,
    ) -> Configuration {
        Configuration {
            features: features
                .into_iter()
                .map(|(key, feature)| (key, feature.into()))
                .collect(),
            saved_groups,
        }
    }

    /// Keys of all features in this configuration, including ones that failed to parse.
    pub fn feature_keys(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    fn report_parse_failures(&self) {
        for (feature_key, feature) in &self.features {
            match feature {
                TryParse::ParseFailed(_) => {
                    log::warn!(target: "growthbook", feature_key = feature_key.as_str(); "failed to parse feature, it will be treated as unknown");
                }
                TryParse::Parsed(Feature::Definition(definition)) => {
                    for (index, rule) in definition.rules.iter().enumerate() {
                        if let TryParse::ParseFailed(_) = rule {
                            log::warn!(target: "growthbook", feature_key = feature_key.as_str(), rule_index = index; "failed to parse rule, it will be skipped");
                        }
                    }
                }
                TryParse::Parsed(Feature::Constant(_)) => {}
            }
        }
    }
}
