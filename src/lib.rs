//! The evaluation core of GrowthBook SDKs: targeting conditions, deterministic hashing and
//! feature resolution.
//!
//! # Overview
//!
//! Features are resolved against user [`Attributes`] using a [`Configuration`] snapshot (feature
//! definitions plus saved groups). Evaluation results in a [`FeatureResult`] that holds the
//! resolved value and its [`FeatureSource`]: unknown feature, prerequisite failure, forced rule,
//! experiment assignment or default value.
//!
//! The two entry points are [`eval_feature()`] and [`evaluate_conditions()`]. For applications that
//! refresh configuration in the background, [`Evaluator`] reads the latest snapshot from a
//! [`ConfigurationStore`].
//!
//! ```
//! # use growthbook_core::{eval_feature, Attributes, Configuration, FeatureSource, ForcedVariations};
//! let configuration = Configuration::from_json(r#"
//!   {
//!     "features": {
//!       "us-banner": {
//!         "defaultValue": false,
//!         "rules": [{"condition": {"country": {"$eq": "US"}}, "force": true}]
//!       }
//!     }
//!   }
//! "#).unwrap();
//!
//! let attributes: Attributes = [("country".to_owned(), "US".into())].into();
//! let result = eval_feature(&configuration, "us-banner", &attributes, &ForcedVariations::new());
//! assert!(result.on);
//! assert_eq!(result.source, FeatureSource::Force);
//! ```
//!
//! # Error Handling
//!
//! Evaluation never fails. Malformed conditions, rules and features degrade to well-defined
//! fallbacks, and everything that prevents a feature from resolving is reported through
//! [`FeatureResult::source`].
//!
//! Errors are represented by the [`Error`] enum and only occur when parsing a configuration.
//!
//! # Logging
//!
//! The package uses the [`log`](https://docs.rs/log/latest/log/) crate for logging messages under
//! the `growthbook` target. Consider integrating a `log`-compatible logger implementation for better
//! visibility into evaluation.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(missing_docs)]

mod attributes;
mod bucket;
mod condition;
mod configuration;
mod configuration_store;
mod error;
mod evaluator;
mod hashing;
mod value;
mod version;

pub mod feature;

pub use attributes::{resolve, Attributes};
pub use bucket::{choose_variation, get_bucket_ranges, BucketRange};
pub use condition::{evaluate_conditions, SavedGroups};
pub use configuration::Configuration;
pub use configuration_store::ConfigurationStore;
pub use error::{Error, Result};
pub use evaluator::{Evaluator, EvaluatorConfig};
pub use feature::{eval_feature, FeatureResult, FeatureSource, ForcedVariations};
pub use hashing::{fnv1a32, gbhash};
pub use value::{deep_eq, type_name, Value};
pub use version::padded_version_string;
