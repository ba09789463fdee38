//! Feature definitions and their evaluation.
mod eval;
mod experiment;
mod models;
mod result;

pub use eval::{eval_feature, ForcedVariations};
pub use models::{
    Feature, FeatureDefinition, FeatureRule, Filter, Namespace, ParentCondition, TryParse,
    VariationMeta,
};
pub use result::{Experiment, FeatureResult, FeatureSource};
