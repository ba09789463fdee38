//! Targeting condition interpreter.
//!
//! A condition is a [`Value`] in a MongoDB-like query language:
//!
//! ```json
//! {
//!   "country": {"$in": ["US", "CA"]},
//!   "$or": [{"plan": "pro"}, {"company.size": {"$gte": 100}}]
//! }
//! ```
//!
//! Top-level keys form a conjunction. `$or`, `$nor`, `$and` and `$not` combine sub-conditions,
//! any other key is an attribute path tested either by direct equality or by an operator object
//! (see [`Operator`](operators::Operator) for the list of supported operators).
//!
//! Evaluation is a pure function of the condition, the attributes and the saved groups. Malformed
//! conditions never fail: they simply don't match (or, for a non-object condition, always match).
use std::collections::HashMap;

use crate::{attributes::resolve, value::deep_eq, Attributes, Value};

mod operators;

use operators::Operator;

/// Saved groups referenced by the `$inGroup`/`$notInGroup` operators: group id to list of member
/// values.
pub type SavedGroups = HashMap<String, Vec<Value>>;

/// Evaluate `condition` against `attributes`.
///
/// A condition that is not an object, or an empty object, always matches.
///
/// ```
/// # use growthbook_core::{evaluate_conditions, Attributes, SavedGroups, Value};
/// let condition: Value = serde_json::json!({"country": {"$in": ["US", "CA"]}}).into();
/// let attributes: Attributes = [("country".to_owned(), "US".into())].into();
/// assert!(evaluate_conditions(&condition, &attributes, &SavedGroups::new()));
/// ```
pub fn evaluate_conditions(
    condition: &Value,
    attributes: &Attributes,
    saved_groups: &SavedGroups,
) -> bool {
    let Value::Object(condition) = condition else {
        return true;
    };

    condition
        .iter()
        .all(|(key, condition_value)| match key.as_str() {
            "$or" => match condition_value {
                Value::Array(conditions) if !conditions.is_empty() => conditions
                    .iter()
                    .any(|c| evaluate_conditions(c, attributes, saved_groups)),
                _ => true,
            },
            "$nor" => match condition_value {
                Value::Array(conditions) => !conditions
                    .iter()
                    .any(|c| evaluate_conditions(c, attributes, saved_groups)),
                _ => true,
            },
            "$and" => match condition_value {
                Value::Array(conditions) if !conditions.is_empty() => conditions
                    .iter()
                    .all(|c| evaluate_conditions(c, attributes, saved_groups)),
                _ => true,
            },
            "$not" => !evaluate_conditions(condition_value, attributes, saved_groups),
            path => eval_condition_value(condition_value, resolve(attributes, path), saved_groups),
        })
}

/// Test a single attribute `value` against the right-hand side of an attribute condition.
///
/// An object with at least one `$`-prefixed key is an operator object. Anything else is compared
/// with deep equality.
fn eval_condition_value(
    condition_value: &Value,
    value: Option<&Value>,
    saved_groups: &SavedGroups,
) -> bool {
    match condition_value {
        Value::Object(operators) if operators.keys().any(|key| key.starts_with('$')) => operators
            .iter()
            .filter(|(key, _)| key.starts_with('$'))
            .all(|(key, literal)| match Operator::from_key(key) {
                Some(operator) => operator.eval(value, literal, saved_groups),
                None => {
                    log::trace!(target: "growthbook", operator = key.as_str(); "unknown condition operator");
                    false
                }
            }),
        _ => deep_eq(value, Some(condition_value)),
    }
}
