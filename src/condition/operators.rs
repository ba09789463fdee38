use std::cmp::Ordering;

use regex::Regex;

use super::{eval_condition_value, evaluate_conditions, SavedGroups};
use crate::{
    value::{deep_eq, type_name},
    version::padded_version_string,
    Value,
};

/// Attribute operators recognized inside an operator object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    VersionEq,
    VersionNe,
    VersionLt,
    VersionLte,
    VersionGt,
    VersionGte,
    In,
    NotIn,
    Exists,
    Type,
    /// `regex` crate syntax. Patterns using look-around or backreferences are rejected and fail.
    Regex,
    ElemMatch,
    Size,
    All,
    InGroup,
    NotInGroup,
    Not,
}

impl Operator {
    pub(super) fn from_key(key: &str) -> Option<Operator> {
        Some(match key {
            "$eq" => Operator::Eq,
            "$ne" => Operator::Ne,
            "$lt" => Operator::Lt,
            "$lte" => Operator::Lte,
            "$gt" => Operator::Gt,
            "$gte" => Operator::Gte,
            "$veq" => Operator::VersionEq,
            "$vne" => Operator::VersionNe,
            "$vlt" => Operator::VersionLt,
            "$vlte" => Operator::VersionLte,
            "$vgt" => Operator::VersionGt,
            "$vgte" => Operator::VersionGte,
            "$in" => Operator::In,
            "$nin" => Operator::NotIn,
            "$exists" => Operator::Exists,
            "$type" => Operator::Type,
            "$regex" => Operator::Regex,
            "$elemMatch" => Operator::ElemMatch,
            "$size" => Operator::Size,
            "$all" => Operator::All,
            "$inGroup" => Operator::InGroup,
            "$notInGroup" => Operator::NotInGroup,
            "$not" => Operator::Not,
            _ => return None,
        })
    }

    /// Apply the operator to an attribute `value` (`None` if absent) and the operator's `literal`.
    /// Returns `false` if the operator cannot be applied or there's a misconfiguration.
    pub(super) fn eval(
        self,
        value: Option<&Value>,
        literal: &Value,
        saved_groups: &SavedGroups,
    ) -> bool {
        self.try_eval(value, literal, saved_groups)
            .unwrap_or(false)
    }

    /// Try applying the operator, returning `None` if it cannot be applied.
    fn try_eval(
        self,
        value: Option<&Value>,
        literal: &Value,
        saved_groups: &SavedGroups,
    ) -> Option<bool> {
        match self {
            Self::Eq => Some(deep_eq(value, Some(literal))),
            Self::Ne => Some(!deep_eq(value, Some(literal))),

            Self::Lt | Self::Lte | Self::Gt | Self::Gte => {
                let ordering = compare(value?, literal)?;
                Some(match self {
                    Self::Lt => ordering.is_lt(),
                    Self::Lte => ordering.is_le(),
                    Self::Gt => ordering.is_gt(),
                    Self::Gte => ordering.is_ge(),
                    _ => {
                        // unreachable
                        return None;
                    }
                })
            }

            Self::VersionEq
            | Self::VersionNe
            | Self::VersionLt
            | Self::VersionLte
            | Self::VersionGt
            | Self::VersionGte => {
                let attribute_version = padded_version_string(value);
                let condition_version = padded_version_string(Some(literal));
                Some(match self {
                    Self::VersionEq => attribute_version == condition_version,
                    Self::VersionNe => attribute_version != condition_version,
                    Self::VersionLt => attribute_version < condition_version,
                    Self::VersionLte => attribute_version <= condition_version,
                    Self::VersionGt => attribute_version > condition_version,
                    Self::VersionGte => attribute_version >= condition_version,
                    _ => {
                        // unreachable
                        return None;
                    }
                })
            }

            Self::In | Self::NotIn => {
                let candidates = literal.as_array()?;
                let is_in = match value {
                    Some(Value::Array(items)) => {
                        items.iter().any(|item| contains(candidates, item))
                    }
                    Some(value) => contains(candidates, value),
                    None => false,
                };
                Some(is_in == (self == Self::In))
            }

            Self::Exists => {
                let expected = literal.as_bool()?;
                let exists = !matches!(value, None | Some(Value::Null));
                Some(exists == expected)
            }

            Self::Type => Some(literal.as_str()? == type_name(value)),

            Self::Regex => {
                let s = value?.as_str()?;
                let pattern = literal.as_str()?;
                let regex = Regex::new(pattern)
                    .map_err(|err| {
                        log::warn!(target: "growthbook", pattern; "invalid regular expression in condition: {err}");
                    })
                    .ok()?;
                Some(regex.is_match(s))
            }

            Self::ElemMatch => {
                let items = value?.as_array()?;
                Some(items.iter().any(|item| match item {
                    Value::Object(item_attributes) => {
                        evaluate_conditions(literal, item_attributes, saved_groups)
                    }
                    _ => eval_condition_value(literal, Some(item), saved_groups),
                }))
            }

            Self::Size => {
                let len = value?.as_array()?.len() as f64;
                // Any other literal is compared with the length as a plain value, so a string
                // like "2" never matches.
                Some(match literal {
                    Value::Number(expected) => len == *expected,
                    _ => eval_condition_value(literal, Some(&Value::Number(len)), saved_groups),
                })
            }

            Self::All => {
                let items = value?.as_array()?;
                let required = literal.as_array()?;
                Some(required.iter().all(|r| contains(items, r)))
            }

            Self::InGroup => {
                let group = saved_groups.get(literal.as_str()?)?;
                Some(value.is_some_and(|value| contains(group, value)))
            }

            Self::NotInGroup => {
                let Some(group) = saved_groups.get(literal.as_str()?) else {
                    // Nobody is a member of a group that doesn't exist.
                    return Some(true);
                };
                Some(!value.is_some_and(|value| contains(group, value)))
            }

            Self::Not => Some(!eval_condition_value(literal, value, saved_groups)),
        }
    }
}

fn contains(haystack: &[Value], needle: &Value) -> bool {
    haystack
        .iter()
        .any(|item| deep_eq(Some(item), Some(needle)))
}

/// Order two values for `$lt`/`$lte`/`$gt`/`$gte`.
///
/// Two strings compare by code point, anything else compares numerically after coercion.
/// Returns `None` if the values are not comparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => to_number(a).partial_cmp(&to_number(b)),
    }
}

fn to_number(value: &Value) -> f64 {
    match value {
        Value::Null => 0.0,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Number(n) => *n,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().unwrap_or(f64::NAN)
            }
        }
        Value::Array(_) | Value::Object(_) => f64::NAN,
    }
}
