use std::collections::HashMap;

use crate::Value;

/// Type alias for a HashMap representing the attributes of a user.
///
/// Keys are attribute names. Values may be nested objects, which conditions address with dotted
/// paths (`"company.size"`).
///
/// # Examples
/// ```
/// # use growthbook_core::{Attributes, Value};
/// let attributes = [
///     ("id".to_owned(), "user-1".into()),
///     ("age".to_owned(), 30.0.into()),
///     ("company".to_owned(), serde_json::json!({"size": "large"}).into()),
/// ].into_iter().collect::<Attributes>();
/// ```
pub type Attributes = HashMap<String, Value>;

/// Resolve a dotted attribute path against `attributes`.
///
/// Returns `None` (absent) as soon as a segment is missing or an intermediate value is not an
/// object. Arrays are not indexed into.
pub fn resolve<'a>(attributes: &'a Attributes, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = attributes.get(segments.next()?)?;
    for segment in segments {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}
