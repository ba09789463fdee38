//! Version string normalization for the `$v*` comparison operators.
use crate::{value::format_number, Value};

/// Normalize a version-like value into a string that compares correctly with plain
/// lexicographic ordering.
///
/// - numbers are stringified first, anything else that isn't a non-empty string becomes `"0"`;
/// - a leading `v`/`V` is dropped, as is build metadata after `+`;
/// - the version is split on `.` and `-`; a bare `MAJOR.MINOR.PATCH` gets a trailing `~` part so
///   that a release sorts after all of its pre-releases;
/// - numeric parts are left-padded with spaces to a width of 5.
///
/// ```
/// # use growthbook_core::padded_version_string;
/// let release = padded_version_string(Some(&"2.0.0".into()));
/// let beta = padded_version_string(Some(&"2.0.0-beta".into()));
/// assert!(release > beta);
/// ```
pub fn padded_version_string(input: Option<&Value>) -> String {
    let version = match input {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => format_number(*n),
        _ => return "0".to_owned(),
    };

    let version = version
        .strip_prefix(|c: char| c == 'v' || c == 'V')
        .unwrap_or(version.as_str());
    let version = version.split('+').next().unwrap_or_default();

    let mut parts: Vec<&str> = version.split(|c: char| c == '.' || c == '-').collect();
    if parts.len() == 3 {
        parts.push("~");
    }

    parts
        .into_iter()
        .map(|part| {
            if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
                format!("{part:>5}")
            } else {
                part.to_owned()
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::padded_version_string;
    use crate::Value;

    fn pad(s: &str) -> String {
        padded_version_string(Some(&s.into()))
    }

    #[test]
    fn pads_numeric_parts() {
        assert_eq!(pad("1.2.3"), "    1-    2-    3-~");
        assert_eq!(pad("v1.2.3-beta.1"), "    1-    2-    3-beta-    1");
        assert_eq!(pad("1.2.3+build.5"), "    1-    2-    3-~");
        assert_eq!(pad("123456.1"), "123456-    1");
    }

    #[test]
    fn non_versions_become_zero() {
        assert_eq!(padded_version_string(None), "0");
        assert_eq!(padded_version_string(Some(&Value::Null)), "0");
        assert_eq!(padded_version_string(Some(&"".into())), "0");
        assert_eq!(padded_version_string(Some(&true.into())), "0");
    }

    #[test]
    fn numbers_are_stringified() {
        assert_eq!(padded_version_string(Some(&2.0.into())), "    2");
        assert_eq!(padded_version_string(Some(&1.5.into())), pad("1.5"));
    }

    #[test]
    fn release_sorts_after_prerelease() {
        assert!(pad("2.0.0") > pad("2.0.0-beta"));
        assert!(pad("2.0.0-beta") > pad("2.0.0-alpha"));
        assert!(pad("2.0.0-rc.1") < pad("2.0.0"));
    }

    #[test]
    fn numeric_parts_compare_numerically() {
        assert!(pad("1.9.0") < pad("1.10.0"));
        assert!(pad("v1.10.0") > pad("1.9.99"));
        assert_eq!(pad("V1.0.0"), pad("1.0.0+meta"));
    }
}
