//! Deterministic hashing used for bucketing.
//!
//! All SDKs must produce the same numbers for the same inputs, so these functions are part of the
//! cross-language contract and must not change.

const FNV_OFFSET_BASIS: u32 = 0x811c9dc5;
const FNV_PRIME: u32 = 0x01000193;

/// 32-bit FNV-1a over the UTF-16 code units of `input`.
///
/// Other SDKs hash JavaScript-style char codes, so each step consumes a whole UTF-16 unit (not a
/// byte). For ASCII input this is the same as hashing bytes.
pub fn fnv1a32(input: &str) -> u32 {
    input.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Hash `value` with `seed` into a float in `[0, 1)`.
///
/// - Version 1: `fnv1a32(value + seed) % 1000 / 1000`.
/// - Version 2: `fnv1a32(str(fnv1a32(seed + value))) % 10000 / 10000`.
///
/// Returns `None` for any other version; callers must skip whatever they were hashing for.
pub fn gbhash(seed: &str, value: &str, version: u32) -> Option<f64> {
    match version {
        1 => {
            let n = fnv1a32(&format!("{value}{seed}"));
            Some(f64::from(n % 1000) / 1000.0)
        }
        2 => {
            let n = fnv1a32(&fnv1a32(&format!("{seed}{value}")).to_string());
            Some(f64::from(n % 10000) / 10000.0)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{fnv1a32, gbhash};

    #[test]
    fn fnv1a32_empty_is_offset_basis() {
        assert_eq!(fnv1a32(""), 0x811c9dc5);
    }

    #[test]
    fn fnv1a32_known_values() {
        assert_eq!(fnv1a32("a"), 0xe40c292c);
        assert_eq!(fnv1a32("hello"), 1335831723);
        assert_eq!(fnv1a32("growthbook"), 27182411);
    }

    #[test]
    fn fnv1a32_non_ascii_uses_utf16_units() {
        assert_eq!(fnv1a32("josé"), 1843599586);
        assert_eq!(fnv1a32("日本"), 1610399396);
        // Surrogate pair: two units.
        assert_eq!(fnv1a32("😀"), 3409036472);
    }

    #[test]
    fn gbhash_non_ascii() {
        assert_eq!(gbhash("feat", "josé", 1), Some(0.846));
        assert_eq!(gbhash("feat", "josé", 2), Some(0.0104));
        assert_eq!(gbhash("", "日本", 1), Some(0.396));
        assert_eq!(gbhash("", "😀", 2), Some(0.4971));
    }

    #[test]
    fn gbhash_v1() {
        assert_eq!(gbhash("", "a", 1), Some(0.22));
        assert_eq!(gbhash("", "b", 1), Some(0.077));
        assert_eq!(gbhash("b", "a", 1), Some(0.946));
        assert_eq!(gbhash("ef", "d", 1), Some(0.652));
        assert_eq!(gbhash("asdf", "8952klfjas09ujkasdf", 1), Some(0.335));
        assert_eq!(gbhash("", "123", 1), Some(0.011));
    }

    #[test]
    fn gbhash_v2() {
        assert_eq!(gbhash("", "a", 2), Some(0.0216));
        assert_eq!(gbhash("b", "a", 2), Some(0.665));
        assert_eq!(gbhash("ef", "d", 2), Some(0.8601));
        assert_eq!(gbhash("asdf", "8952klfjas09ujkasdf", 2), Some(0.5491));
        assert_eq!(gbhash("", "123", 2), Some(0.4547));
    }

    #[test]
    fn gbhash_unknown_version() {
        assert_eq!(gbhash("", "a", 0), None);
        assert_eq!(gbhash("", "a", 3), None);
    }

    #[test]
    fn gbhash_stays_in_unit_interval() {
        for i in 0..500 {
            let value = format!("user-{i}");
            for version in [1, 2] {
                let n = gbhash("seed", &value, version).unwrap();
                assert!((0.0..1.0).contains(&n), "{value} v{version} -> {n}");
            }
        }
    }
}
