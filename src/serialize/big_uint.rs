use num_bigint::BigUint;
use num_traits::Num;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    value.to_str_radix(10).serialize(serializer)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrUint {
    String(String),
    Uint(u64),
}

/// Accepts a canonical decimal string or, for small values, a plain JSON number.
///
/// Canonical means ASCII digits only, with no sign, separators, whitespace, or
/// leading zeros, so every value has exactly one string form.
pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
where
    D: Deserializer<'de>,
{
    let su: StringOrUint = Deserialize::deserialize(deserializer)?;
    match su {
        StringOrUint::String(s) => parse_canonical(&s).map_err(de::Error::custom),
        StringOrUint::Uint(u) => Ok(BigUint::from(u)),
    }
}

fn parse_canonical(s: &str) -> Result<BigUint, String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err("expected a decimal integer".to_string());
    }

    if s.len() > 1 && s.starts_with('0') {
        return Err("leading zeros are not allowed".to_string());
    }

    BigUint::from_str_radix(s, 10).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Wrapper(#[serde(with = "super")] BigUint);

    #[test]
    fn encodes_as_decimal_string() {
        let json = serde_json::to_string(&Wrapper(BigUint::from(953u32))).unwrap();
        assert_eq!(json, "\"953\"");
    }

    #[test]
    fn accepts_string_and_number() {
        let a: Wrapper = serde_json::from_str("\"123456789012345678901234567890\"").unwrap();
        assert_eq!(a.0.to_str_radix(10), "123456789012345678901234567890");

        let b: Wrapper = serde_json::from_str("42").unwrap();
        assert_eq!(b.0, BigUint::from(42u32));
    }

    #[test]
    fn rejects_non_decimal() {
        assert!(serde_json::from_str::<Wrapper>("\"0x10\"").is_err());
        assert!(serde_json::from_str::<Wrapper>("\"-5\"").is_err());
    }

    #[test]
    fn rejects_non_canonical_decimal() {
        for input in ["\"+5\"", "\"1_000\"", "\" 7\"", "\"007\"", "\"\""] {
            assert!(serde_json::from_str::<Wrapper>(input).is_err(), "{input}");
        }

        let zero: Wrapper = serde_json::from_str("\"0\"").unwrap();
        assert_eq!(zero.0, BigUint::from(0u32));
    }
}
