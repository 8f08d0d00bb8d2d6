//! Lenient deserializers for query strings.
//!
//! Filter structs flatten [`crate::pagination::PaginationParams`], and serde's
//! `flatten` hands every query value over as a string. These helpers parse
//! those strings and treat an empty value (`?is_active=`) as absent.

use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use uuid::Uuid;

fn parse_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse::<T>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

pub fn deserialize_optional_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

pub fn deserialize_optional_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

pub fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<chrono::NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    parse_optional(deserializer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Filters {
        #[serde(default, deserialize_with = "deserialize_optional_bool")]
        is_active: Option<bool>,
        #[serde(default, deserialize_with = "deserialize_optional_uuid")]
        student_id: Option<Uuid>,
        #[serde(default, deserialize_with = "deserialize_optional_i32")]
        day: Option<i32>,
    }

    #[test]
    fn test_parses_string_values() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"is_active":"true","student_id":"{}","day":"3"}}"#, id);
        let f: Filters = serde_json::from_str(&json).unwrap();
        assert_eq!(f.is_active, Some(true));
        assert_eq!(f.student_id, Some(id));
        assert_eq!(f.day, Some(3));
    }

    #[test]
    fn test_empty_values_are_none() {
        let f: Filters =
            serde_json::from_str(r#"{"is_active":"","student_id":"","day":" "}"#).unwrap();
        assert_eq!(f.is_active, None);
        assert_eq!(f.student_id, None);
        assert_eq!(f.day, None);
    }

    #[test]
    fn test_missing_values_are_none() {
        let f: Filters = serde_json::from_str("{}").unwrap();
        assert!(f.is_active.is_none() && f.student_id.is_none() && f.day.is_none());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(serde_json::from_str::<Filters>(r#"{"day":"monday"}"#).is_err());
    }
}
