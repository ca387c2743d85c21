use crate::storage::StoreError;

pub mod hrm;
pub mod ledger;
pub mod pms;
pub mod system;

/// Serde helpers for calendar dates.
///
/// Dates are written as `YYYY-MM-DD`. On input a full RFC 3339 timestamp is
/// also accepted and truncated to its date part, since forms post either.
pub mod calendar {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

    pub fn parse(raw: &str) -> Option<Date> {
        let raw = raw.trim();
        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .ok()
            .or_else(|| OffsetDateTime::parse(raw, &Rfc3339).ok().map(|ts| ts.date()))
    }

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(date)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date `{}`", raw)))
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.collect_str(d),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => parse(&raw)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("invalid date `{}`", raw))),
                None => Ok(None),
            }
        }
    }

    /// Clearable date patch field, see `models::nullable`.
    pub mod nullable {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Option<Date>>, D::Error> {
            super::option::deserialize(deserializer).map(Some)
        }
    }
}

/// Patch fields that can be cleared. Used with `#[serde(default)]`, an
/// absent key is `None` (keep), `null` is `Some(None)` (clear) and a value
/// is `Some(Some(v))` (overwrite).
pub mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

pub(crate) fn require(field: &str, value: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
