//! JSON projection of the ICL tree.
//!
//! Every tree and record type derives serde with lowerCamelCase keys and
//! `#[serde(default)]`, so any member may be left out and unknown keys are
//! ignored. This module adds the conversions used for files as a whole:
//!
//! - [`file_to_json`] / [`file_to_json_string`] encode a [`File`], dropping
//!   members that hold a zero value (`null`, `""`, `0`, `false`, `[]`).
//! - [`file_from_json`] / [`file_from_json_value`] decode one. The result is
//!   neither created nor validated; call [`File::create`] to fill in absent
//!   controls.
//!
//! It also holds the serde helpers the record types use for dates, times,
//! and binary payloads.
//!
//! # Examples
//!
//! ```
//! use imagecashletter::json;
//!
//! let input = br#"{
//!     "id": "demo",
//!     "fileHeader": {"standardLevel": "35", "fileCreationDate": "2018-10-24"},
//!     "somethingElse": true
//! }"#;
//! let file = json::file_from_json(input)?;
//! assert_eq!(file.id, "demo");
//! assert!(file.control.is_none());
//!
//! let text = json::file_to_json_string(&file)?;
//! assert!(text.contains("\"fileCreationDate\": \"2018-10-24T00:00:00Z\""));
//! # Ok::<(), imagecashletter::IclError>(())
//! ```

use crate::error::Result;
use crate::file::File;
use chrono::{NaiveDate, NaiveTime, SecondsFormat};
use serde_json::Value;

/// Encode a file as a pruned JSON value.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn file_to_json(file: &File) -> Result<Value> {
    let mut value = serde_json::to_value(file)?;
    prune(&mut value);
    Ok(value)
}

/// Encode a file as pretty-printed JSON text.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn file_to_json_string(file: &File) -> Result<String> {
    Ok(serde_json::to_string_pretty(&file_to_json(file)?)?)
}

/// Decode a file from JSON bytes.
///
/// # Errors
///
/// Returns [`IclError::Json`](crate::IclError::Json) with the decoder's
/// message if the input is not valid JSON or a member has the wrong type.
pub fn file_from_json(bytes: &[u8]) -> Result<File> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode a file from a parsed JSON value.
///
/// # Errors
///
/// Returns an error if a member has the wrong type.
pub fn file_from_json_value(value: Value) -> Result<File> {
    Ok(serde_json::from_value(value)?)
}

/// Remove zero-valued members from every object in `value`.
///
/// Objects are kept even when empty, so a present but blank record stays
/// present.
pub fn prune(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, member| {
                prune(member);
                !is_zero(member)
            });
        },
        Value::Array(items) => items.iter_mut().for_each(prune),
        _ => {},
    }
}

fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_u64() == Some(0) || n.as_i64() == Some(0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

fn rfc3339(date: NaiveDate, time: NaiveTime) -> String {
    date.and_time(time)
        .and_utc()
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serde helpers for `Option<NaiveDate>` fields.
///
/// Written as an RFC 3339 date-time at midnight UTC
/// (`2018-10-24T00:00:00Z`). Read from that form, `YYYY-MM-DD`, `YYYYMMDD`,
/// or an empty string or `null` for an absent date.
pub mod date {
    use chrono::{DateTime, NaiveDate, NaiveTime};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a date.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => s.serialize_str(&super::rfc3339(*date, NaiveTime::MIN)),
            None => s.serialize_none(),
        }
    }

    /// Deserialize a date.
    ///
    /// # Errors
    ///
    /// Returns an error for text in none of the accepted forms.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(text) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.date_naive())
            .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
            .or_else(|_| NaiveDate::parse_from_str(text, "%Y%m%d"))
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid date {text:?}")))
    }
}

/// Serde helpers for `Option<NaiveTime>` fields.
///
/// Written as an RFC 3339 date-time on the zero date, `0000-01-01`, in UTC
/// (`0000-01-01T15:30:00Z`). Read from any RFC 3339 date-time (its date is
/// ignored), `HH:MM`, `HH:MM:SS`, or an empty string or `null` for an
/// absent time.
pub mod time {
    use chrono::{DateTime, NaiveDate, NaiveTime};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize a time.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        let zero = NaiveDate::from_ymd_opt(0, 1, 1);
        match (value, zero) {
            (Some(time), Some(zero)) => s.serialize_str(&super::rfc3339(zero, *time)),
            _ => s.serialize_none(),
        }
    }

    /// Deserialize a time.
    ///
    /// # Errors
    ///
    /// Returns an error for text in none of the accepted forms.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let Some(text) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        DateTime::parse_from_rfc3339(text)
            .map(|dt| dt.time())
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid time {text:?}")))
    }
}

/// Serde helpers for binary payloads, carried as standard base64.
pub mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize bytes as base64.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(value: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(value))
    }

    /// Deserialize base64 text; `null` is empty.
    ///
    /// # Errors
    ///
    /// Returns an error for text that is not valid base64.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let text = Option::<String>::deserialize(d)?.unwrap_or_default();
        STANDARD.decode(text.trim()).map_err(D::Error::custom)
    }
}
