//! Song record model
//!
//! A song is an open-ended, ordered map of field name to JSON value. Only the
//! `id` field carries meaning for the service; everything else (title, artist,
//! tone, ...) is stored and returned untouched.
//!
//! Identifier handling follows two rules:
//! - Path identifiers are parsed as an integer prefix (`"12abc"` is 12,
//!   `"abc"` is not a number and matches nothing).
//! - Body identifiers on create are numerically coerced; values that are not
//!   numbers are stored as `null`, which never matches a lookup.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Name of the lookup field
pub const ID_FIELD: &str = "id";

/// One song entry in the repertoire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Song(Map<String, Value>);

impl Song {
    /// Wrap a set of fields as a song without touching `id`
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Build a song from a request body, coercing its `id` to a number
    pub fn from_body(mut fields: Map<String, Value>) -> Self {
        let id = coerce_id(fields.get(ID_FIELD));
        fields.insert(ID_FIELD.to_string(), id);
        Self(fields)
    }

    /// Raw stored identifier, if any
    pub fn id(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    /// True when the stored `id` is a number equal to `id`
    ///
    /// A `None` identifier (not a number) never matches, not even a song whose
    /// own identifier is missing or `null`.
    pub fn has_id(&self, id: Option<i64>) -> bool {
        let Some(wanted) = id else {
            return false;
        };
        match self.id() {
            Some(Value::Number(stored)) => match stored.as_i64() {
                Some(stored) => stored == wanted,
                None => stored.as_f64() == Some(wanted as f64),
            },
            _ => false,
        }
    }

    /// Overwrite the identifier, keeping its position if already present
    pub fn set_id(&mut self, id: i64) {
        self.0.insert(ID_FIELD.to_string(), Value::from(id));
    }

    /// Shallow merge: every field in `fields` replaces or extends this song
    ///
    /// Existing fields keep their position, new fields are appended in the
    /// order they appear in `fields`.
    pub fn merge(&mut self, fields: Map<String, Value>) {
        for (key, value) in fields {
            self.0.insert(key, value);
        }
    }

    /// Field access by name
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// All fields in stored order
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Find the index of the first song matching `id`
pub fn position_of(songs: &[Song], id: Option<i64>) -> Option<usize> {
    songs.iter().position(|song| song.has_id(id))
}

/// Parse a path segment as an integer prefix
///
/// Leading whitespace and one sign character are accepted, then the longest run
/// of ASCII digits is taken. Returns `None` when there are no digits or the
/// value does not fit in an `i64`.
pub fn parse_path_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = rest[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Numeric coercion of a body identifier
///
/// | input | result |
/// |---|---|
/// | number | same number |
/// | string | trimmed; empty is 0, otherwise decimal parse |
/// | `true` / `false` | 1 / 0 |
/// | `null` | 0 |
/// | missing, array, object, unparseable | `null` |
pub fn coerce_id(value: Option<&Value>) -> Value {
    let coerced = match value {
        None | Some(Value::Array(_)) | Some(Value::Object(_)) => None,
        Some(Value::Null) => Some(0.0),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        Some(Value::Number(number)) => {
            if number.is_i64() || number.is_u64() {
                return Value::Number(number.clone());
            }
            number.as_f64()
        }
        Some(Value::String(text)) => {
            let text = text.trim();
            if text.is_empty() {
                Some(0.0)
            } else {
                text.parse::<f64>().ok()
            }
        }
    };

    coerced
        .filter(|n| n.is_finite())
        .map(number_value)
        .unwrap_or(Value::Null)
}

/// Integral values are stored in integer form so `12.0` is written as `12`
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}
