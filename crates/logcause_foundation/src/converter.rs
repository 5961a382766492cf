//! Converters applied to captured parameter text.
//!
//! Every parameter group carries a [`Converter`] naming how its content is
//! interpreted once the rule runs. Conversion here is only used to check
//! that the sample content is convertible and to feed constraint checks.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::{Error, ErrorKind, Result};

/// Timestamp layouts accepted by [`Converter::Date`], tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%b/%Y:%H:%M:%S",
    "%d/%b/%Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

/// Offset-carrying layouts, normalized to UTC.
const ZONED_FORMATS: &[&str] = &["%d/%b/%Y:%H:%M:%S %z", "%Y-%m-%d %H:%M:%S%.f %z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d/%b/%Y", "%d/%B/%Y"];

/// A named conversion for a parameter group.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Converter {
    /// Keep the text as is.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "to_string"))]
    String,
    /// Signed integer.
    #[cfg_attr(feature = "serde", serde(rename = "to_int"))]
    Int,
    /// Floating point number.
    #[cfg_attr(feature = "serde", serde(rename = "to_float"))]
    Float,
    /// Timestamp.
    #[cfg_attr(feature = "serde", serde(rename = "to_date"))]
    Date,
}

impl Converter {
    /// All converters, in declaration order.
    pub const ALL: [Self; 4] = [Self::String, Self::Int, Self::Float, Self::Date];

    /// Returns the converter's name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "to_string",
            Self::Int => "to_int",
            Self::Float => "to_float",
            Self::Date => "to_date",
        }
    }

    /// Converts `content`.
    ///
    /// # Errors
    ///
    /// Returns a `Conversion` error if the content does not parse.
    pub fn convert(self, content: &str) -> Result<Value> {
        let value = match self {
            Self::String => Some(Value::String(content.to_string())),
            Self::Int => content.parse().ok().map(Value::Int),
            Self::Float => content.parse().ok().map(Value::Float),
            Self::Date => parse_date(content).map(Value::Date),
        };
        value.ok_or_else(|| Error::conversion(self.name(), content))
    }

    /// Returns true if `content` converts successfully.
    #[must_use]
    pub fn accepts(self, content: &str) -> bool {
        self.convert(content).is_ok()
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Converter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| Error::new(ErrorKind::UnknownConverter(s.to_string())))
    }
}

/// A converted parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// Unconverted text.
    String(String),
    /// Integer.
    Int(i64),
    /// Float.
    Float(f64),
    /// Timestamp without zone (zoned inputs are normalized to UTC).
    Date(NaiveDateTime),
}

impl Value {
    /// Returns the numeric value of an `Int` or `Float`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the timestamp of a `Date`.
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }
}

/// Parses a log timestamp in one of the supported layouts.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.naive_utc());
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
