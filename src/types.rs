use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlBinderError;

/// Values bound as query arguments and decoded out of result columns.
///
/// The same enum travels in both directions so the binder and the scanner never need to know
/// which driver sits on the other side:
/// ```rust
/// use sql_binder::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // "YYYY-MM-DD HH:MM:SS" and "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            RowValues::Blob(bytes) => Some(bytes),
            RowValues::Text(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Short variant name, used in conversion errors.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RowValues::Int(_) => "Int",
            RowValues::Float(_) => "Float",
            RowValues::Text(_) => "Text",
            RowValues::Bool(_) => "Bool",
            RowValues::Timestamp(_) => "Timestamp",
            RowValues::Null => "Null",
            RowValues::JSON(_) => "JSON",
            RowValues::Blob(_) => "Blob",
        }
    }
}

/// Turn a record field into a bindable argument.
pub trait ToRowValue {
    fn to_row_value(&self) -> RowValues;
}

/// Decode a column value into a record field or atomic destination.
pub trait FromRowValue: Sized {
    /// # Errors
    ///
    /// Returns `SqlBinderError::ConversionError` when the value has an incompatible kind.
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError>;
}

fn mismatch<T>(value: &RowValues) -> SqlBinderError {
    SqlBinderError::ConversionError(format!(
        "cannot decode {} into {}",
        value.kind(),
        std::any::type_name::<T>()
    ))
}

impl ToRowValue for RowValues {
    fn to_row_value(&self) -> RowValues {
        self.clone()
    }
}

impl FromRowValue for RowValues {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        Ok(value)
    }
}

impl ToRowValue for i64 {
    fn to_row_value(&self) -> RowValues {
        RowValues::Int(*self)
    }
}

impl FromRowValue for i64 {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::Int(i) => Ok(i),
            RowValues::Bool(b) => Ok(i64::from(b)),
            RowValues::Text(ref s) => s.trim().parse().map_err(|_| mismatch::<i64>(&value)),
            other => Err(mismatch::<i64>(&other)),
        }
    }
}

macro_rules! narrow_int {
    ($($t:ty),*) => {
        $(
            impl ToRowValue for $t {
                fn to_row_value(&self) -> RowValues {
                    RowValues::Int(i64::from(*self))
                }
            }

            impl FromRowValue for $t {
                fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
                    let wide = i64::from_row_value(value)?;
                    <$t>::try_from(wide).map_err(|_| {
                        SqlBinderError::ConversionError(format!(
                            "{wide} out of range for {}",
                            stringify!($t)
                        ))
                    })
                }
            }
        )*
    };
}

narrow_int!(i32, i16, u32);

impl ToRowValue for f64 {
    fn to_row_value(&self) -> RowValues {
        RowValues::Float(*self)
    }
}

impl FromRowValue for f64 {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        value.as_float().ok_or_else(|| mismatch::<f64>(&value))
    }
}

impl ToRowValue for f32 {
    fn to_row_value(&self) -> RowValues {
        RowValues::Float(f64::from(*self))
    }
}

impl FromRowValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        f64::from_row_value(value).map(|f| f as f32)
    }
}

impl ToRowValue for bool {
    fn to_row_value(&self) -> RowValues {
        RowValues::Bool(*self)
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        value.as_bool().copied().ok_or_else(|| mismatch::<bool>(&value))
    }
}

impl ToRowValue for String {
    fn to_row_value(&self) -> RowValues {
        RowValues::Text(self.clone())
    }
}

impl ToRowValue for &str {
    fn to_row_value(&self) -> RowValues {
        RowValues::Text((*self).to_string())
    }
}

impl FromRowValue for String {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::Text(s) => Ok(s),
            RowValues::Blob(bytes) => {
                String::from_utf8(bytes).map_err(|e| SqlBinderError::ConversionError(e.to_string()))
            }
            RowValues::Int(i) => Ok(i.to_string()),
            RowValues::Float(f) => Ok(f.to_string()),
            RowValues::JSON(json) => Ok(json.to_string()),
            other => Err(mismatch::<String>(&other)),
        }
    }
}

impl ToRowValue for NaiveDateTime {
    fn to_row_value(&self) -> RowValues {
        RowValues::Timestamp(*self)
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        value
            .as_timestamp()
            .ok_or_else(|| mismatch::<NaiveDateTime>(&value))
    }
}

impl ToRowValue for Vec<u8> {
    fn to_row_value(&self) -> RowValues {
        RowValues::Blob(self.clone())
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::Blob(bytes) => Ok(bytes),
            RowValues::Text(s) => Ok(s.into_bytes()),
            other => Err(mismatch::<Vec<u8>>(&other)),
        }
    }
}

impl ToRowValue for JsonValue {
    fn to_row_value(&self) -> RowValues {
        RowValues::JSON(self.clone())
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        match value {
            RowValues::JSON(json) => Ok(json),
            RowValues::Text(s) => Ok(serde_json::from_str(&s)?),
            RowValues::Null => Ok(JsonValue::Null),
            other => Err(mismatch::<JsonValue>(&other)),
        }
    }
}

impl<T: ToRowValue> ToRowValue for Option<T> {
    fn to_row_value(&self) -> RowValues {
        self.as_ref().map_or(RowValues::Null, ToRowValue::to_row_value)
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: RowValues) -> Result<Self, SqlBinderError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_row_value(value).map(Some)
        }
    }
}
