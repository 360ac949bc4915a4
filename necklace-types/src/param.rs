use std::fmt;

use serde::{Deserialize, Serialize};

/// Keys of the parameters a pattern processor exposes to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKey {
    Steps,
    Pulses,
    Rotation,
    Rate,
    NoteLength,
    IsTriplets,
    Name,
    IsMute,
}

impl ParamKey {
    pub const ALL: [ParamKey; 8] = [
        ParamKey::Steps,
        ParamKey::Pulses,
        ParamKey::Rotation,
        ParamKey::Rate,
        ParamKey::NoteLength,
        ParamKey::IsTriplets,
        ParamKey::Name,
        ParamKey::IsMute,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamKey::Steps => "steps",
            ParamKey::Pulses => "pulses",
            ParamKey::Rotation => "rotation",
            ParamKey::Rate => "rate",
            ParamKey::NoteLength => "note_length",
            ParamKey::IsTriplets => "is_triplets",
            ParamKey::Name => "name",
            ParamKey::IsMute => "is_mute",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == key)
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped parameter value as it arrives from an outer surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl ParamValue {
    fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            ParamValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }
}

/// A typed parameter change. One variant per parameter key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamChange {
    Steps(u32),
    Pulses(u32),
    Rotation(i32),
    Rate(f64),
    NoteLength(f64),
    IsTriplets(bool),
    Name(String),
    IsMute(bool),
}

impl ParamChange {
    pub fn key(&self) -> ParamKey {
        match self {
            ParamChange::Steps(_) => ParamKey::Steps,
            ParamChange::Pulses(_) => ParamKey::Pulses,
            ParamChange::Rotation(_) => ParamKey::Rotation,
            ParamChange::Rate(_) => ParamKey::Rate,
            ParamChange::NoteLength(_) => ParamKey::NoteLength,
            ParamChange::IsTriplets(_) => ParamKey::IsTriplets,
            ParamChange::Name(_) => ParamKey::Name,
            ParamChange::IsMute(_) => ParamKey::IsMute,
        }
    }

    pub fn value(&self) -> ParamValue {
        match self {
            ParamChange::Steps(v) | ParamChange::Pulses(v) => ParamValue::Int(*v as i64),
            ParamChange::Rotation(v) => ParamValue::Int(*v as i64),
            ParamChange::Rate(v) | ParamChange::NoteLength(v) => ParamValue::Float(*v),
            ParamChange::IsTriplets(v) | ParamChange::IsMute(v) => ParamValue::Bool(*v),
            ParamChange::Name(v) => ParamValue::Text(v.clone()),
        }
    }

    /// Build a typed change from a key and an untyped value.
    pub fn from_key_value(key: ParamKey, value: ParamValue) -> Result<Self, ParamError> {
        let mismatch = |expected| ParamError::TypeMismatch { key, expected };
        match key {
            ParamKey::Steps | ParamKey::Pulses => {
                let v = value.as_integer().ok_or_else(|| mismatch("integer"))?;
                let v = u32::try_from(v).map_err(|_| ParamError::OutOfRange { key, value: v })?;
                Ok(if key == ParamKey::Steps {
                    ParamChange::Steps(v)
                } else {
                    ParamChange::Pulses(v)
                })
            }
            ParamKey::Rotation => {
                let v = value.as_integer().ok_or_else(|| mismatch("integer"))?;
                let v = i32::try_from(v).map_err(|_| ParamError::OutOfRange { key, value: v })?;
                Ok(ParamChange::Rotation(v))
            }
            ParamKey::Rate => Ok(ParamChange::Rate(
                value.as_number().ok_or_else(|| mismatch("number"))?,
            )),
            ParamKey::NoteLength => Ok(ParamChange::NoteLength(
                value.as_number().ok_or_else(|| mismatch("number"))?,
            )),
            ParamKey::IsTriplets | ParamKey::IsMute => match value {
                ParamValue::Bool(b) if key == ParamKey::IsTriplets => Ok(ParamChange::IsTriplets(b)),
                ParamValue::Bool(b) => Ok(ParamChange::IsMute(b)),
                _ => Err(mismatch("bool")),
            },
            ParamKey::Name => match value {
                ParamValue::Text(s) => Ok(ParamChange::Name(s)),
                _ => Err(mismatch("text")),
            },
        }
    }

    /// Build a typed change from a raw key string, as sent by untyped callers.
    pub fn from_raw(key: &str, value: ParamValue) -> Result<Self, ParamError> {
        let key = ParamKey::parse(key).ok_or_else(|| ParamError::UnknownKey(key.to_string()))?;
        Self::from_key_value(key, value)
    }
}

/// Error converting an untyped parameter into a [`ParamChange`].
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    UnknownKey(String),
    TypeMismatch { key: ParamKey, expected: &'static str },
    OutOfRange { key: ParamKey, value: i64 },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(k) => write!(f, "unknown parameter key '{}'", k),
            Self::TypeMismatch { key, expected } => {
                write!(f, "parameter '{}' expects a {} value", key, expected)
            }
            Self::OutOfRange { key, value } => {
                write!(f, "value {} out of range for parameter '{}'", value, key)
            }
        }
    }
}

impl std::error::Error for ParamError {}
