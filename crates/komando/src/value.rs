//! Typed flag values and the coercions that produce them.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// A bound flag or positional value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Integers widen to floats.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(n) => Some(*n),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// String items of a list, or the single string of a scalar.
    pub fn strs(&self) -> Vec<&str> {
        match self {
            Self::Str(s) => vec![s.as_str()],
            Self::List(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::List(items.into_iter().map(Into::into).collect())
    }
}

/// Conversion from one raw token to a typed value.
pub type Convert = Arc<dyn Fn(&str) -> Result<Value, String> + Send + Sync>;

/// How a flag's raw input becomes a [`Value`].
#[derive(Clone)]
pub enum FlagType {
    /// A no-value toggle.
    Bool,
    /// One value; the last occurrence wins.
    Scalar(Convert),
    /// Comma-separated values, accumulated across occurrences.
    Repeated(Convert),
}

impl fmt::Debug for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bool => "Bool",
            Self::Scalar(_) => "Scalar(..)",
            Self::Repeated(_) => "Repeated(..)",
        })
    }
}

impl FlagType {
    pub fn boolean() -> Self {
        Self::Bool
    }

    pub fn string() -> Self {
        Self::scalar(convert::string)
    }

    pub fn integer() -> Self {
        Self::scalar(convert::integer)
    }

    pub fn float() -> Self {
        Self::scalar(convert::float)
    }

    pub fn choice(choices: &[&str]) -> Self {
        Self::scalar(convert::choice(choices))
    }

    pub fn scalar<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::Scalar(Arc::new(convert))
    }

    pub fn repeated<F>(convert: F) -> Self
    where
        F: Fn(&str) -> Result<Value, String> + Send + Sync + 'static,
    {
        Self::Repeated(Arc::new(convert))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_repeated(&self) -> bool {
        matches!(self, Self::Repeated(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Scalar(_) => "scalar",
            Self::Repeated(_) => "repeated",
        }
    }

    /// Coerce every raw occurrence of a flag into one value.
    ///
    /// `raw` is never empty when called from the binder.
    pub fn coerce(&self, raw: &[String]) -> Result<Value, String> {
        match self {
            Self::Bool => match raw.last().map(String::as_str) {
                Some("true") | None => Ok(Value::Bool(true)),
                Some("false") => Ok(Value::Bool(false)),
                Some(other) => Err(format!("expected `true` or `false`, got `{other}`")),
            },
            Self::Scalar(convert) => match raw.last() {
                Some(value) => convert(value),
                None => Err("expected a value".to_string()),
            },
            Self::Repeated(convert) => raw
                .iter()
                .flat_map(|occurrence| occurrence.split(','))
                .map(|piece| convert(piece))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),
        }
    }
}

/// Ready-made conversions for [`FlagType::scalar`] and [`FlagType::repeated`].
pub mod convert {
    use super::Value;

    pub fn string(raw: &str) -> Result<Value, String> {
        Ok(Value::Str(raw.to_string()))
    }

    pub fn integer(raw: &str) -> Result<Value, String> {
        raw.parse::<i64>()
            .map(Value::Int)
            .map_err(|e| format!("can't parse `{raw}`, {e}"))
    }

    pub fn float(raw: &str) -> Result<Value, String> {
        raw.parse::<f64>()
            .map(Value::Float)
            .map_err(|e| format!("can't parse `{raw}`, {e}"))
    }

    /// Accept only one of `choices`.
    pub fn choice(choices: &[&str]) -> impl Fn(&str) -> Result<Value, String> + Send + Sync + use<> {
        let choices: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
        move |raw| {
            if choices.iter().any(|c| c == raw) {
                Ok(Value::Str(raw.to_string()))
            } else {
                Err(format!(
                    "invalid choice `{raw}`, choose from {}",
                    choices.join(",")
                ))
            }
        }
    }
}
