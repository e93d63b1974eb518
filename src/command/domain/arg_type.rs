//! Argument types and their validation rules.
//!
//! An [`ArgType`] is built once when a command is registered and reused for
//! every invocation. Parsing is total: every input yields either a typed
//! [`ArgValue`] or an [`ArgError`]. Callers treat all errors alike; the
//! variants only exist so that rejections can be logged with a reason.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use super::RegistrationError;

/// Inclusive bounds applied to a parsed value or a text length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds<T> {
    min: Option<T>,
    max: Option<T>,
}

impl<T: Copy + PartialOrd> Bounds<T> {
    /// Bounds that accept every value.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Bounds with an inclusive lower limit.
    #[must_use]
    pub const fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Bounds with an inclusive upper limit.
    #[must_use]
    pub const fn at_most(max: T) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// Bounds with both limits, inclusive.
    #[must_use]
    pub const fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Returns the lower limit, if any.
    #[must_use]
    pub const fn min(&self) -> Option<T> {
        self.min
    }

    /// Returns the upper limit, if any.
    #[must_use]
    pub const fn max(&self) -> Option<T> {
        self.max
    }

    /// Returns `true` when `value` lies within the bounds.
    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}

impl<T: fmt::Display> Bounds<T> {
    fn describe(&self) -> String {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => format!("{min}..={max}"),
            (Some(min), None) => format!(">= {min}"),
            (None, Some(max)) => format!("<= {max}"),
            (None, None) => String::new(),
        }
    }
}

/// The declared type of a positional argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgType {
    /// Floating point number with optional inclusive bounds.
    Float(Bounds<f64>),
    /// Integer with optional inclusive bounds.
    Int(Bounds<i64>),
    /// Free text with optional inclusive length bounds (in characters).
    Text(Bounds<usize>),
    /// Exact, case-sensitive match against a fixed set of values.
    Choice(BTreeSet<String>),
    /// Any number of whitespace separated elements of the inner type.
    List(Box<ArgType>),
}

/// A successfully parsed argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Parsed float.
    Float(f64),
    /// Parsed integer.
    Int(i64),
    /// Parsed text or choice.
    Text(String),
    /// Parsed list elements, in input order.
    List(Vec<ArgValue>),
}

impl ArgValue {
    /// Returns the float value, if this is a float.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text value, if this is text or a choice.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

/// Reason an argument could not be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgError {
    /// Input was not a number of the declared kind.
    #[error("'{0}' is not a valid number")]
    NotANumber(String),

    /// Number parsed but fell outside the configured bounds.
    #[error("'{0}' is out of range")]
    OutOfRange(String),

    /// Text length fell outside the configured bounds.
    #[error("text of length {0} is outside the allowed length")]
    LengthOutOfRange(usize),

    /// Input did not match any allowed choice.
    #[error("'{0}' is not an allowed value")]
    NotAChoice(String),

    /// Token count did not match the declared positional arguments.
    #[error("expected {expected} arguments, got {actual}")]
    WrongArity {
        /// Number of tokens the schema consumes.
        expected: usize,
        /// Number of tokens supplied.
        actual: usize,
    },
}

impl ArgType {
    /// Unbounded float.
    #[must_use]
    pub const fn float() -> Self {
        Self::Float(Bounds::unbounded())
    }

    /// Unbounded integer.
    #[must_use]
    pub const fn int() -> Self {
        Self::Int(Bounds::unbounded())
    }

    /// Text of any length.
    #[must_use]
    pub const fn text() -> Self {
        Self::Text(Bounds::unbounded())
    }

    /// Choice between the given literal values.
    #[must_use]
    pub fn choice(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::Choice(values.into_iter().map(Into::into).collect())
    }

    /// List whose elements are parsed with `element`.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::List(Box::new(element))
    }

    /// Returns `true` for list types.
    #[must_use]
    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` for text types.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Parses a single raw token.
    ///
    /// A list type splits `raw` on whitespace and parses each element.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] on any format or bounds violation.
    pub fn parse(&self, raw: &str) -> Result<ArgValue, ArgError> {
        match self {
            Self::Float(bounds) => {
                let value = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| ArgError::NotANumber(raw.to_owned()))?;
                if bounds.contains(value) {
                    Ok(ArgValue::Float(value))
                } else {
                    Err(ArgError::OutOfRange(raw.to_owned()))
                }
            }
            Self::Int(bounds) => {
                let value = raw
                    .parse::<i64>()
                    .map_err(|_| ArgError::NotANumber(raw.to_owned()))?;
                if bounds.contains(value) {
                    Ok(ArgValue::Int(value))
                } else {
                    Err(ArgError::OutOfRange(raw.to_owned()))
                }
            }
            Self::Text(bounds) => {
                let length = raw.chars().count();
                if bounds.contains(length) {
                    Ok(ArgValue::Text(raw.to_owned()))
                } else {
                    Err(ArgError::LengthOutOfRange(length))
                }
            }
            Self::Choice(values) => {
                if values.contains(raw) {
                    Ok(ArgValue::Text(raw.to_owned()))
                } else {
                    Err(ArgError::NotAChoice(raw.to_owned()))
                }
            }
            Self::List(element) => {
                let tokens: Vec<&str> = raw.split_whitespace().collect();
                element.parse_elements(&tokens)
            }
        }
    }

    /// Parses a sequence of tokens.
    ///
    /// For a list type every token becomes one element and an empty sequence
    /// yields an empty list. Any other type requires exactly one token.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError`] if any element fails to parse.
    pub fn parse_tokens(&self, tokens: &[&str]) -> Result<ArgValue, ArgError> {
        match (self, tokens) {
            (Self::List(element), _) => element.parse_elements(tokens),
            (_, [token]) => self.parse(token),
            _ => Err(ArgError::WrongArity {
                expected: 1,
                actual: tokens.len(),
            }),
        }
    }

    fn parse_elements(&self, tokens: &[&str]) -> Result<ArgValue, ArgError> {
        tokens
            .iter()
            .map(|token| self.parse(token))
            .collect::<Result<Vec<_>, _>>()
            .map(ArgValue::List)
    }

    /// Short human-readable description, e.g. `float (>= 10)`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Float(bounds) => with_bounds("float", bounds.describe()),
            Self::Int(bounds) => with_bounds("int", bounds.describe()),
            Self::Text(bounds) if bounds.is_unbounded() => "text".to_owned(),
            Self::Text(bounds) => format!("text (length {})", bounds.describe()),
            Self::Choice(values) => format!(
                "one of {{{}}}",
                values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
            ),
            Self::List(element) => format!("list of {}", element.describe()),
        }
    }

    /// Signature fragment for a parameter of this type, e.g. `<x: float>`.
    #[must_use]
    pub fn global_describe(&self, name: &str) -> String {
        match self {
            Self::List(element) => format!("<{name}: {} ...>", element.describe()),
            _ => format!("<{name}: {}>", self.describe()),
        }
    }

    /// Checks that the type is well formed.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidArgType`] for inverted bounds, an
    /// empty choice set, or a list nested in a list.
    pub fn validate(&self, command: &str, parameter: &str) -> Result<(), RegistrationError> {
        let reason = match self {
            Self::Float(bounds) if bounds.is_inverted() => Some("minimum exceeds maximum"),
            Self::Int(bounds) if bounds.is_inverted() => Some("minimum exceeds maximum"),
            Self::Text(bounds) if bounds.is_inverted() => {
                Some("minimum length exceeds maximum length")
            }
            Self::Choice(values) if values.is_empty() => Some("choices must not be empty"),
            Self::List(element) if element.is_list() => Some("lists cannot be nested"),
            Self::List(element) => return element.validate(command, parameter),
            _ => None,
        };
        reason.map_or(Ok(()), |reason| {
            Err(RegistrationError::InvalidArgType {
                command: command.to_owned(),
                parameter: parameter.to_owned(),
                reason: reason.to_owned(),
            })
        })
    }
}

fn with_bounds(kind: &str, bounds: String) -> String {
    if bounds.is_empty() {
        kind.to_owned()
    } else {
        format!("{kind} ({bounds})")
    }
}
