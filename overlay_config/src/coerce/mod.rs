//! Conversion of raw strings into typed field values.
//!
//! Environment variables and default literals always arrive as text. The
//! [`Scalar`] trait turns that text into the declared type of a field and
//! tells the resolver whether a field still holds its zero value.
//!
//! Two boolean dialects are recognised. Environment values accept the
//! permissive set used by most deployment tooling (`yes`, `on`, `y`, ...),
//! whereas default literals, which are written by the schema author, only
//! accept the canonical forms understood by [`parse_bool_literal`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Broad category of a scalar field, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ScalarKind {
    /// Text, including filesystem paths.
    String,
    /// Signed or unsigned integers of any width.
    Integer,
    /// `true`/`false` flags.
    Boolean,
    /// `f32` and `f64`.
    Float,
    /// Raw byte sequences.
    Bytes,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Float => "float",
            Self::Bytes => "bytes",
        };
        f.write_str(name)
    }
}

/// Reasons a raw value could not be converted into a field's type.
///
/// These never escape a load: the resolver forwards them to the configured
/// [`IssueReporter`](crate::IssueReporter) and leaves the field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CoerceError {
    /// The text is not a valid representation of the target kind.
    #[error("{raw:?} is not a valid {kind} value")]
    Invalid {
        /// Kind the value was parsed as.
        kind: ScalarKind,
        /// Offending input.
        raw: String,
    },

    /// The text is a valid integer that does not fit the target type.
    #[error("{raw:?} is out of range for {target}")]
    OutOfRange {
        /// Offending input.
        raw: String,
        /// Name of the target Rust type.
        target: &'static str,
    },

    /// The kind cannot be populated from a default literal.
    #[error("{kind} fields cannot take a default literal")]
    Unsupported {
        /// Kind of the field.
        kind: ScalarKind,
    },
}

impl CoerceError {
    fn invalid(kind: ScalarKind, raw: &str) -> Self {
        Self::Invalid {
            kind,
            raw: raw.to_owned(),
        }
    }

    fn out_of_range(raw: &str, target: &'static str) -> Self {
        Self::OutOfRange {
            raw: raw.to_owned(),
            target,
        }
    }
}

/// A leaf field type the resolver can populate.
///
/// # Examples
///
/// ```
/// use overlay_config::Scalar;
///
/// assert!(0_u16.is_zero());
/// assert_eq!(u16::from_env("9090"), Ok(9090));
/// assert_eq!(bool::from_env("on"), Ok(true));
/// assert!(bool::from_default("on").is_err());
/// ```
pub trait Scalar: Sized {
    /// Category reported in diagnostics.
    const KIND: ScalarKind;

    /// Whether the value is the type's empty state.
    fn is_zero(&self) -> bool;

    /// Convert an environment variable's value.
    ///
    /// # Errors
    ///
    /// Returns a [`CoerceError`] when `raw` does not represent a value of
    /// this type.
    fn from_env(raw: &str) -> Result<Self, CoerceError>;

    /// Convert a default literal declared on the schema.
    ///
    /// Defaults to [`Scalar::from_env`].
    ///
    /// # Errors
    ///
    /// Returns a [`CoerceError`] when `literal` does not represent a value of
    /// this type or the type cannot take defaults.
    fn from_default(literal: &str) -> Result<Self, CoerceError> {
        Self::from_env(literal)
    }
}

/// Parse a base-10 signed integer, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`CoerceError::Invalid`] for anything that is not an `i64`.
pub fn parse_i64(raw: &str) -> Result<i64, CoerceError> {
    raw.trim()
        .parse()
        .map_err(|_| CoerceError::invalid(ScalarKind::Integer, raw))
}

/// Parse a 64-bit float, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`CoerceError::Invalid`] for anything that is not an `f64`.
pub fn parse_f64(raw: &str) -> Result<f64, CoerceError> {
    raw.trim()
        .parse()
        .map_err(|_| CoerceError::invalid(ScalarKind::Float, raw))
}

/// Parse a boolean using the permissive environment dialect.
///
/// Case-insensitive `1`, `t`, `true`, `y`, `yes`, `on` are truthy and `0`,
/// `f`, `false`, `n`, `no`, `off` are falsy.
///
/// # Errors
///
/// Returns [`CoerceError::Invalid`] for any other input.
pub fn parse_env_bool(raw: &str) -> Result<bool, CoerceError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "y" | "yes" | "on" => Ok(true),
        "0" | "f" | "false" | "n" | "no" | "off" => Ok(false),
        _ => Err(CoerceError::invalid(ScalarKind::Boolean, raw)),
    }
}

/// Parse a boolean default literal.
///
/// Accepts exactly `1`, `t`, `T`, `TRUE`, `true`, `True` and `0`, `f`, `F`,
/// `FALSE`, `false`, `False`.
///
/// # Errors
///
/// Returns [`CoerceError::Invalid`] for any other input.
pub fn parse_bool_literal(raw: &str) -> Result<bool, CoerceError> {
    match raw.trim() {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(CoerceError::invalid(ScalarKind::Boolean, raw)),
    }
}

macro_rules! signed_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::Integer;

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn from_env(raw: &str) -> Result<Self, CoerceError> {
                let wide = parse_i64(raw)?;
                Self::try_from(wide).map_err(|_| CoerceError::out_of_range(raw, stringify!($ty)))
            }
        }
    )*};
}

macro_rules! unsigned_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::Integer;

            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn from_env(raw: &str) -> Result<Self, CoerceError> {
                let trimmed = raw.trim();
                // Negative numbers are valid integers, just not for this type.
                if let Ok(signed) = trimmed.parse::<i64>() {
                    return Self::try_from(signed)
                        .map_err(|_| CoerceError::out_of_range(raw, stringify!($ty)));
                }
                let wide = trimmed
                    .parse::<u64>()
                    .map_err(|_| CoerceError::invalid(ScalarKind::Integer, raw))?;
                Self::try_from(wide).map_err(|_| CoerceError::out_of_range(raw, stringify!($ty)))
            }
        }
    )*};
}

signed_scalar!(i8, i16, i32, i64, isize);
unsigned_scalar!(u8, u16, u32, u64, usize);

macro_rules! float_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::Float;

            // Bitwise so that `-0.0` counts as set.
            fn is_zero(&self) -> bool {
                self.to_bits() == 0
            }

            fn from_env(raw: &str) -> Result<Self, CoerceError> {
                raw.trim()
                    .parse()
                    .map_err(|_| CoerceError::invalid(ScalarKind::Float, raw))
            }
        }
    )*};
}

float_scalar!(f32, f64);

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Boolean;

    fn is_zero(&self) -> bool {
        !*self
    }

    fn from_env(raw: &str) -> Result<Self, CoerceError> {
        parse_env_bool(raw)
    }

    fn from_default(literal: &str) -> Result<Self, CoerceError> {
        parse_bool_literal(literal)
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::String;

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn from_env(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.to_owned())
    }
}

impl Scalar for PathBuf {
    const KIND: ScalarKind = ScalarKind::String;

    fn is_zero(&self) -> bool {
        self.as_os_str().is_empty()
    }

    fn from_env(raw: &str) -> Result<Self, CoerceError> {
        Ok(Self::from(raw))
    }
}

impl Scalar for Vec<u8> {
    const KIND: ScalarKind = ScalarKind::Bytes;

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn from_env(raw: &str) -> Result<Self, CoerceError> {
        Ok(raw.as_bytes().to_vec())
    }

    fn from_default(_literal: &str) -> Result<Self, CoerceError> {
        Err(CoerceError::Unsupported {
            kind: ScalarKind::Bytes,
        })
    }
}

impl<T: Scalar> Scalar for Option<T> {
    const KIND: ScalarKind = T::KIND;

    fn is_zero(&self) -> bool {
        self.is_none()
    }

    fn from_env(raw: &str) -> Result<Self, CoerceError> {
        T::from_env(raw).map(Some)
    }

    fn from_default(literal: &str) -> Result<Self, CoerceError> {
        T::from_default(literal).map(Some)
    }
}
