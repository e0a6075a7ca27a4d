use core::fmt;

use super::*;

/// Reasons a [`Tracer`] refuses to run, checked before any tracing happens.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The ray's length must be strictly positive.
    NonPositiveLength(Float),
    /// The ray's origin, direction or length contains a NaN or an infinity.
    NonFiniteRay,
    /// A positive reflection budget was given, but no mirror to reflect off.
    NoMirrors,
    NonFiniteMirror { index: usize },
    /// Both endpoints of a mirror are the same point.
    DegenerateMirror { index: usize },
    ZeroReflectionLimit,
    /// The distance before mirrors at which rays bounce must be finite and non-negative.
    InvalidReflectionDistance(Float),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveLength(length) => {
                write!(f, "ray length must be positive, got {length}")
            }
            Self::NonFiniteRay => f.write_str("ray origin, direction and length must be finite"),
            Self::NoMirrors => f.write_str("at least one mirror is required"),
            Self::NonFiniteMirror { index } => {
                write!(f, "mirror {index} has non-finite coordinates")
            }
            Self::DegenerateMirror { index } => {
                write!(f, "mirror {index} has zero length")
            }
            Self::ZeroReflectionLimit => f.write_str("the reflection limit must be positive"),
            Self::InvalidReflectionDistance(d) => {
                write!(f, "reflection distance must be finite and non-negative, got {d}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
