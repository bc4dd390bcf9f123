//! Errors raised by enumerated types and their collections.

use std::sync::Arc;

use thiserror::Error;

use crate::{Ordinal, Scalar};

/// Errors raised while declaring enumerated types or resolving their values.
///
/// Every variant signals a programming error (wrong type, undeclared value)
/// rather than a transient condition. Operations that fail leave their
/// collection untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnumError {
    /// A collection was requested for a name that is not a registered enumeration.
    #[error("'{name}' is not a registered enumeration")]
    UnsupportedType {
        /// The name that was looked up.
        name: String,
    },

    /// A raw value is not among the declared values of the type.
    #[error("value {value} is not declared by enumeration '{ty}'")]
    InvalidValue {
        /// The enumeration the value was resolved against.
        ty: Arc<str>,
        /// The rejected raw value.
        value: Scalar,
    },

    /// A constant name is not declared by the type.
    #[error("enumeration '{ty}' has no constant named '{name}'")]
    InvalidName {
        /// The enumeration the name was resolved against.
        ty: Arc<str>,
        /// The rejected constant name.
        name: String,
    },

    /// An instance of one enumeration was handed to something bound to another.
    #[error("the given enum of type '{found}' isn't same as the required type '{expected}'")]
    TypeMismatch {
        /// The type the collection or registry is bound to.
        expected: Arc<str>,
        /// The type the instance belongs to.
        found: Arc<str>,
    },

    /// An ordinal outside `0..count` was looked up.
    #[error("ordinal {ordinal} out of range for enumeration '{ty}' with {count} values")]
    OrdinalOutOfRange {
        /// The enumeration looked up.
        ty: Arc<str>,
        /// The requested ordinal.
        ordinal: Ordinal,
        /// Number of declared values.
        count: usize,
    },

    /// The type declares more values than the requested bit capacity.
    #[error("enumeration '{ty}' declares {count} values but the set holds at most {capacity}")]
    CapacityExceeded {
        /// The enumeration the set was built for.
        ty: Arc<str>,
        /// Number of declared values.
        count: usize,
        /// Requested capacity in bits.
        capacity: usize,
    },

    /// Two constants of one declaration share a raw value.
    #[error("ambiguous value {value} in enumeration '{ty}': declared by '{first}' and '{second}'")]
    AmbiguousValue {
        /// The enumeration being declared.
        ty: Arc<str>,
        /// The shared raw value.
        value: Scalar,
        /// First constant declaring the value.
        first: Arc<str>,
        /// Later constant declaring it again.
        second: Arc<str>,
    },

    /// A constant name appears twice in one declaration.
    #[error("constant '{name}' declared twice in enumeration '{ty}'")]
    DuplicateName {
        /// The enumeration being declared.
        ty: Arc<str>,
        /// The repeated constant name.
        name: String,
    },
}

/// Result type for enumeration operations.
pub type Result<T> = std::result::Result<T, EnumError>;
