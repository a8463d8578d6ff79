//! Downcast Diagnostics
//!
//! Error raised by callers when an instance created from a registered class
//! cannot be narrowed to the type they expected.

use std::any::{type_name, Any};

/// A loaded instance could not be narrowed to the expected type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DowncastError {
    message: String,
}

impl DowncastError {
    /// Error for a failed narrowing from `Base` to `Inherited`
    ///
    /// `inherited_class_name` names the registered class the caller asked
    /// for and may be empty.
    pub fn new<Inherited: ?Sized, Base: ?Sized>(inherited_class_name: &str) -> Self {
        let mut message = format!(
            "Failed to downcast {} to type {}",
            type_name::<Base>(),
            type_name::<Inherited>()
        );
        if !inherited_class_name.is_empty() {
            message.push_str(", the base class is not of type ");
            message.push_str(inherited_class_name);
        }
        message.push('!');
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Narrow a type-erased instance to `T`
pub fn downcast<T: Any>(
    instance: Box<dyn Any>,
    class_name: &str,
) -> Result<Box<T>, DowncastError> {
    instance
        .downcast::<T>()
        .map_err(|_| DowncastError::new::<T, dyn Any>(class_name))
}
