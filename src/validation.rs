use anyhow::anyhow;

use crate::app_error::AppError;

/// Values that count as "present" for required-field checks. Empty strings
/// and zero are treated like a missing value.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for String {
    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl Truthy for i32 {
    fn is_truthy(&self) -> bool {
        *self != 0
    }
}

impl Truthy for f64 {
    fn is_truthy(&self) -> bool {
        *self != 0.0 && !self.is_nan()
    }
}

impl<T: Truthy> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(Truthy::is_truthy)
    }
}

/// Keeps the value only when it is truthy.
pub fn truthy<T: Truthy>(value: Option<T>) -> Option<T> {
    value.filter(Truthy::is_truthy)
}

/// Unwraps a value bound for a `NOT NULL` column. A missing value fails the
/// same way the database would reject the statement.
pub fn not_null<T>(value: Option<T>, relation: &str, column: &str) -> Result<T, AppError> {
    value.ok_or_else(|| {
        AppError::Other(anyhow!(
            "null value in column \"{}\" of relation \"{}\" violates not-null constraint",
            column,
            relation
        ))
    })
}
