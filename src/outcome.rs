//! Discriminated success/failure container.
//!
//! [`Outcome`] is what the wrap functions return instead of letting a fault
//! unwind. It has two equivalent access modes:
//!
//! ```rust
//! use safe_result::{Outcome, ResultError};
//!
//! let outcome: Outcome<u32> = Outcome::ok(7);
//!
//! // Named access
//! assert!(outcome.is_ok());
//! assert_eq!(outcome.value(), Some(&7));
//!
//! // Positional access: (value, error)
//! let (value, error) = outcome.as_pair();
//! assert_eq!(value, Some(&7));
//! assert!(error.is_none());
//!
//! let failed: Outcome<u32> = ResultError::result("nope");
//! let (value, error) = failed.into_pair();
//! assert!(value.is_none());
//! assert_eq!(error.map(|e| e.status()), Some(500));
//! ```

use crate::ResultError;

/// Either a success value or a structured failure, never both.
#[must_use = "this `Outcome` may be a failure, which should be handled"]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, E = ResultError> {
    Success(T),
    Failure(E),
}

impl<T, E> Outcome<T, E> {
    /// Success carrying `value`.
    #[inline]
    pub const fn ok(value: T) -> Self {
        Self::Success(value)
    }

    /// Failure carrying `error`.
    #[inline]
    pub const fn err(error: E) -> Self {
        Self::Failure(error)
    }

    /// The discriminant: `true` on success.
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[inline]
    pub const fn is_err(&self) -> bool {
        !self.is_ok()
    }

    /// Success payload, `None` on failure.
    #[inline]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Failure payload, `None` on success.
    #[inline]
    pub const fn error(&self) -> Option<&E> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Positional view: position 0 is the value, position 1 the error.
    #[inline]
    pub const fn as_pair(&self) -> (Option<&T>, Option<&E>) {
        (self.value(), self.error())
    }

    /// Owned positional form.
    #[inline]
    pub fn into_pair(self) -> (Option<T>, Option<E>) {
        match self {
            Self::Success(value) => (Some(value), None),
            Self::Failure(error) => (None, Some(error)),
        }
    }

    #[inline]
    pub const fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Convert to a std `Result` so `?` can propagate the failure.
    #[inline]
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(error) => Err(error),
        }
    }

    #[inline]
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    #[inline]
    pub fn map_err<G, F: FnOnce(E) -> G>(self, f: F) -> Outcome<T, G> {
        match self {
            Self::Success(value) => Outcome::Success(value),
            Self::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    #[inline]
    pub fn and_then<U, F: FnOnce(T) -> Outcome<U, E>>(self, f: F) -> Outcome<U, E> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(_) => default,
        }
    }

    #[inline]
    pub fn unwrap_or_else<F: FnOnce(E) -> T>(self, f: F) -> T {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => f(error),
        }
    }

    /// Success payload, or raise the failure payload as a panic.
    ///
    /// This is the one deliberate way back to implicit control flow, meant
    /// for trust boundaries. The panic payload is the error value itself, so
    /// an enclosing [`try_result_sync`](crate::try_result_sync) or
    /// [`try_result`](crate::try_result) recovers it unchanged.
    ///
    /// # Panics
    ///
    /// On `Failure`, always.
    #[track_caller]
    pub fn unwrap(self) -> T
    where
        E: Send + 'static,
    {
        match self {
            Self::Success(value) => value,
            Self::Failure(error) => std::panic::panic_any(error),
        }
    }
}

impl<E> Outcome<(), E> {
    /// Success carrying nothing, for operations that only validate.
    #[inline]
    pub const fn void() -> Self {
        Self::Success(())
    }
}

impl<T: Default, E> Outcome<T, E> {
    #[inline]
    pub fn unwrap_or_default(self) -> T {
        self.unwrap_or_else(|_| T::default())
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T, E> From<Outcome<T, E>> for Result<T, E> {
    fn from(outcome: Outcome<T, E>) -> Self {
        outcome.into_result()
    }
}
