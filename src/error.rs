//! Structured error type and fault normalization.
//!
//! [`ResultError`] is a fault represented as data: a stable machine-readable
//! `code`, an HTTP-style `status`, a human-readable `message` and an optional
//! `cause` holding the original value that produced it.
//!
//! # Normalization
//!
//! [`ResultError::from`] is total. Whatever was raised, it yields a
//! structured error and never panics:
//!
//! | Input | message | cause |
//! |-------|---------|-------|
//! | `ResultError` | returned unchanged | unchanged |
//! | string | the string | none |
//! | native error | its message | the error |
//! | panic text | the text | the panic |
//! | anything else | [`inspect`] of the value | the value |
//!
//! Status defaults to 500 and code to `INTERNAL_SERVER_ERROR`.
//!
//! # Kinds
//!
//! The catalog kinds ([`NotFoundError`](crate::NotFoundError), ...) pin `code`
//! and `status`. Their `from` behaves the same way but produces an instance of
//! the kind: a `ResultError` of another kind is wrapped as the cause.

use crate::catalog::{HttpErrorEntry, HttpErrorKind};
use crate::logging::ErrorLog;
use crate::{Outcome, Thrown, inspect};
use std::borrow::Cow;
use std::fmt;
use zeroize::Zeroize;

/// Status used by normalization when nothing more specific is known.
pub const DEFAULT_STATUS: i32 = 500;

/// Code used by normalization when nothing more specific is known.
pub const DEFAULT_CODE: &str = "INTERNAL_SERVER_ERROR";

/// Name of the base error type.
pub const BASE_NAME: &str = "ResultError";

/// Message substituted when a fault carries an empty one.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error";

/// A catalog kind: a zero-sized marker type pinning code and status.
///
/// Implemented for every type generated in [`definitions`](crate::definitions).
pub trait ErrorKind {
    /// Enum tag of this kind.
    const KIND: HttpErrorKind;

    /// Catalog entry of this kind.
    #[inline]
    fn entry() -> &'static HttpErrorEntry {
        Self::KIND.entry()
    }
}

/// Structured error with stable code and status.
///
/// Immutable after construction. The owned message is zeroized on drop since
/// inspected fault payloads can carry request data.
#[must_use = "errors should be handled or logged"]
#[derive(Clone)]
pub struct ResultError {
    name: Cow<'static, str>,
    code: Cow<'static, str>,
    status: i32,
    message: String,
    cause: Option<Thrown>,
}

impl ResultError {
    /// Base structured error with every field explicit.
    pub fn new(
        message: impl Into<String>,
        status: i32,
        code: impl Into<Cow<'static, str>>,
        cause: Option<Thrown>,
    ) -> Self {
        Self {
            name: Cow::Borrowed(BASE_NAME),
            code: code.into(),
            status,
            message: message.into(),
            cause,
        }
    }

    /// Instance of a catalog kind. An empty message takes the catalog default.
    pub(crate) fn from_entry(entry: &'static HttpErrorEntry, message: String, cause: Option<Thrown>) -> Self {
        let message = if message.is_empty() {
            entry.message.to_owned()
        } else {
            message
        };
        Self {
            name: Cow::Borrowed(entry.name),
            code: Cow::Borrowed(entry.code),
            status: i32::from(entry.status),
            message,
            cause,
        }
    }

    /// Build an instance of kind `K`.
    #[inline]
    pub fn of_kind<K: ErrorKind>(message: impl Into<String>, cause: Option<Thrown>) -> Self {
        Self::from_entry(K::entry(), message.into(), cause)
    }

    /// Normalize any raised value into a structured error. Never fails.
    #[allow(clippy::should_implement_trait)]
    pub fn from(input: impl Into<Thrown>) -> Self {
        match input.into() {
            Thrown::ResultError(err) => *err,
            other => {
                let (message, cause) = describe(other);
                Self::new(message, DEFAULT_STATUS, DEFAULT_CODE, cause)
            }
        }
    }

    /// Normalize into kind `K`, keeping an existing instance of `K` as is.
    pub fn from_kind<K: ErrorKind>(input: impl Into<Thrown>) -> Self {
        let entry = K::entry();
        match input.into() {
            Thrown::ResultError(err) if err.is_entry(entry) => *err,
            Thrown::ResultError(err) => {
                let message = err.message.clone();
                Self::from_entry(entry, message, Some(Thrown::ResultError(err)))
            }
            other => {
                let (message, cause) = describe(other);
                Self::from_entry(entry, message, cause)
            }
        }
    }

    /// Normalize a borrowed std error, keeping its `source()` chain as causes.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::from(Thrown::from_error(err))
    }

    /// Failure outcome carrying `from(input)`.
    #[inline]
    pub fn result<T>(input: impl Into<Thrown>) -> Outcome<T> {
        Outcome::Failure(Self::from(input))
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Runtime type name: `ResultError` or the kind's type name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[inline]
    pub const fn status(&self) -> i32 {
        self.status
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original value this error was normalized from, if any.
    #[inline]
    pub fn cause(&self) -> Option<&Thrown> {
        self.cause.as_ref()
    }

    /// Catalog kind, if this error was produced by one.
    pub fn kind(&self) -> Option<HttpErrorKind> {
        HttpErrorKind::from_code(&self.code).filter(|kind| self.is_entry(kind.entry()))
    }

    /// `true` if this is an instance of kind `K`.
    #[inline]
    pub fn is<K: ErrorKind>(&self) -> bool {
        self.is_entry(K::entry())
    }

    fn is_entry(&self, entry: &HttpErrorEntry) -> bool {
        self.name == entry.name && self.code == entry.code && self.status == i32::from(entry.status)
    }

    #[inline]
    pub fn has_code(&self, code: &str) -> bool {
        self.code == code
    }

    #[inline]
    pub const fn has_status(&self, status: i32) -> bool {
        self.status == status
    }

    /// Status in the 4xx range.
    #[inline]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    /// Status in the 5xx range.
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    // ------------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------------

    /// Transportable form: `{name, code, status, message, cause?}` with the
    /// cause inspected to a string.
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert("name".into(), self.name().into());
        body.insert("code".into(), self.code().into());
        body.insert("status".into(), self.status.into());
        body.insert("message".into(), self.message().into());
        if let Some(cause) = &self.cause {
            body.insert("cause".into(), inspect(cause).into());
        }
        serde_json::Value::Object(body)
    }

    /// Borrowed structured log view. It cannot outlive this error.
    #[inline]
    pub fn internal_log(&self) -> ErrorLog<'_> {
        ErrorLog {
            name: self.name(),
            code: self.code(),
            status: self.status,
            message: self.message(),
            cause: self.cause.as_ref(),
        }
    }

    /// Callback form of [`ResultError::internal_log`].
    #[inline]
    pub fn with_internal_log<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ErrorLog<'_>) -> R,
    {
        let log = self.internal_log();
        f(&log)
    }
}

/// Message and cause for a raised value that is not already structured.
fn describe(input: Thrown) -> (String, Option<Thrown>) {
    match input {
        Thrown::String(message) => (non_empty(message), None),
        Thrown::Panic(message) => {
            let cause = Thrown::Panic(message.clone());
            (non_empty(message), Some(cause))
        }
        native @ Thrown::Error(_) => {
            let message = native
                .native_error()
                .map(|err| err.message().to_owned())
                .unwrap_or_default();
            (non_empty(message), Some(native))
        }
        other => (non_empty(inspect(&other)), Some(other)),
    }
}

#[inline]
fn non_empty(message: String) -> String {
    if message.is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_owned()
    } else {
        message
    }
}

impl Drop for ResultError {
    fn drop(&mut self) {
        self.message.zeroize();
    }
}

/// Equality on `{name, code, status, message}`. Causes are not compared.
impl PartialEq for ResultError {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.code == other.code
            && self.status == other.status
            && self.message == other.message
    }
}

impl fmt::Debug for ResultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(&self.name)
            .field("code", &self.code)
            .field("status", &self.status)
            .field("message", &self.message)
            .field("cause", &self.cause.as_ref().map(inspect))
            .finish()
    }
}

impl fmt::Display for ResultError {
    /// `[<status> <CODE>] <message>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.status, self.code, self.message)
    }
}

impl std::error::Error for ResultError {}
