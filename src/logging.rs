//! Structured log entry for a [`ResultError`](crate::ResultError).
//!
//! [`ErrorLog`] borrows every field from the error that produced it, so it
//! cannot outlive that error and holds no copy of the message once the
//! error is dropped and zeroized. Consume it immediately: either read the
//! fields for a structured logger or stream it with [`ErrorLog::write_to`].
//!
//! ```rust
//! use safe_result::NotFoundError;
//!
//! let err = NotFoundError::from("no user 7");
//! let mut line = String::new();
//! err.internal_log().write_to(&mut line).unwrap();
//! assert_eq!(line, "[404 NOT_FOUND] NotFoundError message='no user 7'");
//! ```

use crate::{Thrown, inspect};
use std::borrow::Cow;
use std::fmt;

/// Maximum length for any individual field in formatted output
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Appended to truncated fields
pub const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Borrowed view of a [`ResultError`](crate::ResultError).
#[derive(Debug, Clone, Copy)]
pub struct ErrorLog<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub status: i32,
    pub message: &'a str,
    pub cause: Option<&'a Thrown>,
}

impl<'a> ErrorLog<'a> {
    /// Human-readable line including the full inspected cause.
    ///
    /// Only compiled with BOTH the `trusted_debug` feature and debug
    /// assertions, since the cause may carry arbitrary payload data.
    #[cfg(all(feature = "trusted_debug", debug_assertions))]
    pub fn format_for_trusted_debug(&self) -> String {
        let mut output = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_to(&mut output);
        output
    }

    /// Write the entry to `f` without materializing the message.
    ///
    /// Format: `[status CODE] Name message='...' cause=...`, each field
    /// truncated to [`MAX_FIELD_OUTPUT_LEN`] bytes.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{} {}] {} message='{}'",
            self.status,
            truncate_with_indicator(self.code),
            truncate_with_indicator(self.name),
            truncate_with_indicator(self.message)
        )?;

        if let Some(cause) = self.cause {
            let rendered = inspect(cause);
            write!(f, " cause={}", truncate_with_indicator(&rendered))?;
        }

        Ok(())
    }

    // Field accessors are not truncated; that is the logging framework's job.

    #[inline]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    #[inline]
    pub const fn code(&self) -> &'a str {
        self.code
    }

    #[inline]
    pub const fn status(&self) -> i32 {
        self.status
    }

    #[inline]
    pub const fn message(&self) -> &'a str {
        self.message
    }

    #[inline]
    pub const fn cause(&self) -> Option<&'a Thrown> {
        self.cause
    }
}

impl fmt::Display for ErrorLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}

/// Truncate `s` to at most [`MAX_FIELD_OUTPUT_LEN`] bytes at a UTF-8
/// boundary, appending [`TRUNCATION_INDICATOR`] when anything was cut.
///
/// Borrows when no truncation is needed.
pub fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
