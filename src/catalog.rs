//! Static HTTP error catalog: entry type and lookups.
//!
//! The entries themselves are declared once in
//! [`definitions`](crate::definitions) and live in the read-only
//! [`HTTP_ERRORS`] table for the life of the process. Nothing here allocates
//! or mutates; every lookup is a scan over that table.
//!
//! ```rust
//! use safe_result::{HttpErrorKind, find_http_error_from_code};
//!
//! let entry = find_http_error_from_code("NOT_FOUND").unwrap();
//! assert_eq!(entry.status, 404);
//! assert_eq!(HttpErrorKind::from_status(404), Some(HttpErrorKind::NotFound));
//! ```

use crate::{ResultError, Thrown};
use std::fmt;

pub use crate::definitions::{HTTP_ERRORS, HttpErrorKind};

/// One row of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpErrorEntry {
    /// Type name of the kind (`NotFoundError`).
    pub name: &'static str,
    /// Stable machine-readable code (`NOT_FOUND`).
    pub code: &'static str,
    /// HTTP status (`404`).
    pub status: u16,
    /// Default human-readable message (`Not Found`).
    pub message: &'static str,
}

impl HttpErrorEntry {
    #[inline]
    pub const fn new(name: &'static str, code: &'static str, status: u16, message: &'static str) -> Self {
        Self {
            name,
            code,
            status,
            message,
        }
    }

    #[inline]
    pub const fn is_client_error(&self) -> bool {
        self.status >= 400 && self.status < 500
    }

    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status >= 500 && self.status < 600
    }

    /// Build an error of this entry's kind.
    pub fn to_error(&'static self, message: impl Into<String>, cause: Option<Thrown>) -> ResultError {
        ResultError::from_entry(self, message.into(), cause)
    }
}

impl fmt::Display for HttpErrorEntry {
    /// `404 NOT_FOUND`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status, self.code)
    }
}

impl HttpErrorKind {
    /// Catalog row of this kind.
    #[inline]
    pub fn entry(self) -> &'static HttpErrorEntry {
        // Variants are declared in the same order as the table rows.
        &HTTP_ERRORS[self as usize]
    }

    #[inline]
    pub fn code(self) -> &'static str {
        self.entry().code
    }

    #[inline]
    pub fn status(self) -> u16 {
        self.entry().status
    }

    #[inline]
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    pub fn from_status(status: i32) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| i32::from(kind.status()) == status)
    }

    /// Build an error of this kind.
    #[inline]
    pub fn error(self, message: impl Into<String>, cause: Option<Thrown>) -> ResultError {
        self.entry().to_error(message, cause)
    }
}

impl fmt::Display for HttpErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.entry(), f)
    }
}

/// Catalog row for `code`.
pub fn find_by_code(code: &str) -> Option<&'static HttpErrorEntry> {
    HTTP_ERRORS.iter().find(|entry| entry.code == code)
}

/// Catalog row for `status`.
pub fn find_by_status(status: i32) -> Option<&'static HttpErrorEntry> {
    HTTP_ERRORS
        .iter()
        .find(|entry| i32::from(entry.status) == status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_has_twenty_entries() {
        assert_eq!(HTTP_ERRORS.len(), 20);
        assert_eq!(HttpErrorKind::ALL.len(), HTTP_ERRORS.len());
    }

    #[test]
    fn kind_order_matches_table() {
        for (index, kind) in HttpErrorKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index);
            assert_eq!(kind.entry(), &HTTP_ERRORS[index]);
        }
    }

    #[test]
    fn codes_and_statuses_are_unique() {
        let codes: HashSet<_> = HTTP_ERRORS.iter().map(|e| e.code).collect();
        let statuses: HashSet<_> = HTTP_ERRORS.iter().map(|e| e.status).collect();
        assert_eq!(codes.len(), HTTP_ERRORS.len());
        assert_eq!(statuses.len(), HTTP_ERRORS.len());
    }

    #[test]
    fn statuses_span_400_to_504_plus_499() {
        assert!(HTTP_ERRORS.iter().all(|e| (400..=504).contains(&e.status)));
        assert!(find_by_status(499).is_some());
        assert_eq!(HTTP_ERRORS.iter().filter(|e| e.is_client_error()).count(), 15);
        assert_eq!(HTTP_ERRORS.iter().filter(|e| e.is_server_error()).count(), 5);
    }

    #[test]
    fn names_end_with_error() {
        for entry in HTTP_ERRORS {
            assert!(entry.name.ends_with("Error"), "{}", entry.name);
        }
    }

    #[test]
    fn lookups() {
        assert_eq!(find_by_code("CONFLICT").map(|e| e.status), Some(409));
        assert_eq!(find_by_status(503).map(|e| e.code), Some("SERVICE_UNAVAILABLE"));
        assert!(find_by_code("TEAPOT").is_none());
        assert!(find_by_status(418).is_none());
        assert_eq!(HttpErrorKind::from_code("GONE"), Some(HttpErrorKind::Gone));
        assert_eq!(HttpErrorKind::GatewayTimeout.to_string(), "504 GATEWAY_TIMEOUT");
    }

    #[test]
    fn kind_builds_errors() {
        let err = HttpErrorKind::Conflict.error("version mismatch", None);
        assert_eq!(err.status(), 409);
        assert_eq!(err.name(), "ConflictError");
        assert_eq!(err.kind(), Some(HttpErrorKind::Conflict));
    }
}
