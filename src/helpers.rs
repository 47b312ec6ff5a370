//! Guards and catalog lookups for code that holds a raw [`Thrown`].

use crate::catalog::{self, HttpErrorEntry};
use crate::Thrown;

/// `true` when `value` is a structured error of any kind.
#[inline]
pub fn is_result_error(value: &Thrown) -> bool {
    value.as_result_error().is_some()
}

/// `true` when `value` is a structured error with `code`.
#[inline]
pub fn is_result_error_code(value: &Thrown, code: &str) -> bool {
    value.as_result_error().is_some_and(|err| err.has_code(code))
}

/// `true` when `value` is a structured error with `status`.
#[inline]
pub fn is_result_error_status(value: &Thrown, status: i32) -> bool {
    value.as_result_error().is_some_and(|err| err.has_status(status))
}

/// Catalog row for `code`, if any.
#[inline]
pub fn find_http_error_from_code(code: &str) -> Option<&'static HttpErrorEntry> {
    catalog::find_by_code(code)
}

#[inline]
pub fn find_http_error_from_status(status: i32) -> Option<&'static HttpErrorEntry> {
    catalog::find_by_status(status)
}

/// Default message for `code`, or `fallback` when the code is unknown.
///
/// ```rust
/// use safe_result::get_http_error_message_from_code;
///
/// assert_eq!(get_http_error_message_from_code("GONE", "?"), "Gone");
/// assert_eq!(get_http_error_message_from_code("TEAPOT", "?"), "?");
/// ```
pub fn get_http_error_message_from_code<'a>(code: &str, fallback: &'a str) -> &'a str {
    match find_http_error_from_code(code) {
        Some(entry) => entry.message,
        None => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ForbiddenError, HttpErrorKind, ResultError, thrown};

    #[test]
    fn guards_on_structured_errors() {
        let value = Thrown::from(ForbiddenError::from("no"));
        assert!(is_result_error(&value));
        assert!(is_result_error_code(&value, "FORBIDDEN"));
        assert!(is_result_error_status(&value, 403));
        assert!(!is_result_error_code(&value, "NOT_FOUND"));
        assert!(!is_result_error_status(&value, 500));
    }

    #[test]
    fn guards_reject_other_values() {
        for value in [
            Thrown::Undefined,
            Thrown::from("FORBIDDEN"),
            Thrown::error("403"),
            thrown!({ code: "FORBIDDEN", status: 403 }),
        ] {
            assert!(!is_result_error(&value));
            assert!(!is_result_error_code(&value, "FORBIDDEN"));
            assert!(!is_result_error_status(&value, 403));
        }
    }

    #[test]
    fn every_catalog_code_round_trips() {
        for kind in HttpErrorKind::ALL {
            let entry = find_http_error_from_code(kind.code()).unwrap();
            assert_eq!(entry.code, kind.code());
            assert_eq!(find_http_error_from_status(i32::from(entry.status)), Some(entry));

            let err = Thrown::from(kind.error("m", None));
            assert!(is_result_error_code(&err, entry.code));
        }
    }

    #[test]
    fn message_lookup_with_fallback() {
        assert_eq!(get_http_error_message_from_code("NOT_FOUND", "x"), "Not Found");
        assert_eq!(get_http_error_message_from_code("", "fallback"), "fallback");
        let base = ResultError::from("m");
        assert_eq!(
            get_http_error_message_from_code(base.code(), "x"),
            "Internal Server Error"
        );
    }
}
