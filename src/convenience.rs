//! Declarative helpers.
//!
//! - [`thrown!`](crate::thrown) builds object, instance and array values
//!   with literal-like syntax.
//! - [`fail!`](crate::fail) returns early from a function producing an
//!   [`Outcome`](crate::Outcome) with a normalized failure.
//! - `define_http_errors!` (crate-internal) declares the catalog table, the
//!   kind enum and one kind type per row in a single pass so the three can
//!   never drift apart.

/// Build a [`Thrown`](crate::Thrown) object, instance or array.
///
/// ```rust
/// use safe_result::{inspect, thrown};
///
/// let user = thrown!(User { id: 1, name: "ada" });
/// assert_eq!(inspect(&user), r#"[User]:{id:1,name:"ada"}"#);
///
/// let plain = thrown!({ weird: true, tags: thrown!(["a", "b"]) });
/// assert_eq!(inspect(&plain), r#"[Object]:{weird:true,tags:["a","b"]}"#);
/// ```
#[macro_export]
macro_rules! thrown {
    ($ctor:ident { $($key:ident : $value:expr),* $(,)? }) => {
        $crate::Thrown::instance(stringify!($ctor))$(.with(stringify!($key), $value))*
    };
    ({ $($key:ident : $value:expr),* $(,)? }) => {
        $crate::Thrown::object()$(.with(stringify!($key), $value))*
    };
    ([ $($value:expr),* $(,)? ]) => {{
        let items: ::std::vec::Vec<$crate::Thrown> = ::std::vec![$($crate::Thrown::from($value)),*];
        $crate::Thrown::array(items)
    }};
}

/// Return `Outcome::Failure` from the enclosing function.
///
/// With one argument the value is normalized through
/// [`ResultError::from`](crate::ResultError::from); with a kind type first it
/// goes through that kind.
///
/// ```rust
/// use safe_result::{NotFoundError, Outcome, fail};
///
/// fn lookup(id: u32) -> Outcome<&'static str> {
///     if id != 1 {
///         fail!(NotFoundError, format!("no user {id}"));
///     }
///     Outcome::ok("ada")
/// }
///
/// assert_eq!(lookup(2).error().map(|e| e.status()), Some(404));
/// ```
#[macro_export]
macro_rules! fail {
    ($kind:ident, $input:expr $(,)?) => {
        return $crate::Outcome::Failure($kind::from($input))
    };
    ($input:expr $(,)?) => {
        return $crate::Outcome::Failure($crate::ResultError::from($input))
    };
}

/// Declare the catalog: table rows, kind enum and kind types.
///
/// Row syntax: `TypeName / Variant => (status, "CODE", "Default message")`,
/// with optional doc attributes applied to both the type and the variant.
macro_rules! define_http_errors {
    ($( $(#[$meta:meta])* $kind:ident / $variant:ident => ($status:literal, $code:literal, $message:literal) ),+ $(,)?) => {
        /// Every catalog row, in status order. Read-only for the life of the process.
        pub static HTTP_ERRORS: &[$crate::HttpErrorEntry] = &[
            $( $crate::HttpErrorEntry::new(stringify!($kind), $code, $status, $message), )+
        ];

        /// Catalog kinds, declared in the same order as [`HTTP_ERRORS`].
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum HttpErrorKind {
            $( $(#[$meta])* $variant, )+
        }

        impl HttpErrorKind {
            /// Every kind, in catalog order.
            pub const ALL: &'static [HttpErrorKind] = &[ $( HttpErrorKind::$variant ),+ ];
        }

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $kind;

            impl $crate::ErrorKind for $kind {
                const KIND: HttpErrorKind = HttpErrorKind::$variant;
            }

            impl $kind {
                /// Build with an explicit message (empty takes the catalog default).
                #[inline]
                pub fn new(message: impl Into<String>, cause: Option<$crate::Thrown>) -> $crate::ResultError {
                    $crate::ResultError::of_kind::<Self>(message, cause)
                }

                /// Normalize any raised value into this kind.
                #[inline]
                #[allow(clippy::should_implement_trait)]
                pub fn from(input: impl Into<$crate::Thrown>) -> $crate::ResultError {
                    $crate::ResultError::from_kind::<Self>(input)
                }

                /// Failure outcome carrying `from(input)`.
                #[inline]
                pub fn result<T>(input: impl Into<$crate::Thrown>) -> $crate::Outcome<T> {
                    $crate::Outcome::Failure(Self::from(input))
                }
            }
        )+
    };
}

pub(crate) use define_http_errors;
