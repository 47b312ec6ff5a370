//! # Safe Result
//!
//! Explicit results for code that must not let a fault escape.
//!
//! ## Design Philosophy
//!
//! 1. **Faults are data.** Every wrapped operation yields an [`Outcome`]:
//!    a success value or a [`ResultError`], never an unwinding panic.
//! 2. **Anything raised can be normalized.** A string, a native error, a
//!    panic payload or an arbitrary object graph ([`Thrown`]) becomes a
//!    `ResultError` with a stable `code`, an HTTP `status` and a readable
//!    `message`. Normalization never fails.
//! 3. **Kinds are types.** The HTTP catalog ([`HTTP_ERRORS`]) is declared
//!    once and produces one zero-sized kind type per row
//!    ([`NotFoundError`], [`ConflictError`], ...).
//! 4. **Descriptions are total.** [`inspect`] renders any value to one
//!    line, including cyclic graphs, very deep nesting and accessors that
//!    fail or panic.
//!
//! ## Quick Start
//!
//! ```rust
//! use safe_result::{NotFoundError, Outcome, Thrown, try_result_sync};
//!
//! fn find_user(id: u32) -> Result<&'static str, Thrown> {
//!     match id {
//!         1 => Ok("ada"),
//!         _ => Err(Thrown::error(format!("no user {id}"))),
//!     }
//! }
//!
//! let found = try_result_sync(|| find_user(1));
//! assert_eq!(found.value(), Some(&"ada"));
//!
//! let (value, error) = try_result_sync(|| find_user(2)).into_pair();
//! assert!(value.is_none());
//! assert_eq!(error.unwrap().message(), "no user 2");
//!
//! // Pin a kind at the boundary
//! let outcome: Outcome<&str> = NotFoundError::result("no user 3");
//! assert_eq!(outcome.error().map(|e| e.code()), Some("NOT_FOUND"));
//! ```
//!
//! ## Inspecting Arbitrary Values
//!
//! ```rust
//! use safe_result::{inspect, thrown};
//!
//! let node = thrown!(Node { id: 1 });
//! node.assign("parent", node.clone());
//! assert_eq!(inspect(&node), "[Node]:{id:1,parent:[Circular]}");
//! ```
//!
//! ## Logging
//!
//! [`ResultError::internal_log`] lends a borrowed [`ErrorLog`] whose
//! fields are truncated when written. The message is zeroized when the
//! error drops.
//!
//! ## Features
//!
//! - `tokio`: [`try_join`] for task handles (cancellation maps to 499)
//! - `trusted_debug`: [`ErrorLog::format_for_trusted_debug`] (debug builds only)

#![warn(clippy::all)]

pub mod catalog;
mod convenience;
pub mod definitions;
pub mod error;
pub mod helpers;
pub mod inspect;
pub mod logging;
pub mod outcome;
pub mod value;
pub mod wrap;

pub use catalog::*;
pub use definitions::*;
pub use error::*;
pub use helpers::*;
pub use inspect::*;
pub use logging::*;
pub use outcome::*;
pub use value::*;
pub use wrap::*;
