//! Fault boundaries: run an operation and always get an [`Outcome`] back.
//!
//! Every wrapper here catches both an explicit `Err` and a panic unwinding
//! out of the operation, and normalizes either one through
//! [`ResultError::from`]. None of them panic, and the async forms add no
//! suspension points of their own.
//!
//! ```rust
//! use safe_result::{Thrown, try_result_sync};
//!
//! let parsed = try_result_sync(|| "42".parse::<u32>());
//! assert_eq!(parsed.value(), Some(&42));
//!
//! let failed = try_result_sync(|| -> Result<u32, Thrown> { panic!("lost it") });
//! assert_eq!(failed.error().map(|e| e.message()), Some("lost it"));
//! ```
//!
//! Panics are only caught with `panic = "unwind"` (the default profile).
//! A caught panic still runs the process panic hook first, so the default
//! hook prints its usual message to stderr. Install a quieter hook with
//! [`std::panic::set_hook`] if that output is unwanted.

use crate::{Outcome, ResultError, Thrown};
use futures::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

/// Run `op`, turning `Err` and panics into a normalized failure.
pub fn try_result_sync<T, X, F>(op: F) -> Outcome<T>
where
    F: FnOnce() -> Result<T, X>,
    X: Into<Thrown>,
{
    match capture(op) {
        Ok(value) => Outcome::Success(value),
        Err(fault) => Outcome::Failure(ResultError::from(fault)),
    }
}

/// Like [`try_result_sync`], with a caller-supplied fault mapper.
///
/// `map_error` sees the raw fault. If it panics, the fault is normalized
/// with [`ResultError::from`] and converted into `E` instead.
pub fn try_result_sync_with<T, X, E, F, M>(op: F, map_error: M) -> Outcome<T, E>
where
    F: FnOnce() -> Result<T, X>,
    X: Into<Thrown>,
    M: FnOnce(Thrown) -> E,
    E: From<ResultError>,
{
    match capture(op) {
        Ok(value) => Outcome::Success(value),
        Err(fault) => Outcome::Failure(map_fault(fault, map_error)),
    }
}

/// Await `future`, turning `Err` and panics while polling into a failure.
pub async fn try_result<T, X, Fut>(future: Fut) -> Outcome<T>
where
    Fut: Future<Output = Result<T, X>>,
    X: Into<Thrown>,
{
    match capture_async(future).await {
        Ok(value) => Outcome::Success(value),
        Err(fault) => Outcome::Failure(ResultError::from(fault)),
    }
}

/// Async counterpart of [`try_result_sync_with`].
///
/// ```rust
/// use safe_result::{NotFoundError, Thrown, try_result_with};
///
/// async fn fetch() -> Result<String, Thrown> {
///     Err(Thrown::error("HTTP 404"))
/// }
///
/// let outcome = futures::executor::block_on(try_result_with(fetch(), NotFoundError::from));
/// let err = outcome.error().unwrap();
/// assert_eq!((err.status(), err.code()), (404, "NOT_FOUND"));
/// ```
pub async fn try_result_with<T, X, E, Fut, M>(future: Fut, map_error: M) -> Outcome<T, E>
where
    Fut: Future<Output = Result<T, X>>,
    X: Into<Thrown>,
    M: FnOnce(Thrown) -> E,
    E: From<ResultError>,
{
    match capture_async(future).await {
        Ok(value) => Outcome::Success(value),
        Err(fault) => Outcome::Failure(map_fault(fault, map_error)),
    }
}

/// Message of the failure reported for a cancelled task.
#[cfg(feature = "tokio")]
pub const TASK_CANCELLED_MESSAGE: &str = "task was cancelled";

/// Await a spawned task and fold its join error into the outcome.
///
/// A cancelled task becomes a
/// [`ClientClosedRequestError`](crate::ClientClosedRequestError); a
/// panicked task is normalized from its panic payload.
#[cfg(feature = "tokio")]
pub async fn try_join<T, X>(handle: tokio::task::JoinHandle<Result<T, X>>) -> Outcome<T>
where
    X: Into<Thrown>,
{
    match handle.await {
        Ok(Ok(value)) => Outcome::Success(value),
        Ok(Err(fault)) => Outcome::Failure(ResultError::from(fault)),
        Err(join_error) if join_error.is_cancelled() => {
            Outcome::Failure(crate::ClientClosedRequestError::new(TASK_CANCELLED_MESSAGE, None))
        }
        Err(join_error) => match join_error.try_into_panic() {
            Ok(payload) => Outcome::Failure(ResultError::from(Thrown::from_panic(payload))),
            Err(other) => Outcome::Failure(ResultError::from(Thrown::from_std(other))),
        },
    }
}

/// A function whose calls always return an [`Outcome`]. See [`guard`].
#[derive(Debug, Clone, Copy)]
pub struct Guarded<F> {
    f: F,
}

/// Wrap `f` so every call goes through [`try_result_sync`].
///
/// ```rust
/// use safe_result::guard;
///
/// let parse = guard(|s: &str| s.parse::<i64>());
/// assert!(parse.call("12").is_ok());
/// assert_eq!(parse.call("x").error().map(|e| e.status()), Some(500));
/// ```
#[inline]
pub const fn guard<F>(f: F) -> Guarded<F> {
    Guarded { f }
}

impl<F> Guarded<F> {
    pub fn call<A, T, X>(&self, arg: A) -> Outcome<T>
    where
        F: Fn(A) -> Result<T, X>,
        X: Into<Thrown>,
    {
        try_result_sync(|| (self.f)(arg))
    }

    #[inline]
    pub fn into_inner(self) -> F {
        self.f
    }
}

/// An async function whose calls always resolve to an [`Outcome`].
/// See [`guard_async`].
#[derive(Debug, Clone, Copy)]
pub struct GuardedAsync<F> {
    f: F,
}

/// Wrap an async `f` so every call goes through [`try_result`].
#[inline]
pub const fn guard_async<F>(f: F) -> GuardedAsync<F> {
    GuardedAsync { f }
}

impl<F> GuardedAsync<F> {
    /// A panic while building the future is caught as well.
    pub async fn call<A, T, X, Fut>(&self, arg: A) -> Outcome<T>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, X>>,
        X: Into<Thrown>,
    {
        try_result(async move { (self.f)(arg).await }).await
    }

    #[inline]
    pub fn into_inner(self) -> F {
        self.f
    }
}

fn capture<T, X, F>(op: F) -> Result<T, Thrown>
where
    F: FnOnce() -> Result<T, X>,
    X: Into<Thrown>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(result) => result.map_err(Into::into),
        Err(payload) => Err(Thrown::from_panic(payload)),
    }
}

async fn capture_async<T, X, Fut>(future: Fut) -> Result<T, Thrown>
where
    Fut: Future<Output = Result<T, X>>,
    X: Into<Thrown>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result.map_err(Into::into),
        Err(payload) => Err(Thrown::from_panic(payload)),
    }
}

fn map_fault<E, M>(fault: Thrown, map_error: M) -> E
where
    M: FnOnce(Thrown) -> E,
    E: From<ResultError>,
{
    // Handles share the underlying value, so the fallback sees the same fault.
    let original = fault.clone();
    match panic::catch_unwind(AssertUnwindSafe(|| map_error(fault))) {
        Ok(mapped) => mapped,
        Err(_) => E::from(ResultError::from(original)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BadRequestError, NotFoundError, thrown};
    use futures::executor::block_on;

    #[test]
    fn sync_success() {
        let outcome = try_result_sync(|| Ok::<_, Thrown>(5));
        assert_eq!(outcome.value(), Some(&5));
    }

    #[test]
    fn sync_err_string_is_message() {
        let outcome = try_result_sync(|| Err::<u8, _>("x"));
        let err = outcome.error().unwrap();
        assert_eq!(err.message(), "x");
        assert!(err.cause().is_none());
    }

    #[test]
    fn sync_panic_is_caught() {
        let outcome = try_result_sync(|| -> Result<u8, Thrown> { panic!("x") });
        let err = outcome.error().unwrap();
        assert_eq!(err.message(), "x");
        assert!(matches!(err.cause(), Some(Thrown::Panic(_))));
    }

    #[test]
    fn sync_std_error_keeps_cause() {
        let outcome = try_result_sync(|| "nope".parse::<u32>());
        let err = outcome.error().unwrap();
        assert_eq!(err.message(), "invalid digit found in string");
        assert_eq!(
            err.cause().and_then(Thrown::native_error).map(|e| e.name().to_owned()),
            Some("ParseIntError".to_owned())
        );
    }

    #[test]
    fn sync_raised_object() {
        let outcome = try_result_sync(|| -> Result<u8, Thrown> { crate::raise(thrown!({ weird: true })) });
        assert_eq!(outcome.error().map(ResultError::message), Some("[Object]:{weird:true}"));
    }

    #[test]
    fn sync_with_maps_fault() {
        let outcome = try_result_sync_with(|| Err::<u8, _>("bad id"), BadRequestError::from);
        let err = outcome.error().unwrap();
        assert_eq!(err.status(), 400);
        assert_eq!(err.message(), "bad id");
    }

    #[test]
    fn sync_with_falls_back_when_mapper_panics() {
        let outcome = try_result_sync_with(
            || Err::<u8, _>("original"),
            |_: Thrown| -> ResultError { panic!("mapper broke") },
        );
        let err = outcome.error().unwrap();
        assert_eq!(err.message(), "original");
        assert_eq!(err.status(), 500);
    }

    #[test]
    fn async_with_falls_back_when_mapper_panics() {
        let outcome = block_on(try_result_with(
            async { Err::<u8, _>(Thrown::error("upstream gone")) },
            |_: Thrown| -> ResultError { panic!("mapper broke") },
        ));
        let err = outcome.error().unwrap();
        assert_eq!(err.message(), "upstream gone");
        assert_eq!(err.status(), 500);
        assert!(err.cause().is_some());
    }

    #[test]
    fn sync_with_custom_error_type() {
        #[derive(Debug, PartialEq)]
        struct Status(i32);
        impl From<ResultError> for Status {
            fn from(err: ResultError) -> Self {
                Status(err.status())
            }
        }
        let outcome = try_result_sync_with(|| Err::<u8, _>("x"), |_| Status(418));
        assert_eq!(outcome.error(), Some(&Status(418)));
    }

    #[test]
    fn async_error_message_survives() {
        let outcome = block_on(try_result(async { Err::<u8, _>(Thrown::error("boom")) }));
        assert!(outcome.error().unwrap().message().contains("boom"));
    }

    #[test]
    fn async_panic_while_polling_is_caught() {
        let outcome = block_on(try_result(async {
            futures::future::ready(()).await;
            if true {
                panic!("mid-poll");
            }
            Ok::<u8, Thrown>(1)
        }));
        assert_eq!(outcome.error().map(ResultError::message), Some("mid-poll"));
    }

    #[test]
    fn async_with_maps_to_kind() {
        let outcome = block_on(try_result_with(
            async { Err::<u8, _>(Thrown::error("HTTP 404")) },
            NotFoundError::from,
        ));
        let err = outcome.error().unwrap();
        assert_eq!((err.status(), err.code()), (404, "NOT_FOUND"));
    }

    #[test]
    fn guard_wraps_every_call() {
        let halve = guard(|n: u32| if n % 2 == 0 { Ok(n / 2) } else { Err("odd") });
        assert_eq!(halve.call(4).value(), Some(&2));
        assert_eq!(halve.call(3).error().map(ResultError::message), Some("odd"));
    }

    #[test]
    fn guard_catches_panics() {
        let index = guard(|i: usize| Ok::<_, Thrown>([1, 2, 3][i]));
        assert!(index.call(1).is_ok());
        assert!(index.call(9).is_err());
    }

    #[test]
    fn guard_async_catches_err_and_panic() {
        let fetch = guard_async(|id: u32| async move {
            match id {
                0 => panic!("zero id"),
                1 => Ok("ada"),
                _ => Err(NotFoundError::from("no user")),
            }
        });
        assert_eq!(block_on(fetch.call(1)).value(), Some(&"ada"));
        assert_eq!(block_on(fetch.call(2)).error().map(ResultError::status), Some(404));
        assert_eq!(block_on(fetch.call(0)).error().map(ResultError::message), Some("zero id"));
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn join_maps_cancellation_to_499() {
        let handle = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
            Ok::<u8, Thrown>(1)
        });
        handle.abort();
        let outcome = try_join(handle).await;
        let err = outcome.error().unwrap();
        assert_eq!(err.status(), 499);
        assert_eq!(err.message(), TASK_CANCELLED_MESSAGE);
    }

    #[cfg(feature = "tokio")]
    #[tokio::test]
    async fn join_normalizes_task_panic() {
        let handle = tokio::spawn(async {
            if true {
                panic!("task died");
            }
            Ok::<u8, Thrown>(1)
        });
        let outcome = try_join(handle).await;
        assert_eq!(outcome.error().map(ResultError::message), Some("task died"));
    }
}
