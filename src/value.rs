//! The "any raised value" model.
//!
//! A fault in Rust is either a returned `Err` of some concrete type or a panic
//! payload of unknown type. Both are funnelled into [`Thrown`], a closed set of
//! tagged variants that the inspection engine and the error taxonomy know how
//! to handle exhaustively.
//!
//! # Identity
//!
//! Compound variants (`Array`, `Map`, `Set`, `Object`, `Error`) live behind
//! [`Shared`] handles. Cloning a `Thrown` clones the handle, not the contents,
//! so two clones have the same identity. This is what lets callers build
//! self-referential graphs and what the inspector's cycle guard keys on.
//!
//! ```rust
//! use safe_result::{Thrown, inspect};
//!
//! let node = Thrown::object();
//! node.assign("self", node.clone());
//! assert!(inspect(&node).contains("[Circular]"));
//! ```

use crate::ResultError;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared, interior-mutable storage for compound values.
pub type Shared<T> = Arc<RwLock<T>>;

/// A property accessor that computes its value on read and may fail.
pub type Getter = Arc<dyn Fn() -> Result<Thrown, Thrown> + Send + Sync>;

/// Message used when a panic payload is neither a string nor a known value.
pub const NON_STRING_PANIC: &str = "<non-string panic payload>";

/// Largest magnitude an `f64` represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: i128 = 9_007_199_254_740_991;

/// `source()` chains longer than this are cut when converting std errors.
const MAX_SOURCE_CHAIN: usize = 64;

#[inline]
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[inline]
fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

// ============================================================================
// Big integers
// ============================================================================

/// Sign and magnitude of an integer too wide for an `f64`.
///
/// Covers the whole of `i128` and `u128`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BigInt {
    negative: bool,
    magnitude: u128,
}

impl BigInt {
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub const fn magnitude(&self) -> u128 {
        self.magnitude
    }
}

macro_rules! big_int_from {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for BigInt {
                fn from(value: $ty) -> Self {
                    let wide = value as i128;
                    Self {
                        negative: wide < 0,
                        magnitude: wide.unsigned_abs(),
                    }
                }
            }
        )+
    };
}

big_int_from!(i8, i16, i32, i64, isize, i128, u8, u16, u32, u64, usize);

impl From<u128> for BigInt {
    fn from(value: u128) -> Self {
        Self {
            negative: false,
            magnitude: value,
        }
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

// ============================================================================
// Properties
// ============================================================================

/// An own property of an object or error.
#[derive(Clone)]
pub enum Property {
    /// Stored value.
    Value(Thrown),
    /// Computed on read. Failures are contained by the inspector.
    Getter(Getter),
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

fn assign_property(properties: &mut Vec<(String, Property)>, key: String, property: Property) {
    match properties.iter_mut().find(|(existing, _)| *existing == key) {
        Some((_, slot)) => *slot = property,
        None => properties.push((key, property)),
    }
}

/// Contents of a plain object or class instance.
#[derive(Clone, Debug, Default)]
pub struct ObjectData {
    constructor: Option<Cow<'static, str>>,
    properties: Vec<(String, Property)>,
}

impl ObjectData {
    /// Runtime type name, `None` for plain objects.
    #[inline]
    pub fn constructor(&self) -> Option<&str> {
        self.constructor.as_deref()
    }

    /// Own properties in insertion order.
    #[inline]
    pub fn properties(&self) -> &[(String, Property)] {
        &self.properties
    }
}

/// Contents of a native error value.
#[derive(Clone, Debug)]
pub struct NativeError {
    name: Cow<'static, str>,
    message: String,
    cause: Option<Thrown>,
    properties: Vec<(String, Property)>,
}

impl NativeError {
    /// Error type name (`Error`, `TypeError`, `ParseIntError`, ...).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn cause(&self) -> Option<&Thrown> {
        self.cause.as_ref()
    }

    /// Extra own properties beyond name, message and cause.
    #[inline]
    pub fn properties(&self) -> &[(String, Property)] {
        &self.properties
    }
}

// ============================================================================
// Thrown
// ============================================================================

/// Any value a fault can carry.
///
/// Variants are ordered roughly by how the inspector dispatches on them.
/// Construct compound values with the builder functions ([`Thrown::object`],
/// [`Thrown::map`], ...) rather than the variants, so identity handles are
/// set up correctly.
#[derive(Clone, Default)]
pub enum Thrown {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    /// Integer outside the exactly-representable `f64` range. Kept distinct
    /// from `Number` so precision is never silently lost.
    BigInt(BigInt),
    String(String),
    /// Unique token. Identity is the `Arc`.
    Symbol(Arc<str>),
    /// Callable reference, rendered by name only.
    Function(Option<Cow<'static, str>>),
    Date(DateTime<Utc>),
    Url(String),
    RegExp { source: String, flags: String },
    Buffer(Arc<[u8]>),
    Array(Shared<Vec<Thrown>>),
    /// Insertion-ordered key/value pairs with unique keys.
    Map(Shared<Vec<(Thrown, Thrown)>>),
    /// Insertion-ordered unique elements.
    Set(Shared<Vec<Thrown>>),
    Object(Shared<ObjectData>),
    Error(Shared<NativeError>),
    ResultError(Box<ResultError>),
    /// Text of a caught panic whose payload was not a recognised value.
    Panic(String),
}

impl Thrown {
    /// Plain object with no constructor name.
    pub fn object() -> Self {
        Self::Object(shared(ObjectData::default()))
    }

    /// Instance of a named type, e.g. `Thrown::instance("User")`.
    pub fn instance(constructor: impl Into<Cow<'static, str>>) -> Self {
        Self::Object(shared(ObjectData {
            constructor: Some(constructor.into()),
            properties: Vec::new(),
        }))
    }

    /// Native error named `Error`.
    pub fn error(message: impl Into<String>) -> Self {
        Self::error_named("Error", message)
    }

    /// Native error with an explicit type name (`TypeError`, `IoError`, ...).
    pub fn error_named(name: impl Into<Cow<'static, str>>, message: impl Into<String>) -> Self {
        Self::Error(shared(NativeError {
            name: name.into(),
            message: message.into(),
            cause: None,
            properties: Vec::new(),
        }))
    }

    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Thrown>,
    {
        Self::Array(shared(items.into_iter().map(Into::into).collect()))
    }

    /// Map built from pairs. Later duplicates overwrite earlier values but
    /// keep the first insertion position.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Thrown>,
        V: Into<Thrown>,
    {
        let map = Self::Map(shared(Vec::new()));
        for (key, value) in entries {
            map.insert(key, value);
        }
        map
    }

    /// Set built from elements, duplicates dropped.
    pub fn set<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Thrown>,
    {
        let set = Self::Set(shared(Vec::new()));
        for item in items {
            set.add(item);
        }
        set
    }

    pub fn buffer(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Buffer(Arc::from(bytes.into()))
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }

    pub fn regexp(source: impl Into<String>, flags: impl Into<String>) -> Self {
        Self::RegExp {
            source: source.into(),
            flags: flags.into(),
        }
    }

    pub fn date(at: DateTime<Utc>) -> Self {
        Self::Date(at)
    }

    pub fn symbol(description: impl Into<String>) -> Self {
        Self::Symbol(Arc::from(description.into()))
    }

    pub fn function(name: impl Into<Cow<'static, str>>) -> Self {
        Self::Function(Some(name.into()))
    }

    pub fn big_int(value: impl Into<BigInt>) -> Self {
        Self::BigInt(value.into())
    }

    // ------------------------------------------------------------------------
    // Builders / mutation through shared handles
    // ------------------------------------------------------------------------

    /// Builder form of [`Thrown::assign`].
    pub fn with(self, key: impl Into<String>, value: impl Into<Thrown>) -> Self {
        self.assign(key, value);
        self
    }

    /// Builder form of [`Thrown::assign_getter`].
    pub fn with_getter<F>(self, key: impl Into<String>, getter: F) -> Self
    where
        F: Fn() -> Result<Thrown, Thrown> + Send + Sync + 'static,
    {
        self.assign_getter(key, getter);
        self
    }

    /// Builder form of [`Thrown::set_cause`].
    pub fn with_cause(self, cause: impl Into<Thrown>) -> Self {
        self.set_cause(cause);
        self
    }

    /// Set an own property on an object or error.
    ///
    /// Other variants have no own properties; the call is ignored for them.
    pub fn assign(&self, key: impl Into<String>, value: impl Into<Thrown>) {
        self.assign_property(key.into(), Property::Value(value.into()));
    }

    /// Install a computed property on an object or error.
    pub fn assign_getter<F>(&self, key: impl Into<String>, getter: F)
    where
        F: Fn() -> Result<Thrown, Thrown> + Send + Sync + 'static,
    {
        self.assign_property(key.into(), Property::Getter(Arc::new(getter)));
    }

    fn assign_property(&self, key: String, property: Property) {
        match self {
            Self::Object(data) => assign_property(&mut write(data).properties, key, property),
            Self::Error(data) => assign_property(&mut write(data).properties, key, property),
            _ => {}
        }
    }

    /// Attach a cause to a native error. Ignored for other variants.
    pub fn set_cause(&self, cause: impl Into<Thrown>) {
        if let Self::Error(data) = self {
            write(data).cause = Some(cause.into());
        }
    }

    /// Append to an array. Ignored for other variants.
    pub fn push(&self, item: impl Into<Thrown>) {
        if let Self::Array(items) = self {
            write(items).push(item.into());
        }
    }

    /// Insert or overwrite a map entry. Ignored for other variants.
    pub fn insert(&self, key: impl Into<Thrown>, value: impl Into<Thrown>) {
        if let Self::Map(entries) = self {
            let key = key.into();
            let value = value.into();
            let mut entries = write(entries);
            match entries.iter_mut().find(|(k, _)| k.same_value_zero(&key)) {
                Some((_, slot)) => *slot = value,
                None => entries.push((key, value)),
            }
        }
    }

    /// Add an element to a set if not already present. Ignored for other variants.
    pub fn add(&self, item: impl Into<Thrown>) {
        if let Self::Set(items) = self {
            let item = item.into();
            let mut items = write(items);
            if !items.iter().any(|existing| existing.same_value_zero(&item)) {
                items.push(item);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Inspection helpers
    // ------------------------------------------------------------------------

    /// Identity of a compound value: the address of its shared storage.
    pub fn identity(&self) -> Option<usize> {
        match self {
            Self::Array(items) | Self::Set(items) => Some(Arc::as_ptr(items) as *const () as usize),
            Self::Map(entries) => Some(Arc::as_ptr(entries) as *const () as usize),
            Self::Object(data) => Some(Arc::as_ptr(data) as *const () as usize),
            Self::Error(data) => Some(Arc::as_ptr(data) as *const () as usize),
            Self::Symbol(token) => Some(Arc::as_ptr(token) as *const () as usize),
            _ => None,
        }
    }

    /// Key equality used by maps and sets: primitives by value (NaN equals
    /// NaN), everything with identity by identity.
    pub fn same_value_zero(&self, other: &Thrown) -> bool {
        match (self, other) {
            (Self::Undefined, Self::Undefined) | (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::BigInt(a), Self::BigInt(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Url(a), Self::Url(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }

    pub fn as_result_error(&self) -> Option<&ResultError> {
        match self {
            Self::ResultError(err) => Some(err),
            _ => None,
        }
    }

    /// Snapshot of a native error's contents.
    pub fn native_error(&self) -> Option<NativeError> {
        match self {
            Self::Error(data) => Some(read(data).clone()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// `true` for `Undefined` and `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    // ------------------------------------------------------------------------
    // Conversions from Rust faults
    // ------------------------------------------------------------------------

    /// Convert a borrowed std error, unrolling its `source()` chain into
    /// nested causes. A `ResultError` is recovered as itself.
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        Self::from_error_chain(err, "Error", 0)
    }

    /// Convert an owned std error, naming it after its Rust type.
    pub fn from_std<E>(err: E) -> Self
    where
        E: Error + 'static,
    {
        let any: &dyn Any = &err;
        if let Some(result_error) = any.downcast_ref::<ResultError>() {
            return Self::ResultError(Box::new(result_error.clone()));
        }
        Self::from_error_chain(&err, short_type_name::<E>(), 0)
    }

    fn from_error_chain(err: &(dyn Error + 'static), name: &'static str, depth: usize) -> Self {
        if let Some(result_error) = err.downcast_ref::<ResultError>() {
            return Self::ResultError(Box::new(result_error.clone()));
        }
        let native = Self::error_named(name, err.to_string());
        if depth < MAX_SOURCE_CHAIN {
            if let Some(source) = err.source() {
                native.set_cause(Self::from_error_chain(source, "Error", depth + 1));
            }
        }
        native
    }

    /// Recover the raised value from a `catch_unwind` payload.
    ///
    /// Values raised with [`raise`] and errors raised by
    /// [`Outcome::unwrap`](crate::Outcome::unwrap) come back as themselves;
    /// `panic!` messages come back as [`Thrown::Panic`].
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Thrown>() {
            Ok(thrown) => return *thrown,
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<ResultError>() {
            Ok(err) => return Self::ResultError(err),
            Err(payload) => payload,
        };
        if let Some(message) = payload.downcast_ref::<&'static str>() {
            return Self::Panic((*message).to_owned());
        }
        match payload.downcast::<String>() {
            Ok(message) => Self::Panic(*message),
            Err(_) => Self::Panic(NON_STRING_PANIC.to_owned()),
        }
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Raise `value` as a panic so an enclosing wrap function recovers it intact.
///
/// This is the explicit counterpart of throwing an arbitrary value.
#[track_caller]
pub fn raise(value: impl Into<Thrown>) -> ! {
    std::panic::panic_any(value.into())
}

impl fmt::Debug for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::inspect(self))
    }
}

impl fmt::Display for Thrown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::inspect(self))
    }
}

// ============================================================================
// From impls
// ============================================================================

impl From<&str> for Thrown {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Thrown {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Cow<'_, str>> for Thrown {
    fn from(value: Cow<'_, str>) -> Self {
        Self::String(value.into_owned())
    }
}

impl From<bool> for Thrown {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for Thrown {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<f32> for Thrown {
    fn from(value: f32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<()> for Thrown {
    fn from(_: ()) -> Self {
        Self::Undefined
    }
}

macro_rules! lossless_number {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Thrown {
                fn from(value: $ty) -> Self {
                    Self::Number(f64::from(value))
                }
            }
        )+
    };
}

lossless_number!(i8, i16, i32, u8, u16, u32);

macro_rules! wide_integer {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Thrown {
                fn from(value: $ty) -> Self {
                    let wide = value as i128;
                    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&wide) {
                        Self::Number(wide as f64)
                    } else {
                        Self::BigInt(BigInt::from(wide))
                    }
                }
            }
        )+
    };
}

wide_integer!(i64, u64, isize, usize, i128);

impl From<u128> for Thrown {
    fn from(value: u128) -> Self {
        match i128::try_from(value) {
            Ok(wide) => Self::from(wide),
            Err(_) => Self::BigInt(BigInt::from(value)),
        }
    }
}

impl<T: Into<Thrown>> From<Option<T>> for Thrown {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Thrown>> From<Vec<T>> for Thrown {
    fn from(value: Vec<T>) -> Self {
        Self::array(value)
    }
}

impl From<DateTime<Utc>> for Thrown {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl From<ResultError> for Thrown {
    fn from(value: ResultError) -> Self {
        Self::ResultError(Box::new(value))
    }
}

impl From<Box<dyn Error + Send + Sync>> for Thrown {
    fn from(value: Box<dyn Error + Send + Sync>) -> Self {
        Self::from_error(&*value)
    }
}

macro_rules! std_error {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Thrown {
                fn from(value: $ty) -> Self {
                    Self::from_std(value)
                }
            }
        )+
    };
}

std_error!(
    std::io::Error,
    std::fmt::Error,
    std::num::ParseIntError,
    std::num::ParseFloatError,
    std::str::Utf8Error,
    std::string::FromUtf8Error,
    serde_json::Error,
    chrono::ParseError,
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn clones_share_identity() {
        let a = Thrown::object();
        let b = a.clone();
        assert_eq!(a.identity(), b.identity());
        assert_ne!(a.identity(), Thrown::object().identity());
    }

    #[test]
    fn map_overwrites_but_keeps_position() {
        let map = Thrown::map([("a", 1), ("b", 2), ("a", 3)]);
        let Thrown::Map(entries) = &map else {
            panic!("expected map");
        };
        let entries = read(entries);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0.as_str(), Some("a"));
        assert!(matches!(entries[0].1, Thrown::Number(n) if n == 3.0));
    }

    #[test]
    fn set_dedupes_primitives_and_nan() {
        let set = Thrown::set([Thrown::Number(f64::NAN), Thrown::Number(f64::NAN), 1.into()]);
        let Thrown::Set(items) = &set else {
            panic!("expected set");
        };
        assert_eq!(read(items).len(), 2);
    }

    #[test]
    fn set_keeps_distinct_objects() {
        let set = Thrown::set([Thrown::object(), Thrown::object()]);
        let Thrown::Set(items) = &set else {
            panic!("expected set");
        };
        assert_eq!(read(items).len(), 2);
    }

    #[test]
    fn wide_integers_become_big_int() {
        assert!(matches!(Thrown::from(42i64), Thrown::Number(n) if n == 42.0));
        assert!(matches!(Thrown::from(u64::MAX), Thrown::BigInt(_)));
        assert!(matches!(Thrown::from(i128::MIN), Thrown::BigInt(_)));
    }

    #[test]
    fn u128_above_i128_keeps_every_digit() {
        let Thrown::BigInt(n) = Thrown::from(u128::MAX) else {
            panic!("expected big int");
        };
        assert_eq!(n.magnitude(), u128::MAX);
        assert!(!n.is_negative());
        assert!(Thrown::from(u128::MAX).same_value_zero(&Thrown::big_int(u128::MAX)));
        assert!(!Thrown::from(u128::MAX).same_value_zero(&Thrown::from(u128::MAX as f64)));
    }

    #[test]
    fn big_int_display_keeps_sign() {
        assert_eq!(BigInt::from(i128::MIN).to_string(), i128::MIN.to_string());
        assert_eq!(BigInt::from(-7_i128).to_string(), "-7");
        assert_eq!(BigInt::from(0_u128).to_string(), "0");
    }

    #[test]
    fn std_error_keeps_type_name_and_chain() {
        #[derive(Debug)]
        struct Outer(io::Error);
        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("outer failed")
            }
        }
        impl Error for Outer {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                Some(&self.0)
            }
        }

        let thrown = Thrown::from_std(Outer(io::Error::other("disk gone")));
        let native = thrown.native_error().unwrap();
        assert_eq!(native.name(), "Outer");
        assert_eq!(native.message(), "outer failed");
        let cause = native.cause().and_then(Thrown::native_error).unwrap();
        assert_eq!(cause.message(), "disk gone");
    }

    fn caught(f: impl FnOnce() + std::panic::UnwindSafe) -> Box<dyn Any + Send> {
        std::panic::catch_unwind(f).unwrap_err()
    }

    #[test]
    fn panic_payloads_are_recovered() {
        let payload = caught(|| raise("x"));
        assert_eq!(Thrown::from_panic(payload).as_str(), Some("x"));

        let payload = caught(|| panic!("boom {}", 1));
        assert!(matches!(Thrown::from_panic(payload), Thrown::Panic(m) if m == "boom 1"));

        let payload = caught(|| std::panic::panic_any(7u8));
        assert!(matches!(Thrown::from_panic(payload), Thrown::Panic(m) if m == NON_STRING_PANIC));
    }

    #[test]
    fn assign_on_primitive_is_ignored() {
        let value = Thrown::from(1).with("x", 2);
        assert!(matches!(value, Thrown::Number(_)));
    }
}
