//! Safe, cycle-tolerant stringification of arbitrary raised values.
//!
//! [`inspect`] turns any [`Thrown`] into a readable diagnostic string and never
//! panics. It is what the error taxonomy uses to give unknown faults a message.
//!
//! # Output shape
//!
//! | Value | Rendering |
//! |-------|-----------|
//! | top-level string | the string itself |
//! | nested string | JSON-quoted |
//! | big integer | `123` at top level, `123n` when nested |
//! | map | `[Map]:[[k,v],...]` |
//! | set | `[Set]:[a,b,...]` |
//! | buffer | `[Buffer]:<N bytes: 0a 0b ...>` |
//! | URL / regexp / date | `[URL]:...`, `[RegExp]:/src/flags`, `[Date]:<rfc3339>` |
//! | native error | `[<Name>]:{name:..,message:..,cause:..}` |
//! | result error | `[<Name>]:{name:..,code:..,status:..,message:..,cause:..}` |
//! | object | `[<Constructor>]:{key:value,...}` |
//! | array | `[a,b,...]` |
//!
//! # Guarantees
//!
//! - A compound value met again on the current recursive path renders as
//!   [`CIRCULAR_MARKER`]. Shared but acyclic references are expanded at every
//!   occurrence.
//! - Getters that fail or panic render as `[Thrown: ...]` for that field only.
//! - Nesting beyond [`InspectOptions::max_depth`] renders as [`MAX_DEPTH_MARKER`].
//! - The cycle guard lives for one top-level call; calls are independent.

use crate::value::{Getter, Property, read};
use crate::{ResultError, Thrown};
use chrono::SecondsFormat;
use smallvec::SmallVec;
use std::fmt::Write as _;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Rendered in place of a value already on the current path.
pub const CIRCULAR_MARKER: &str = "[Circular]";

/// Rendered in place of values nested deeper than the configured limit.
pub const MAX_DEPTH_MARKER: &str = "[MaxDepth]";

/// Returned when inspection itself fails unexpectedly.
pub const UNINSPECTABLE_MARKER: &str = "[Uninspectable]";

/// Prefix of the per-field marker for getters that failed.
pub const THROWN_MARKER_PREFIX: &str = "[Thrown: ";

/// Constructor label for objects without a named type.
const DEFAULT_CONSTRUCTOR: &str = "Object";

/// Limits applied while inspecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOptions {
    /// Maximum nesting depth before [`MAX_DEPTH_MARKER`] is emitted.
    pub max_depth: usize,
    /// Number of leading bytes shown for buffers.
    pub buffer_preview: usize,
}

impl InspectOptions {
    pub const DEFAULT_MAX_DEPTH: usize = 256;
    pub const DEFAULT_BUFFER_PREVIEW: usize = 16;

    #[inline]
    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            buffer_preview: Self::DEFAULT_BUFFER_PREVIEW,
        }
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[inline]
    pub const fn with_buffer_preview(mut self, bytes: usize) -> Self {
        self.buffer_preview = bytes;
        self
    }
}

impl Default for InspectOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Inspect with default limits.
///
/// A getter that panics is contained, but the process panic hook still runs
/// for it. With the default hook that means a message on stderr.
pub fn inspect(value: &Thrown) -> String {
    inspect_with(value, &InspectOptions::default())
}

/// Inspect with explicit limits. Never panics.
pub fn inspect_with(value: &Thrown, options: &InspectOptions) -> String {
    catch_unwind(AssertUnwindSafe(|| match value {
        Thrown::String(s) => s.clone(),
        Thrown::BigInt(n) => n.to_string(),
        other => {
            let mut inspector = Inspector::new(options);
            inspector.render(other, 0);
            inspector.out
        }
    }))
    .unwrap_or_else(|_| UNINSPECTABLE_MARKER.to_owned())
}

/// Render a float the way a JavaScript engine prints numbers: the shortest
/// round-trip digits, positional between 1e-7 and 1e21, exponent outside.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }

    let scientific = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{n}");
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return format!("{n}");
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let count = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let point = exponent + 1;

    let mut out = String::with_capacity(digits.len() + 8);
    if n < 0.0 {
        out.push('-');
    }
    if count <= point && point <= 21 {
        out.push_str(&digits);
        out.extend(std::iter::repeat_n('0', (point - count) as usize));
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        out.push_str(whole);
        out.push('.');
        out.push_str(fraction);
    } else if -6 < point && point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat_n('0', (-point) as usize));
        out.push_str(&digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{}", exponent.unsigned_abs());
    }
    out
}

fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// One top-level inspection: output buffer plus the identities on the
/// current recursive path.
struct Inspector<'o> {
    options: &'o InspectOptions,
    path: SmallVec<[usize; 16]>,
    out: String,
}

impl<'o> Inspector<'o> {
    fn new(options: &'o InspectOptions) -> Self {
        Self {
            options,
            path: SmallVec::new(),
            out: String::new(),
        }
    }

    fn render(&mut self, value: &Thrown, depth: usize) {
        if depth > self.options.max_depth {
            self.out.push_str(MAX_DEPTH_MARKER);
            return;
        }

        match value {
            Thrown::Undefined => self.out.push_str("undefined"),
            Thrown::Null => self.out.push_str("null"),
            Thrown::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Thrown::Number(n) => self.out.push_str(&format_number(*n)),
            Thrown::BigInt(n) => {
                let _ = write!(self.out, "{n}n");
            }
            Thrown::String(s) => self.push_quoted(s),
            Thrown::Symbol(description) => {
                let _ = write!(self.out, "Symbol({description})");
            }
            Thrown::Function(name) => {
                let name = name.as_deref().unwrap_or("anonymous");
                let _ = write!(self.out, "[Function: {name}]");
            }
            Thrown::Map(entries) => {
                self.guarded(value, |this| {
                    let entries = read(entries).clone();
                    this.out.push_str("[Map]:[");
                    for (i, (key, val)) in entries.iter().enumerate() {
                        this.separator(i);
                        this.out.push('[');
                        this.render(key, depth + 1);
                        this.out.push(',');
                        this.render(val, depth + 1);
                        this.out.push(']');
                    }
                    this.out.push(']');
                });
            }
            Thrown::Set(items) => {
                self.guarded(value, |this| {
                    let items = read(items).clone();
                    this.out.push_str("[Set]:");
                    this.render_sequence(&items, depth);
                });
            }
            Thrown::Buffer(bytes) => self.render_buffer(bytes),
            Thrown::Url(url) => {
                self.out.push_str("[URL]:");
                self.out.push_str(url);
            }
            Thrown::RegExp { source, flags } => {
                let _ = write!(self.out, "[RegExp]:/{source}/{flags}");
            }
            Thrown::Date(at) => {
                self.out.push_str("[Date]:");
                self.out.push_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true));
            }
            Thrown::Error(data) => {
                self.guarded(value, |this| {
                    let native = read(data).clone();
                    let _ = write!(this.out, "[{}]:{{name:", native.name());
                    this.push_quoted(native.name());
                    this.out.push_str(",message:");
                    this.push_quoted(native.message());
                    if let Some(cause) = native.cause() {
                        this.out.push_str(",cause:");
                        this.render(cause, depth + 1);
                    }
                    for (key, property) in native.properties() {
                        this.out.push(',');
                        this.render_property(key, property, depth);
                    }
                    this.out.push('}');
                });
            }
            Thrown::ResultError(err) => self.render_result_error(err, depth),
            Thrown::Object(data) => {
                self.guarded(value, |this| {
                    let object = read(data).clone();
                    let constructor = object.constructor().unwrap_or(DEFAULT_CONSTRUCTOR);
                    let _ = write!(this.out, "[{constructor}]:{{");
                    for (i, (key, property)) in object.properties().iter().enumerate() {
                        this.separator(i);
                        this.render_property(key, property, depth);
                    }
                    this.out.push('}');
                });
            }
            Thrown::Array(items) => {
                self.guarded(value, |this| {
                    let items = read(items).clone();
                    this.render_sequence(&items, depth);
                });
            }
            Thrown::Panic(message) => {
                self.out.push_str("[Panic]:");
                self.push_quoted(message);
            }
        }
    }

    /// Run `body` with `value` pushed on the path, or emit the circular
    /// marker if it is already there.
    fn guarded(&mut self, value: &Thrown, body: impl FnOnce(&mut Self)) {
        let Some(identity) = value.identity() else {
            body(self);
            return;
        };
        if self.path.contains(&identity) {
            self.out.push_str(CIRCULAR_MARKER);
            return;
        }
        self.path.push(identity);
        body(self);
        self.path.pop();
    }

    fn render_sequence(&mut self, items: &[Thrown], depth: usize) {
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            self.separator(i);
            self.render(item, depth + 1);
        }
        self.out.push(']');
    }

    fn render_result_error(&mut self, err: &ResultError, depth: usize) {
        let _ = write!(self.out, "[{}]:{{name:", err.name());
        self.push_quoted(err.name());
        self.out.push_str(",code:");
        self.push_quoted(err.code());
        let _ = write!(self.out, ",status:{},message:", err.status());
        self.push_quoted(err.message());
        if let Some(cause) = err.cause() {
            self.out.push_str(",cause:");
            self.render(cause, depth + 1);
        }
        self.out.push('}');
    }

    fn render_property(&mut self, key: &str, property: &Property, depth: usize) {
        if is_identifier(key) {
            self.out.push_str(key);
        } else {
            self.push_quoted(key);
        }
        self.out.push(':');
        match property {
            Property::Value(value) => self.render(value, depth + 1),
            Property::Getter(getter) => self.render_getter(getter, depth + 1),
        }
    }

    /// Read a computed property, containing any failure to this field.
    fn render_getter(&mut self, getter: &Getter, depth: usize) {
        let fault = match catch_unwind(AssertUnwindSafe(|| getter())) {
            Ok(Ok(value)) => {
                self.render(&value, depth);
                return;
            }
            Ok(Err(fault)) => fault,
            Err(payload) => Thrown::from_panic(payload),
        };
        self.out.push_str(THROWN_MARKER_PREFIX);
        self.render(&fault, depth);
        self.out.push(']');
    }

    fn render_buffer(&mut self, bytes: &[u8]) {
        let _ = write!(self.out, "[Buffer]:<{} bytes", bytes.len());
        let shown = bytes.len().min(self.options.buffer_preview);
        if shown > 0 {
            self.out.push(':');
            for byte in &bytes[..shown] {
                let _ = write!(self.out, " {byte:02x}");
            }
            if shown < bytes.len() {
                self.out.push_str(" ...");
            }
        }
        self.out.push('>');
    }

    fn push_quoted(&mut self, s: &str) {
        match serde_json::to_string(s) {
            Ok(quoted) => self.out.push_str(&quoted),
            Err(_) => {
                let _ = write!(self.out, "{s:?}");
            }
        }
    }

    #[inline]
    fn separator(&mut self, index: usize) {
        if index > 0 {
            self.out.push(',');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn primitives() {
        assert_eq!(inspect(&Thrown::Undefined), "undefined");
        assert_eq!(inspect(&Thrown::Null), "null");
        assert_eq!(inspect(&true.into()), "true");
        assert_eq!(inspect(&42.into()), "42");
        assert_eq!(inspect(&1.5.into()), "1.5");
        assert_eq!(inspect(&Thrown::Number(f64::NAN)), "NaN");
        assert_eq!(inspect(&Thrown::Number(f64::NEG_INFINITY)), "-Infinity");
        assert_eq!(inspect(&"plain".into()), "plain");
    }

    #[test]
    fn big_int_is_tagged_only_when_nested() {
        assert_eq!(inspect(&Thrown::big_int(123)), "123");
        assert_eq!(inspect(&Thrown::array([Thrown::big_int(123), 123.into()])), "[123n,123]");
    }

    #[test]
    fn u128_beyond_i128_renders_exact_digits() {
        let max = Thrown::from(u128::MAX);
        assert_eq!(inspect(&max), "340282366920938463463374607431768211455");
        assert_eq!(
            inspect(&Thrown::array([max, Thrown::from(i128::MIN)])),
            "[340282366920938463463374607431768211455n,-170141183460469231731687303715884105728n]"
        );
    }

    #[test]
    fn nested_strings_are_escaped() {
        let value = Thrown::array(["a\"b", "line\nbreak"]);
        assert_eq!(inspect(&value), r#"["a\"b","line\nbreak"]"#);
    }

    #[test]
    fn map_and_set_tags() {
        let map = Thrown::map([("k", "v")]);
        let rendered = inspect(&map);
        assert!(rendered.starts_with("[Map]"));
        assert_eq!(rendered, r#"[Map]:[["k","v"]]"#);

        let set = Thrown::set([1, 2, 3]);
        let rendered = inspect(&set);
        assert!(rendered.starts_with("[Set]"));
        assert!(rendered.contains("1,2,3"));
    }

    #[test]
    fn constructor_name_is_preserved() {
        let user = Thrown::instance("User").with("id", 1);
        let rendered = inspect(&user);
        assert!(rendered.contains("User"));
        assert!(rendered.contains("id:1"));

        let plain = Thrown::object().with("id", 1);
        assert_eq!(inspect(&plain), "[Object]:{id:1}");
        assert_ne!(inspect(&user), inspect(&plain));
    }

    #[test]
    fn non_identifier_keys_are_quoted() {
        let value = Thrown::object().with("content-type", "json").with("_ok", true);
        assert_eq!(inspect(&value), r#"[Object]:{"content-type":"json",_ok:true}"#);
    }

    #[test]
    fn self_reference_is_marked() {
        let a = Thrown::object();
        a.assign("self", a.clone());
        assert_eq!(inspect(&a), "[Object]:{self:[Circular]}");
    }

    #[test]
    fn mutual_reference_is_marked() {
        let a = Thrown::instance("A");
        let b = Thrown::instance("B").with("a", a.clone());
        a.assign("b", b);
        assert_eq!(inspect(&a), "[A]:{b:[B]:{a:[Circular]}}");
    }

    #[test]
    fn shared_acyclic_reference_is_expanded_twice() {
        let shared = Thrown::object().with("x", 1);
        let holder = Thrown::array([shared.clone(), shared]);
        let rendered = inspect(&holder);
        assert_eq!(rendered, "[[Object]:{x:1},[Object]:{x:1}]");
        assert!(!rendered.contains(CIRCULAR_MARKER));
    }

    #[test]
    fn cyclic_array_and_map() {
        let list = Thrown::array([1]);
        list.push(list.clone());
        assert_eq!(inspect(&list), "[1,[Circular]]");

        let map = Thrown::map([("k", 1)]);
        map.insert("me", map.clone());
        assert!(inspect(&map).contains(CIRCULAR_MARKER));
    }

    #[test]
    fn error_chain_is_unrolled() {
        let root = Thrown::error_named("TypeError", "bad type");
        let outer = Thrown::error("wrapped").with_cause(root).with("attempt", 2);
        assert_eq!(
            inspect(&outer),
            r#"[Error]:{name:"Error",message:"wrapped",cause:[TypeError]:{name:"TypeError",message:"bad type"},attempt:2}"#
        );
    }

    #[test]
    fn cyclic_error_cause_terminates() {
        let err = Thrown::error("loop");
        err.set_cause(err.clone());
        assert!(inspect(&err).contains(CIRCULAR_MARKER));
    }

    #[test]
    fn result_error_exposes_code_and_status() {
        let err = ResultError::new("missing", 404, "NOT_FOUND", Some(Thrown::from("why")));
        let rendered = inspect(&err.into());
        assert_eq!(
            rendered,
            r#"[ResultError]:{name:"ResultError",code:"NOT_FOUND",status:404,message:"missing",cause:"why"}"#
        );
    }

    #[test]
    fn buffer_is_summarised() {
        let rendered = inspect(&Thrown::buffer(vec![0u8; 40]));
        assert!(rendered.starts_with("[Buffer]:<40 bytes:"));
        assert!(rendered.ends_with(" ...>"));
        assert_eq!(inspect(&Thrown::buffer(vec![0xab_u8, 0x01])), "[Buffer]:<2 bytes: ab 01>");
        assert_eq!(inspect(&Thrown::buffer(Vec::<u8>::new())), "[Buffer]:<0 bytes>");
    }

    #[test]
    fn canonical_string_types() {
        assert_eq!(inspect(&Thrown::url("https://example.com/a?b=1")), "[URL]:https://example.com/a?b=1");
        assert_eq!(inspect(&Thrown::regexp("ab+c", "gi")), "[RegExp]:/ab+c/gi");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(inspect(&Thrown::date(at)), "[Date]:2024-05-01T12:00:00.000Z");
        assert_eq!(inspect(&Thrown::symbol("tag")), "Symbol(tag)");
        assert_eq!(inspect(&Thrown::Function(None)), "[Function: anonymous]");
    }

    #[test]
    fn failing_getter_is_contained() {
        let value = Thrown::object()
            .with("ok", 1)
            .with_getter("bad", || Err(Thrown::error("getter failed")))
            .with("after", 2);
        let rendered = inspect(&value);
        assert!(rendered.starts_with("[Object]:{ok:1,bad:[Thrown: [Error]:"));
        assert!(rendered.contains("getter failed"));
        assert!(rendered.ends_with(",after:2}"));
    }

    #[test]
    fn panicking_getter_is_contained() {
        let value = Thrown::object().with_getter("boom", || panic!("getter exploded"));
        let rendered = inspect(&value);
        assert_eq!(rendered, r#"[Object]:{boom:[Thrown: [Panic]:"getter exploded"]}"#);
    }

    #[test]
    fn getter_may_reenter_its_owner() {
        let owner = Thrown::object();
        let handle = owner.clone();
        owner.assign_getter("me", move || Ok(handle.clone()));
        assert_eq!(inspect(&owner), "[Object]:{me:[Circular]}");
    }

    #[test]
    fn deep_nesting_is_bounded() {
        let mut value = Thrown::Null;
        for _ in 0..1_000 {
            value = Thrown::array([value]);
        }
        let rendered = inspect(&value);
        assert!(rendered.contains(MAX_DEPTH_MARKER));

        let shallow = InspectOptions::new().with_max_depth(2);
        assert_eq!(inspect_with(&Thrown::array([Thrown::array([Thrown::array([1])])]), &shallow), "[[[[MaxDepth]]]]");
    }

    #[test]
    fn buffer_preview_is_configurable() {
        let options = InspectOptions::new().with_buffer_preview(0);
        assert_eq!(inspect_with(&Thrown::buffer(vec![1_u8, 2, 3]), &options), "[Buffer]:<3 bytes>");
    }

    #[test]
    fn format_number_matches_js_rendering() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1e20), "100000000000000000000");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(-1.23e-18), "-1.23e-18");
        assert_eq!(format_number(2.5e300), "2.5e+300");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(9_007_199_254_740_993.0), "9007199254740992");
        assert_eq!(format_number(-12.0), "-12");
        assert_eq!(format_number(0.25), "0.25");
    }
}
