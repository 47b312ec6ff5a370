#![no_main]

use libfuzzer_sys::fuzz_target;
use safe_result::{HttpErrorKind, ResultError, Thrown, try_result_sync};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).into_owned();
    let selector = data.first().copied().unwrap_or(0);

    let raised = match selector % 5 {
        0 => Thrown::from(text.as_str()),
        1 => Thrown::error(text.clone()),
        2 => Thrown::object().with("payload", text.as_str()),
        3 => Thrown::buffer(data.to_vec()),
        _ => Thrown::from(ResultError::new(text.clone(), i32::from(selector), "FUZZ", None)),
    };

    let once = ResultError::from(raised.clone());
    assert!(!once.message().is_empty());
    let twice = ResultError::from(once.clone());
    assert_eq!(once, twice);

    let kind = HttpErrorKind::ALL[usize::from(selector) % HttpErrorKind::ALL.len()];
    let pinned = kind.error("", Some(raised.clone()));
    assert_eq!(pinned.code(), kind.code());

    let outcome = try_result_sync(|| -> Result<(), Thrown> {
        if selector % 2 == 0 {
            safe_result::raise(raised)
        } else {
            Err(raised)
        }
    });
    assert!(outcome.is_err());
});
