#![no_main]

use libfuzzer_sys::fuzz_target;
use safe_result::{MAX_FIELD_OUTPUT_LEN, NotFoundError, Thrown};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let err = NotFoundError::new(text.as_ref(), Some(Thrown::from(text.as_ref())));

    let mut buffer = String::new();
    err.internal_log().write_to(&mut buffer).unwrap();
    assert!(buffer.len() < 4 * MAX_FIELD_OUTPUT_LEN);
    let _ = err.to_json();
});
