//! Unwrap helpers with good error messages.
//!
//! These replace `unwrap()` and `expect()` in test code. Every helper is
//! `#[track_caller]` so a failure points at the test line, not here.

use std::fmt::Debug;

/// Unwrap a `Result`, panicking with the error value on `Err`.
///
/// ```rust
/// use uvc_test_helpers::must;
///
/// let result: Result<u32, &str> = Ok(0x0098_0900);
/// assert_eq!(must(result), 0x0098_0900);
/// ```
///
/// # Panics
///
/// Panics if the result is `Err`.
#[track_caller]
pub fn must<T, E: Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must: unexpected Err: {e:?}"),
    }
}

/// Unwrap an `Option`, panicking with `msg` on `None`.
///
/// ```rust
/// use uvc_test_helpers::must_some;
///
/// assert_eq!(must_some(Some(2u8), "unit 2"), 2);
/// ```
///
/// # Panics
///
/// Panics if the option is `None`.
#[track_caller]
pub fn must_some<T>(option: Option<T>, msg: &str) -> T {
    match option {
        Some(v) => v,
        None => panic!("must_some: {msg}"),
    }
}

/// Unwrap a `Result` with a context message.
///
/// # Panics
///
/// Panics if the result is `Err`, with the context and error value.
#[track_caller]
pub fn must_with<T, E: Debug>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("must_with: {context}: {e:?}"),
    }
}

/// Unwrap the error of a `Result`, panicking if it is `Ok`.
///
/// ```rust
/// use uvc_test_helpers::must_err;
///
/// let result: Result<(), &str> = Err("no such control");
/// assert_eq!(must_err(result), "no such control");
/// ```
///
/// # Panics
///
/// Panics if the result is `Ok`.
#[track_caller]
pub fn must_err<T: Debug, E>(result: Result<T, E>) -> E {
    match result {
        Ok(v) => panic!("must_err: unexpected Ok: {v:?}"),
        Err(e) => e,
    }
}
