//! Custom assertion macros for testing.

/// Assert that a collection is sorted in strictly ascending order.
///
/// ```rust
/// use uvc_test_helpers::assert_strictly_increasing;
///
/// assert_strictly_increasing!(&[0x0098_0900u32, 0x0098_0903, 0x009a_0901]);
/// ```
#[macro_export]
macro_rules! assert_strictly_increasing {
    ($collection:expr $(,)?) => {
        let collection = $collection;
        let mut iter = collection.iter();
        if let Some(mut prev) = iter.next() {
            for (i, curr) in iter.enumerate() {
                if prev >= curr {
                    panic!(
                        "assertion failed: collection is not strictly increasing\n  first offending pair at index {}: {:?} >= {:?}",
                        i, prev, curr
                    );
                }
                prev = curr;
            }
        }
    };
}

/// Assert that an expression is an `Err` carrying the given errno.
///
/// The error type must provide an `errno()` method.
///
/// ```rust,ignore
/// use uvc_test_helpers::assert_errno;
///
/// assert_errno!(device.query_ctrl(0x1234), libc::EINVAL);
/// ```
#[macro_export]
macro_rules! assert_errno {
    ($result:expr, $errno:expr $(,)?) => {
        match $result {
            Ok(value) => panic!(
                "assertion failed: expected errno {}, got Ok({:?})",
                $errno, value
            ),
            Err(err) => {
                if err.errno() != $errno {
                    panic!(
                        "assertion failed: expected errno {}, got {} ({})",
                        $errno,
                        err.errno(),
                        err
                    );
                }
            }
        }
    };
}
