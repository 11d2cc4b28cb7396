//! Address text primitives the native stack is missing or renames.

use ffi;
use ffi::{in_addr, socklen_t, INADDR_NONE};
use libc::{c_char, c_int, c_void};

/// Parses a dotted-quad string into `*inp` in network byte order.
/// Returns `1` on success, `0` on failure, in which case `*inp` is left
/// untouched. Inherits the native parser's quirk that the broadcast
/// address `255.255.255.255` collides with the failure sentinel and is
/// reported as unparseable.
pub unsafe fn inet_aton(cp: *const c_char, inp: *mut in_addr) -> c_int {
    let raw = ffi::inet_addr(cp);
    ffi::republish_last_error();
    if raw == INADDR_NONE {
        return 0;
    }
    ffi::store_in_addr(inp, raw);
    1
}

/// Formats a binary address as text; straight passthrough to the native
/// formatter.
pub unsafe fn inet_ntop(af: c_int, src: *const c_void, dst: *mut c_char,
                        size: socklen_t) -> *const c_char {
    let ret = ffi::inet_ntop(af, src, dst, size);
    ffi::republish_last_error();
    ret
}
