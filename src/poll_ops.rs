//! Multiplexed wait over a set of socket descriptors.

use ffi;
use ffi::{nfds_t, pollfd};
use libc::c_int;

/// Waits for readiness on every entry of `fds`, delegating to the native
/// scalable poll. Timeout semantics pass through verbatim: milliseconds,
/// `-1` to wait forever, `0` to return at once.
///
/// Each entry's `fd` field is rewritten **in place** to the native
/// handle before the native call; the mutation is part of the contract
/// and the array must be rebuilt from descriptors before reuse. Only
/// sockets are supported; an entry referring to a non-socket waitable
/// is undefined behavior. The signature leaves room for a mixed-handle
/// implementation later without a change at the call sites.
pub unsafe fn poll(fds: *mut pollfd, nfds: nfds_t, timeout: c_int) -> c_int {
    for i in 0..nfds as isize {
        let p = fds.offset(i);
        (*p).fd = ffi::fd_to_socket((*p).fd as c_int);
    }
    let ret = ffi::poll(fds, nfds, timeout);
    ffi::republish_last_error();
    ret
}
