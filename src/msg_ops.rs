//! Scatter/gather message transfer.
//!
//! Peer-address translation is not supported: a message carrying a
//! name buffer is rejected before any native call, with
//! `OPERATION_NOT_SUPPORTED` in the error channel and nothing
//! transferred. Control data and the iovec array pass through; on
//! handle-based stacks the iovec array is repacked into the native
//! buffer-descriptor form for the one-shot extension calls.

use ffi;
use ffi::msghdr;
use libc::{c_int, ssize_t};
use sock_ops::wrap_socket_call;

pub unsafe fn sendmsg(s: c_int, message: *const msghdr, flags: c_int) -> ssize_t {
    if !(*message).msg_name.is_null() || (*message).msg_namelen != 0 {
        ffi::set_last_error(ffi::OPERATION_NOT_SUPPORTED);
        return -1;
    }
    wrap_socket_call(s, |h| ffi::sendmsg(h, message, flags))
}

pub unsafe fn recvmsg(s: c_int, message: *mut msghdr, flags: c_int) -> ssize_t {
    if !(*message).msg_name.is_null() || (*message).msg_namelen != 0 {
        ffi::set_last_error(ffi::OPERATION_NOT_SUPPORTED);
        return -1;
    }
    wrap_socket_call(s, |h| ffi::recvmsg(h, message, flags))
}
