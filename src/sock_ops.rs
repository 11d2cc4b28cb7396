//! Per-call wrappers over the native socket primitives.
//!
//! Every function accepts the caller's integer descriptor, translates it
//! to the native handle for exactly one native call, republishes the
//! native error code through the ambient `errno` channel and hands the
//! result back unchanged. Blocking behavior is the native call's own.

use ffi;
use ffi::{sockaddr, socklen_t, RawFd};
use libc::{c_int, c_void, size_t, ssize_t};

/// Runs one native call against the handle underneath `s`.
///
/// The error code is republished even when the call succeeds; callers
/// must not expect stale error state to survive a successful call.
pub(crate) unsafe fn wrap_socket_call<R, F>(s: c_int, f: F) -> R
where
    F: FnOnce(RawFd) -> R,
{
    let h = ffi::fd_to_socket(s);
    let ret = f(h);
    ffi::republish_last_error();
    ret
}

/// Creates a native socket and mints a descriptor for it.
pub unsafe fn socket(af: c_int, ty: c_int, protocol: c_int) -> c_int {
    let h = ffi::socket(af, ty, protocol);
    ffi::republish_last_error();
    ffi::socket_to_fd(h)
}

/// Accepts a pending connection and mints a descriptor for the new
/// native handle. A failed accept stays `-1`; no descriptor is minted
/// for the invalid-handle sentinel.
pub unsafe fn accept(s: c_int, addr: *mut sockaddr, addrlen: *mut socklen_t) -> c_int {
    ffi::socket_to_fd(wrap_socket_call(s, |h| ffi::accept(h, addr, addrlen)))
}

pub unsafe fn bind(s: c_int, name: *const sockaddr, namelen: socklen_t) -> c_int {
    wrap_socket_call(s, |h| ffi::bind(h, name, namelen))
}

pub unsafe fn connect(s: c_int, name: *const sockaddr, namelen: socklen_t) -> c_int {
    wrap_socket_call(s, |h| ffi::connect(h, name, namelen))
}

pub unsafe fn listen(s: c_int, backlog: c_int) -> c_int {
    wrap_socket_call(s, |h| ffi::listen(h, backlog))
}

pub unsafe fn shutdown(s: c_int, how: c_int) -> c_int {
    wrap_socket_call(s, |h| ffi::shutdown(h, how))
}

pub unsafe fn getsockname(s: c_int, name: *mut sockaddr, namelen: *mut socklen_t) -> c_int {
    wrap_socket_call(s, |h| ffi::getsockname(h, name, namelen))
}

pub unsafe fn getpeername(s: c_int, name: *mut sockaddr, namelen: *mut socklen_t) -> c_int {
    wrap_socket_call(s, |h| ffi::getpeername(h, name, namelen))
}

pub unsafe fn getsockopt(s: c_int, level: c_int, optname: c_int, optval: *mut c_void,
                         optlen: *mut socklen_t) -> c_int {
    wrap_socket_call(s, |h| ffi::getsockopt(h, level, optname, optval, optlen))
}

pub unsafe fn setsockopt(s: c_int, level: c_int, optname: c_int, optval: *const c_void,
                         optlen: socklen_t) -> c_int {
    wrap_socket_call(s, |h| ffi::setsockopt(h, level, optname, optval, optlen))
}

pub unsafe fn send(s: c_int, buf: *const c_void, len: size_t, flags: c_int) -> ssize_t {
    wrap_socket_call(s, |h| ffi::send(h, buf, len, flags))
}

pub unsafe fn sendto(s: c_int, buf: *const c_void, len: size_t, flags: c_int,
                     to: *const sockaddr, tolen: socklen_t) -> ssize_t {
    wrap_socket_call(s, |h| ffi::sendto(h, buf, len, flags, to, tolen))
}

pub unsafe fn recv(s: c_int, buf: *mut c_void, len: size_t, flags: c_int) -> ssize_t {
    wrap_socket_call(s, |h| ffi::recv(h, buf, len, flags))
}

pub unsafe fn recvfrom(s: c_int, buf: *mut c_void, len: size_t, flags: c_int,
                       from: *mut sockaddr, fromlen: *mut socklen_t) -> ssize_t {
    wrap_socket_call(s, |h| ffi::recvfrom(h, buf, len, flags, from, fromlen))
}
