use errno::{errno, set_errno, Errno};
use libc;
use std::fmt;
use std::io;
use std::mem;

pub use libc::{c_char, c_int, c_void, size_t, ssize_t};
pub use libc::{in_addr, in_addr_t, iovec, msghdr, nfds_t, pollfd, sa_family_t, sockaddr,
               sockaddr_in, socklen_t};
pub use libc::{AF_INET, AF_INET6, AF_UNSPEC, IPPROTO_TCP, SHUT_RD, SHUT_RDWR, SHUT_WR,
               SOCK_DGRAM, SOCK_STREAM, SOL_SOCKET, SO_ERROR, SO_RCVBUF, SO_REUSEADDR, SO_SNDBUF,
               TCP_NODELAY};
pub use libc::{POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLOUT};
pub use std::os::unix::io::RawFd;

/// Sentinel for a socket handle that does not refer to an open socket.
pub const INVALID_SOCKET: RawFd = -1;

pub const INADDR_ANY: in_addr_t = 0x0000_0000;
pub const INADDR_LOOPBACK: in_addr_t = 0x7f00_0001;
pub const INADDR_NONE: in_addr_t = 0xffff_ffff;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SystemError(Errno);

impl SystemError {
    pub fn last_error() -> Self {
        SystemError(errno())
    }
}

impl Default for SystemError {
    fn default() -> Self {
        SystemError(Errno(0))
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<SystemError> for io::Error {
    fn from(err: SystemError) -> Self {
        io::Error::from_raw_os_error((err.0).0)
    }
}

/// Address family not supported by protocol.
pub const ADDRESS_FAMILY_NOT_SUPPORTED: SystemError = SystemError(Errno(libc::EAFNOSUPPORT));

/// A connection has been aborted.
pub const CONNECTION_ABORTED: SystemError = SystemError(Errno(libc::ECONNABORTED));

/// Invalid argument.
pub const INVALID_ARGUMENT: SystemError = SystemError(Errno(libc::EINVAL));

/// Protocol not available.
pub const NO_PROTOCOL_OPTION: SystemError = SystemError(Errno(libc::ENOPROTOOPT));

/// Operation not supported.
pub const OPERATION_NOT_SUPPORTED: SystemError = SystemError(Errno(libc::EOPNOTSUPP));

/// The socket is marked non-blocking and the requested operation would block.
pub const WOULD_BLOCK: SystemError = SystemError(Errno(libc::EWOULDBLOCK));

/// Seeds the ambient error channel with `err`.
pub fn set_last_error(err: SystemError) {
    set_errno(err.0);
}

/// Copies the native last-error code into the ambient `errno` channel.
///
/// The native error channel here already is `errno`, so this is the
/// identity; it exists so callers of the uniform backend surface do not
/// branch per platform.
#[inline]
pub fn republish_last_error() {}

/// Resolves a descriptor to its native socket handle. Descriptor and
/// handle coincide on this backend; an unopened descriptor flows through
/// unchanged and fails at the native call, matching the handle-based
/// backend where the lookup yields `INVALID_SOCKET`.
pub unsafe fn fd_to_socket(fd: c_int) -> RawFd {
    fd
}

/// Mints a descriptor for a native socket handle. The identity here; the
/// invalid handle maps to the `-1` error sentinel either way.
pub unsafe fn socket_to_fd(s: RawFd) -> c_int {
    s
}

// Raw natives. Result conventions are the platform's own; the wrappers
// above this layer are responsible for error republishing.

pub unsafe fn socket(af: c_int, ty: c_int, protocol: c_int) -> RawFd {
    libc::socket(af, ty, protocol)
}

pub unsafe fn accept(s: RawFd, addr: *mut sockaddr, addrlen: *mut socklen_t) -> RawFd {
    libc::accept(s, addr, addrlen)
}

pub unsafe fn bind(s: RawFd, name: *const sockaddr, namelen: socklen_t) -> c_int {
    libc::bind(s, name, namelen)
}

pub unsafe fn connect(s: RawFd, name: *const sockaddr, namelen: socklen_t) -> c_int {
    libc::connect(s, name, namelen)
}

pub unsafe fn listen(s: RawFd, backlog: c_int) -> c_int {
    libc::listen(s, backlog)
}

pub unsafe fn shutdown(s: RawFd, how: c_int) -> c_int {
    libc::shutdown(s, how)
}

pub unsafe fn getsockname(s: RawFd, name: *mut sockaddr, namelen: *mut socklen_t) -> c_int {
    libc::getsockname(s, name, namelen)
}

pub unsafe fn getpeername(s: RawFd, name: *mut sockaddr, namelen: *mut socklen_t) -> c_int {
    libc::getpeername(s, name, namelen)
}

pub unsafe fn getsockopt(s: RawFd, level: c_int, optname: c_int, optval: *mut c_void,
                         optlen: *mut socklen_t) -> c_int {
    libc::getsockopt(s, level, optname, optval, optlen)
}

pub unsafe fn setsockopt(s: RawFd, level: c_int, optname: c_int, optval: *const c_void,
                         optlen: socklen_t) -> c_int {
    libc::setsockopt(s, level, optname, optval, optlen)
}

pub unsafe fn send(s: RawFd, buf: *const c_void, len: size_t, flags: c_int) -> ssize_t {
    libc::send(s, buf, len, flags)
}

pub unsafe fn sendto(s: RawFd, buf: *const c_void, len: size_t, flags: c_int,
                     to: *const sockaddr, tolen: socklen_t) -> ssize_t {
    libc::sendto(s, buf, len, flags, to, tolen)
}

pub unsafe fn recv(s: RawFd, buf: *mut c_void, len: size_t, flags: c_int) -> ssize_t {
    libc::recv(s, buf, len, flags)
}

pub unsafe fn recvfrom(s: RawFd, buf: *mut c_void, len: size_t, flags: c_int,
                       from: *mut sockaddr, fromlen: *mut socklen_t) -> ssize_t {
    libc::recvfrom(s, buf, len, flags, from, fromlen)
}

pub unsafe fn sendmsg(s: RawFd, message: *const msghdr, flags: c_int) -> ssize_t {
    libc::sendmsg(s, message, flags)
}

pub unsafe fn recvmsg(s: RawFd, message: *mut msghdr, flags: c_int) -> ssize_t {
    libc::recvmsg(s, message, flags)
}

pub unsafe fn poll(fds: *mut pollfd, nfds: nfds_t, timeout: c_int) -> c_int {
    libc::poll(fds, nfds, timeout)
}

/// Closes a native socket handle. A failed close is ignored, which also
/// swallows the deliberate double-close of `INVALID_SOCKET` on unwind
/// paths.
pub unsafe fn close(s: RawFd) {
    libc::close(s);
}

/// Closes a minted descriptor through the host descriptor table.
pub unsafe fn close_fd(fd: c_int) {
    libc::close(fd);
}

pub unsafe fn inet_addr(cp: *const c_char) -> in_addr_t {
    extern "C" {
        #[link_name = "inet_addr"]
        fn native_inet_addr(cp: *const c_char) -> in_addr_t;
    }
    native_inet_addr(cp)
}

pub unsafe fn inet_ntop(af: c_int, src: *const c_void, dst: *mut c_char,
                        size: socklen_t) -> *const c_char {
    extern "C" {
        #[link_name = "inet_ntop"]
        fn native_inet_ntop(af: c_int, src: *const c_void, dst: *mut c_char,
                            size: socklen_t) -> *const c_char;
    }
    native_inet_ntop(af, src, dst, size)
}

/// Stores a raw network-byte-order IPv4 address through an out-pointer.
pub unsafe fn store_in_addr(inp: *mut in_addr, raw: in_addr_t) {
    (*inp).s_addr = raw;
}

/// No process-wide bring-up is needed on this backend.
pub fn startup() {}

pub fn cleanup() {}

pub fn sockaddr_in_any() -> sockaddr_in {
    let mut sin: sockaddr_in = unsafe { mem::zeroed() };
    sin.sin_family = AF_INET as sa_family_t;
    sin.sin_port = 0;
    sin.sin_addr.s_addr = INADDR_ANY.to_be();
    sin
}

pub fn set_loopback(sin: &mut sockaddr_in) {
    sin.sin_addr.s_addr = INADDR_LOOPBACK.to_be();
}

#[test]
fn test_translation_identity() {
    let fd = 5;
    unsafe {
        assert_eq!(socket_to_fd(fd_to_socket(fd)), fd);
        assert_eq!(fd_to_socket(-1), INVALID_SOCKET);
    }
}

#[test]
fn test_sockaddr_in_any() {
    let sin = sockaddr_in_any();
    assert_eq!(sin.sin_family, AF_INET as sa_family_t);
    assert_eq!(sin.sin_port, 0);
    assert_eq!(sin.sin_addr.s_addr, 0);
}
