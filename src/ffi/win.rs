#![allow(non_camel_case_types)]

use errno::{set_errno, Errno};
use libc;
use std::fmt;
use std::io;
use std::mem;
use std::ptr;
use std::sync::Mutex;

pub use libc::{c_char, c_int, c_short, c_ulong, c_void, size_t, ssize_t};

pub use winapi::shared::guiddef::GUID;
pub use winapi::shared::inaddr::in_addr;
pub use winapi::shared::minwindef::DWORD;
pub use winapi::shared::ws2def::{ADDRESS_FAMILY, AF_INET, AF_INET6, AF_UNSPEC, IPPROTO_TCP,
                                 SOCKADDR as sockaddr, SOCKADDR_IN as sockaddr_in, SOCK_DGRAM,
                                 SOCK_STREAM, SOL_SOCKET, SO_ERROR, SO_RCVBUF, SO_REUSEADDR,
                                 SO_SNDBUF, TCP_NODELAY, WSABUF, WSAMSG};
pub use winapi::um::winsock2::{self, INVALID_SOCKET, SOCKET as RawFd, WSAGetLastError,
                               WSASetLastError, SD_BOTH, SD_RECEIVE, SD_SEND};
pub use winapi::um::ws2tcpip::socklen_t;

pub const SHUT_RD: c_int = SD_RECEIVE;
pub const SHUT_WR: c_int = SD_SEND;
pub const SHUT_RDWR: c_int = SD_BOTH;

pub type in_addr_t = u32;
pub type nfds_t = c_ulong;

pub const INADDR_ANY: in_addr_t = 0x0000_0000;
pub const INADDR_LOOPBACK: in_addr_t = 0x7f00_0001;
pub const INADDR_NONE: in_addr_t = 0xffff_ffff;

pub const POLLERR: c_short = 0x0001;
pub const POLLHUP: c_short = 0x0002;
pub const POLLNVAL: c_short = 0x0004;
pub const POLLIN: c_short = 0x0100 | 0x0200;
pub const POLLOUT: c_short = 0x0010;

/// Native poll record. Callers place an integer descriptor in `fd`; the
/// poll wrapper rewrites it to the native handle in place.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct pollfd {
    pub fd: RawFd,
    pub events: c_short,
    pub revents: c_short,
}

/// Scatter/gather segment, POSIX layout.
#[repr(C)]
pub struct iovec {
    pub iov_base: *mut c_void,
    pub iov_len: size_t,
}

/// POSIX message header. The native stack has no equivalent; the
/// scatter/gather wrappers repack it into a `WSAMSG`.
#[repr(C)]
pub struct msghdr {
    pub msg_name: *mut c_void,
    pub msg_namelen: socklen_t,
    pub msg_iov: *mut iovec,
    pub msg_iovlen: size_t,
    pub msg_control: *mut c_void,
    pub msg_controllen: size_t,
    pub msg_flags: c_int,
}

// Not statically importable across winapi revisions; the exports are
// stable in ws2_32 itself.
#[link(name = "ws2_32")]
extern "system" {
    fn WSAPoll(fds: *mut pollfd, nfds: nfds_t, timeout: c_int) -> c_int;
    fn WSASendMsg(s: RawFd, msg: *mut WSAMSG, flags: DWORD, sent: *mut DWORD,
                  overlapped: *mut c_void, completion: *mut c_void) -> c_int;
    fn WSAIoctl(s: RawFd, code: DWORD, in_buf: *mut c_void, in_len: DWORD, out_buf: *mut c_void,
                out_len: DWORD, returned: *mut DWORD, overlapped: *mut c_void,
                completion: *mut c_void) -> c_int;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SystemError(c_int);

impl SystemError {
    pub fn last_error() -> Self {
        SystemError(unsafe { WSAGetLastError() })
    }
}

impl Default for SystemError {
    fn default() -> Self {
        SystemError(0)
    }
}

impl fmt::Display for SystemError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use winapi::um::winbase::{FormatMessageW, FORMAT_MESSAGE_IGNORE_INSERTS};
        use winapi::um::winnt::WCHAR;

        let mut buf = [0 as WCHAR; 2048];
        match unsafe {
            FormatMessageW(FORMAT_MESSAGE_IGNORE_INSERTS,
                           ptr::null_mut(),
                           self.0 as DWORD,
                           0x0800,
                           buf.as_mut_ptr(),
                           buf.len() as DWORD,
                           ptr::null_mut())
        } {
            0 => write!(f, "invalid error code: {}", self.0),
            len => write!(f, "{}", String::from_utf16_lossy(&buf[..len as usize])),
        }
    }
}

impl From<SystemError> for io::Error {
    fn from(err: SystemError) -> Self {
        io::Error::from_raw_os_error(err.0)
    }
}

/// Address family not supported by protocol.
pub const ADDRESS_FAMILY_NOT_SUPPORTED: SystemError = SystemError(winsock2::WSAEAFNOSUPPORT);

/// A connection has been aborted.
pub const CONNECTION_ABORTED: SystemError = SystemError(winsock2::WSAECONNABORTED);

/// Invalid argument.
pub const INVALID_ARGUMENT: SystemError = SystemError(winsock2::WSAEINVAL);

/// Protocol not available.
pub const NO_PROTOCOL_OPTION: SystemError = SystemError(winsock2::WSAENOPROTOOPT);

/// Operation not supported.
pub const OPERATION_NOT_SUPPORTED: SystemError = SystemError(winsock2::WSAEOPNOTSUPP);

/// The socket is marked non-blocking and the requested operation would block.
pub const WOULD_BLOCK: SystemError = SystemError(winsock2::WSAEWOULDBLOCK);

/// Seeds both the native last-error slot and the ambient `errno` channel.
pub fn set_last_error(err: SystemError) {
    unsafe { WSASetLastError(err.0) };
    set_errno(Errno(err.0));
}

/// Copies the native last-error code into the ambient `errno` channel.
/// Runs after every native call, success included; callers see the exact
/// error-reporting discipline they would on a POSIX stack.
pub fn republish_last_error() {
    set_errno(Errno(unsafe { WSAGetLastError() }));
}

/// Resolves a descriptor to the native socket handle underneath it, via
/// the host CRT descriptor table. An unopened descriptor yields
/// `INVALID_SOCKET`; ownership stays with the descriptor.
pub unsafe fn fd_to_socket(fd: c_int) -> RawFd {
    libc::get_osfhandle(fd) as RawFd
}

/// Mints a read-write, binary-mode descriptor over a native handle.
/// Returns `-1` for the invalid handle or when the descriptor table is
/// exhausted; the CRT would otherwise happily wrap the sentinel.
pub unsafe fn socket_to_fd(s: RawFd) -> c_int {
    if s == INVALID_SOCKET {
        return -1;
    }
    libc::open_osfhandle(s as libc::intptr_t, libc::O_RDWR | libc::O_BINARY)
}

pub unsafe fn socket(af: c_int, ty: c_int, protocol: c_int) -> RawFd {
    winsock2::socket(af, ty, protocol)
}

pub unsafe fn accept(s: RawFd, addr: *mut sockaddr, addrlen: *mut socklen_t) -> RawFd {
    winsock2::accept(s, addr, addrlen)
}

pub unsafe fn bind(s: RawFd, name: *const sockaddr, namelen: socklen_t) -> c_int {
    winsock2::bind(s, name, namelen)
}

pub unsafe fn connect(s: RawFd, name: *const sockaddr, namelen: socklen_t) -> c_int {
    winsock2::connect(s, name, namelen)
}

pub unsafe fn listen(s: RawFd, backlog: c_int) -> c_int {
    winsock2::listen(s, backlog)
}

pub unsafe fn shutdown(s: RawFd, how: c_int) -> c_int {
    winsock2::shutdown(s, how)
}

pub unsafe fn getsockname(s: RawFd, name: *mut sockaddr, namelen: *mut socklen_t) -> c_int {
    winsock2::getsockname(s, name, namelen)
}

pub unsafe fn getpeername(s: RawFd, name: *mut sockaddr, namelen: *mut socklen_t) -> c_int {
    winsock2::getpeername(s, name, namelen)
}

pub unsafe fn getsockopt(s: RawFd, level: c_int, optname: c_int, optval: *mut c_void,
                         optlen: *mut socklen_t) -> c_int {
    winsock2::getsockopt(s, level, optname, optval as *mut c_char, optlen)
}

pub unsafe fn setsockopt(s: RawFd, level: c_int, optname: c_int, optval: *const c_void,
                         optlen: socklen_t) -> c_int {
    winsock2::setsockopt(s, level, optname, optval as *const c_char, optlen)
}

pub unsafe fn send(s: RawFd, buf: *const c_void, len: size_t, flags: c_int) -> ssize_t {
    winsock2::send(s, buf as *const c_char, len as c_int, flags) as ssize_t
}

pub unsafe fn sendto(s: RawFd, buf: *const c_void, len: size_t, flags: c_int,
                     to: *const sockaddr, tolen: socklen_t) -> ssize_t {
    winsock2::sendto(s, buf as *const c_char, len as c_int, flags, to, tolen) as ssize_t
}

pub unsafe fn recv(s: RawFd, buf: *mut c_void, len: size_t, flags: c_int) -> ssize_t {
    winsock2::recv(s, buf as *mut c_char, len as c_int, flags) as ssize_t
}

pub unsafe fn recvfrom(s: RawFd, buf: *mut c_void, len: size_t, flags: c_int,
                       from: *mut sockaddr, fromlen: *mut socklen_t) -> ssize_t {
    winsock2::recvfrom(s, buf as *mut c_char, len as c_int, flags, from, fromlen) as ssize_t
}

/// Repacks the iovec array into a `WSAMSG` and sends in one shot. The
/// buffer-descriptor array is a per-call allocation and is released on
/// every exit path. Name fields are always zeroed; callers were filtered
/// one layer up.
pub unsafe fn sendmsg(s: RawFd, message: *const msghdr, _flags: c_int) -> ssize_t {
    let message = &*message;
    let mut bufs = wsabufs(message.msg_iov, message.msg_iovlen);
    let mut msg = WSAMSG {
        name: ptr::null_mut(),
        namelen: 0,
        lpBuffers: bufs.as_mut_ptr(),
        dwBufferCount: bufs.len() as DWORD,
        Control: WSABUF {
            len: message.msg_controllen as u32,
            buf: message.msg_control as *mut c_char,
        },
        dwFlags: 0,
    };

    let mut sent: DWORD = 0;
    match WSASendMsg(s, &mut msg, 0, &mut sent, ptr::null_mut(), ptr::null_mut()) {
        0 => sent as ssize_t,
        _ => -1,
    }
}

/// Receive counterpart of [`sendmsg`], through the dynamically resolved
/// one-shot extension entry point.
pub unsafe fn recvmsg(s: RawFd, message: *mut msghdr, _flags: c_int) -> ssize_t {
    let recv_fn = match recvmsg_extension(s) {
        Some(f) => f,
        None => return -1,
    };

    let message = &mut *message;
    let mut bufs = wsabufs(message.msg_iov, message.msg_iovlen);
    let mut msg = WSAMSG {
        name: ptr::null_mut(),
        namelen: 0,
        lpBuffers: bufs.as_mut_ptr(),
        dwBufferCount: bufs.len() as DWORD,
        Control: WSABUF {
            len: message.msg_controllen as u32,
            buf: message.msg_control as *mut c_char,
        },
        dwFlags: 0,
    };

    let mut received: DWORD = 0;
    match recv_fn(s, &mut msg, &mut received, ptr::null_mut(), ptr::null_mut()) {
        0 => received as ssize_t,
        _ => -1,
    }
}

unsafe fn wsabufs(iov: *mut iovec, iovlen: size_t) -> Vec<WSABUF> {
    (0..iovlen)
        .map(|i| {
            let seg = &*iov.add(i);
            WSABUF {
                len: seg.iov_len as u32,
                buf: seg.iov_base as *mut c_char,
            }
        })
        .collect()
}

type WsaRecvMsgFn = unsafe extern "system" fn(RawFd, *mut WSAMSG, *mut DWORD, *mut c_void,
                                              *mut c_void) -> c_int;

const SIO_GET_EXTENSION_FUNCTION_POINTER: DWORD = 0xC800_0006;

const WSAID_WSARECVMSG: GUID = GUID {
    Data1: 0xf689d7c8,
    Data2: 0x6f1f,
    Data3: 0x436b,
    Data4: [0x8a, 0x53, 0xe5, 0x4f, 0xe3, 0x51, 0xc3, 0x22],
};

lazy_static! {
    static ref RECVMSG_EXT: Mutex<Option<WsaRecvMsgFn>> = Mutex::new(None);
}

// The extension entry point is not exported from ws2_32; it has to be
// queried through the socket-options channel. One query per process.
unsafe fn recvmsg_extension(s: RawFd) -> Option<WsaRecvMsgFn> {
    let mut cached = RECVMSG_EXT.lock().unwrap();
    if cached.is_none() {
        let mut guid = WSAID_WSARECVMSG;
        let mut func: *mut c_void = ptr::null_mut();
        let mut returned: DWORD = 0;
        let rc = WSAIoctl(s,
                          SIO_GET_EXTENSION_FUNCTION_POINTER,
                          &mut guid as *mut _ as *mut c_void,
                          mem::size_of::<GUID>() as DWORD,
                          &mut func as *mut _ as *mut c_void,
                          mem::size_of::<*mut c_void>() as DWORD,
                          &mut returned,
                          ptr::null_mut(),
                          ptr::null_mut());
        if rc == 0 && !func.is_null() {
            *cached = Some(mem::transmute(func));
        }
    }
    *cached
}

pub unsafe fn poll(fds: *mut pollfd, nfds: nfds_t, timeout: c_int) -> c_int {
    WSAPoll(fds, nfds, timeout)
}

/// Closes a native socket handle. A failed close is ignored, which also
/// swallows the deliberate double-close of `INVALID_SOCKET` on unwind
/// paths.
pub unsafe fn close(s: RawFd) {
    winsock2::closesocket(s);
}

/// Closes a minted descriptor through the host descriptor table; the
/// underlying handle goes with it.
pub unsafe fn close_fd(fd: c_int) {
    libc::close(fd);
}

pub unsafe fn inet_addr(cp: *const c_char) -> in_addr_t {
    winsock2::inet_addr(cp) as in_addr_t
}

pub unsafe fn inet_ntop(af: c_int, src: *const c_void, dst: *mut c_char,
                        size: socklen_t) -> *const c_char {
    #[link(name = "ws2_32")]
    extern "system" {
        #[link_name = "inet_ntop"]
        fn native_inet_ntop(af: c_int, src: *const c_void, dst: *mut c_char,
                            size: size_t) -> *const c_char;
    }
    native_inet_ntop(af, src, dst, size as size_t)
}

/// Stores a raw network-byte-order IPv4 address through an out-pointer.
pub unsafe fn store_in_addr(inp: *mut in_addr, raw: in_addr_t) {
    *(*inp).S_un.S_addr_mut() = raw;
}

/// Winsock 2.2 handshake; this process counts as the single top-level
/// user of the subsystem.
pub fn startup() {
    let mut wsa: winsock2::WSADATA = unsafe { mem::zeroed() };
    unsafe { winsock2::WSAStartup(0x0202, &mut wsa) };
}

pub fn cleanup() {
    unsafe { winsock2::WSACleanup() };
}

pub fn sockaddr_in_any() -> sockaddr_in {
    let mut sin: sockaddr_in = unsafe { mem::zeroed() };
    sin.sin_family = AF_INET as ADDRESS_FAMILY;
    sin.sin_port = 0;
    unsafe { *sin.sin_addr.S_un.S_addr_mut() = INADDR_ANY.to_be() };
    sin
}

pub fn set_loopback(sin: &mut sockaddr_in) {
    unsafe { *sin.sin_addr.S_un.S_addr_mut() = INADDR_LOOPBACK.to_be() };
}
