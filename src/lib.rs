// sockport
//
// The software is released under the MIT license.

//! POSIX-style socket calls for platforms whose native sockets are opaque
//! handles rather than small integers.
//!
//! Every function takes and returns integer descriptors; the translation to
//! the native socket handle happens at each call boundary through the host
//! descriptor table. On POSIX targets descriptor and handle coincide and the
//! layer degenerates to a direct delegation, which keeps the whole surface
//! buildable and testable everywhere.
//!
//! The hosting program must keep a [`NetInit`] guard alive for as long as it
//! uses any of these calls.

#[macro_use]
extern crate lazy_static;
extern crate errno;
extern crate libc;
extern crate winapi;

mod ffi;
pub use ffi::{fd_to_socket, socket_to_fd, RawFd, SystemError};
pub use ffi::{in_addr, in_addr_t, iovec, msghdr, nfds_t, pollfd, sockaddr, sockaddr_in, socklen_t};
pub use ffi::{AF_INET, AF_INET6, AF_UNSPEC, INVALID_SOCKET, SOCK_DGRAM, SOCK_STREAM};
pub use ffi::{INADDR_ANY, INADDR_LOOPBACK, INADDR_NONE};
pub use ffi::{IPPROTO_TCP, SOL_SOCKET, SO_ERROR, SO_RCVBUF, SO_REUSEADDR, SO_SNDBUF, TCP_NODELAY};
pub use ffi::{POLLERR, POLLHUP, POLLIN, POLLNVAL, POLLOUT};
pub use ffi::{SHUT_RD, SHUT_RDWR, SHUT_WR};
pub use ffi::{ADDRESS_FAMILY_NOT_SUPPORTED, CONNECTION_ABORTED, INVALID_ARGUMENT,
              NO_PROTOCOL_OPTION, OPERATION_NOT_SUPPORTED, WOULD_BLOCK};

mod init;
pub use init::NetInit;

mod sock_ops;
pub use sock_ops::{accept, bind, connect, getpeername, getsockname, getsockopt, listen, recv,
                   recvfrom, send, sendto, setsockopt, shutdown, socket};

mod msg_ops;
pub use msg_ops::{recvmsg, sendmsg};

mod poll_ops;
pub use poll_ops::poll;

mod pair_ops;
pub use pair_ops::socketpair;

mod addr_ops;
pub use addr_ops::{inet_aton, inet_ntop};
