//! Connected-pair emulation over IPv4 loopback.
//!
//! The native stack has no pairwise socket creation, so a pair is built
//! the classic way: listen on an ephemeral loopback port, connect a
//! second socket to it, accept, and drop the listener. Only `AF_INET`
//! is accepted; any other family fails up front with
//! `NO_PROTOCOL_OPTION` and creates nothing.
//!
//! Known limitation: between `listen` and the deliberate `connect`,
//! an unrelated process could connect to the same ephemeral port first.
//! The window is negligible in practice and is inherited as-is rather
//! than papered over with a handshake the interface never promised.

use ffi;
use ffi::{sockaddr, sockaddr_in, socklen_t, RawFd, SystemError, AF_INET, INVALID_SOCKET};
use libc::c_int;
use std::mem;

/// Fills `sv[0..2]` with two connected stream descriptors. Returns `0`
/// on success; on any failure every handle created along the way is
/// closed, `-1` is returned and the error channel reads
/// `CONNECTION_ABORTED`.
pub unsafe fn socketpair(domain: c_int, ty: c_int, protocol: c_int, sv: *mut c_int) -> c_int {
    if domain != AF_INET {
        ffi::set_last_error(ffi::NO_PROTOCOL_OPTION);
        return -1;
    }

    let mut sock = [INVALID_SOCKET; 2];
    let mut redirect = INVALID_SOCKET;
    if loopback_pair(domain, ty, protocol, &mut sock, &mut redirect).is_err() {
        ffi::close(redirect);
        ffi::close(sock[0]);
        ffi::close(sock[1]);
        ffi::set_last_error(ffi::CONNECTION_ABORTED);
        return -1;
    }

    let fd0 = ffi::socket_to_fd(sock[0]);
    let fd1 = ffi::socket_to_fd(sock[1]);
    if fd0 == -1 || fd1 == -1 {
        // A minted descriptor owns its handle; close whichever form we
        // ended up holding.
        if fd0 == -1 { ffi::close(sock[0]) } else { ffi::close_fd(fd0) }
        if fd1 == -1 { ffi::close(sock[1]) } else { ffi::close_fd(fd1) }
        ffi::set_last_error(ffi::CONNECTION_ABORTED);
        return -1;
    }

    *sv = fd0;
    *sv.offset(1) = fd1;
    ffi::republish_last_error();
    0
}

unsafe fn loopback_pair(domain: c_int, ty: c_int, protocol: c_int, sock: &mut [RawFd; 2],
                        redirect: &mut RawFd) -> Result<(), SystemError> {
    let mut address = ffi::sockaddr_in_any();
    let mut size = mem::size_of::<sockaddr_in>() as socklen_t;

    sock[0] = ffi::socket(domain, ty, protocol);
    if sock[0] == INVALID_SOCKET {
        return Err(SystemError::last_error());
    }
    if ffi::bind(sock[0], &address as *const _ as *const sockaddr, size) != 0 {
        return Err(SystemError::last_error());
    }
    if ffi::getsockname(sock[0], &mut address as *mut _ as *mut sockaddr, &mut size) != 0 {
        return Err(SystemError::last_error());
    }
    if ffi::listen(sock[0], 2) != 0 {
        return Err(SystemError::last_error());
    }

    sock[1] = ffi::socket(domain, ty, protocol);
    if sock[1] == INVALID_SOCKET {
        return Err(SystemError::last_error());
    }
    ffi::set_loopback(&mut address);
    if ffi::connect(sock[1],
                    &address as *const _ as *const sockaddr,
                    mem::size_of::<sockaddr_in>() as socklen_t) != 0 {
        return Err(SystemError::last_error());
    }

    *redirect = ffi::accept(sock[0], &mut address as *mut _ as *mut sockaddr, &mut size);
    if *redirect == INVALID_SOCKET {
        return Err(SystemError::last_error());
    }

    // The listener has served its purpose; the accepted side replaces it
    // as the first member of the pair.
    ffi::close(sock[0]);
    sock[0] = *redirect;
    *redirect = INVALID_SOCKET;
    Ok(())
}
