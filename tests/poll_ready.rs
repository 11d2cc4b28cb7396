extern crate libc;
extern crate sockport;

use libc::{c_int, c_void};
use sockport::*;

#[test]
fn main() {
    let _net = NetInit::registry();

    let mut sv: [c_int; 2] = [-1; 2];
    assert_eq!(unsafe { socketpair(AF_INET, SOCK_STREAM, 0, sv.as_mut_ptr()) }, 0);

    // nothing readable yet; a zero timeout must come back at once
    let mut fds = [pollfd {
        fd: sv[1] as _,
        events: POLLIN,
        revents: 0,
    }];
    assert_eq!(unsafe { poll(fds.as_mut_ptr(), 1, 0) }, 0);

    // the send side has buffer space from the start
    let mut fds = [pollfd {
        fd: sv[0] as _,
        events: POLLOUT,
        revents: 0,
    }];
    assert_eq!(unsafe { poll(fds.as_mut_ptr(), 1, 0) }, 1);
    assert!(fds[0].revents & POLLOUT != 0);

    assert_eq!(unsafe { send(sv[0], b"ping".as_ptr() as *const c_void, 4, 0) }, 4);

    // only the entry with pending data reports; the array is rebuilt
    // because poll rewrites the fd fields in place
    let mut fds = [pollfd {
                       fd: sv[0] as _,
                       events: POLLIN,
                       revents: 0,
                   },
                   pollfd {
                       fd: sv[1] as _,
                       events: POLLIN,
                       revents: 0,
                   }];
    assert_eq!(unsafe { poll(fds.as_mut_ptr(), 2, 1000) }, 1);
    assert_eq!(fds[0].revents, 0);
    assert!(fds[1].revents & POLLIN != 0);

    let mut buf = [0u8; 8];
    assert_eq!(unsafe { recv(sv[1], buf.as_mut_ptr() as *mut c_void, buf.len(), 0) }, 4);

    unsafe {
        libc::close(sv[0]);
        libc::close(sv[1]);
    }
}
