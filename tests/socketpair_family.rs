extern crate libc;
extern crate sockport;

use libc::c_int;
use sockport::*;

#[test]
fn test_rejects_non_ipv4_family() {
    let _net = NetInit::registry();

    let mut sv: [c_int; 2] = [-1; 2];
    let rc = unsafe { socketpair(AF_INET6, SOCK_STREAM, 0, sv.as_mut_ptr()) };
    assert_eq!(rc, -1);
    assert_eq!(SystemError::last_error(), NO_PROTOCOL_OPTION);
    assert_eq!(sv, [-1, -1]);

    let rc = unsafe { socketpair(AF_UNSPEC, SOCK_STREAM, 0, sv.as_mut_ptr()) };
    assert_eq!(rc, -1);
    assert_eq!(SystemError::last_error(), NO_PROTOCOL_OPTION);
    assert_eq!(sv, [-1, -1]);
}

// The host hands out the lowest free descriptor, so a leaked handle in
// a failing call would shift the next allocation.
#[cfg(unix)]
#[test]
fn test_failing_calls_leak_nothing() {
    let _net = NetInit::registry();

    let probe = unsafe { socket(AF_INET, SOCK_STREAM, 0) };
    assert!(probe >= 0);
    unsafe { libc::close(probe) };

    let mut sv: [c_int; 2] = [-1; 2];
    for _ in 0..100 {
        assert_eq!(unsafe { socketpair(AF_INET6, SOCK_STREAM, 0, sv.as_mut_ptr()) }, -1);
    }

    let probe2 = unsafe { socket(AF_INET, SOCK_STREAM, 0) };
    assert_eq!(probe2, probe);
    unsafe { libc::close(probe2) };
}
