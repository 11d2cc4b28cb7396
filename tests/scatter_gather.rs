extern crate libc;
extern crate sockport;

use libc::{c_int, c_void};
use sockport::*;
use std::mem;

unsafe fn stream_pair() -> [c_int; 2] {
    let mut sv: [c_int; 2] = [-1; 2];
    assert_eq!(socketpair(AF_INET, SOCK_STREAM, 0, sv.as_mut_ptr()), 0);
    sv
}

#[test]
fn test_gather_send_scatter_recv() {
    let _net = NetInit::registry();
    let sv = unsafe { stream_pair() };

    let head = b"hello ";
    let tail = b"world";
    let mut iov = [iovec {
                       iov_base: head.as_ptr() as *mut c_void,
                       iov_len: head.len() as _,
                   },
                   iovec {
                       iov_base: tail.as_ptr() as *mut c_void,
                       iov_len: tail.len() as _,
                   }];
    let mut msg: msghdr = unsafe { mem::zeroed() };
    msg.msg_iov = iov.as_mut_ptr();
    msg.msg_iovlen = 2;
    assert_eq!(unsafe { sendmsg(sv[0], &msg, 0) }, 11);

    let mut a = [0u8; 6];
    let mut b = [0u8; 5];
    let mut iov = [iovec {
                       iov_base: a.as_mut_ptr() as *mut c_void,
                       iov_len: a.len() as _,
                   },
                   iovec {
                       iov_base: b.as_mut_ptr() as *mut c_void,
                       iov_len: b.len() as _,
                   }];
    let mut msg: msghdr = unsafe { mem::zeroed() };
    msg.msg_iov = iov.as_mut_ptr();
    msg.msg_iovlen = 2;
    assert_eq!(unsafe { recvmsg(sv[1], &mut msg, 0) }, 11);
    assert_eq!(&a, b"hello ");
    assert_eq!(&b, b"world");

    unsafe {
        libc::close(sv[0]);
        libc::close(sv[1]);
    }
}

#[test]
fn test_peer_address_buffer_rejected() {
    let _net = NetInit::registry();
    let sv = unsafe { stream_pair() };

    let payload = b"x";
    let mut iov = [iovec {
                       iov_base: payload.as_ptr() as *mut c_void,
                       iov_len: payload.len() as _,
                   }];
    let mut name: sockaddr_in = unsafe { mem::zeroed() };
    let mut msg: msghdr = unsafe { mem::zeroed() };
    msg.msg_name = &mut name as *mut _ as *mut c_void;
    msg.msg_namelen = mem::size_of::<sockaddr_in>() as _;
    msg.msg_iov = iov.as_mut_ptr();
    msg.msg_iovlen = 1;

    assert_eq!(unsafe { sendmsg(sv[0], &msg, 0) }, -1);
    assert_eq!(SystemError::last_error(), OPERATION_NOT_SUPPORTED);

    // nothing went out above: the next clean send is all the peer sees
    assert_eq!(unsafe { send(sv[0], b"ok".as_ptr() as *const c_void, 2, 0) }, 2);

    let mut buf = [0u8; 8];
    let mut iov = [iovec {
                       iov_base: buf.as_mut_ptr() as *mut c_void,
                       iov_len: buf.len() as _,
                   }];
    let mut msg: msghdr = unsafe { mem::zeroed() };
    msg.msg_name = &mut name as *mut _ as *mut c_void;
    msg.msg_namelen = mem::size_of::<sockaddr_in>() as _;
    msg.msg_iov = iov.as_mut_ptr();
    msg.msg_iovlen = 1;
    assert_eq!(unsafe { recvmsg(sv[1], &mut msg, 0) }, -1);
    assert_eq!(SystemError::last_error(), OPERATION_NOT_SUPPORTED);

    // the rejected receive consumed nothing
    assert_eq!(unsafe { recv(sv[1], buf.as_mut_ptr() as *mut c_void, buf.len(), 0) }, 2);
    assert_eq!(&buf[..2], b"ok");

    unsafe {
        libc::close(sv[0]);
        libc::close(sv[1]);
    }
}
