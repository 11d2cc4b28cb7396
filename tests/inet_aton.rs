extern crate libc;
extern crate sockport;

use libc::{c_char, c_void};
use sockport::*;
use std::ffi::{CStr, CString};
use std::mem;

#[test]
fn main() {
    let _net = NetInit::registry();

    let loopback = CString::new("127.0.0.1").unwrap();
    let mut addr: in_addr = unsafe { mem::zeroed() };
    assert_eq!(unsafe { inet_aton(loopback.as_ptr(), &mut addr) }, 1);
    #[cfg(unix)]
    assert_eq!(addr.s_addr, 0x7f00_0001u32.to_be());

    // and back out through the native formatter
    let mut buf = [0 as c_char; 32];
    let p = unsafe {
        inet_ntop(AF_INET,
                  &addr as *const _ as *const c_void,
                  buf.as_mut_ptr(),
                  buf.len() as socklen_t)
    };
    assert!(!p.is_null());
    let text = unsafe { CStr::from_ptr(buf.as_ptr()) };
    assert_eq!(text.to_str().unwrap(), "127.0.0.1");

    // a failed parse reports 0 and leaves the out-address alone
    let bad = CString::new("not-an-address").unwrap();
    let mut addr: in_addr = unsafe { mem::zeroed() };
    #[cfg(unix)]
    {
        addr.s_addr = 0x0102_0304;
    }
    assert_eq!(unsafe { inet_aton(bad.as_ptr(), &mut addr) }, 0);
    #[cfg(unix)]
    assert_eq!(addr.s_addr, 0x0102_0304);

    // inherited parser quirk: the broadcast address is indistinguishable
    // from the failure sentinel
    let bcast = CString::new("255.255.255.255").unwrap();
    let mut addr: in_addr = unsafe { mem::zeroed() };
    assert_eq!(unsafe { inet_aton(bcast.as_ptr(), &mut addr) }, 0);
}
