use ffi::{cleanup, startup};

use std::sync::Mutex;

/// Process-lifetime guard over the native networking subsystem.
///
/// The first live guard brings the subsystem up (the Winsock 2.2
/// handshake on handle-based stacks, a no-op elsewhere); dropping the
/// last one tears it down. The hosting program holds one for as long as
/// it issues socket calls. Guards are cheap and the count is shared, so
/// nested users may take their own.
#[derive(Debug)]
pub struct NetInit;

impl Drop for NetInit {
    fn drop(&mut self) {
        let mut i = REGISTRY_COUNT.lock().unwrap();
        *i -= 1;
        if *i == 0 {
            cleanup();
        }
    }
}

impl NetInit {
    pub fn registry() -> Self {
        let mut i = REGISTRY_COUNT.lock().unwrap();
        *i += 1;
        if *i == 1 {
            startup();
        }
        NetInit
    }
}

lazy_static! {
    static ref REGISTRY_COUNT: Mutex<usize> = Default::default();
}

#[test]
fn test_registry_refcount() {
    let outer = NetInit::registry();
    {
        let _inner = NetInit::registry();
        assert_eq!(*REGISTRY_COUNT.lock().unwrap(), 2);
    }
    assert_eq!(*REGISTRY_COUNT.lock().unwrap(), 1);
    drop(outer);
    assert_eq!(*REGISTRY_COUNT.lock().unwrap(), 0);
}
