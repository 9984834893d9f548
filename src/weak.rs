//! Runtime symbol probing for OS-version-dependent entry points.
//!
//! The brightness SPIs live in frameworks that are not present, or not
//! complete, on every macOS release. Probing with `dlopen`/`dlsym` once at
//! startup makes a missing entry point an ordinary `None` instead of a load
//! failure.

use std::ffi::CStr;
use std::os::raw::c_void;

pub struct Framework {
    handle: *mut c_void,
}

impl Framework {
    /// Open a framework binary. `None` when the framework does not exist on
    /// this system. The handle is never closed; it lives as long as the
    /// process, as do any function pointers resolved from it.
    pub fn open(path: &CStr) -> Option<Self> {
        let handle = unsafe { libc::dlopen(path.as_ptr(), libc::RTLD_LAZY) };
        if handle.is_null() {
            None
        } else {
            Some(Framework { handle })
        }
    }

    /// Resolve one symbol as a function pointer of type `T`.
    ///
    /// # Safety
    /// The caller asserts that `T` is a function pointer type matching the
    /// symbol's actual C signature.
    pub unsafe fn symbol<T: Copy>(&self, name: &CStr) -> Option<T> {
        let sym = unsafe { libc::dlsym(self.handle, name.as_ptr()) };
        if sym.is_null() {
            None
        } else {
            Some(unsafe { std::mem::transmute_copy(&sym) })
        }
    }
}
