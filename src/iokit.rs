//! IOKit side: resolving a display's `IODisplayConnect` service and the
//! public IODisplay float-parameter calls.
//!
//! `CGDisplayIOServicePort` has been deprecated since 10.9, so the service
//! is located by hand: walk the registry's `IODisplayConnect` services and
//! take the first whose vendor/product/serial triple matches the one
//! CoreGraphics reports for the display.

use std::os::raw::{c_char, c_float};

use core_foundation::base::TCFType;
use core_foundation::dictionary::{CFDictionary, CFDictionaryRef, CFMutableDictionaryRef};
use core_foundation::number::CFNumber;
use core_foundation::string::{CFString, CFStringRef};

use crate::chain::ServicePort;
use crate::matching::DisplayTriple;

pub type IoObject = u32;
pub type IoIterator = u32;
pub type IoReturn = i32;

const KERN_SUCCESS: i32 = 0;
// Zero asks for the default main port; spares us the kIOMainPortDefault vs
// kIOMasterPortDefault rename.
const MAIN_PORT_DEFAULT: libc::mach_port_t = 0;
// kIODisplayNoProductName: skip localized-name lookups we don't need.
const NO_PRODUCT_NAME: u32 = 0x0000_0400;

#[link(name = "IOKit", kind = "framework")]
unsafe extern "C" {
    fn IOServiceMatching(name: *const c_char) -> CFMutableDictionaryRef;
    fn IOServiceGetMatchingServices(
        main_port: libc::mach_port_t,
        matching: CFMutableDictionaryRef,
        existing: *mut IoIterator,
    ) -> i32;
    fn IOIteratorNext(iterator: IoIterator) -> IoObject;
    fn IOObjectRelease(object: IoObject) -> i32;
    fn IODisplayCreateInfoDictionary(framebuffer: IoObject, options: u32) -> CFDictionaryRef;
    fn IODisplaySetFloatParameter(
        service: IoObject,
        options: u32,
        parameter: CFStringRef,
        value: c_float,
    ) -> IoReturn;
    fn IODisplayGetFloatParameter(
        service: IoObject,
        options: u32,
        parameter: CFStringRef,
        value: *mut c_float,
    ) -> IoReturn;
}

/// kIODisplayBrightnessKey
fn brightness_key() -> CFString {
    CFString::from_static_string("brightness")
}

/// Find the `IODisplayConnect` service whose identifying triple matches.
///
/// Returns 0 when the registry query fails or nothing matches; callers must
/// tolerate a zero port. Non-matching services and the iterator are released
/// before returning; the matched service is handed to the caller, who
/// releases it with [`release`] when done.
pub fn service_port_for(triple: &DisplayTriple) -> ServicePort {
    let matching = unsafe { IOServiceMatching(c"IODisplayConnect".as_ptr()) };
    if matching.is_null() {
        return 0;
    }

    // IOServiceGetMatchingServices consumes the matching dictionary.
    let mut iter: IoIterator = 0;
    if unsafe { IOServiceGetMatchingServices(MAIN_PORT_DEFAULT, matching, &mut iter) }
        != KERN_SUCCESS
    {
        return 0;
    }

    let mut matched: ServicePort = 0;
    loop {
        let service = unsafe { IOIteratorNext(iter) };
        if service == 0 {
            break;
        }
        if service_matches(service, triple) {
            matched = service;
            break;
        }
        unsafe { IOObjectRelease(service) };
    }

    unsafe { IOObjectRelease(iter) };
    matched
}

fn service_matches(service: IoObject, triple: &DisplayTriple) -> bool {
    let info = unsafe { IODisplayCreateInfoDictionary(service, NO_PRODUCT_NAME) };
    if info.is_null() {
        return false;
    }
    // Create rule: the wrapper owns the dictionary and releases it on every
    // exit path.
    let info: CFDictionary<CFString, core_foundation::base::CFType> =
        unsafe { CFDictionary::wrap_under_create_rule(info) };

    triple.matches(
        dictionary_number(&info, "DisplayVendorID"),
        dictionary_number(&info, "DisplayProductID"),
        dictionary_number(&info, "DisplaySerialNumber"),
    )
}

fn dictionary_number(
    info: &CFDictionary<CFString, core_foundation::base::CFType>,
    key: &'static str,
) -> Option<i64> {
    info.find(CFString::from_static_string(key))
        .and_then(|value| value.downcast::<CFNumber>())
        .and_then(|number| number.to_i64())
}

pub fn release(object: IoObject) {
    if object != 0 {
        unsafe { IOObjectRelease(object) };
    }
}

/// `IODisplaySetFloatParameter` on the brightness key. Raw `IOReturn`, zero
/// on success.
pub fn set_brightness_parameter(service: ServicePort, value: f32) -> IoReturn {
    let key = brightness_key();
    unsafe { IODisplaySetFloatParameter(service, 0, key.as_concrete_TypeRef(), value) }
}

/// `IODisplayGetFloatParameter` on the brightness key.
pub fn brightness_parameter(service: ServicePort) -> Option<f32> {
    let key = brightness_key();
    let mut value: c_float = 0.0;
    let ret =
        unsafe { IODisplayGetFloatParameter(service, 0, key.as_concrete_TypeRef(), &mut value) };
    (ret == KERN_SUCCESS).then_some(value)
}
