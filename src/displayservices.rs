//! DisplayServices.framework SPI, probed at startup.
//!
//! This is a private framework, but it is the only set side that works on
//! Apple Silicon and it is what the brightness keys go through. Every entry
//! point is optional.

use std::os::raw::{c_double, c_float, c_int};

use crate::chain::DisplayId;
use crate::weak::Framework;

const FRAMEWORK_PATH: &std::ffi::CStr =
    c"/System/Library/PrivateFrameworks/DisplayServices.framework/DisplayServices";

pub type SetBrightnessFn = unsafe extern "C" fn(DisplayId, c_float) -> c_int;
pub type GetBrightnessFn = unsafe extern "C" fn(DisplayId, *mut c_float) -> c_int;
pub type CanChangeBrightnessFn = unsafe extern "C" fn(DisplayId) -> bool;
pub type BrightnessChangedFn = unsafe extern "C" fn(DisplayId, c_double);

pub struct DisplayServices {
    pub set: Option<SetBrightnessFn>,
    pub get: Option<GetBrightnessFn>,
    pub can_change: Option<CanChangeBrightnessFn>,
    pub changed: Option<BrightnessChangedFn>,
}

impl DisplayServices {
    pub fn load() -> Self {
        let Some(framework) = Framework::open(FRAMEWORK_PATH) else {
            return DisplayServices {
                set: None,
                get: None,
                can_change: None,
                changed: None,
            };
        };
        unsafe {
            DisplayServices {
                set: framework.symbol(c"DisplayServicesSetBrightness"),
                get: framework.symbol(c"DisplayServicesGetBrightness"),
                can_change: framework.symbol(c"DisplayServicesCanChangeBrightness"),
                changed: framework.symbol(c"DisplayServicesBrightnessChanged"),
            }
        }
    }
}
