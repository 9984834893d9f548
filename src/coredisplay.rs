//! CoreDisplay.framework user-brightness SPI, probed at startup.
//!
//! The symbols are listed in the framework's .tbd but carry no public
//! headers. They adjust the same "user" brightness as the System Settings
//! slider, which is what keeps Night Shift from overriding the value.

use std::os::raw::c_double;

use crate::chain::DisplayId;
use crate::weak::Framework;

const FRAMEWORK_PATH: &std::ffi::CStr =
    c"/System/Library/Frameworks/CoreDisplay.framework/CoreDisplay";

pub type SetUserBrightnessFn = unsafe extern "C" fn(DisplayId, c_double);
pub type GetUserBrightnessFn = unsafe extern "C" fn(DisplayId) -> c_double;

pub struct CoreDisplay {
    pub set_user: Option<SetUserBrightnessFn>,
    pub get_user: Option<GetUserBrightnessFn>,
}

impl CoreDisplay {
    pub fn load() -> Self {
        let Some(framework) = Framework::open(FRAMEWORK_PATH) else {
            return CoreDisplay {
                set_user: None,
                get_user: None,
            };
        };
        unsafe {
            CoreDisplay {
                set_user: framework.symbol(c"CoreDisplay_Display_SetUserBrightness"),
                get_user: framework.symbol(c"CoreDisplay_Display_GetUserBrightness"),
            }
        }
    }
}
