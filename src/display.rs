//! CoreGraphics display enumeration and per-display metadata.

use core_graphics::display::{CGDirectDisplayID, CGDisplay, CGError};

use crate::matching::DisplayTriple;

/// Enumeration cap; matches the fixed-size identifier array the OS call
/// fills in.
pub const MAX_DISPLAYS: usize = 16;

/// All currently online displays, up to [`MAX_DISPLAYS`]. The only fatal
/// failure in the program.
pub fn online_displays() -> Result<Vec<CGDirectDisplayID>, CGError> {
    let mut ids: [CGDirectDisplayID; MAX_DISPLAYS] = [0; MAX_DISPLAYS];
    let mut count: u32 = 0;
    let err =
        unsafe { CGGetOnlineDisplayList(MAX_DISPLAYS as u32, ids.as_mut_ptr(), &mut count) };
    if err != 0 {
        return Err(err);
    }
    Ok(ids[..count as usize].to_vec())
}

/// The main display's identifier, for `-m`.
pub fn main_display() -> CGDirectDisplayID {
    CGDisplay::main().id
}

/// A display whose current mode cannot be retrieved is not a real
/// addressable display (mirroring sets and sleeping panels show up in the
/// online list too); the driver skips it. The mode object is released as
/// soon as it drops.
pub fn is_addressable(id: CGDirectDisplayID) -> bool {
    CGDisplay::new(id).display_mode().is_some()
}

/// Identifying triple used to locate the display's IOKit service.
pub fn triple(id: CGDirectDisplayID) -> DisplayTriple {
    let display = CGDisplay::new(id);
    DisplayTriple {
        vendor: display.vendor_number(),
        product: display.model_number(),
        serial: display.serial_number(),
    }
}

// The wrapper crate covers the per-display calls but not the online list.
#[link(name = "CoreGraphics", kind = "framework")]
unsafe extern "C" {
    fn CGGetOnlineDisplayList(
        max_displays: u32,
        online_displays: *mut CGDirectDisplayID,
        display_count: *mut u32,
    ) -> CGError;
}
