//! The real capability table: [`BrightnessOps`] backed by the entry points
//! that resolved at startup.

use log::debug;

use crate::chain::{BrightnessOps, DisplayId, ServicePort};
use crate::coredisplay::CoreDisplay;
use crate::displayservices::DisplayServices;
use crate::iokit;

pub struct SystemOps {
    services: DisplayServices,
    core_display: CoreDisplay,
}

impl SystemOps {
    /// Probe both frameworks once; absent symbols stay `None` for the life
    /// of the process.
    pub fn load() -> Self {
        let ops = SystemOps {
            services: DisplayServices::load(),
            core_display: CoreDisplay::load(),
        };
        debug!(
            "capabilities: DisplayServices set={} get={} can_change={} changed={}, \
             CoreDisplay set_user={} get_user={}",
            ops.services.set.is_some(),
            ops.services.get.is_some(),
            ops.services.can_change.is_some(),
            ops.services.changed.is_some(),
            ops.core_display.set_user.is_some(),
            ops.core_display.get_user.is_some(),
        );
        ops
    }
}

impl BrightnessOps for SystemOps {
    fn services_set(&self, display: DisplayId, value: f32) -> Option<i32> {
        let set = self.services.set?;
        Some(unsafe { set(display, value) })
    }

    fn services_get(&self, display: DisplayId) -> Option<f32> {
        let get = self.services.get?;
        let mut value: f32 = 0.0;
        (unsafe { get(display, &mut value) } == 0).then_some(value)
    }

    fn services_can_change(&self, display: DisplayId) -> Option<bool> {
        let can_change = self.services.can_change?;
        Some(unsafe { can_change(display) })
    }

    fn services_notify_changed(&self, display: DisplayId, value: f64) {
        if let Some(changed) = self.services.changed {
            unsafe { changed(display, value) }
        }
    }

    fn has_user_set(&self) -> bool {
        self.core_display.set_user.is_some()
    }

    fn user_set(&self, display: DisplayId, value: f64) {
        if let Some(set_user) = self.core_display.set_user {
            unsafe { set_user(display, value) }
        }
    }

    fn user_get(&self, display: DisplayId) -> Option<f64> {
        let get_user = self.core_display.get_user?;
        Some(unsafe { get_user(display) })
    }

    fn io_set(&self, service: ServicePort, value: f32) -> i32 {
        iokit::set_brightness_parameter(service, value)
    }

    fn io_get(&self, service: ServicePort) -> Option<f32> {
        iokit::brightness_parameter(service)
    }
}
