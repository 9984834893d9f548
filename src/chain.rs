//! Prioritized fallback chain over the OS brightness entry points.
//!
//! Not every entry point exists on every macOS release or architecture, so
//! each one is an optional capability resolved once at startup. The chain
//! dispatches through whichever capabilities are present, in fixed priority
//! order, and stops at the first method that reports success.

use thiserror::Error;

/// CoreGraphics display identifier, valid for the current session only.
pub type DisplayId = u32;

/// IOKit service port for the display's `IODisplayConnect` service.
/// Zero means the service could not be resolved.
pub type ServicePort = u32;

/// The OS entry points the chain dispatches through. Methods returning
/// `Option` yield `None` when the underlying symbol was absent at startup.
pub trait BrightnessOps {
    /// `DisplayServicesSetBrightness`. Zero return is success.
    fn services_set(&self, display: DisplayId, value: f32) -> Option<i32>;

    /// `DisplayServicesGetBrightness`. `None` on absent symbol or nonzero
    /// return.
    fn services_get(&self, display: DisplayId) -> Option<f32>;

    /// `DisplayServicesCanChangeBrightness`.
    fn services_can_change(&self, display: DisplayId) -> Option<bool>;

    /// `DisplayServicesBrightnessChanged` notification. No-op when absent.
    fn services_notify_changed(&self, display: DisplayId, value: f64);

    /// Whether `CoreDisplay_Display_SetUserBrightness` resolved.
    fn has_user_set(&self) -> bool;

    /// `CoreDisplay_Display_SetUserBrightness`. Only called when
    /// [`has_user_set`](Self::has_user_set) is true; reports nothing.
    fn user_set(&self, display: DisplayId, value: f64);

    /// `CoreDisplay_Display_GetUserBrightness`.
    fn user_get(&self, display: DisplayId) -> Option<f64>;

    /// `IODisplaySetFloatParameter` on the resolved service port. Returns
    /// the raw `IOReturn` code, zero on success.
    fn io_set(&self, service: ServicePort, value: f32) -> i32;

    /// `IODisplayGetFloatParameter` on the resolved service port.
    fn io_get(&self, service: ServicePort) -> Option<f32>;
}

/// Which link of the chain ended up doing the work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    DisplayServices,
    UserBrightness,
    IoDisplay,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Method::DisplayServices => "DisplayServices",
            Method::UserBrightness => "CoreDisplay user brightness",
            Method::IoDisplay => "IODisplay parameter",
        }
    }
}

/// Per-display failure. Never aborts the run; the driver reports it and
/// moves on to the next display.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SetError {
    #[error("unable to set brightness of display {0:#x}")]
    CannotChange(DisplayId),
    #[error("failed to set brightness of display {display:#x} (error {code})")]
    Io { display: DisplayId, code: i32 },
}

/// Set `value` on one display, first-success-wins.
///
/// A nonzero return from the DisplayServices setter falls through to the
/// next method. The capability check only blocks when its symbol is present
/// and answers no; in that case the chain stops without trying IODisplay.
pub fn set_brightness<O: BrightnessOps>(
    ops: &O,
    display: DisplayId,
    service: ServicePort,
    value: f32,
) -> Result<Method, SetError> {
    if ops.services_set(display, value) == Some(0) {
        return Ok(Method::DisplayServices);
    }

    if ops.has_user_set() {
        if ops.services_can_change(display) == Some(false) {
            return Err(SetError::CannotChange(display));
        }
        ops.user_set(display, f64::from(value));
        ops.services_notify_changed(display, f64::from(value));
        return Ok(Method::UserBrightness);
    }

    match ops.io_set(service, value) {
        0 => Ok(Method::IoDisplay),
        code => Err(SetError::Io { display, code }),
    }
}

/// Read one display's brightness through the mirror chain, or `None` when
/// no method can read it.
pub fn get_brightness<O: BrightnessOps>(
    ops: &O,
    display: DisplayId,
    service: ServicePort,
) -> Option<f32> {
    ops.services_get(display)
        .or_else(|| ops.user_get(display).map(|v| v as f32))
        .or_else(|| ops.io_get(service))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Scripted stand-in for the OS entry points, recording call order.
    struct FakeOps {
        services_set: Option<i32>,
        services_get: Option<f32>,
        can_change: Option<bool>,
        user_present: bool,
        user_get: Option<f64>,
        io_set: i32,
        io_get: Option<f32>,
        calls: RefCell<Vec<&'static str>>,
    }

    impl FakeOps {
        fn none() -> Self {
            FakeOps {
                services_set: None,
                services_get: None,
                can_change: None,
                user_present: false,
                user_get: None,
                io_set: 0,
                io_get: None,
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.borrow().clone()
        }
    }

    impl BrightnessOps for FakeOps {
        fn services_set(&self, _display: DisplayId, _value: f32) -> Option<i32> {
            if self.services_set.is_some() {
                self.calls.borrow_mut().push("services_set");
            }
            self.services_set
        }

        fn services_get(&self, _display: DisplayId) -> Option<f32> {
            self.services_get
        }

        fn services_can_change(&self, _display: DisplayId) -> Option<bool> {
            if self.can_change.is_some() {
                self.calls.borrow_mut().push("can_change");
            }
            self.can_change
        }

        fn services_notify_changed(&self, _display: DisplayId, _value: f64) {
            self.calls.borrow_mut().push("notify_changed");
        }

        fn has_user_set(&self) -> bool {
            self.user_present
        }

        fn user_set(&self, _display: DisplayId, _value: f64) {
            self.calls.borrow_mut().push("user_set");
        }

        fn user_get(&self, _display: DisplayId) -> Option<f64> {
            self.user_get
        }

        fn io_set(&self, _service: ServicePort, _value: f32) -> i32 {
            self.calls.borrow_mut().push("io_set");
            self.io_set
        }

        fn io_get(&self, _service: ServicePort) -> Option<f32> {
            self.io_get
        }
    }

    #[test]
    fn display_services_success_short_circuits() {
        let ops = FakeOps {
            services_set: Some(0),
            user_present: true,
            can_change: Some(true),
            ..FakeOps::none()
        };
        assert_eq!(
            set_brightness(&ops, 1, 0, 0.5),
            Ok(Method::DisplayServices)
        );
        assert_eq!(ops.calls(), ["services_set"]);
    }

    #[test]
    fn nonzero_display_services_return_falls_through() {
        let ops = FakeOps {
            services_set: Some(-1),
            user_present: true,
            can_change: Some(true),
            ..FakeOps::none()
        };
        assert_eq!(set_brightness(&ops, 1, 0, 0.5), Ok(Method::UserBrightness));
        assert_eq!(
            ops.calls(),
            ["services_set", "can_change", "user_set", "notify_changed"]
        );
    }

    #[test]
    fn capability_check_refusal_stops_the_chain() {
        let ops = FakeOps {
            user_present: true,
            can_change: Some(false),
            ..FakeOps::none()
        };
        assert_eq!(
            set_brightness(&ops, 0x1a, 7, 0.5),
            Err(SetError::CannotChange(0x1a))
        );
        // IODisplay is never attempted after a refusal.
        assert_eq!(ops.calls(), ["can_change"]);
    }

    #[test]
    fn absent_capability_check_does_not_block_user_set() {
        let ops = FakeOps {
            user_present: true,
            can_change: None,
            ..FakeOps::none()
        };
        assert_eq!(set_brightness(&ops, 1, 0, 0.5), Ok(Method::UserBrightness));
        assert_eq!(ops.calls(), ["user_set", "notify_changed"]);
    }

    #[test]
    fn io_display_is_the_last_resort() {
        let ops = FakeOps::none();
        assert_eq!(set_brightness(&ops, 1, 42, 1.0), Ok(Method::IoDisplay));
        assert_eq!(ops.calls(), ["io_set"]);
    }

    #[test]
    fn io_display_failure_carries_the_return_code() {
        let ops = FakeOps {
            io_set: -536870201,
            ..FakeOps::none()
        };
        assert_eq!(
            set_brightness(&ops, 2, 0, 1.0),
            Err(SetError::Io {
                display: 2,
                code: -536870201
            })
        );
    }

    #[test]
    fn get_prefers_display_services() {
        let ops = FakeOps {
            services_get: Some(0.25),
            user_get: Some(0.75),
            io_get: Some(1.0),
            ..FakeOps::none()
        };
        assert_eq!(get_brightness(&ops, 1, 0), Some(0.25));
    }

    #[test]
    fn get_falls_back_in_order() {
        let ops = FakeOps {
            user_get: Some(0.75),
            io_get: Some(1.0),
            ..FakeOps::none()
        };
        assert_eq!(get_brightness(&ops, 1, 0), Some(0.75));

        let ops = FakeOps {
            io_get: Some(1.0),
            ..FakeOps::none()
        };
        assert_eq!(get_brightness(&ops, 1, 0), Some(1.0));

        assert_eq!(get_brightness(&FakeOps::none(), 1, 0), None);
    }
}
