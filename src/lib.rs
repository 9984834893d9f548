pub mod chain;
pub mod matching;

#[cfg(target_os = "macos")]
pub mod coredisplay;
#[cfg(target_os = "macos")]
pub mod display;
#[cfg(target_os = "macos")]
pub mod displayservices;
#[cfg(target_os = "macos")]
pub mod iokit;
#[cfg(target_os = "macos")]
pub mod ops;
#[cfg(target_os = "macos")]
mod weak;

pub use chain::{BrightnessOps, DisplayId, Method, ServicePort, SetError};
pub use matching::DisplayTriple;
#[cfg(target_os = "macos")]
pub use ops::SystemOps;
