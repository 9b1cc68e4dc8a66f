//! Outbound fetch pacing and quota state.

mod gate;
mod window;

pub use gate::{Admission, Permit, RateGate, Rejected};
pub use window::RateWindow;
