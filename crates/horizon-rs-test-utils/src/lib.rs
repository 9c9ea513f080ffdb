//! Test helpers shared across Horizon crates.

pub mod backends;
pub mod request;

pub use backends::{StubCompute, StubNetwork, StubVolume};
pub use request::{request_with, scenario_defaults};
