//! Common test utilities for testgrid-artifacts integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod mock_device_farm;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_device_farm::*;
