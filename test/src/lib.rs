// Licensed under the Apache-2.0 license

//! Host side of the Caravel virtual GPIO tests: environment bring-up, the
//! virtual GPIO observer and the status-sequence monitor that turns the
//! firmware's status codes into a verdict.

mod aes_test;

pub use aes_test::{aes_test, AesTestParams, AesTestSummary};
pub use env::{test_configure, TestEnv};
pub use monitor::{Milestone, MonitorError, MonitorState, Outcome, StatusMonitor, StatusObserver};
pub use vgpio::VirtualGpioModel;
