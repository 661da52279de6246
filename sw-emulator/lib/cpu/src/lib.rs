/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Caravel management core emulator.

--*/

mod bus;
pub mod cpu;

pub use bus::CpuBus;
pub use cpu::{Cpu, Firmware, FwResult, StepAction};
