// Licensed under the Apache-2.0 license

use std::{error::Error, io::stdout, path::PathBuf};

use caravel_emu_bus::{Bus, BusError};

mod bus_logger;
mod model_emulated;
mod output;

pub use caravel_emu_cpu::Firmware;
pub use model_emulated::ModelEmulated;
pub use output::{Output, OutputSink};

pub type DefaultHwModel = ModelEmulated;

/// Cycles between releasing CSB and the management core fetching its first
/// instruction.
pub const DEFAULT_BOOT_CYCLES: u64 = 100;

pub struct InitParams {
    /// The firmware run by the management core once CSB is released.
    pub firmware: Firmware,

    /// Where the model log goes; stdout unless a test wants to capture it.
    pub log_writer: Box<dyn std::io::Write>,

    pub boot_cycles: u64,

    /// If set, every management core bus access is traced to this file.
    /// Falls back to the `CARAVEL_TRACE_PATH` environment variable.
    pub trace_path: Option<PathBuf>,
}
impl Default for InitParams {
    fn default() -> Self {
        Self {
            firmware: Firmware::idle(),
            log_writer: Box::new(stdout()),
            boot_cycles: DEFAULT_BOOT_CYCLES,
            trace_path: None,
        }
    }
}

/// Creates the default model.
pub fn new(params: InitParams) -> Result<DefaultHwModel, Box<dyn Error>> {
    DefaultHwModel::init(params)
}

// Represents an emulator or simulation of the Caravel SoC, to be called from
// tests.
pub trait HwModel {
    type TBus<'a>: Bus
    where
        Self: 'a;

    fn init(params: InitParams) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;

    /// The management core's view of the SoC, for backdoor access from tests.
    /// Accesses do not consume clock cycles.
    fn wishbone_bus(&mut self) -> Self::TBus<'_>;

    /// Step execution ahead one clock cycle.
    fn step(&mut self);

    /// The model log, with the virtual GPIO history captured so far.
    fn output(&mut self) -> &mut Output;

    fn cycle_count(&self) -> u64;

    /// Releases the management core; until then only the clock runs.
    fn release_csb(&mut self);

    /// The output half of the virtual GPIO register.
    fn vgpio_output(&self) -> u16;

    /// Drives the input half of the virtual GPIO register.
    fn set_vgpio_input(&mut self, val: u16);

    /// The bus fault that stopped the firmware, if any.
    fn firmware_fault(&self) -> Option<BusError>;

    /// Execute until the result of `predicate` becomes true.
    fn step_until(&mut self, mut predicate: impl FnMut(&mut Self) -> bool) {
        while !predicate(self) {
            self.step();
        }
    }

    /// Execute until the virtual GPIO output equals `expected`, giving up
    /// after `max_cycles`.
    fn step_until_vgpio_output(
        &mut self,
        expected: u16,
        max_cycles: u64,
    ) -> Result<(), Box<dyn Error>> {
        let deadline = self.cycle_count().saturating_add(max_cycles);
        self.step_until(|m| m.vgpio_output() == expected || m.cycle_count() >= deadline);
        if self.vgpio_output() != expected {
            return Err(format!(
                "expected vgpio output {}, was {}",
                expected,
                self.vgpio_output()
            )
            .into());
        }
        Ok(())
    }
}
