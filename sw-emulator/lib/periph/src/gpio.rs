/*++

Licensed under the Apache-2.0 license.

File Name:

    gpio.rs

Abstract:

    File contains the user-area GPIO configuration block. Pad configurations
    are shifted out serially, so a transfer keeps the block busy for a fixed
    number of cycles.

--*/

use caravel_emu_bus::{ActionHandle, Bus, BusError, Clock, Timer};
use caravel_emu_types::{RvAddr, RvData, RvSize};

pub struct GpioConfig {
    pad_modes: [u32; Self::PAD_COUNT],
    /// Pad configurations as of the last completed transfer.
    applied_modes: [u32; Self::PAD_COUNT],
    timer: Timer,
    xfer_action: Option<ActionHandle>,
}

impl GpioConfig {
    pub const PAD_COUNT: usize = 38;
    const CONFIG_BITS_PER_PAD: u64 = 13;
    pub const XFER_CYCLES: u64 = Self::PAD_COUNT as u64 * Self::CONFIG_BITS_PER_PAD;

    pub const ADDR_XFER: RvAddr = 0x00;
    pub const ADDR_PAD_MODE0: RvAddr = 0x24;
    pub const MMIO_SIZE: RvAddr = 0x100;

    pub fn new(clock: &Clock) -> Self {
        Self {
            pad_modes: [0; Self::PAD_COUNT],
            applied_modes: [0; Self::PAD_COUNT],
            timer: clock.timer(),
            xfer_action: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.xfer_action.is_some()
    }

    pub fn applied_mode(&self, pad: usize) -> Option<u32> {
        self.applied_modes.get(pad).copied()
    }

    fn pad_index(addr: RvAddr) -> Option<usize> {
        let offset = addr.checked_sub(Self::ADDR_PAD_MODE0)?;
        let idx = (offset / 4) as usize;
        (offset % 4 == 0 && idx < Self::PAD_COUNT).then_some(idx)
    }
}

impl Bus for GpioConfig {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if size != RvSize::Word {
            return Err(BusError::LoadAccessFault);
        }
        if addr == Self::ADDR_XFER {
            return Ok(u32::from(self.busy()));
        }
        match Self::pad_index(addr) {
            Some(idx) => Ok(self.pad_modes[idx]),
            None => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if size != RvSize::Word {
            return Err(BusError::StoreAccessFault);
        }
        if addr == Self::ADDR_XFER {
            if val & 1 != 0 && !self.busy() {
                self.xfer_action = Some(self.timer.schedule_poll_in(Self::XFER_CYCLES));
            }
            return Ok(());
        }
        match Self::pad_index(addr) {
            Some(idx) => {
                self.pad_modes[idx] = val & 0x1fff;
                Ok(())
            }
            None => Err(BusError::StoreAccessFault),
        }
    }

    fn poll(&mut self) {
        if self.timer.fired(&mut self.xfer_action) {
            self.applied_modes = self.pad_modes;
        }
    }
}
