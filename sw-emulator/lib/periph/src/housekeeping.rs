/*++

Licensed under the Apache-2.0 license.

File Name:

    housekeeping.rs

Abstract:

    File contains the housekeeping block registers visible to the management
    core.

--*/

use caravel_emu_bus::{Bus, BusError, ReadWriteRegister, Register};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use tock_registers::interfaces::Readable;
use tock_registers::register_bitfields;

register_bitfields! [
    u32,
    HkSpiDisable [
        DISABLE OFFSET(0) NUMBITS(1) [],
    ],
];

pub struct Housekeeping {
    hkspi_disable: ReadWriteRegister<HkSpiDisable::Register>,
}

impl Housekeeping {
    pub const ADDR_HKSPI_DISABLE: RvAddr = 0x10;
    pub const MMIO_SIZE: RvAddr = 0x100;

    pub fn new() -> Self {
        Self {
            hkspi_disable: ReadWriteRegister::new(0),
        }
    }

    /// True while the housekeeping SPI still owns the pads.
    pub fn hkspi_enabled(&self) -> bool {
        !self.hkspi_disable.reg.is_set(HkSpiDisable::DISABLE)
    }
}

impl Default for Housekeeping {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for Housekeeping {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        match addr {
            Self::ADDR_HKSPI_DISABLE => self.hkspi_disable.read(size),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        match addr {
            Self::ADDR_HKSPI_DISABLE => self.hkspi_disable.write(size, val),
            _ => Err(BusError::StoreAccessFault),
        }
    }
}
