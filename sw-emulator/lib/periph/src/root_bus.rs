/*++

Licensed under the Apache-2.0 license.

File Name:

    root_bus.rs

Abstract:

    File contains the root Bus implementation for the Caravel management SoC
    as seen from the management core.

--*/

use crate::{EfAes, GpioConfig, Housekeeping, VgpioOutputCb, VirtualGpio};
use caravel_emu_bus::{Bus, BusError, Clock, ReadWriteRegister, Register};
use caravel_emu_types::{RvAddr, RvData, RvSize};
use tock_registers::interfaces::Readable;
use tock_registers::register_bitfields;

register_bitfields! [
    u32,
    WbEnable [
        EN OFFSET(0) NUMBITS(1) [],
    ],
];

#[derive(Default)]
pub struct CaravelRootBusArgs {
    pub vgpio_output_cb: VgpioOutputCb,
}

pub struct CaravelRootBus {
    pub gpio: GpioConfig,
    pub housekeeping: Housekeeping,
    pub wb_enable: ReadWriteRegister<WbEnable::Register>,
    pub aes: EfAes,
    pub vgpio: VirtualGpio,
}

impl CaravelRootBus {
    pub const GPIO_BASE: RvAddr = 0x2600_0000;
    pub const HOUSEKEEPING_BASE: RvAddr = 0x2610_0000;
    pub const USER_IF_ENABLE: RvAddr = 0x2f00_0000;
    pub const USER_PROJECT_BASE: RvAddr = 0x3000_0000;
    pub const USER_PROJECT_END: RvAddr = 0x30ff_ffff;
    pub const AES_BASE: RvAddr = 0x3000_0000;
    pub const VGPIO_ADDR: RvAddr = 0x30ff_fffc;

    pub fn new(clock: &Clock, args: CaravelRootBusArgs) -> Self {
        Self {
            gpio: GpioConfig::new(clock),
            housekeeping: Housekeeping::new(),
            wb_enable: ReadWriteRegister::new(0),
            aes: EfAes::new(clock),
            vgpio: VirtualGpio::new(args.vgpio_output_cb),
        }
    }

    /// Whether the management core may reach the user project wishbone area.
    pub fn user_if_enabled(&self) -> bool {
        self.wb_enable.reg.is_set(WbEnable::EN)
    }

    fn user_project_device(&mut self, addr: RvAddr) -> Option<(&mut dyn Bus, RvAddr)> {
        if (Self::AES_BASE..Self::AES_BASE + EfAes::MMIO_SIZE).contains(&addr) {
            return Some((&mut self.aes, addr - Self::AES_BASE));
        }
        if (Self::VGPIO_ADDR..Self::VGPIO_ADDR + VirtualGpio::MMIO_SIZE).contains(&addr) {
            return Some((&mut self.vgpio, addr - Self::VGPIO_ADDR));
        }
        None
    }
}

fn in_window(addr: RvAddr, base: RvAddr, size: RvAddr) -> bool {
    (base..base + size).contains(&addr)
}

impl Bus for CaravelRootBus {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if in_window(addr, Self::GPIO_BASE, GpioConfig::MMIO_SIZE) {
            return self.gpio.read(size, addr - Self::GPIO_BASE);
        }
        if in_window(addr, Self::HOUSEKEEPING_BASE, Housekeeping::MMIO_SIZE) {
            return self.housekeeping.read(size, addr - Self::HOUSEKEEPING_BASE);
        }
        if addr == Self::USER_IF_ENABLE {
            return self.wb_enable.read(size);
        }
        if (Self::USER_PROJECT_BASE..=Self::USER_PROJECT_END).contains(&addr) {
            if !self.user_if_enabled() {
                return Err(BusError::LoadAccessFault);
            }
            if let Some((dev, offset)) = self.user_project_device(addr) {
                return dev.read(size, offset);
            }
        }
        Err(BusError::LoadAccessFault)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if in_window(addr, Self::GPIO_BASE, GpioConfig::MMIO_SIZE) {
            return self.gpio.write(size, addr - Self::GPIO_BASE, val);
        }
        if in_window(addr, Self::HOUSEKEEPING_BASE, Housekeeping::MMIO_SIZE) {
            return self
                .housekeeping
                .write(size, addr - Self::HOUSEKEEPING_BASE, val);
        }
        if addr == Self::USER_IF_ENABLE {
            return self.wb_enable.write(size, val);
        }
        if (Self::USER_PROJECT_BASE..=Self::USER_PROJECT_END).contains(&addr) {
            if !self.user_if_enabled() {
                return Err(BusError::StoreAccessFault);
            }
            if let Some((dev, offset)) = self.user_project_device(addr) {
                return dev.write(size, offset, val);
            }
        }
        Err(BusError::StoreAccessFault)
    }

    fn poll(&mut self) {
        self.gpio.poll();
        self.aes.poll();
    }
}
