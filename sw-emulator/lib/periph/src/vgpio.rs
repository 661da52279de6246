/*++

Licensed under the Apache-2.0 license.

File Name:

    vgpio.rs

Abstract:

    File contains the virtual GPIO register: a single word in the user
    project area used as a status channel between firmware and the test
    bench.

--*/

use caravel_emu_bus::{Bus, BusError};
use caravel_emu_types::{RvAddr, RvData, RvSize};

/// Invoked with `(old, new)` whenever firmware changes the output half.
pub struct VgpioOutputCb(pub Box<dyn FnMut(u16, u16)>);
impl VgpioOutputCb {
    pub fn new(f: impl FnMut(u16, u16) + 'static) -> Self {
        Self(Box::new(f))
    }
}
impl Default for VgpioOutputCb {
    fn default() -> Self {
        Self(Box::new(|_, _| {}))
    }
}
impl std::fmt::Debug for VgpioOutputCb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("VgpioOutputCb")
            .field(&"<unknown closure>")
            .finish()
    }
}

/// Bits 15:0 are driven by firmware (output), bits 31:16 by the test bench
/// (input). Firmware writes only ever change the output half.
pub struct VirtualGpio {
    output: u16,
    input: u16,
    output_cb: VgpioOutputCb,
}

impl VirtualGpio {
    pub const MMIO_SIZE: RvAddr = 4;

    pub fn new(output_cb: VgpioOutputCb) -> Self {
        Self {
            output: 0,
            input: 0,
            output_cb,
        }
    }

    /// The value most recently written by firmware.
    pub fn output(&self) -> u16 {
        self.output
    }

    pub fn input(&self) -> u16 {
        self.input
    }

    /// Drive the input half from the test bench side.
    pub fn set_input(&mut self, val: u16) {
        self.input = val;
    }
}

impl Bus for VirtualGpio {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        match (size, addr) {
            (RvSize::Word, 0) => Ok(u32::from(self.input) << 16 | u32::from(self.output)),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        match (size, addr) {
            (RvSize::Word, 0) => {
                let new = (val & 0xffff) as u16;
                if new != self.output {
                    let old = std::mem::replace(&mut self.output, new);
                    (self.output_cb.0)(old, new);
                }
                Ok(())
            }
            _ => Err(BusError::StoreAccessFault),
        }
    }
}
