/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the firmware-side API used by Caravel management core test
    firmware: virtual GPIO status signalling, pad configuration, the
    housekeeping SPI switch, the user interface enable and the EF_AES driver.

--*/

mod aes;
mod vgpio;

pub use aes::{AesError, AesOp, EfAes};
pub use vgpio::{vgpio_read_input, vgpio_wait_val, vgpio_write_output};

use caravel_emu_bus::BusError;
use caravel_emu_cpu::CpuBus;
use caravel_test_harness_types::mmap;

/// Pad configuration words, as shifted into the GPIO control blocks.
pub mod gpio_mode {
    pub const USER_STD_OUTPUT: u32 = 0x1808;
}

/// Hands the housekeeping pads to (`true`) or takes them back from
/// (`false`) the housekeeping SPI.
pub async fn enable_hk_spi(bus: &CpuBus, enable: bool) -> Result<(), BusError> {
    bus.write_u32(mmap::HKSPI_DISABLE, u32::from(!enable)).await
}

pub async fn gpio_config_io(bus: &CpuBus, pad: usize, mode: u32) -> Result<(), BusError> {
    let addr = mmap::GPIO_PAD_MODE0 + 4 * pad as u32;
    bus.write_u32(addr, mode).await
}

/// Shifts the pad configuration into the pads and waits for the transfer to
/// finish.
pub async fn gpio_load_configs(bus: &CpuBus) -> Result<(), BusError> {
    bus.write_u32(mmap::GPIO_XFER, 1).await?;
    while bus.read_u32(mmap::GPIO_XFER).await? & 1 != 0 {}
    Ok(())
}

/// Opens the wishbone window into the user project area.
pub async fn user_enable_if(bus: &CpuBus) -> Result<(), BusError> {
    bus.write_u32(mmap::USER_IF_ENABLE, 1).await
}
