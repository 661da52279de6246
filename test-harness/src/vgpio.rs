// Licensed under the Apache-2.0 license

use caravel_emu_bus::BusError;
use caravel_emu_cpu::CpuBus;
use caravel_test_harness_types::mmap;

/// Writes `val` to the output half of the virtual GPIO register, preserving
/// the input half.
pub async fn vgpio_write_output(bus: &CpuBus, val: u16) -> Result<(), BusError> {
    let reg = bus.read_u32(mmap::VGPIO).await?;
    bus.write_u32(mmap::VGPIO, (reg & 0xffff_0000) | u32::from(val))
        .await
}

pub async fn vgpio_read_input(bus: &CpuBus) -> Result<u16, BusError> {
    Ok((bus.read_u32(mmap::VGPIO).await? >> 16) as u16)
}

/// Spins until the test bench drives `val` on the input half.
pub async fn vgpio_wait_val(bus: &CpuBus, val: u16) -> Result<(), BusError> {
    while vgpio_read_input(bus).await? != val {}
    Ok(())
}
