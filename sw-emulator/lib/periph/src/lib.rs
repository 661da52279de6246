/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the Caravel Emulator Peripheral library.

--*/

mod aes;
mod gpio;
mod helpers;
mod housekeeping;
mod root_bus;
mod vgpio;

pub use aes::EfAes;
pub use gpio::GpioConfig;
pub use helpers::{block_from_words_be, words_from_block_be};
pub use housekeeping::Housekeeping;
pub use root_bus::{CaravelRootBus, CaravelRootBusArgs};
pub use vgpio::{VgpioOutputCb, VirtualGpio};
