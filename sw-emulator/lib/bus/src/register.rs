/*++

Licensed under the Apache-2.0 license.

File Name:

    register.rs

Abstract:

    File contains implementation of the register types used by peripherals

--*/

use crate::BusError;
use caravel_emu_types::{RvData, RvSize};
use tock_registers::interfaces::{Readable, Writeable};
use tock_registers::registers::InMemoryRegister;
use tock_registers::RegisterLongName;

/// A single word-wide peripheral register.
pub trait Register {
    /// Size of the register in bytes.
    const SIZE: usize;

    /// Read data of specified size
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::LoadAccessFault`
    fn read(&self, size: RvSize) -> Result<RvData, BusError>;

    /// Write data of specified size
    ///
    /// # Error
    ///
    /// * `BusError` - Exception with cause `BusError::StoreAccessFault`
    fn write(&mut self, size: RvSize, val: RvData) -> Result<(), BusError>;
}

impl Register for u32 {
    const SIZE: usize = std::mem::size_of::<Self>();

    fn read(&self, size: RvSize) -> Result<RvData, BusError> {
        match size {
            RvSize::Word => Ok(*self),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, val: RvData) -> Result<(), BusError> {
        match size {
            RvSize::Word => {
                *self = val;
                Ok(())
            }
            _ => Err(BusError::StoreAccessFault),
        }
    }
}

/// Read Write Register
pub struct ReadWriteRegister<R: RegisterLongName = ()> {
    /// Register
    pub reg: InMemoryRegister<u32, R>,
}

impl<R: RegisterLongName> ReadWriteRegister<R> {
    /// Create an instance of Read Write Register
    pub fn new(val: u32) -> Self {
        Self {
            reg: InMemoryRegister::new(val),
        }
    }
}

impl<R: RegisterLongName> Register for ReadWriteRegister<R> {
    const SIZE: usize = std::mem::size_of::<u32>();

    fn read(&self, size: RvSize) -> Result<RvData, BusError> {
        if size != RvSize::Word {
            Err(BusError::LoadAccessFault)?
        }
        Ok(self.reg.get())
    }

    fn write(&mut self, size: RvSize, val: RvData) -> Result<(), BusError> {
        if size != RvSize::Word {
            Err(BusError::StoreAccessFault)?
        }
        self.reg.set(val);
        Ok(())
    }
}

/// Read Only Register. Writes from the bus fault; the owning peripheral
/// updates it through `reg`.
pub struct ReadOnlyRegister<R: RegisterLongName = ()> {
    /// Register
    pub reg: InMemoryRegister<u32, R>,
}

impl<R: RegisterLongName> ReadOnlyRegister<R> {
    /// Create an instance of Read Only Register
    pub fn new(val: u32) -> Self {
        Self {
            reg: InMemoryRegister::new(val),
        }
    }
}

impl<R: RegisterLongName> Register for ReadOnlyRegister<R> {
    const SIZE: usize = std::mem::size_of::<u32>();

    fn read(&self, size: RvSize) -> Result<RvData, BusError> {
        if size != RvSize::Word {
            Err(BusError::LoadAccessFault)?
        }
        Ok(self.reg.get())
    }

    fn write(&mut self, _size: RvSize, _val: RvData) -> Result<(), BusError> {
        Err(BusError::StoreAccessFault)
    }
}
