// Licensed under the Apache-2.0 license

use crate::helpers::{block_from_words_be, words_from_block_be};
use caravel_emu_bus::{ActionHandle, Bus, BusError, Clock, Timer};
use caravel_emu_bus::{ReadOnlyRegister, ReadWriteRegister, Register};
use caravel_emu_crypto::Aes128Block;
use caravel_emu_types::{RvAddr, RvData, RvSize};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};
use tock_registers::register_bitfields;

register_bitfields! [
    u32,
    Ctrl [
        START OFFSET(0) NUMBITS(1) [],
        DECRYPT OFFSET(1) NUMBITS(1) [],
    ],
    Status [
        BUSY OFFSET(0) NUMBITS(1) [],
        DONE OFFSET(1) NUMBITS(1) [],
    ],
    Gclk [
        EN OFFSET(0) NUMBITS(1) [],
    ],
];

/// AES-128 ECB peripheral with the EF IP register layout: four key words,
/// four input words, four output words, a control/status pair and the
/// gated-clock enable at the top of the window.
pub struct EfAes {
    key: [u32; 4],
    data_in: [u32; 4],
    data_out: [u32; 4],
    ctrl: ReadWriteRegister<Ctrl::Register>,
    status: ReadOnlyRegister<Status::Register>,
    gclk: ReadWriteRegister<Gclk::Register>,

    timer: Timer,
    op_complete_action: Option<ActionHandle>,
    pending_result: [u32; 4],
}

impl EfAes {
    pub const ADDR_KEY0: RvAddr = 0x00;
    pub const ADDR_KEY3: RvAddr = 0x0c;
    pub const ADDR_DATA_IN0: RvAddr = 0x10;
    pub const ADDR_DATA_IN3: RvAddr = 0x1c;
    pub const ADDR_DATA_OUT0: RvAddr = 0x20;
    pub const ADDR_DATA_OUT3: RvAddr = 0x2c;
    pub const ADDR_CTRL: RvAddr = 0x30;
    pub const ADDR_STATUS: RvAddr = 0x34;
    pub const ADDR_GCLK: RvAddr = 0xff10;
    pub const MMIO_SIZE: RvAddr = 0x1_0000;

    pub const CTRL_START: u32 = 1 << 0;
    pub const CTRL_DECRYPT: u32 = 1 << 1;
    pub const STATUS_BUSY: u32 = 1 << 0;
    pub const STATUS_DONE: u32 = 1 << 1;

    /// Cycles from START to DONE (ten rounds plus key expansion, two cycles
    /// each).
    pub const LATENCY_CYCLES: u64 = 22;

    pub fn new(clock: &Clock) -> Self {
        Self {
            key: [0; 4],
            data_in: [0; 4],
            data_out: [0; 4],
            ctrl: ReadWriteRegister::new(0),
            status: ReadOnlyRegister::new(0),
            gclk: ReadWriteRegister::new(0),
            timer: clock.timer(),
            op_complete_action: None,
            pending_result: [0; 4],
        }
    }

    pub fn clock_enabled(&self) -> bool {
        self.gclk.reg.is_set(Gclk::EN)
    }

    pub fn busy(&self) -> bool {
        self.status.reg.is_set(Status::BUSY)
    }

    fn start(&mut self) {
        let cipher = Aes128Block::new(&block_from_words_be(&self.key));
        let input = block_from_words_be(&self.data_in);
        let output = if self.ctrl.reg.is_set(Ctrl::DECRYPT) {
            cipher.decrypt(&input)
        } else {
            cipher.encrypt(&input)
        };
        self.pending_result = words_from_block_be(&output);
        self.status.reg.write(Status::BUSY::SET);
        self.op_complete_action = Some(self.timer.schedule_poll_in(Self::LATENCY_CYCLES));
    }

    fn write_ctrl(&mut self, size: RvSize, val: RvData) -> Result<(), BusError> {
        self.ctrl.write(size, val)?;
        if self.ctrl.reg.is_set(Ctrl::START) {
            // START is self-clearing; a second START while busy is dropped.
            self.ctrl.reg.modify(Ctrl::START::CLEAR);
            if !self.busy() {
                self.start();
            }
        }
        Ok(())
    }

    fn write_gclk(&mut self, size: RvSize, val: RvData) -> Result<(), BusError> {
        self.gclk.write(size, val)?;
        if !self.clock_enabled() {
            if let Some(action) = self.op_complete_action.take() {
                self.timer.cancel(action);
            }
            self.status.reg.set(0);
        }
        Ok(())
    }
}

impl Bus for EfAes {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        if addr & 0x3 != 0 {
            return Err(BusError::LoadAddrMisaligned);
        }
        if size != RvSize::Word {
            return Err(BusError::LoadAccessFault);
        }
        let idx = ((addr & 0xf) >> 2) as usize;
        match addr {
            Self::ADDR_KEY0..=Self::ADDR_KEY3 => Ok(self.key[idx]),
            Self::ADDR_DATA_IN0..=Self::ADDR_DATA_IN3 => Ok(self.data_in[idx]),
            Self::ADDR_DATA_OUT0..=Self::ADDR_DATA_OUT3 => Ok(self.data_out[idx]),
            Self::ADDR_CTRL => self.ctrl.read(size),
            Self::ADDR_STATUS => self.status.read(size),
            Self::ADDR_GCLK => self.gclk.read(size),
            _ => Err(BusError::LoadAccessFault),
        }
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        if addr & 0x3 != 0 {
            return Err(BusError::StoreAddrMisaligned);
        }
        if size != RvSize::Word {
            return Err(BusError::StoreAccessFault);
        }
        if addr == Self::ADDR_GCLK {
            return self.write_gclk(size, val);
        }
        if !self.clock_enabled() {
            // Without its clock the core silently drops register writes.
            return Ok(());
        }
        let idx = ((addr & 0xf) >> 2) as usize;
        match addr {
            Self::ADDR_KEY0..=Self::ADDR_KEY3 => self.key[idx] = val,
            Self::ADDR_DATA_IN0..=Self::ADDR_DATA_IN3 => self.data_in[idx] = val,
            Self::ADDR_CTRL => self.write_ctrl(size, val)?,
            Self::ADDR_STATUS => self.status.write(size, val)?,
            _ => Err(BusError::StoreAccessFault)?,
        }
        Ok(())
    }

    fn poll(&mut self) {
        if self.timer.fired(&mut self.op_complete_action) {
            self.data_out = self.pending_result;
            self.status.reg.write(Status::DONE::SET);
        }
    }
}
