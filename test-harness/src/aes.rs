/*++

Licensed under the Apache-2.0 license.

File Name:

    aes.rs

Abstract:

    File contains the firmware driver for the EF_AES user project peripheral.

--*/

use core::fmt;

use caravel_emu_bus::BusError;
use caravel_emu_cpu::CpuBus;
use caravel_test_harness_types::mmap;

const REG_KEY0: u32 = 0x00;
const REG_DATA_IN0: u32 = 0x10;
const REG_DATA_OUT0: u32 = 0x20;
const REG_CTRL: u32 = 0x30;
const REG_STATUS: u32 = 0x34;
const REG_GCLK: u32 = 0xff10;

const CTRL_START: u32 = 1 << 0;
const CTRL_DECRYPT: u32 = 1 << 1;
const STATUS_DONE: u32 = 1 << 1;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AesOp {
    Encrypt,
    Decrypt,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AesError {
    Bus(BusError),
    /// DONE was not raised within the polling budget.
    Timeout,
}

impl From<BusError> for AesError {
    fn from(err: BusError) -> Self {
        AesError::Bus(err)
    }
}

impl fmt::Display for AesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AesError::Bus(err) => write!(f, "bus error: {err}"),
            AesError::Timeout => write!(f, "timed out waiting for AES done"),
        }
    }
}

impl std::error::Error for AesError {}

pub struct EfAes {
    bus: CpuBus,
    base: u32,
}

impl EfAes {
    pub fn new(bus: CpuBus) -> Self {
        Self {
            bus,
            base: mmap::AES_BASE,
        }
    }

    pub fn set_base_address(&mut self, base: u32) {
        self.base = base;
    }

    async fn write_reg(&self, offset: u32, val: u32) -> Result<(), BusError> {
        self.bus.write_u32(self.base + offset, val).await
    }

    async fn read_reg(&self, offset: u32) -> Result<u32, BusError> {
        self.bus.read_u32(self.base + offset).await
    }

    async fn write_block(&self, offset: u32, block: &[u32; 4]) -> Result<(), BusError> {
        for (i, word) in block.iter().enumerate() {
            self.write_reg(offset + 4 * i as u32, *word).await?;
        }
        Ok(())
    }

    pub async fn enable_gclk(&self, enable: bool) -> Result<(), BusError> {
        self.write_reg(REG_GCLK, u32::from(enable)).await
    }

    pub async fn load_key(&self, key: &[u32; 4]) -> Result<(), BusError> {
        self.write_block(REG_KEY0, key).await
    }

    pub async fn load_data(&self, data: &[u32; 4]) -> Result<(), BusError> {
        self.write_block(REG_DATA_IN0, data).await
    }

    pub async fn start(&self, op: AesOp) -> Result<(), BusError> {
        let ctrl = match op {
            AesOp::Encrypt => CTRL_START,
            AesOp::Decrypt => CTRL_START | CTRL_DECRYPT,
        };
        self.write_reg(REG_CTRL, ctrl).await
    }

    pub async fn is_done(&self) -> Result<bool, BusError> {
        Ok(self.read_reg(REG_STATUS).await? & STATUS_DONE != 0)
    }

    /// Polls STATUS until DONE, reading it at most `max_polls` times.
    pub async fn wait_done(&self, max_polls: u32) -> Result<(), AesError> {
        for _ in 0..max_polls {
            if self.is_done().await? {
                return Ok(());
            }
        }
        Err(AesError::Timeout)
    }

    pub async fn read_result(&self) -> Result<[u32; 4], BusError> {
        let mut out = [0; 4];
        for (i, word) in out.iter_mut().enumerate() {
            *word = self.read_reg(REG_DATA_OUT0 + 4 * i as u32).await?;
        }
        Ok(out)
    }

    async fn run_block(
        &self,
        op: AesOp,
        key: &[u32; 4],
        input: &[u32; 4],
        max_polls: u32,
    ) -> Result<[u32; 4], AesError> {
        self.load_key(key).await?;
        self.load_data(input).await?;
        self.start(op).await?;
        self.wait_done(max_polls).await?;
        Ok(self.read_result().await?)
    }

    pub async fn encrypt128(
        &self,
        key: &[u32; 4],
        plaintext: &[u32; 4],
        max_polls: u32,
    ) -> Result<[u32; 4], AesError> {
        self.run_block(AesOp::Encrypt, key, plaintext, max_polls)
            .await
    }

    pub async fn decrypt128(
        &self,
        key: &[u32; 4],
        ciphertext: &[u32; 4],
        max_polls: u32,
    ) -> Result<[u32; 4], AesError> {
        self.run_block(AesOp::Decrypt, key, ciphertext, max_polls)
            .await
    }
}
