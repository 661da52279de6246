/*++

Licensed under the Apache-2.0 license.

File Name:

    aes128.rs

Abstract:

    File contains the AES-128 single-block (ECB) primitive used by the
    emulated EF_AES peripheral.

--*/

use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

pub const AES_128_BLOCK_SIZE: usize = 16;
pub const AES_128_KEY_SIZE: usize = 16;

/// One AES-128 key schedule, able to encrypt or decrypt single blocks.
pub struct Aes128Block {
    cipher: Aes128,
}

impl Aes128Block {
    pub fn new(key: &[u8; AES_128_KEY_SIZE]) -> Self {
        Self {
            cipher: Aes128::new(key.into()),
        }
    }

    pub fn encrypt(&self, block: &[u8; AES_128_BLOCK_SIZE]) -> [u8; AES_128_BLOCK_SIZE] {
        let mut block = aes::Block::from(*block);
        self.cipher.encrypt_block(&mut block);
        block.into()
    }

    pub fn decrypt(&self, block: &[u8; AES_128_BLOCK_SIZE]) -> [u8; AES_128_BLOCK_SIZE] {
        let mut block = aes::Block::from(*block);
        self.cipher.decrypt_block(&mut block);
        block.into()
    }
}
