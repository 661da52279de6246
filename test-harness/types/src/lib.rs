// Licensed under the Apache-2.0 license

/// Status codes the AES test firmware writes to the virtual GPIO output.
///
/// Codes 1 through 5 are milestones and are written in increasing order.
/// The run ends on [`PASS`] or [`FAIL`].
pub mod status {
    /// Pads configured and user interface enabled.
    pub const FW_READY: u16 = 1;
    /// EF_AES clock gate opened.
    pub const PERIPHERAL_ENABLED: u16 = 2;
    /// Key and plaintext written to the peripheral.
    pub const VECTORS_LOADED: u16 = 3;
    pub const ENCRYPTION_STARTED: u16 = 4;
    pub const CIPHERTEXT_READ: u16 = 5;

    pub const PASS: u16 = 6;
    pub const FAIL: u16 = 7;

    pub const MILESTONES: [u16; 5] = [
        FW_READY,
        PERIPHERAL_ENABLED,
        VECTORS_LOADED,
        ENCRYPTION_STARTED,
        CIPHERTEXT_READ,
    ];

    pub fn is_terminal(code: u16) -> bool {
        code == PASS || code == FAIL
    }
}

/// Addresses of the management SoC as seen by firmware.
pub mod mmap {
    pub const GPIO_BASE: u32 = 0x2600_0000;
    pub const GPIO_XFER: u32 = GPIO_BASE;
    pub const GPIO_PAD_MODE0: u32 = GPIO_BASE + 0x24;

    pub const HKSPI_DISABLE: u32 = 0x2610_0010;
    pub const USER_IF_ENABLE: u32 = 0x2f00_0000;

    pub const AES_BASE: u32 = 0x3000_0000;
    pub const VGPIO: u32 = 0x30ff_fffc;
}

/// FIPS-197 Appendix B AES-128 vector, as big-endian words in register order.
pub mod aes_vector {
    pub const KEY: [u32; 4] = [0x2b7e1516, 0x28aed2a6, 0xabf71588, 0x09cf4f3c];
    pub const PLAINTEXT: [u32; 4] = [0x3243f6a8, 0x885a308d, 0x313198a2, 0xe0370734];
    pub const CIPHERTEXT: [u32; 4] = [0x3925841d, 0x02dc09fb, 0xdc118597, 0x196a0b32];
}

/// Renders `words` as one lowercase hex string, most significant word first.
pub fn words_to_hex(words: &[u32]) -> String {
    words.iter().map(|w| format!("{w:08x}")).collect()
}
