/*++

Licensed under the Apache-2.0 license.

File Name:

    helpers.rs

Abstract:

    File contains helper functions for converting between register words and
    byte blocks.

--*/

/// Packs four big-endian register words into a 16-byte block. Word 0 holds
/// the first four bytes.
pub fn block_from_words_be(words: &[u32; 4]) -> [u8; 16] {
    let mut block = [0u8; 16];
    for (chunk, word) in block.chunks_exact_mut(4).zip(words) {
        chunk.copy_from_slice(&word.to_be_bytes());
    }
    block
}

/// Inverse of [`block_from_words_be`].
pub fn words_from_block_be(block: &[u8; 16]) -> [u32; 4] {
    let mut words = [0u32; 4];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
    }
    words
}
