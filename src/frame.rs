//! Serialization of commands and responses.
//!
//! A command frame is the big-endian opcode followed by each argument word
//! and its checksum. A response is a run of `word, checksum` triplets.

use alloc::vec::Vec;

use crate::crc::{generate_checksum, verify_checksum};
use crate::error::FrameError;

/// Bytes in an opcode.
pub const OPCODE_SIZE: usize = 2;
/// Bytes in one word plus its checksum.
pub const CHUNK_SIZE: usize = 3;

/// Length in bytes of a command frame carrying `num_args` argument words.
pub const fn frame_len(num_args: usize) -> usize {
    OPCODE_SIZE + CHUNK_SIZE * num_args
}

/// Length in bytes of a response carrying `num_words` words.
pub const fn response_len(num_words: usize) -> usize {
    CHUNK_SIZE * num_words
}

/// Serializes `opcode` and `args` into a frame of exactly `frame_len(args.len())` bytes.
pub fn encode(opcode: u16, args: &[u16]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(frame_len(args.len()));
    buf.extend_from_slice(&opcode.to_be_bytes());
    for arg in args {
        let word = arg.to_be_bytes();
        buf.extend_from_slice(&word);
        buf.push(generate_checksum(word));
    }
    buf
}

/// Decodes `num_words` checksum-protected words from `raw`.
///
/// Stops at the first invalid checksum. No words are returned unless every
/// checksum in the buffer is valid.
pub fn decode(raw: &[u8], num_words: usize) -> Result<Vec<u16>, FrameError> {
    let expected = response_len(num_words);
    if raw.len() != expected {
        return Err(FrameError::Length {
            expected,
            actual: raw.len(),
        });
    }

    let mut words = Vec::with_capacity(num_words);
    for (index, chunk) in raw.chunks_exact(CHUNK_SIZE).enumerate() {
        let word = [chunk[0], chunk[1]];
        if !verify_checksum(word, chunk[2]) {
            return Err(FrameError::Checksum { word: index });
        }
        words.push(u16::from_be_bytes(word));
    }
    Ok(words)
}
