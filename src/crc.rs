//! CRC-8 checksum carried by every word on the SPS30 bus.
//!
//! Polynomial `0x31` (x⁸ + x⁵ + x⁴ + 1), initial value `0xFF`, MSB first,
//! no final XOR.

const POLYNOMIAL: u8 = 0x31;
const INIT: u8 = 0xFF;

/// Computes the checksum of a single big-endian word.
pub fn generate_checksum(word: [u8; 2]) -> u8 {
    let mut crc = INIT;
    for byte in word {
        crc ^= byte;
        for _ in 0..8 {
            if crc & 0x80 == 0 {
                crc <<= 1;
            } else {
                crc = (crc << 1) ^ POLYNOMIAL;
            }
        }
    }
    crc
}

/// Returns `true` if `checksum` matches the checksum of `word`.
pub fn verify_checksum(word: [u8; 2], checksum: u8) -> bool {
    generate_checksum(word) == checksum
}
