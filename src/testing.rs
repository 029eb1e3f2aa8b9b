//! Test helpers shared by the unit tests.

use embedded_hal::delay::DelayNs;

use crate::crc::generate_checksum;

/// Sensor response bytes for `words`, each followed by its checksum.
pub fn response(words: &[u16]) -> Vec<u8> {
    words
        .iter()
        .flat_map(|word| {
            let [hi, lo] = word.to_be_bytes();
            [hi, lo, generate_checksum([hi, lo])]
        })
        .collect()
}

/// Delay provider that only adds up the time it was asked to wait.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    total_ns: u64,
}

impl RecordingDelay {
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1_000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
