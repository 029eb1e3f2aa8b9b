//! Command/response transactions on the I2C bus.

use alloc::vec;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use crate::error::Error;
use crate::frame;

/// Issues framed commands to a sensor at a fixed bus address.
///
/// Every call blocks until the bus transfer, and for delayed reads the
/// settling time, has completed.
pub struct CommandExecutor<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C, D> CommandExecutor<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Creates an executor talking to the device at `address`.
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// The I2C address commands are sent to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Writes a bare opcode.
    pub fn write_command(&mut self, opcode: u16) -> Result<(), Error<I2C::Error>> {
        self.write_command_with_args(opcode, &[])
    }

    /// Writes an opcode followed by checksummed argument words.
    pub fn write_command_with_args(
        &mut self,
        opcode: u16,
        args: &[u16],
    ) -> Result<(), Error<I2C::Error>> {
        let buf = frame::encode(opcode, args);
        self.i2c.write(self.address, &buf).map_err(Error::I2c)
    }

    /// Writes `opcode`, waits `delay_us` if non-zero, then reads and verifies `num_words` words.
    ///
    /// A failed write skips the read. A checksum failure is reported as
    /// [`Error::Checksum`] and never as a bus error.
    pub fn read_delayed(
        &mut self,
        opcode: u16,
        delay_us: u32,
        num_words: usize,
    ) -> Result<Vec<u16>, Error<I2C::Error>> {
        self.write_command(opcode)?;

        if delay_us > 0 {
            self.delay.delay_us(delay_us);
        }

        let mut raw = vec![0u8; frame::response_len(num_words)];
        self.i2c.read(self.address, &mut raw).map_err(Error::I2c)?;

        let words = frame::decode(&raw, num_words).inspect_err(|_err| {
            #[cfg(feature = "defmt")]
            defmt::warn!("SPS30 response to {=u16:#x} rejected: {}", opcode, _err);
        })?;
        Ok(words)
    }

    /// [`read_delayed`](Self::read_delayed) without a settling delay.
    pub fn read_command(
        &mut self,
        opcode: u16,
        num_words: usize,
    ) -> Result<Vec<u16>, Error<I2C::Error>> {
        self.read_delayed(opcode, 0, num_words)
    }

    /// Gives back the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{response, RecordingDelay};
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDRESS: u8 = 0x69;

    fn executor(expectations: &[I2cTransaction]) -> CommandExecutor<I2cMock, RecordingDelay> {
        CommandExecutor::new(I2cMock::new(expectations), RecordingDelay::default(), ADDRESS)
    }

    fn finish(executor: CommandExecutor<I2cMock, RecordingDelay>) -> RecordingDelay {
        let (mut i2c, delay) = executor.release();
        i2c.done();
        delay
    }

    #[test]
    fn write_with_args_sends_exact_frame_length() {
        let expectations = [I2cTransaction::write(
            ADDRESS,
            vec![0x80, 0x04, 0x00, 0x09, 0x09, 0x3a, 0x80, 0xa7],
        )];
        let mut executor = executor(&expectations);

        assert_eq!(executor.address(), ADDRESS);
        executor
            .write_command_with_args(0x8004, &[0x0009, 0x3a80])
            .unwrap();

        finish(executor);
    }

    #[test]
    fn delayed_read_waits_then_decodes() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x80, 0x04]),
            I2cTransaction::read(ADDRESS, response(&[0x0009, 0x3a80])),
        ];
        let mut executor = executor(&expectations);

        let words = executor.read_delayed(0x8004, 5_000, 2).unwrap();

        assert_eq!(words, [0x0009, 0x3a80]);
        assert_eq!(finish(executor).total_us(), 5_000);
    }

    #[test]
    fn read_command_does_not_wait() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x02, 0x02]),
            I2cTransaction::read(ADDRESS, response(&[0x0001])),
        ];
        let mut executor = executor(&expectations);

        assert_eq!(executor.read_command(0x0202, 1).unwrap(), [0x0001]);
        assert_eq!(finish(executor).total_us(), 0);
    }

    #[test]
    fn failed_write_skips_read() {
        let expectations =
            [I2cTransaction::write(ADDRESS, vec![0x02, 0x02]).with_error(ErrorKind::Other)];
        let mut executor = executor(&expectations);

        assert_eq!(
            executor.read_delayed(0x0202, 5_000, 1),
            Err(Error::I2c(ErrorKind::Other))
        );
        assert_eq!(finish(executor).total_us(), 0);
    }

    #[test]
    fn failed_read_is_a_bus_error() {
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x02, 0x02]),
            I2cTransaction::read(ADDRESS, vec![0x00, 0x01, 0xb0]).with_error(ErrorKind::Other),
        ];
        let mut executor = executor(&expectations);

        assert_eq!(
            executor.read_command(0x0202, 1),
            Err(Error::I2c(ErrorKind::Other))
        );
        finish(executor);
    }

    #[test]
    fn corrupted_response_is_a_checksum_error() {
        let mut raw = response(&[0x0009, 0x3a80]);
        raw[5] ^= 0x01;
        let expectations = [
            I2cTransaction::write(ADDRESS, vec![0x80, 0x04]),
            I2cTransaction::read(ADDRESS, raw),
        ];
        let mut executor = executor(&expectations);

        assert_eq!(
            executor.read_command(0x8004, 2),
            Err(Error::Checksum { word: 1 })
        );
        finish(executor);
    }
}
