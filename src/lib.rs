#![cfg_attr(not(test), no_std)]
//! embedded-hal driver for the Sensirion SPS30 particulate matter sensor.
//!
//! The driver speaks the SPS30 I2C protocol: every 16 bit word on the bus is
//! big-endian and followed by a CRC-8 checksum. It also tracks whether the
//! sensor has been probed and whether a measurement is running, and rejects
//! commands that make no sense in the current state.
//!
//! ```text
//!   Uninitialized ──init()──► Idle ──start()──► Measuring
//!                              ▲                   │
//!                              └──────stop()───────┘
//! ```
//!
//! Example:
//!
//! ```
//! # use embedded_hal_mock::eh1::delay::NoopDelay;
//! # use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction};
//! # use sps30_rs::{Sps30, DEFAULT_ADDRESS};
//! # // "00080000" followed by NUL padding, every word with its checksum
//! # let mut product_type = vec![
//! #     0x30, 0x30, 0xf6, 0x30, 0x38, 0x4f, 0x30, 0x30, 0xf6, 0x30, 0x30, 0xf6,
//! # ];
//! # product_type.extend([0x00, 0x00, 0x81].repeat(12));
//! # let expectations = [
//! #     Transaction::write(DEFAULT_ADDRESS, vec![0xd0, 0x02]),
//! #     Transaction::read(DEFAULT_ADDRESS, product_type),
//! #     Transaction::write(DEFAULT_ADDRESS, vec![0x00, 0x10, 0x03, 0x00, 0xac]),
//! #     Transaction::write(DEFAULT_ADDRESS, vec![0x02, 0x02]),
//! #     Transaction::read(DEFAULT_ADDRESS, vec![0x00, 0x01, 0xb0]),
//! #     Transaction::write(DEFAULT_ADDRESS, vec![0x03, 0x00]),
//! #     Transaction::read(DEFAULT_ADDRESS, [0x00, 0x00, 0x81].repeat(20)),
//! # ];
//! let i2c = I2cMock::new(&expectations);
//! let mut sensor = Sps30::new(i2c, NoopDelay::new());
//!
//! sensor.init().unwrap();
//! sensor.start().unwrap();
//! if sensor.is_new_data_available().unwrap() {
//!     let data = sensor.get_measurement().unwrap();
//!     println!("PM2.5: {:.1} μg/m³", data.mass_pm2_5);
//! }
//! # let (mut i2c, _) = sensor.release();
//! # i2c.done();
//! ```

extern crate alloc;

pub mod commands;
pub mod crc;
pub mod error;
pub mod executor;
pub mod frame;
pub mod types;

#[cfg(test)]
mod testing;

use alloc::string::String;
use alloc::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

pub use commands::Command;
pub use error::{Error, FrameError};
pub use executor::CommandExecutor;
pub use types::{FirmwareVersion, LifecycleState, MeasurementRecord, MEASUREMENT_WORDS};

/// I2C address of the SPS30.
pub const DEFAULT_ADDRESS: u8 = 0x69;

use LifecycleState::{Idle, Measuring, Uninitialized};

/// SPS30 driver.
pub struct Sps30<I2C, D> {
    executor: CommandExecutor<I2C, D>,
    state: LifecycleState,
    // Cleared by a device reset, which silently stops a running measurement.
    started: bool,
}

impl<I2C, D> Sps30<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Creates a driver for a sensor at [`DEFAULT_ADDRESS`]. No bus traffic happens until [`init`](Self::init).
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::new_with_address(i2c, delay, DEFAULT_ADDRESS)
    }

    /// Creates a driver for a sensor at a non-default I2C address.
    pub fn new_with_address(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            executor: CommandExecutor::new(i2c, delay, address),
            state: Uninitialized,
            started: false,
        }
    }

    /// The lifecycle state tracked by the driver.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// The I2C address commands are sent to.
    pub fn address(&self) -> u8 {
        self.executor.address()
    }

    /// Destroys the driver and returns the bus and delay provider.
    pub fn release(self) -> (I2C, D) {
        self.executor.release()
    }

    /// Probes the sensor by reading its product type.
    ///
    /// Must be called once before anything but [`reset`](Self::reset). The
    /// driver stays uninitialized if the sensor does not answer. The sensor
    /// may still be measuring from an earlier session; follow up with
    /// [`reset`](Self::reset) to put it into a known idle state.
    pub fn init(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure("init", &[Uninitialized])?;
        self.read_ascii(Command::ReadProductType)?;
        self.transition(Idle);
        Ok(())
    }

    /// Resets the sensor. Allowed in every state; the tracked state is left as is.
    ///
    /// The sensor drops any running measurement, so the next
    /// [`start`](Self::start) always sends the start command. The sensor needs
    /// about 100 ms after a reset before it accepts the next command; the
    /// driver does not wait for it.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.write(Command::DeviceReset)?;
        self.started = false;
        Ok(())
    }

    /// Reads the serial number.
    pub fn get_serial_number(&mut self) -> Result<String, Error<I2C::Error>> {
        self.ensure("get_serial_number", &[Idle, Measuring])?;
        self.read_ascii(Command::ReadSerialNumber)
    }

    /// Reads the product type, `"00080000"` for the SPS30.
    pub fn get_product_number(&mut self) -> Result<String, Error<I2C::Error>> {
        self.ensure("get_product_number", &[Idle, Measuring])?;
        self.read_ascii(Command::ReadProductType)
    }

    /// Reads the firmware version.
    pub fn read_firmware_version(&mut self) -> Result<FirmwareVersion, Error<I2C::Error>> {
        self.ensure("read_firmware_version", &[Idle, Measuring])?;
        let words = self.read(Command::ReadFirmwareVersion)?;
        Ok(FirmwareVersion::from(words[0]))
    }

    /// Starts continuous measurement with float output. Does nothing if already measuring.
    pub fn start(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure("start", &[Idle, Measuring])?;
        if self.state == Measuring && self.started {
            return Ok(());
        }
        self.executor.write_command_with_args(
            Command::StartMeasurement.opcode(),
            &[commands::MEASUREMENT_FORMAT_FLOAT],
        )?;
        self.started = true;
        self.transition(Measuring);
        Ok(())
    }

    /// Stops measurement. Does nothing if already idle.
    pub fn stop(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure("stop", &[Idle, Measuring])?;
        if self.state == Idle {
            return Ok(());
        }
        self.write(Command::StopMeasurement)?;
        self.started = false;
        self.transition(Idle);
        Ok(())
    }

    /// Whether a measurement has been taken since the last [`get_measurement`](Self::get_measurement).
    pub fn is_new_data_available(&mut self) -> Result<bool, Error<I2C::Error>> {
        self.ensure("is_new_data_available", &[Measuring])?;
        let words = self.read(Command::ReadDataReady)?;
        Ok(words[0] == 1)
    }

    /// Reads the latest measured values.
    pub fn get_measurement(&mut self) -> Result<MeasurementRecord, Error<I2C::Error>> {
        self.ensure("get_measurement", &[Measuring])?;
        let words = self.read(Command::ReadMeasuredValues)?;
        let words: &[u16; MEASUREMENT_WORDS] =
            words.as_slice().try_into().map_err(|_| Error::Length {
                expected: frame::response_len(MEASUREMENT_WORDS),
                actual: frame::response_len(words.len()),
            })?;
        Ok(MeasurementRecord::from_words(words))
    }

    /// Reads the fan auto-cleaning interval in seconds.
    ///
    /// The sensor forgets a written interval on power loss, so the value is
    /// always read back from the device.
    pub fn get_auto_clean_interval(&mut self) -> Result<u32, Error<I2C::Error>> {
        self.ensure("get_auto_clean_interval", &[Idle, Measuring])?;
        let words = self.read(Command::AutoCleanInterval)?;
        Ok((u32::from(words[0]) << 16) | u32::from(words[1]))
    }

    /// Writes the fan auto-cleaning interval in seconds. Lost on power loss.
    pub fn set_auto_clean_interval(&mut self, seconds: u32) -> Result<(), Error<I2C::Error>> {
        self.ensure("set_auto_clean_interval", &[Idle, Measuring])?;
        let args = [(seconds >> 16) as u16, seconds as u16];
        self.executor
            .write_command_with_args(Command::AutoCleanInterval.opcode(), &args)
    }

    /// Runs the fan at full speed for 10 seconds. Only accepted while measuring.
    pub fn start_fan_cleaning(&mut self) -> Result<(), Error<I2C::Error>> {
        self.ensure("start_fan_cleaning", &[Measuring])?;
        self.write(Command::StartFanCleaning)
    }

    fn ensure(
        &self,
        operation: &'static str,
        allowed: &[LifecycleState],
    ) -> Result<(), Error<I2C::Error>> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(Error::State {
                operation,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, next: LifecycleState) {
        #[cfg(feature = "defmt")]
        defmt::debug!("SPS30 {} -> {}", self.state, next);
        self.state = next;
    }

    fn write(&mut self, command: Command) -> Result<(), Error<I2C::Error>> {
        self.executor.write_command(command.opcode())
    }

    fn read(&mut self, command: Command) -> Result<Vec<u16>, Error<I2C::Error>> {
        self.executor.read_delayed(
            command.opcode(),
            command.read_delay_us(),
            command.response_words(),
        )
    }

    fn read_ascii(&mut self, command: Command) -> Result<String, Error<I2C::Error>> {
        let words = self.read(command)?;
        let bytes: Vec<u8> = words
            .iter()
            .flat_map(|word| word.to_be_bytes())
            .take_while(|&byte| byte != 0)
            .collect();
        if !bytes.is_ascii() {
            return Err(Error::InvalidString);
        }
        String::from_utf8(bytes).map_err(|_| Error::InvalidString)
    }
}
