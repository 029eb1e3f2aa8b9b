/// Argument of [`Command::StartMeasurement`] selecting big-endian IEEE754 float output.
pub const MEASUREMENT_FORMAT_FLOAT: u16 = 0x0300;

/// Maximum length of the product type and serial number strings, NUL included.
pub const ASCII_LEN: usize = 32;

/// Settling time the sensor needs before a read of this command's response, in microseconds.
const CMD_DELAY_US: u32 = 5_000;

/// Commands understood by the SPS30 over I2C.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Start continuous measurement, takes the output format as argument.
    StartMeasurement,
    /// Stop measurement and return to idle.
    StopMeasurement,
    /// Read the data-ready flag, `1` when a new measurement is available.
    ReadDataReady,
    /// Read the ten measured values as float word pairs.
    ReadMeasuredValues,
    /// Read or write the fan auto-cleaning interval.
    AutoCleanInterval,
    /// Run the fan at full speed for 10 seconds.
    StartFanCleaning,
    /// Read the NUL-terminated product type string.
    ReadProductType,
    /// Read the NUL-terminated serial number string.
    ReadSerialNumber,
    /// Read the firmware major and minor version.
    ReadFirmwareVersion,
    /// Soft reset, the sensor returns to idle.
    DeviceReset,
}

impl Command {
    /// The 16 bit opcode sent on the bus.
    pub const fn opcode(self) -> u16 {
        match self {
            Self::StartMeasurement => 0x0010,
            Self::StopMeasurement => 0x0104,
            Self::ReadDataReady => 0x0202,
            Self::ReadMeasuredValues => 0x0300,
            Self::AutoCleanInterval => 0x8004,
            Self::StartFanCleaning => 0x5607,
            Self::ReadProductType => 0xD002,
            Self::ReadSerialNumber => 0xD033,
            Self::ReadFirmwareVersion => 0xD100,
            Self::DeviceReset => 0xD304,
        }
    }

    /// Delay between writing the command and reading its response.
    pub const fn read_delay_us(self) -> u32 {
        match self {
            Self::AutoCleanInterval | Self::ReadProductType | Self::ReadSerialNumber => {
                CMD_DELAY_US
            }
            _ => 0,
        }
    }

    /// Number of words in the command's response, zero for write-only commands.
    pub const fn response_words(self) -> usize {
        match self {
            Self::ReadDataReady | Self::ReadFirmwareVersion => 1,
            Self::AutoCleanInterval => 2,
            Self::ReadProductType | Self::ReadSerialNumber => ASCII_LEN / 2,
            Self::ReadMeasuredValues => crate::types::MEASUREMENT_WORDS,
            Self::StartMeasurement
            | Self::StopMeasurement
            | Self::StartFanCleaning
            | Self::DeviceReset => 0,
        }
    }
}
