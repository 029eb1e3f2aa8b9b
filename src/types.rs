/// Number of response words holding one [`MeasurementRecord`].
pub const MEASUREMENT_WORDS: usize = 20;

/// SPS30 measurement, all values as reported by the sensor in float format.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementRecord {
    /// Mass Concentration PM1.0 [μg/m³]
    pub mass_pm1_0: f32,
    /// Mass Concentration PM2.5 [μg/m³]
    pub mass_pm2_5: f32,
    /// Mass Concentration PM4.0 [μg/m³]
    pub mass_pm4_0: f32,
    /// Mass Concentration PM10 [μg/m³]
    pub mass_pm10_0: f32,
    /// Number Concentration PM0.5 [#/cm³]
    pub number_pm0_5: f32,
    /// Number Concentration PM1.0 [#/cm³]
    pub number_pm1_0: f32,
    /// Number Concentration PM2.5 [#/cm³]
    pub number_pm2_5: f32,
    /// Number Concentration PM4.0 [#/cm³]
    pub number_pm4_0: f32,
    /// Number Concentration PM10 [#/cm³]
    pub number_pm10_0: f32,
    /// Average particle size [μm]
    pub average_particle_size: f32,
}

impl MeasurementRecord {
    /// Builds a record from the verified measurement words, two per float, high word first.
    pub fn from_words(words: &[u16; MEASUREMENT_WORDS]) -> Self {
        let value = |index: usize| {
            f32::from_bits((u32::from(words[2 * index]) << 16) | u32::from(words[2 * index + 1]))
        };
        MeasurementRecord {
            mass_pm1_0: value(0),
            mass_pm2_5: value(1),
            mass_pm4_0: value(2),
            mass_pm10_0: value(3),
            number_pm0_5: value(4),
            number_pm1_0: value(5),
            number_pm2_5: value(6),
            number_pm4_0: value(7),
            number_pm10_0: value(8),
            average_particle_size: value(9),
        }
    }
}

/// Driver-side model of the sensor's operating mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleState {
    /// The sensor has not been probed yet.
    Uninitialized,
    /// Probed and ready, not measuring.
    Idle,
    /// Continuous measurement is running.
    Measuring,
}

/// Firmware version reported by the sensor.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareVersion {
    /// Major version, high byte of the response word
    pub major: u8,
    /// Minor version, low byte of the response word
    pub minor: u8,
}

impl From<u16> for FirmwareVersion {
    fn from(word: u16) -> Self {
        let [major, minor] = word.to_be_bytes();
        FirmwareVersion { major, minor }
    }
}
