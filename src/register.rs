//! HDC1000 register map and configuration register layout.

/// Fixed 7-bit bus address of the HDC1000.
pub const DEVICE_ADDRESS: u8 = 0x40;

/// Value of the manufacturer ID register ("TI").
pub const MANUFACTURER_ID: u16 = 0x5449;

/// Value of the device ID register.
pub const DEVICE_ID: u16 = 0x1000;

/// Registers of the HDC1000.
///
/// The serial ID spans three consecutive 16-bit registers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Register {
    Temperature = 0x00,
    Humidity = 0x01,
    Configuration = 0x02,
    SerialIdHigh = 0xFB,
    SerialIdMid = 0xFC,
    SerialIdLow = 0xFD,
    ManufacturerId = 0xFE,
    DeviceId = 0xFF,
}

impl Register {
    /// Register pointer byte sent on the bus.
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

// Configuration register bit fields
pub const SOFT_RESET: u16 = 0x8000;
pub const HEATER_ON: u16 = 0x2000;
pub const MODE_COMBINED: u16 = 0x1000;
pub const BATTERY_STATUS_MASK: u16 = 0x0800;
pub const TRES_11: u16 = 0x0400;
pub const HRES_MASK: u16 = 0x0300;
pub const HRES_8: u16 = 0x0200;
pub const HRES_11: u16 = 0x0100;

/// Acquisition mode (MODE bit of the configuration register).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Temperature or humidity is converted, depending on the register pointer.
    Single,
    /// A trigger on the temperature register converts temperature, then humidity.
    Combined,
}

/// Temperature measurement resolution.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureResolution {
    Bits14,
    Bits11,
}

/// Humidity measurement resolution.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HumidityResolution {
    Bits14,
    Bits11,
    Bits8,
}

/// Contents of the configuration register.
///
/// `Default` matches the power-on value of the chip (`0x1000`): heater off,
/// combined acquisition, 14-bit resolution for both channels.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Configuration {
    pub heater: bool,
    pub mode: AcquisitionMode,
    pub temperature_resolution: TemperatureResolution,
    pub humidity_resolution: HumidityResolution,
    /// Battery status as reported by the chip. Read-only, ignored by [`Configuration::bits`].
    pub battery_low: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            heater: false,
            mode: AcquisitionMode::Combined,
            temperature_resolution: TemperatureResolution::Bits14,
            humidity_resolution: HumidityResolution::Bits14,
            battery_low: false,
        }
    }
}

impl Configuration {
    /// Fluent setter for the heater.
    pub fn with_heater(mut self, heater: bool) -> Self {
        self.heater = heater;
        self
    }

    /// Fluent setter for the acquisition mode.
    pub fn with_mode(mut self, mode: AcquisitionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Fluent setter for the temperature resolution.
    pub fn with_temperature_resolution(mut self, resolution: TemperatureResolution) -> Self {
        self.temperature_resolution = resolution;
        self
    }

    /// Fluent setter for the humidity resolution.
    pub fn with_humidity_resolution(mut self, resolution: HumidityResolution) -> Self {
        self.humidity_resolution = resolution;
        self
    }

    /// Encodes the configuration as the 16-bit register value.
    pub fn bits(&self) -> u16 {
        let mut bits = 0;
        if self.heater {
            bits |= HEATER_ON;
        }
        if self.mode == AcquisitionMode::Combined {
            bits |= MODE_COMBINED;
        }
        if self.temperature_resolution == TemperatureResolution::Bits11 {
            bits |= TRES_11;
        }
        bits |= match self.humidity_resolution {
            HumidityResolution::Bits14 => 0,
            HumidityResolution::Bits11 => HRES_11,
            HumidityResolution::Bits8 => HRES_8,
        };
        bits
    }

    /// Decodes a configuration register value.
    ///
    /// The undefined humidity resolution pattern `0b11` decodes as 8 bit.
    pub fn from_bits(bits: u16) -> Self {
        Self {
            heater: bits & HEATER_ON != 0,
            mode: if bits & MODE_COMBINED != 0 {
                AcquisitionMode::Combined
            } else {
                AcquisitionMode::Single
            },
            temperature_resolution: if bits & TRES_11 != 0 {
                TemperatureResolution::Bits11
            } else {
                TemperatureResolution::Bits14
            },
            humidity_resolution: match bits & HRES_MASK {
                0 => HumidityResolution::Bits14,
                HRES_11 => HumidityResolution::Bits11,
                _ => HumidityResolution::Bits8,
            },
            battery_low: bits & BATTERY_STATUS_MASK != 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_power_on_value() {
        assert_eq!(Configuration::default().bits(), 0x1000);
        assert_eq!(Configuration::from_bits(0x1000), Configuration::default());
    }

    #[test]
    fn test_bits_encoding() {
        let config = Configuration::default()
            .with_heater(true)
            .with_mode(AcquisitionMode::Single)
            .with_temperature_resolution(TemperatureResolution::Bits11)
            .with_humidity_resolution(HumidityResolution::Bits8);
        assert_eq!(config.bits(), 0x2000 | 0x0400 | 0x0200);

        let config = Configuration::default().with_humidity_resolution(HumidityResolution::Bits11);
        assert_eq!(config.bits(), 0x1000 | 0x0100);
    }

    #[test]
    fn test_from_bits_reads_battery_status() {
        let config = Configuration::from_bits(0x1800);
        assert!(config.battery_low);
        assert_eq!(config.mode, AcquisitionMode::Combined);
        // battery status is read-only and never written back
        assert_eq!(config.bits(), 0x1000);
    }

    #[test]
    fn test_from_bits_undefined_humidity_resolution() {
        let config = Configuration::from_bits(0x0300);
        assert_eq!(config.humidity_resolution, HumidityResolution::Bits8);
        assert_eq!(config.mode, AcquisitionMode::Single);
    }

    #[test]
    fn test_register_addresses() {
        assert_eq!(Register::Temperature.addr(), 0x00);
        assert_eq!(Register::Humidity.addr(), 0x01);
        assert_eq!(Register::Configuration.addr(), 0x02);
        assert_eq!(Register::SerialIdHigh.addr(), 0xFB);
        assert_eq!(Register::SerialIdLow.addr(), 0xFD);
        assert_eq!(Register::DeviceId.addr(), 0xFF);
    }
}
