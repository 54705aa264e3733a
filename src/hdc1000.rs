use embedded_hal::{delay::DelayNs, i2c::I2c};

use crate::error::HdcError;
use crate::register::{
    AcquisitionMode, Configuration, DEVICE_ID, MANUFACTURER_ID, Register, SOFT_RESET,
};
use crate::transfer::{self, I2cBus, MasterBus};

/// Time the chip needs to convert a single measurement.
pub const CONVERSION_DELAY_MS: u32 = 8;

/// Time the chip needs to convert temperature and humidity back to back.
pub const COMBINED_CONVERSION_DELAY_MS: u32 = 16;

/// Start-up time after a software reset.
pub const RESET_DELAY_MS: u32 = 15;

/// Driver for the HDC1000 temperature and humidity sensor.
pub struct Hdc1000<BUS, D> {
    bus: BUS,
    delay: D,
    mode: AcquisitionMode,
}

/// Raw conversion results of a combined measurement.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMeasurement {
    /// Raw temperature register value.
    pub temperature: u16,
    /// Raw humidity register value.
    pub humidity: u16,
}

impl RawMeasurement {
    /// Temperature in degrees Celsius.
    pub fn celsius(&self) -> f32 {
        temperature_celsius(self.temperature)
    }

    /// Relative humidity in percent.
    pub fn relative_humidity(&self) -> f32 {
        relative_humidity_percent(self.humidity)
    }
}

/// Reading converted to physical units.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub relative_humidity: f32,
}

impl From<RawMeasurement> for Reading {
    fn from(raw: RawMeasurement) -> Self {
        Reading {
            temperature: raw.celsius(),
            relative_humidity: raw.relative_humidity(),
        }
    }
}

/// Converts a raw temperature register value to degrees Celsius.
pub fn temperature_celsius(raw: u16) -> f32 {
    raw as f32 * 165.0 / 65536.0 - 40.0
}

/// Converts a raw humidity register value to percent relative humidity.
pub fn relative_humidity_percent(raw: u16) -> f32 {
    raw as f32 * 100.0 / 65536.0
}

impl<I2C, D> Hdc1000<I2cBus<I2C>, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Creates a driver talking through a blocking `embedded-hal` I2C bus.
    pub fn new_i2c(i2c: I2C, delay: D) -> Self {
        Self::new(I2cBus::new(i2c), delay)
    }
}

impl<BUS, D> Hdc1000<BUS, D>
where
    BUS: MasterBus,
    D: DelayNs,
{
    /// Creates a new instance of the HDC1000 driver.
    ///
    /// The chip is assumed to be in its power-on configuration, which uses
    /// combined acquisition.
    ///
    /// # Arguments
    ///
    /// * `bus` - The bus peripheral the HDC1000 is attached to.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(bus: BUS, delay: D) -> Self {
        Hdc1000 {
            bus,
            delay,
            mode: AcquisitionMode::Combined,
        }
    }

    /// Releases the bus and the delay provider.
    pub fn release(self) -> (BUS, D) {
        (self.bus, self.delay)
    }

    /// Acquisition mode the driver believes the chip is in.
    pub fn mode(&self) -> AcquisitionMode {
        self.mode
    }

    /// Writes a 16-bit value to a register, most significant byte first.
    ///
    /// Writing the configuration register also updates the tracked
    /// acquisition mode.
    pub fn set_register(&mut self, register: Register, value: u16) -> Result<(), HdcError> {
        let [high, low] = value.to_be_bytes();
        transfer::write(&mut self.bus, &[register.addr(), high, low])?;

        if register == Register::Configuration {
            self.mode = if value & SOFT_RESET != 0 {
                Configuration::default().mode
            } else {
                Configuration::from_bits(value).mode
            };
        }
        Ok(())
    }

    /// Reads a 16-bit register.
    ///
    /// This writes the register pointer, waits [`CONVERSION_DELAY_MS`] for the
    /// chip to finish converting, then reads two bytes.
    pub fn get_register(&mut self, register: Register) -> Result<u16, HdcError> {
        transfer::write(&mut self.bus, &[register.addr()])?;
        self.delay.delay_ms(CONVERSION_DELAY_MS);

        let mut data = [0; 2];
        transfer::read(&mut self.bus, &mut data)?;
        Ok(u16::from_be_bytes(data))
    }

    /// Triggers a temperature conversion and returns the raw result.
    pub fn get_temperature(&mut self) -> Result<u16, HdcError> {
        self.get_register(Register::Temperature)
    }

    /// Triggers a humidity conversion and returns the raw result.
    pub fn get_humidity(&mut self) -> Result<u16, HdcError> {
        self.get_register(Register::Humidity)
    }

    /// Triggers a combined conversion and returns both raw results.
    ///
    /// # Errors
    ///
    /// Returns `HdcError::NotCombinedMode` without touching the bus if the
    /// chip was configured for single acquisition.
    pub fn get_combined(&mut self) -> Result<RawMeasurement, HdcError> {
        if self.mode != AcquisitionMode::Combined {
            return Err(HdcError::NotCombinedMode);
        }

        transfer::write(&mut self.bus, &[Register::Temperature.addr()])?;
        self.delay.delay_ms(COMBINED_CONVERSION_DELAY_MS);

        let mut data = [0; 4];
        transfer::read(&mut self.bus, &mut data)?;
        let [t_hi, t_lo, h_hi, h_lo] = data;

        Ok(RawMeasurement {
            temperature: u16::from_be_bytes([t_hi, t_lo]),
            humidity: u16::from_be_bytes([h_hi, h_lo]),
        })
    }

    /// Reads temperature and humidity and converts them to physical units.
    pub fn read(&mut self) -> Result<Reading, HdcError> {
        self.get_combined().map(Reading::from)
    }

    /// Writes the configuration register.
    pub fn configure(&mut self, config: Configuration) -> Result<(), HdcError> {
        self.set_register(Register::Configuration, config.bits())
    }

    /// Reads the configuration register and resynchronises the tracked mode.
    pub fn read_configuration(&mut self) -> Result<Configuration, HdcError> {
        let config = Configuration::from_bits(self.get_register(Register::Configuration)?);
        self.mode = config.mode;
        Ok(config)
    }

    /// Returns `true` when the chip reports a supply voltage below 2.8 V.
    pub fn battery_low(&mut self) -> Result<bool, HdcError> {
        Ok(self.read_configuration()?.battery_low)
    }

    /// Performs a software reset and waits for the chip to start up again.
    pub fn reset(&mut self) -> Result<(), HdcError> {
        self.set_register(Register::Configuration, SOFT_RESET)?;
        self.delay.delay_ms(RESET_DELAY_MS);
        Ok(())
    }

    /// Reads the manufacturer ID register (`0x5449` for Texas Instruments).
    pub fn manufacturer_id(&mut self) -> Result<u16, HdcError> {
        self.get_register(Register::ManufacturerId)
    }

    /// Reads the device ID register (`0x1000` for the HDC1000).
    pub fn device_id(&mut self) -> Result<u16, HdcError> {
        self.get_register(Register::DeviceId)
    }

    /// Reads the 41-bit serial number spread over the three serial ID registers.
    pub fn serial_id(&mut self) -> Result<u64, HdcError> {
        let high = self.get_register(Register::SerialIdHigh)? as u64;
        let mid = self.get_register(Register::SerialIdMid)? as u64;
        let low = self.get_register(Register::SerialIdLow)? as u64;
        Ok(high << 25 | mid << 9 | low >> 7)
    }

    /// Checks that the device answering at the bus address is an HDC1000.
    pub fn probe(&mut self) -> Result<(), HdcError> {
        let manufacturer = self.manufacturer_id()?;
        let device = self.device_id()?;
        if manufacturer != MANUFACTURER_ID || device != DEVICE_ID {
            warn!(
                "unexpected device, manufacturer {} device {}",
                manufacturer, device
            );
            return Err(HdcError::UnexpectedDevice {
                manufacturer,
                device,
            });
        }
        Ok(())
    }
}
