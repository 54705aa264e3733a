/// Possible errors from the HDC1000 driver.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HdcError {
    /// The retry ceiling was reached without the bus reporting a terminal status.
    BusTimeout,
    /// The bus driver reported the transfer as failed.
    BusError,
    /// A combined read was requested while the chip is in single-measurement mode.
    NotCombinedMode,
    /// The identification registers do not belong to an HDC1000.
    UnexpectedDevice {
        /// Value read from the manufacturer ID register.
        manufacturer: u16,
        /// Value read from the device ID register.
        device: u16,
    },
}

impl core::fmt::Display for HdcError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HdcError::BusTimeout => f.write_str("bus transfer retries exhausted"),
            HdcError::BusError => f.write_str("bus transfer failed"),
            HdcError::NotCombinedMode => f.write_str("combined measurement mode is not enabled"),
            HdcError::UnexpectedDevice {
                manufacturer,
                device,
            } => write!(
                f,
                "unexpected device (manufacturer {manufacturer:#06x}, device {device:#06x})"
            ),
        }
    }
}
