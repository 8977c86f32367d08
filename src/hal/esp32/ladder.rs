//! Local button ladder read through the ESP32 ADC.
//!
//! The panel pulls GPIO3 to one of four levels. The 12-bit oneshot reading
//! is scaled down to the 0..1023 range the thresholds are written in.
//!
//! # Wiring
//!
//! - Ladder output → GPIO3 (ADC1)
//! - With the panel unplugged the pin floats to ground through the
//!   board's pull-down, reading as `Disconnected`.

use esp_idf_hal::adc::attenuation::DB_11;
use esp_idf_hal::adc::oneshot::config::AdcChannelConfig;
use esp_idf_hal::adc::oneshot::{AdcChannelDriver, AdcDriver};
use esp_idf_hal::adc::ADC1;
use esp_idf_hal::gpio::Gpio3;
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

use crate::traits::ButtonLadder;

/// Button ladder on GPIO3.
///
/// # Example
///
/// ```ignore
/// use rs_garage::hal::esp32::Esp32ButtonLadder;
/// use rs_garage::traits::ButtonLadder;
///
/// let adc = AdcDriver::new(peripherals.adc1)?;
/// let mut ladder = Esp32ButtonLadder::new(&adc, peripherals.pins.gpio3)?;
/// let raw = ladder.read_raw()?;
/// ```
pub struct Esp32ButtonLadder<'d> {
    channel: AdcChannelDriver<'d, Gpio3, &'d AdcDriver<'d, ADC1>>,
}

impl<'d> Esp32ButtonLadder<'d> {
    /// Configure the ADC channel with full-range attenuation.
    ///
    /// # Errors
    ///
    /// Returns an error if ADC channel initialization fails.
    pub fn new(
        adc: &'d AdcDriver<'d, ADC1>,
        pin: impl Peripheral<P = Gpio3> + 'd,
    ) -> Result<Self, EspError> {
        let config = AdcChannelConfig {
            attenuation: DB_11,
            ..Default::default()
        };
        let channel = AdcChannelDriver::new(adc, pin, &config)?;
        Ok(Self { channel })
    }
}

impl ButtonLadder for Esp32ButtonLadder<'_> {
    type Error = EspError;

    fn read_raw(&mut self) -> Result<u16, EspError> {
        // 12-bit reading to 10-bit scale
        Ok(self.channel.read()?.min(4095) >> 2)
    }
}
