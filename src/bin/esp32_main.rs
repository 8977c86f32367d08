//! ESP32-C3 SuperMini garage door controller.
//!
//! This is the main entry point for the physical hardware controller.
//! It runs a 100Hz control loop that:
//! - Reads the closed and open reed switches
//! - Polls the local button ladder and the remote receiver
//! - Pulses the opener relay and plays the close warning
//! - Logs state publishes and events
//! - Persists the lock state across reboots (NVS)
//!
//! # Hardware Setup
//!
//! See [`rs_garage::hal::esp32::pins`] for the wiring.
//!
//! # Build
//!
//! ```bash
//! cargo build --release --features esp32 --bin esp32_main
//! espflash flash --monitor target/riscv32imc-esp-espidf/release/esp32_main
//! ```

use esp_idf_hal::adc::oneshot::AdcDriver;
use esp_idf_hal::gpio::{PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};
use log::{info, warn};
use rs_garage::hal::esp32::{Esp32ButtonLadder, Esp32Clock};
use rs_garage::hal::{GpioDoorHardware, LogSink, Polarity};
use rs_garage::rtttl::BuzzerPlayer;
use rs_garage::traits::Clock;
use rs_garage::{Config, GarageDoor};
use std::thread;
use std::time::Duration;

/// Main loop interval in milliseconds (100Hz = 10ms)
const LOOP_INTERVAL_MS: u64 = 10;

/// NVS namespace and key for the lock state
const NVS_NAMESPACE: &str = "garage";
const NVS_LOCK_KEY: &str = "locked";

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    println!();
    println!("================================");
    println!("  rs-garage SuperMini Controller");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = Config::default();
    config.validate()?;

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Restore lock state (NVS)
    // =========================================================================
    let nvs_partition = EspDefaultNvsPartition::take()?;
    let mut nvs = EspNvs::<NvsDefault>::new(nvs_partition, NVS_NAMESPACE, true)?;
    let restored_lock = match nvs.get_u8(NVS_LOCK_KEY) {
        Ok(value) => value.unwrap_or(0) != 0,
        Err(e) => {
            warn!("Could not read lock state, assuming unlocked: {:?}", e);
            false
        }
    };
    println!("[OK] NVS ready (restored lock: {})", restored_lock);

    // =========================================================================
    // Initialize Sensors and Remote (GPIO4/5/6/7, pull-up)
    // =========================================================================
    let mut closed = PinDriver::input(peripherals.pins.gpio4)?;
    closed.set_pull(Pull::Up)?;
    let mut open = PinDriver::input(peripherals.pins.gpio5)?;
    open.set_pull(Pull::Up)?;
    let mut remote = PinDriver::input(peripherals.pins.gpio6)?;
    remote.set_pull(Pull::Up)?;
    let mut remote_light = PinDriver::input(peripherals.pins.gpio7)?;
    remote_light.set_pull(Pull::Up)?;
    println!("[OK] Sensors and remote initialized (GPIO4/5/6/7)");

    // =========================================================================
    // Initialize Relay (GPIO2) and Status LED (GPIO8)
    // =========================================================================
    let mut relay = PinDriver::output(peripherals.pins.gpio2)?;
    relay.set_low()?;
    let mut status_led = PinDriver::output(peripherals.pins.gpio8)?;
    println!("[OK] Relay initialized (GPIO2)");

    // =========================================================================
    // Initialize Button Ladder (ADC on GPIO3)
    // =========================================================================
    let adc1 = AdcDriver::new(peripherals.adc1)?;
    let ladder = Esp32ButtonLadder::new(&adc1, peripherals.pins.gpio3)?;
    println!("[OK] Button ladder initialized (GPIO3 ADC)");

    // =========================================================================
    // Initialize Warning Buzzer (GPIO10)
    // =========================================================================
    let clock = Esp32Clock::new();
    let buzzer = BuzzerPlayer::new(PinDriver::output(peripherals.pins.gpio10)?, clock);
    println!("[OK] Buzzer initialized (GPIO10)");

    // =========================================================================
    // Initialize Controller
    // =========================================================================
    let hw = GpioDoorHardware::new(
        closed,
        open,
        remote,
        remote_light,
        relay,
        ladder,
        buzzer,
        Polarity::default(),
    );
    let sink = LogSink::new(&config.device.object_id);
    let mut door = GarageDoor::new(config, hw, sink);
    door.setup(clock.now_ms(), restored_lock)?;
    let mut saved_lock = door.is_locked();

    info!(
        "Door ready: {} at {:.0}%",
        door.state().as_str(),
        door.position() * 100.0
    );
    println!();
    println!("Starting control loop (100Hz)...");
    println!();

    // =========================================================================
    // Main Control Loop (100Hz)
    // =========================================================================
    loop {
        let now = clock.now_ms();

        if let Err(e) = door.tick(now) {
            warn!("Tick failed: {}", e);
        }

        // Status LED mirrors the relay
        let led = if door.relay_active() {
            status_led.set_high()
        } else {
            status_led.set_low()
        };
        if let Err(e) = led {
            warn!("Status LED write failed: {}", e);
        }

        // ---------------------------------------------------------------------
        // Persist lock changes
        // ---------------------------------------------------------------------
        let locked = door.is_locked();
        if locked != saved_lock {
            if let Err(e) = nvs.set_u8(NVS_LOCK_KEY, locked as u8) {
                warn!("Could not save lock state: {:?}", e);
            }
            saved_lock = locked;
        }

        thread::sleep(Duration::from_millis(LOOP_INTERVAL_MS));
    }
}
