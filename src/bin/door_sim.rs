//! Desktop door simulator.
//!
//! Runs the controller against a [`SimulatedDoor`] in real time, with a
//! shortened travel time, and plays a script of commands. Every state change
//! is printed; the [`LogSink`] logs what a hub would receive.
//!
//! # Usage
//!
//! Default script:
//! ```sh
//! RUST_LOG=info cargo run --bin door_sim --features sim
//! ```
//!
//! Custom script (any command text, plus `remote` and `button` presses):
//! ```sh
//! cargo run --bin door_sim --features sim -- open 40% close lock remote unlock
//! ```

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::info;

use rs_garage::hal::{LogSink, SimulatedDoor, StdClock, LADDER_IDLE};
use rs_garage::services::SharedDoor;
use rs_garage::{
    Config, DeviceConfig, DoorCommand, DoorConfig, DoorController, GarageDoor, TimingConfig,
};

type Shared = Arc<SharedDoor<SimulatedDoor<StdClock>, LogSink>>;

const OPEN_MS: u32 = 4_000;
const CLOSE_MS: u32 = 5_000;
const TICK: Duration = Duration::from_millis(10);
const STEP_TIMEOUT_MS: u64 = 20_000;
const PRESS_MS: u64 = 300;

const DEFAULT_SCRIPT: &[&str] = &["open", "40%", "close", "lock", "remote", "unlock", "button"];

/// Raw ladder reading for the local door button.
const LADDER_DOOR: u16 = 993;

/// One step of the script.
enum Step {
    Command(DoorCommand),
    Remote,
    Button,
}

impl Step {
    fn parse(text: &str) -> Result<Self> {
        if text.eq_ignore_ascii_case("remote") {
            return Ok(Step::Remote);
        }
        if text.eq_ignore_ascii_case("button") {
            return Ok(Step::Button);
        }
        let command = text
            .parse::<DoorCommand>()
            .with_context(|| format!("invalid command '{}'", text))?;
        Ok(Step::Command(command))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let script = if args.is_empty() {
        DEFAULT_SCRIPT
            .iter()
            .map(|s| Step::parse(s))
            .collect::<Result<Vec<_>>>()?
    } else {
        args.iter().map(|s| Step::parse(s)).collect::<Result<Vec<_>>>()?
    };

    let config = Config::default()
        .with_door(
            DoorConfig::default()
                .with_open_duration_ms(OPEN_MS)
                .with_close_duration_ms(CLOSE_MS),
        )
        .with_timing(TimingConfig::default().with_sensor_read_delay_ms(500))
        .with_device(
            DeviceConfig::default()
                .with_name("Simulated Garage Door")
                .with_warning_tune("warn:d=8,o=6,b=240:c,p,c,p,c"),
        );
    config.validate().context("invalid simulator config")?;

    println!("=================================");
    println!("  rs-garage Door Simulator");
    println!("=================================");
    println!();

    let sink = LogSink::new(&config.device.object_id);
    let hw = SimulatedDoor::closed(StdClock::new(), OPEN_MS, CLOSE_MS);
    let door = Arc::new(SharedDoor::new(GarageDoor::new(config, hw, sink)));
    door.setup(false).context("setup failed")?;
    print_state(&door);

    for step in script {
        match step {
            Step::Command(command) => {
                let outcome = door.clone().apply(command)?;
                println!("> {} -> {:?}", command.as_str(), outcome);
            }
            Step::Remote => {
                println!("> remote button");
                press(&door, |hw, down| hw.remote = down)?;
            }
            Step::Button => {
                println!("> local door button");
                press(&door, |hw, down| {
                    hw.ladder = if down { LADDER_DOOR } else { LADDER_IDLE }
                })?;
            }
        }
        run_until_settled(&door)?;
    }

    println!();
    println!("Script finished");
    Ok(())
}

/// Hold a simulated input down for a moment, ticking the whole time.
fn press(door: &Shared, set: impl Fn(&mut SimulatedDoor<StdClock>, bool)) -> Result<()> {
    door.with_door(|d| set(d.hardware_mut(), true));
    run_for(door, PRESS_MS)?;
    door.with_door(|d| set(d.hardware_mut(), false));
    run_for(door, PRESS_MS)
}

fn run_for(door: &Shared, duration_ms: u64) -> Result<()> {
    let until = door.now_ms() + duration_ms;
    while door.now_ms() < until {
        tick(door)?;
    }
    Ok(())
}

/// Tick until the door is at rest with nothing pending.
fn run_until_settled(door: &Shared) -> Result<()> {
    let deadline = door.now_ms() + STEP_TIMEOUT_MS;
    loop {
        tick(door)?;
        let snapshot = door.snapshot();
        if snapshot.state.is_idle() && snapshot.target.is_none() && !snapshot.relay_active {
            return Ok(());
        }
        if door.now_ms() > deadline {
            bail!("door did not settle, stuck in {}", snapshot.state.as_str());
        }
    }
}

fn tick(door: &Shared) -> Result<()> {
    door.tick().context("tick failed")?;
    if door.check_changes().is_some() {
        print_state(door);
    }
    thread::sleep(TICK);
    Ok(())
}

fn print_state(door: &Shared) {
    let snapshot = door.snapshot();
    let position = door.with_door(|d| d.hardware_mut().position());
    info!(
        "[{:>6}ms] {:<16} estimate {:>3.0}%  actual {:>3.0}%{}",
        door.now_ms(),
        snapshot.state.as_str(),
        snapshot.position * 100.0,
        position * 100.0,
        if snapshot.locked { "  (locked)" } else { "" }
    );
}
