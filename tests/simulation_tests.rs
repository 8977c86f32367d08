//! End-to-end tests against the simulated opener.
//!
//! The controller and the [`SimulatedDoor`] share one [`MockClock`], so the
//! door physically moves between ticks and the sensors follow it.

use rs_garage::hal::{MockClock, MockSink, MotorState, SimulatedDoor, LADDER_IDLE};
use rs_garage::{
    Config, DeviceConfig, DoorController, DoorEvent, DoorState, GarageDoor, TargetState,
};

const TRAVEL_MS: u32 = 10_000;
const STEP_MS: u64 = 10;
const LADDER_DOOR: u16 = 993;

struct Rig {
    clock: MockClock,
    door: GarageDoor<SimulatedDoor<MockClock>, MockSink>,
}

impl Rig {
    fn new(position: f32) -> Self {
        let clock = MockClock::new();
        let sim = SimulatedDoor::new(clock.clone(), TRAVEL_MS, TRAVEL_MS, position);
        // One second warning
        let config = Config::default()
            .with_device(DeviceConfig::default().with_warning_tune("w:d=4,o=5,b=120:c,c"));
        let mut door = GarageDoor::new(config, sim, MockSink::new());
        door.setup(0, false).unwrap();
        Self { clock, door }
    }

    fn now(&self) -> u64 {
        use rs_garage::traits::Clock;
        self.clock.now_ms()
    }

    fn step(&mut self) {
        self.clock.advance(STEP_MS);
        let now = self.now();
        self.door.tick(now).unwrap();
    }

    fn run_for(&mut self, ms: u64) {
        let until = self.now() + ms;
        while self.now() < until {
            self.step();
        }
    }

    /// Step until `done` holds. Returns false on hitting `limit_ms`.
    fn run_until(&mut self, limit_ms: u64, done: impl Fn(&Self) -> bool) -> bool {
        let until = self.now() + limit_ms;
        while self.now() < until {
            self.step();
            if done(self) {
                return true;
            }
        }
        false
    }

    fn settled(&self) -> bool {
        self.door.state().is_idle() && self.door.target().is_none() && !self.door.relay_active()
    }

    fn sim(&mut self) -> &mut SimulatedDoor<MockClock> {
        self.door.hardware_mut()
    }

    /// Hold the local door button until the door reacts, then let go
    /// long enough for the release to be read after the relay gap.
    fn press_door_button(&mut self) {
        let before = self.door.state();
        self.sim().ladder = LADDER_DOOR;
        assert!(self.run_until(1_000, |r| r.door.state() != before));
        self.sim().ladder = LADDER_IDLE;
        self.run_for(500);
    }
}

// ============================================================================
// Full Travel
// ============================================================================

#[test]
fn open_then_close() {
    let mut rig = Rig::new(0.0);

    rig.door.request(TargetState::Open).unwrap();
    assert!(rig.run_until(15_000, |r| r.door.state() == DoorState::Open));
    assert_eq!(rig.sim().position(), 1.0);
    let open_ms = rig.door.snapshot().last_open_ms.unwrap();
    assert!((10_000..=10_010).contains(&open_ms), "open took {}", open_ms);

    rig.door.request(TargetState::Closed).unwrap();
    rig.step();
    assert_eq!(rig.door.state(), DoorState::CloseWarning);
    assert!(rig.run_until(15_000, |r| r.door.state() == DoorState::Closed));
    assert_eq!(rig.sim().position(), 0.0);
    let close_ms = rig.door.snapshot().last_close_ms.unwrap();
    assert!((10_000..=10_010).contains(&close_ms), "close took {}", close_ms);

    assert_eq!(rig.sim().pulse_count, 2);
    assert!(rig.door.sink().events.is_empty());
}

#[test]
fn partial_open_stops_near_target() {
    let mut rig = Rig::new(0.0);

    rig.door.control(false, Some(0.5)).unwrap();
    assert!(rig.run_until(15_000, |r| r.settled()));
    assert_eq!(rig.door.state(), DoorState::StoppedOpening);
    assert!((rig.door.position() - 0.5).abs() <= 0.011);

    let actual = rig.sim().position();
    assert!((actual - 0.5).abs() < 0.03, "door stopped at {}", actual);
    assert_eq!(rig.sim().motor(), MotorState::Stopped { opens_next: false });
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn obstruction_reverses_and_reports_close_failed() {
    let mut rig = Rig::new(1.0);
    rig.sim().obstruction_at = Some(0.5);

    rig.door.request(TargetState::Closed).unwrap();
    assert!(rig.run_until(5_000, |r| r.door.state() == DoorState::Closing));
    assert!(rig.run_until(15_000, |r| r.door.state() == DoorState::Open));

    assert_eq!(rig.door.sink().events, vec![DoorEvent::CloseFailed]);
    assert_eq!(rig.door.target(), TargetState::None);
    assert_eq!(rig.sim().position(), 1.0);
    assert_eq!(rig.sim().motor(), MotorState::Stopped { opens_next: false });
}

#[test]
fn jammed_door_times_out_then_recovers() {
    let mut rig = Rig::new(0.0);

    rig.door.request(TargetState::Open).unwrap();
    rig.run_for(3_000);
    assert_eq!(rig.door.state(), DoorState::Opening);
    rig.sim().jammed = true;

    assert!(rig.run_until(25_000, |r| r.door.state() == DoorState::Unknown));
    assert_eq!(rig.door.position(), 0.5);
    assert_eq!(rig.door.target(), TargetState::None);

    // Freed, the motor carries on to the open stop
    rig.sim().jammed = false;
    assert!(rig.run_until(10_000, |r| r.door.state() == DoorState::Open));
    assert!(rig.door.sink().events.is_empty());
    assert_eq!(rig.sim().pulse_count, 1);
}

// ============================================================================
// Buttons and Lock
// ============================================================================

#[test]
fn local_button_follows_opener_cycle() {
    let mut rig = Rig::new(0.0);
    rig.step();

    rig.press_door_button();
    assert_eq!(rig.door.state(), DoorState::Opening);
    assert_eq!(rig.sim().motor(), MotorState::Opening);
    rig.run_for(2_000);

    rig.press_door_button();
    assert_eq!(rig.door.state(), DoorState::StoppedOpening);
    assert_eq!(rig.sim().motor(), MotorState::Stopped { opens_next: false });

    // Attended: no warning
    rig.press_door_button();
    assert_eq!(rig.door.state(), DoorState::Closing);
    assert_eq!(rig.sim().motor(), MotorState::Closing);

    rig.press_door_button();
    assert_eq!(rig.door.state(), DoorState::StoppedClosing);
    assert_eq!(rig.sim().motor(), MotorState::Stopped { opens_next: true });
    assert_eq!(rig.sim().pulse_count, 4);
}

#[test]
fn lock_from_open_then_remote_ignored() {
    let mut rig = Rig::new(1.0);

    rig.door.lock().unwrap();
    assert!(rig.run_until(20_000, |r| r.door.state() == DoorState::Locked));
    assert_eq!(rig.sim().position(), 0.0);
    assert_eq!(rig.door.sink().last_lock_state(), Some(true));
    assert_eq!(rig.sim().pulse_count, 1);

    for _ in 0..3 {
        rig.sim().remote = true;
        rig.run_for(100);
        rig.sim().remote = false;
        rig.run_for(300);
    }
    assert_eq!(rig.door.state(), DoorState::Locked);
    assert_eq!(rig.sim().pulse_count, 1);
    assert_eq!(rig.sim().motor(), MotorState::Stopped { opens_next: true });

    rig.door.unlock().unwrap();
    rig.sim().remote = true;
    rig.run_for(100);
    assert_eq!(rig.door.state(), DoorState::Opening);
}
