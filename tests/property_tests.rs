//! Property tests for the door state machine.
//!
//! Random sequences of hub commands, sensor changes, button input and time
//! are fed to the controller; the invariants are checked after every step.

use proptest::prelude::*;

use rs_garage::hal::{MockDoorHardware, MockSink, LADDER_IDLE};
use rs_garage::position::{MAX_ESTIMATE, MIN_ESTIMATE};
use rs_garage::{Config, DoorController, DoorState, GarageDoor, TargetState};

type Door = GarageDoor<MockDoorHardware, MockSink>;

const TICK_MS: u64 = 50;

#[derive(Debug, Clone)]
enum Op {
    Request(TargetState),
    Lock,
    Unlock,
    Closed(bool),
    Open(bool),
    Remote(bool),
    Ladder(u16),
    FinishWarning,
    Wait(u64),
    /// Run open until the estimate saturates, stop, then start a hub close
    /// and cancel its warning.
    StopSaturatedThenClose,
}

/// Tracks how the door entered a sensor-confirmed state.
struct Watch {
    prev: DoorState,
    warning_from_open: bool,
}

impl Watch {
    fn new(door: &Door) -> Self {
        Self {
            prev: door.state(),
            warning_from_open: false,
        }
    }
}

fn arb_target() -> impl Strategy<Value = TargetState> {
    prop_oneof![
        Just(TargetState::Open),
        Just(TargetState::Closed),
        Just(TargetState::Stopped),
        Just(TargetState::Locked),
        (-0.5f32..1.5f32).prop_map(TargetState::Position),
    ]
}

fn arb_hub_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_target().prop_map(Op::Request),
        Just(Op::Lock),
        Just(Op::Unlock),
        any::<bool>().prop_map(Op::Closed),
        any::<bool>().prop_map(Op::Open),
        Just(Op::FinishWarning),
        (TICK_MS..3_000u64).prop_map(Op::Wait),
        Just(Op::StopSaturatedThenClose),
    ]
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => arb_hub_op(),
        1 => any::<bool>().prop_map(Op::Remote),
        1 => prop_oneof![Just(LADDER_IDLE), 0u16..1024].prop_map(Op::Ladder),
    ]
}

fn arb_start() -> impl Strategy<Value = MockDoorHardware> {
    prop_oneof![
        Just(MockDoorHardware::closed()),
        Just(MockDoorHardware::open()),
        Just(MockDoorHardware::new()),
    ]
}

/// Apply one op. Returns the new time.
fn step(door: &mut Door, watch: &mut Watch, op: &Op, now: u64) -> u64 {
    match op {
        Op::Request(target) => {
            door.request(*target).unwrap();
        }
        Op::Lock => {
            door.lock().unwrap();
        }
        Op::Unlock => {
            door.unlock().unwrap();
        }
        Op::Closed(level) => door.hardware_mut().closed = *level,
        Op::Open(level) => door.hardware_mut().open = *level,
        Op::Remote(level) => door.hardware_mut().remote = *level,
        Op::Ladder(raw) => door.hardware_mut().ladder = *raw,
        Op::FinishWarning => door.hardware_mut().warning.finish(),
        Op::Wait(ms) => {
            let until = now + ms;
            let mut t = now;
            while t < until {
                t += TICK_MS;
                door.tick(t).unwrap();
                check_invariants(door, watch);
            }
            return t;
        }
        Op::StopSaturatedThenClose => {
            let script = [
                Op::Closed(false),
                Op::Open(false),
                Op::Request(TargetState::Open),
                Op::Wait(15_000),
                Op::Request(TargetState::Stopped),
                Op::Wait(500),
                Op::Request(TargetState::Closed),
                Op::Wait(500),
                Op::Request(TargetState::Stopped),
            ];
            let mut t = now;
            for op in &script {
                t = step(door, watch, op, t);
                check_invariants(door, watch);
            }
            return t;
        }
    }
    let t = now + 1;
    door.tick(t).unwrap();
    t
}

fn check_invariants(door: &Door, watch: &mut Watch) {
    let state = door.state();
    let p = door.position();
    let in_band = (MIN_ESTIMATE..=MAX_ESTIMATE).contains(&p);

    assert!((0.0..=1.0).contains(&p), "position {} out of range", p);
    match state {
        DoorState::Closed | DoorState::Locked => assert_eq!(p, 0.0, "{:?}", state),
        DoorState::Open => assert_eq!(p, 1.0),
        // Still on the open sensor, or stopped partway
        DoorState::CloseWarning => assert!(in_band || p == 1.0, "warning at {}", p),
        _ => assert!(in_band, "{:?} at unconfirmed position {}", state, p),
    }
    assert_eq!(door.is_locked(), state == DoorState::Locked);
    assert_eq!(door.snapshot().operation, state.operation());

    // Exact ends only come from a sensor
    let prev = watch.prev;
    if state != prev {
        let hw = door.hardware();
        match state {
            DoorState::Open => assert!(
                hw.open || (prev == DoorState::CloseWarning && watch.warning_from_open),
                "{:?} -> Open without the open sensor",
                prev
            ),
            DoorState::Closed | DoorState::Locked if !prev.is_closed() => assert!(
                hw.closed,
                "{:?} -> {:?} without the closed sensor",
                prev,
                state
            ),
            DoorState::CloseWarning => watch.warning_from_open = prev == DoorState::Open,
            _ => {}
        }
    }
    watch.prev = state;
}

proptest! {
    /// Position stays in range, and in the estimate band unless a sensor confirmed it.
    #[test]
    fn position_invariants_hold(
        start in arb_start(),
        ops in proptest::collection::vec(arb_op(), 1..60),
    ) {
        let mut door = GarageDoor::new(Config::default(), start, MockSink::new());
        door.setup(0, false).unwrap();
        let mut watch = Watch::new(&door);
        check_invariants(&door, &mut watch);

        let mut now = 0;
        for op in &ops {
            now = step(&mut door, &mut watch, op, now);
            check_invariants(&door, &mut watch);
        }
    }

    /// Without buttons, every close passes through the warning.
    #[test]
    fn hub_closes_always_warn(
        start in arb_start(),
        ops in proptest::collection::vec(arb_hub_op(), 1..60),
    ) {
        let mut door = GarageDoor::new(Config::default(), start, MockSink::new());
        door.setup(0, false).unwrap();
        let mut watch = Watch::new(&door);

        let mut now = 0;
        let mut prev = door.state();
        let mut closes = 0u32;
        for op in &ops {
            now = step(&mut door, &mut watch, op, now);
            let state = door.state();
            if state == DoorState::Closing && prev != DoorState::Closing {
                prop_assert_eq!(prev, DoorState::CloseWarning);
                closes += 1;
            }
            prev = state;
        }
        prop_assert!(door.hardware().warning.play_count >= closes);
    }

    /// A locked door ignores the remote door button.
    #[test]
    fn locked_door_ignores_remote(
        presses in proptest::collection::vec((any::<bool>(), 1u64..2_000), 1..40),
    ) {
        let mut door = GarageDoor::new(Config::default(), MockDoorHardware::closed(), MockSink::new());
        door.setup(0, true).unwrap();

        let mut now = 0;
        for (level, wait) in presses {
            door.hardware_mut().remote = level;
            now += wait;
            door.tick(now).unwrap();
            prop_assert_eq!(door.state(), DoorState::Locked);
        }
        prop_assert_eq!(door.hardware().pulse_count, 0);
    }
}
