//! End-to-end race scenarios driven through the public API with
//! hand-stepped time, so every assertion is deterministic.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use reflex_drive::{ControlKind, InputMethod, Race, RaceStatus, ReactionClass, TrackConfig};

const TICK_MS: f64 = 100.0;

fn started_race() -> Race {
    let mut race = Race::new(TrackConfig::default()).unwrap();
    race.start(0.0);
    race
}

/// Tick in fixed steps until `target_ms`, returning the final time.
fn run_until(race: &mut Race, from_ms: f64, target_ms: f64) -> f64 {
    let mut now = from_ms;
    while now < target_ms && race.status() == RaceStatus::Running {
        now += TICK_MS;
        race.tick(TICK_MS, now);
    }
    now
}

#[test]
fn full_race_without_input() {
    let mut race = started_race();

    let mut now = 0.0;
    let mut finish_transitions = 0;
    for _ in 0..400 {
        let was_running = race.status() == RaceStatus::Running;
        now += TICK_MS;
        race.tick(TICK_MS, now);
        if was_running && race.status() == RaceStatus::Finished {
            finish_transitions += 1;
        }
        if race.status() == RaceStatus::Finished {
            break;
        }
    }

    assert_eq!(race.status(), RaceStatus::Finished);
    assert_eq!(finish_transitions, 1);
    // distance clamps to the track length exactly
    assert_eq!(race.distance_covered(), 1000.0);
    // 1000 m at 50 m/s, within tick granularity
    assert_abs_diff_eq!(race.elapsed_ms(now), 20_000.0, epsilon = TICK_MS);

    // further ticks are no-ops and the elapsed time stays frozen
    let frozen = race.elapsed_ms(now);
    race.tick(TICK_MS, now + 500.0);
    assert_eq!(race.status(), RaceStatus::Finished);
    assert_eq!(race.elapsed_ms(now + 500.0), frozen);
}

#[test]
fn scenario_perfect_reaction_at_first_acceleration_point() {
    let mut race = started_race();

    // 100 m at 50 m/s: the first acceleration window opens at t=2000 ms
    let now = run_until(&mut race, 0.0, 2000.0);
    assert_relative_eq!(race.distance_covered(), 100.0);

    let controls = race.snapshot(now).controls;
    assert!(controls.acceleration.is_active);
    assert_relative_eq!(controls.acceleration.activated_at_ms, 2000.0);

    // react 50 ms later: perfect tier, boost 15 x 1.5 for the 1950 ms left
    let outcome = race
        .handle_action(ControlKind::Acceleration, 2050.0, InputMethod::Keyboard)
        .unwrap();
    assert_eq!(outcome.class, ReactionClass::Perfect);
    assert_relative_eq!(outcome.magnitude, 22.5);
    assert_relative_eq!(outcome.duration_ms, 1950.0);

    // the boost shows up in the very next tick
    race.tick(TICK_MS, now + TICK_MS);
    assert_relative_eq!(race.current_speed(), 72.5);

    // and lapses once its (remaining-window) duration is over
    race.tick(TICK_MS, 2050.0 + 1950.0 + TICK_MS);
    assert_relative_eq!(race.current_speed(), 50.0);
}

#[test]
fn scenario_red_state_penalty() {
    let mut race = started_race();
    race.tick(TICK_MS, 100.0);

    // no brake window is open this early
    assert!(!race.snapshot(100.0).controls.brake.is_active);

    let outcome = race
        .handle_action(ControlKind::Brake, 150.0, InputMethod::Touch)
        .unwrap();
    assert_eq!(outcome.class, ReactionClass::Penalty);
    assert_relative_eq!(outcome.magnitude, 10.0);
    assert_relative_eq!(outcome.duration_ms, 1000.0);

    race.tick(TICK_MS, 200.0);
    assert_relative_eq!(race.current_speed(), 40.0);

    // back to cruise once the penalty lapses
    race.tick(TICK_MS, 1200.0);
    assert_relative_eq!(race.current_speed(), 50.0);
}

#[test]
fn penalty_mashing_yields_one_modifier() {
    let mut race = started_race();
    race.tick(TICK_MS, 100.0);

    // two penalty-eligible presses 50 ms apart
    assert!(race
        .handle_action(ControlKind::Brake, 150.0, InputMethod::Keyboard)
        .is_some());
    assert!(race
        .handle_action(ControlKind::Brake, 200.0, InputMethod::Keyboard)
        .is_none());
    assert_eq!(race.stats().penalty_count, 1);

    // speed reflects a single -10, not -20
    race.tick(TICK_MS, 300.0);
    assert_relative_eq!(race.current_speed(), 40.0);
}

#[test]
fn expired_window_never_reactivates() {
    let mut race = started_race();

    // open the 100 m acceleration window and let it lapse unanswered
    let mut now = run_until(&mut race, 0.0, 2000.0);
    assert!(race.snapshot(now).controls.acceleration.is_active);
    now = run_until(&mut race, now, 4100.0);
    assert!(!race.snapshot(now).controls.acceleration.is_active);

    // the vehicle is far past 100 m, but the trigger stays consumed
    assert!(race.distance_covered() > 100.0);
    now = run_until(&mut race, now, 6000.0);
    let controls = race.snapshot(now).controls;
    if controls.acceleration.is_active {
        // only the 350 m trigger may be open by now, never the first one
        assert!(controls.acceleration.activated_at_ms >= 7000.0);
    }
}

#[test]
fn reset_is_idempotent() {
    let mut race = started_race();
    let now = run_until(&mut race, 0.0, 3000.0);
    race.handle_action(ControlKind::Brake, now + 10.0, InputMethod::Keyboard);

    race.reset();
    let first = race.snapshot(0.0);
    race.reset();
    let second = race.snapshot(0.0);

    assert_eq!(first, second);
    assert_eq!(first.status, RaceStatus::Idle);
    assert_eq!(first.distance_covered, 0.0);
    assert_eq!(first.elapsed_ms, 0.0);

    // a reset race restarts cleanly
    race.start(0.0);
    assert_eq!(race.status(), RaceStatus::Running);
    assert_relative_eq!(race.current_speed(), 50.0);
}

#[test]
fn good_and_late_tiers_through_the_full_path() {
    let mut race = started_race();

    // brake window at 200 m opens at t=4000 ms
    let now = run_until(&mut race, 0.0, 4000.0);
    assert!(race.snapshot(now).controls.brake.is_active);

    // 300 ms reaction lands in the good tier: 15 x 1.2
    let outcome = race
        .handle_action(ControlKind::Brake, 4300.0, InputMethod::Keyboard)
        .unwrap();
    assert_eq!(outcome.class, ReactionClass::Good);
    assert_relative_eq!(outcome.magnitude, 18.0);
    assert_relative_eq!(outcome.duration_ms, 1700.0);

    // acceleration window at 350 m opens at t=7000 ms... but the good boost
    // is still live then, so cruise to it and check the late tier instead
    let now = run_until(&mut race, now, 12_000.0);
    let controls = race.snapshot(now).controls;
    if controls.acceleration.is_active {
        let at = controls.acceleration.activated_at_ms;
        let outcome = race
            .handle_action(ControlKind::Acceleration, at + 600.0, InputMethod::Touch)
            .unwrap();
        assert_eq!(outcome.class, ReactionClass::Late);
        assert_relative_eq!(outcome.magnitude, 15.0);
    }
}
