//! Hand-computed traces through the position state machine.
//!
//! Each trace lists z-scores and the state expected after each step, using the
//! five-rule priority table with entry = 2, exit = 1.

use pairlab_core::domain::{EventKind, PositionState};
use pairlab_core::signal::{transition, Thresholds};

use PositionState::{Flat, LongSpread, ShortSpread};

fn run_trace(zscores: &[f64], thresholds: &Thresholds) -> (Vec<PositionState>, Vec<(usize, EventKind)>) {
    let mut state = Flat;
    let mut states = Vec::with_capacity(zscores.len());
    let mut events = Vec::new();
    for (i, &z) in zscores.iter().enumerate() {
        let step = transition(state, z, thresholds);
        if let Some(kind) = step.event {
            events.push((i, kind));
        }
        state = step.next;
        states.push(state);
    }
    (states, events)
}

#[test]
fn reference_path_trace() {
    // z = 0: flat holds
    // z = 2.5: rule 1, enter short
    // z = 1.8: short holds (1.8 > 1)
    // z = 0.5: rule 3, exit short (0.5 ≤ 1)
    // z = -2.1: rule 2, enter long
    // z = 0: rule 4, exit long (0 ≥ -1)
    let (states, events) = run_trace(&[0.0, 2.5, 1.8, 0.5, -2.1, 0.0], &Thresholds::default());

    assert_eq!(
        states,
        vec![Flat, ShortSpread, ShortSpread, Flat, LongSpread, Flat]
    );
    assert_eq!(
        events,
        vec![
            (1, EventKind::EnterShortSpread),
            (3, EventKind::ExitShortSpread),
            (4, EventKind::EnterLongSpread),
            (5, EventKind::ExitLongSpread),
        ]
    );
}

#[test]
fn held_state_is_stable_inside_exit_band() {
    // After returning to flat, z stays within (-exit, exit): nothing fires.
    let path = [2.2, 0.9, 0.5, -0.5, 0.99, -0.99, 0.0, 0.3];
    let (states, events) = run_trace(&path, &Thresholds::default());

    assert_eq!(events.len(), 2);
    assert!(states[1..].iter().all(|s| *s == Flat));
}

#[test]
fn long_spread_holds_until_exit_band() {
    let path = [-2.0, -3.0, -1.5, -1.01, -1.0];
    let (states, events) = run_trace(&path, &Thresholds::default());

    assert_eq!(
        states,
        vec![LongSpread, LongSpread, LongSpread, LongSpread, Flat]
    );
    assert_eq!(
        events,
        vec![(0, EventKind::EnterLongSpread), (4, EventKind::ExitLongSpread)]
    );
}

#[test]
fn reversal_takes_two_steps() {
    // Short spread facing a deep negative z exits first; entering long needs
    // another step.
    let path = [2.5, -2.5, -2.5];
    let (states, events) = run_trace(&path, &Thresholds::default());

    assert_eq!(states, vec![ShortSpread, Flat, LongSpread]);
    assert_eq!(
        events,
        vec![
            (0, EventKind::EnterShortSpread),
            (1, EventKind::ExitShortSpread),
            (2, EventKind::EnterLongSpread),
        ]
    );
}

#[test]
fn custom_thresholds() {
    let t = Thresholds::new(1.5, 0.25).unwrap();
    let (states, _) = run_trace(&[1.5, 0.3, 0.25, -1.49, -1.5, -0.26, -0.25], &t);
    assert_eq!(
        states,
        vec![
            ShortSpread,
            ShortSpread,
            Flat,
            Flat,
            LongSpread,
            LongSpread,
            Flat
        ]
    );
}
