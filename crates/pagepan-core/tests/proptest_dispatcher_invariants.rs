//! Property-based invariant tests for GestureDispatcher.
//!
//! These tests drive the dispatcher with arbitrary contact sequences
//! (including spurious ups/moves and duplicate downs) and verify:
//!
//! 1. Phase matches the contact count after every event
//! 2. At most one gesture event per contact event
//! 3. Sequence counts start at 1 and increase by exactly 1 within an interaction
//! 4. `is_first` only on the event that leaves Idle; `is_final` only on the one that returns
//! 5. Pinch events are present iff two or more contacts were involved
//! 6. Adding or removing a contact mid-pinch never changes the current ratio

use pagepan_core::geometry::Point;
use pagepan_core::{ContactEvent, ContactPhase, GestureDispatcher, GesturePhase, PinchSession};
use proptest::prelude::*;
use web_time::{Duration, Instant};

// ── Strategies ──────────────────────────────────────────────────────────

fn phase_strategy() -> impl Strategy<Value = ContactPhase> {
    prop_oneof![
        2 => Just(ContactPhase::Down),
        5 => Just(ContactPhase::Move),
        2 => Just(ContactPhase::Up),
    ]
}

fn event_strategy() -> impl Strategy<Value = ContactEvent> {
    (0u32..5, -500.0f64..500.0, -500.0f64..500.0, phase_strategy())
        .prop_map(|(id, x, y, phase)| ContactEvent::new(id, Point::new(x, y), phase))
}

fn events_strategy() -> impl Strategy<Value = Vec<ContactEvent>> {
    prop::collection::vec(event_strategy(), 1..80)
}

fn expected_phase(contacts: usize) -> GesturePhase {
    match contacts {
        0 => GesturePhase::Idle,
        1 => GesturePhase::Panning,
        _ => GesturePhase::Pinching,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 1–5. Structural invariants
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn phase_tracks_contact_count(events in events_strategy()) {
        let mut gd = GestureDispatcher::default();
        let t = Instant::now();

        for (i, ev) in events.iter().enumerate() {
            let out = gd.process(ev, t + Duration::from_millis(i as u64 * 8));
            prop_assert!(out.len() <= 1);
            prop_assert_eq!(gd.phase(), expected_phase(gd.contact_count()));
            prop_assert_eq!(gd.is_capturing(), gd.contact_count() > 0);
            prop_assert_eq!(gd.pan_session().is_some(), gd.contact_count() >= 1);
            prop_assert_eq!(gd.pinch_session().is_some(), gd.contact_count() >= 2);
        }
    }

    #[test]
    fn sequence_counts_are_contiguous(events in events_strategy()) {
        let mut gd = GestureDispatcher::default();
        let t = Instant::now();
        let mut expected_next = 1u32;

        for (i, ev) in events.iter().enumerate() {
            let was_idle = gd.phase() == GesturePhase::Idle;
            for out in gd.process(ev, t + Duration::from_millis(i as u64 * 8)) {
                if out.is_first {
                    prop_assert!(was_idle);
                    expected_next = 1;
                }
                prop_assert_eq!(out.sequence_count, expected_next);
                expected_next += 1;

                if out.is_final {
                    prop_assert_eq!(gd.phase(), GesturePhase::Idle);
                    prop_assert!(out.pinch.is_none());
                }
                prop_assert!(!out.is_kinetic);
            }
        }
    }

    #[test]
    fn pinch_present_iff_multiple_contacts(events in events_strategy()) {
        let mut gd = GestureDispatcher::default();
        let t = Instant::now();

        for (i, ev) in events.iter().enumerate() {
            let before = gd.contact_count();
            for out in gd.process(ev, t + Duration::from_millis(i as u64 * 8)) {
                let involved = before.max(gd.contact_count());
                prop_assert_eq!(out.pinch.is_some(), involved >= 2);
                if let Some(pinch) = out.pinch {
                    prop_assert!(!pinch.scale.is_nan());
                    prop_assert!(pinch.scale >= 0.0);
                }
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // 6. Rebase continuity
    // ═══════════════════════════════════════════════════════════════════

    #[test]
    fn contact_count_changes_do_not_jump_scale(
        events in events_strategy(),
        extra in (5u32..8, -500.0f64..500.0, -500.0f64..500.0),
    ) {
        let mut gd = GestureDispatcher::default();
        let t = Instant::now();
        for (i, ev) in events.iter().enumerate() {
            gd.process(ev, t + Duration::from_millis(i as u64 * 8));
        }
        prop_assume!(gd.phase() == GesturePhase::Pinching);

        let before = gd.pinch_session().map(PinchSession::current_ratio);
        let (id, x, y) = extra;
        let out = gd.process(&ContactEvent::down(id, x, y), t + Duration::from_secs(5));

        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].pinch.map(|p| p.scale), before);
        let after = gd.pinch_session().map(PinchSession::current_ratio);
        match (before, after) {
            (Some(b), Some(a)) => prop_assert!((a - b).abs() <= 1e-9 * (1.0 + b.abs())),
            _ => prop_assert!(false, "pinch session lost on contact-down"),
        }

        // Lifting it again keeps the ratio too.
        let out = gd.process(&ContactEvent::up(id, x, y), t + Duration::from_secs(6));
        prop_assert_eq!(out.len(), 1);
        let lifted = gd.pinch_session().map(PinchSession::current_ratio);
        match (after, lifted) {
            (Some(b), Some(a)) => prop_assert!((a - b).abs() <= 1e-9 * (1.0 + b.abs())),
            _ => prop_assert!(false, "pinch session lost on contact-up"),
        }
    }
}
