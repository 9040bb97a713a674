#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use pagepan_core::{ContactEvent, GesturePhase};
use pagepan_viewport::{Extent, MAX_SCALE, MIN_SCALE, OverscrollEdges, Viewer, ViewerConfig};
use web_time::{Duration, Instant};

#[derive(Arbitrary, Debug)]
enum Op {
    Down { id: u8, x: i16, y: i16 },
    Move { id: u8, x: i16, y: i16 },
    Up { id: u8, x: i16, y: i16 },
    Tick,
    Wait { ms: u16 },
    Resize { width: u16, height: u16 },
}

#[derive(Arbitrary, Debug)]
struct Input {
    overscroll: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let edges = if input.overscroll {
        OverscrollEdges::HORIZONTAL
    } else {
        OverscrollEdges::NONE
    };
    let mut viewer = Viewer::new(ViewerConfig::default().with_overscroll(edges))
        .with_extents(Extent::new(800.0, 1200.0), Extent::new(400.0, 600.0));
    let mut now = Instant::now();

    for op in input.ops {
        now += Duration::from_millis(4);
        // Six ids so that three-plus contact pinches are reachable.
        match op {
            Op::Down { id, x, y } => {
                let ev = ContactEvent::down(u32::from(id % 6), f64::from(x), f64::from(y));
                viewer.handle_contact(&ev, now);
            }
            Op::Move { id, x, y } => {
                let ev = ContactEvent::moved(u32::from(id % 6), f64::from(x), f64::from(y));
                viewer.handle_contact(&ev, now);
            }
            Op::Up { id, x, y } => {
                let ev = ContactEvent::up(u32::from(id % 6), f64::from(x), f64::from(y));
                viewer.handle_contact(&ev, now);
            }
            Op::Tick => {
                viewer.tick(now);
            }
            Op::Wait { ms } => now += Duration::from_millis(u64::from(ms)),
            Op::Resize { width, height } => {
                viewer.set_container_extent(Extent::new(f64::from(width), f64::from(height)));
            }
        }

        // Post-conditions that must always hold:
        assert!(viewer.scale() >= MIN_SCALE && viewer.scale() <= MAX_SCALE);
        let limits = viewer.limits();
        assert!(limits.contains(viewer.scroll()), "scroll outside limits");
        assert_eq!(
            viewer.phase() == GesturePhase::Idle,
            viewer.dispatcher().contact_count() == 0
        );
        assert!(!(viewer.is_capturing() && viewer.is_kinetic_active()));
    }
});
