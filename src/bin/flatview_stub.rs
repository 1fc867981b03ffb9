//! Minimal binary that links `flatview` without an embedding shell.
//! Placeholder target to verify library-only builds remain viable.

use flatview::tick::TickScheduler;

fn main() {
    let mut scheduler = TickScheduler::new();
    let mut first_subtick = 0u32;
    for frame in 1..=60 {
        if scheduler.advance_frame().subtick && first_subtick == 0 {
            first_subtick = frame;
        }
    }
    println!("flatview stub (first subtick on frame {first_subtick})");
}
