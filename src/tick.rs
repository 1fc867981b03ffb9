pub const FRAMES_PER_TICK: u32 = 60;
pub const FRAMES_PER_SUBTICK: u32 = 5;

/// Periodic events produced by a single frame advance. A tick frame is also a
/// subtick frame; neither suppresses the other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub subtick: bool,
    pub tick: bool,
}

/// Frame-driven counter behind the candidate-refresh (tick) and targeting
/// (subtick) cadence. Pure state, no clock involved.
#[derive(Debug, Default)]
pub struct TickScheduler {
    frame: u32,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_frame(&mut self) -> FrameEvents {
        self.frame += 1;
        let subtick = self.frame % FRAMES_PER_SUBTICK == 0;
        let tick = self.frame >= FRAMES_PER_TICK;
        if tick {
            self.frame = 0;
        }
        FrameEvents { subtick, tick }
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }
}
