/// Play time before the first obstacle may spawn.
pub const OBSTACLE_WARMUP_MS: u64 = 4_000;
/// Spawn cadence once the warm-up has passed.
pub const OBSTACLE_INTERVAL_MS: u64 = 2_000;
pub const OBSTACLE_WIDTH: f64 = 26.0;
pub const OBSTACLE_MIN_HEIGHT: f64 = 18.0;
/// Minimum vertical gap between an obstacle's lower edge and the price line,
/// guaranteeing the course is passable at spawn time.
pub const OBSTACLE_MIN_CLEARANCE: f64 = 60.0;
/// Width reveal animation length.
pub const OBSTACLE_REVEAL_MS: u64 = 350;

/// A ceiling column the marker has to duck under.
///
/// The clearance gap to the price line is fixed at spawn; the rendered height
/// is recomputed every frame from the *current* line position, so the column
/// follows the line as it moves.
#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub spawn_ms: u64,
    pub width: f64,
    pub gap_from_line: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(spawn_ms: u64, height: f64, line_y: f64) -> Self {
        Self {
            spawn_ms,
            width: OBSTACLE_WIDTH,
            gap_from_line: line_y - height,
            height,
        }
    }

    /// Re-derive the rendered height from the line's current position.
    pub fn track_line(&mut self, line_y: f64) {
        self.height = (line_y - self.gap_from_line).max(0.0);
    }

    /// Width at `now_ms`, animating in with an ease-out curve.
    pub fn revealed_width(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.spawn_ms);
        if elapsed >= OBSTACLE_REVEAL_MS {
            return self.width;
        }
        self.width * ease_out_cubic(elapsed as f64 / OBSTACLE_REVEAL_MS as f64)
    }
}

pub fn ease_out_cubic(u: f64) -> f64 {
    let u = u.clamp(0.0, 1.0);
    1.0 - (1.0 - u).powi(3)
}
