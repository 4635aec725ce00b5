use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::model::axis::{AxisController, AxisRange};
use crate::model::series::SampleSeries;

use super::obstacle::{
    Obstacle, OBSTACLE_INTERVAL_MS, OBSTACLE_MIN_CLEARANCE, OBSTACLE_MIN_HEIGHT,
    OBSTACLE_WARMUP_MS,
};

/// Logical drawing surface the engine works in. The widget rasterizes this
/// into whatever terminal area it gets.
pub const LOGICAL_W: f64 = 600.0;
pub const LOGICAL_H: f64 = 240.0;
pub const PAD_X: f64 = 20.0;
pub const PAD_Y: f64 = 20.0;

pub const BIRD_X: f64 = 35.0;
pub const BIRD_SIZE: f64 = 28.0;
pub const BIRD_START_Y: f64 = 30.0;
const GRAVITY: f64 = 1_200.0;
const FLAP_VELOCITY: f64 = -200.0;
const TOP_MARGIN: f64 = 10.0;
const BOTTOM_MARGIN: f64 = 10.0;
/// Cap on the integration step so a stalled frame doesn't teleport the bird.
const DT_CAP: f64 = 0.05;
/// Restart is ignored for this long after entering game over.
const RESTART_COOLDOWN_MS: u64 = 600;

const IDLE_HINT_DELAY_MS: u64 = 5_000;
const IDLE_HINT_SPEED: f64 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Playing,
    GameOver,
}

/// Per-frame input. Time is injected so tests can drive a manual clock.
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub now_ms: u64,
    pub flap: bool,
}

/// View model handed to the rendering widget, all in logical coordinates.
#[derive(Debug, Clone)]
pub struct Scene {
    pub phase: GamePhase,
    pub axis: Option<AxisRange>,
    pub line: Vec<(f64, f64)>,
    pub bird: (f64, f64),
    pub obstacles: Vec<ObstacleView>,
    pub score_secs: u64,
    pub idle_hint_x: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct ObstacleView {
    pub x: f64,
    pub width: f64,
    pub height: f64,
}

/// The chart/game engine: rolling sample buffer, display axis and the
/// gravity game, advanced one frame at a time from the repaint loop.
///
/// All mutable frame state lives here; nothing depends on ambient timers.
pub struct GameEngine {
    series: SampleSeries,
    axis: AxisController,
    phase: GamePhase,
    bird_y: f64,
    bird_vy: f64,
    play_started_ms: Option<u64>,
    game_over_at_ms: Option<u64>,
    idle_since_ms: Option<u64>,
    next_spawn_ms: Option<u64>,
    last_frame_ms: Option<u64>,
    obstacles: Vec<Obstacle>,
    rng: SmallRng,
}

impl GameEngine {
    pub fn new(window_ms: u64, max_points: usize) -> Self {
        Self::with_rng(window_ms, max_points, SmallRng::from_os_rng())
    }

    pub fn with_rng(window_ms: u64, max_points: usize, rng: SmallRng) -> Self {
        Self {
            series: SampleSeries::new(window_ms, max_points),
            axis: AxisController::new(),
            phase: GamePhase::Idle,
            bird_y: BIRD_START_Y,
            bird_vy: 0.0,
            play_started_ms: None,
            game_over_at_ms: None,
            idle_since_ms: None,
            next_spawn_ms: None,
            last_frame_ms: None,
            obstacles: Vec::new(),
            rng,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn bird_y(&self) -> f64 {
        self.bird_y
    }

    pub fn series(&self) -> &SampleSeries {
        &self.series
    }

    pub fn axis_range(&self) -> Option<AxisRange> {
        self.axis.range()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn score_secs(&self, now_ms: u64) -> u64 {
        match (self.phase, self.play_started_ms) {
            (GamePhase::Playing, Some(start)) => now_ms.saturating_sub(start) / 1_000,
            (GamePhase::GameOver, Some(start)) => self
                .game_over_at_ms
                .unwrap_or(now_ms)
                .saturating_sub(start)
                / 1_000,
            _ => 0,
        }
    }

    /// Ingest one decoded price sample.
    pub fn push_sample(&mut self, timestamp_ms: u64, value: f64) {
        self.series.push(timestamp_ms, value);
        self.axis.observe(value);
    }

    /// Drop everything; used when the selected feed changes.
    pub fn reset(&mut self) {
        self.series.clear();
        self.axis.reset();
        self.phase = GamePhase::Idle;
        self.bird_y = BIRD_START_Y;
        self.bird_vy = 0.0;
        self.play_started_ms = None;
        self.game_over_at_ms = None;
        self.idle_since_ms = None;
        self.next_spawn_ms = None;
        self.last_frame_ms = None;
        self.obstacles.clear();
    }

    fn time_to_x(&self, t: u64, now_ms: u64) -> f64 {
        let window = self.series.window_ms();
        let left_t = now_ms.saturating_sub(window);
        let clamped = t.clamp(left_t, now_ms);
        let u = (clamped - left_t) as f64 / window as f64;
        PAD_X + u * (LOGICAL_W - 2.0 * PAD_X)
    }

    fn value_to_y(&self, value: f64, range: &AxisRange) -> f64 {
        let top = PAD_Y;
        let bottom = LOGICAL_H - PAD_Y;
        bottom - range.value_to_frac(value) * (bottom - top)
    }

    /// Logical y of the interpolated price line at a logical x, if a line can
    /// be computed this frame.
    pub fn line_y_at_x(&self, x: f64, now_ms: u64) -> Option<f64> {
        let range = self.axis.range()?;
        let window = self.series.window_ms();
        let left_t = now_ms.saturating_sub(window);
        let u = ((x - PAD_X) / (LOGICAL_W - 2.0 * PAD_X)).clamp(0.0, 1.0);
        let t = left_t + (u * window as f64) as u64;
        let value = self.series.value_at(t)?;
        Some(self.value_to_y(value, &range))
    }

    /// Whether a marker centered at `bird_y` touches a line at `line_y`.
    pub fn hits_line(bird_y: f64, line_y: f64) -> bool {
        (bird_y - line_y).abs() <= BIRD_SIZE / 2.0
    }

    /// Advance one frame.
    pub fn step(&mut self, input: FrameInput) {
        let now = input.now_ms;
        if self.idle_since_ms.is_none() && self.phase == GamePhase::Idle {
            self.idle_since_ms = Some(now);
        }

        let dt = match self.last_frame_ms {
            Some(last) => ((now.saturating_sub(last)) as f64 / 1_000.0).min(DT_CAP),
            None => 0.0,
        };
        self.last_frame_ms = Some(now);

        if input.flap {
            self.handle_flap(now);
        }

        if self.phase != GamePhase::Playing {
            return;
        }

        // Gravity integration.
        self.bird_vy += GRAVITY * dt;
        self.bird_y += self.bird_vy * dt;

        let top_bound = TOP_MARGIN + BIRD_SIZE / 2.0;
        let bottom_bound = LOGICAL_H - BOTTOM_MARGIN - BIRD_SIZE / 2.0;
        if self.bird_y < top_bound {
            self.bird_y = top_bound;
            self.bird_vy = 0.0;
        }
        if self.bird_y > bottom_bound {
            self.enter_game_over(now);
            return;
        }

        // Collision against the interpolated price line. A frame without a
        // line suspends line collisions, it does not end the game.
        if let Some(line_y) = self.line_y_at_x(BIRD_X, now) {
            if Self::hits_line(self.bird_y, line_y) {
                self.enter_game_over(now);
                return;
            }
        }

        self.update_obstacles(now);
    }

    fn handle_flap(&mut self, now: u64) {
        match self.phase {
            GamePhase::Idle => {
                self.phase = GamePhase::Playing;
                self.play_started_ms = Some(now);
                self.bird_vy = 0.0;
                self.obstacles.clear();
                self.next_spawn_ms = Some(now + OBSTACLE_WARMUP_MS);
                self.idle_since_ms = None;
            }
            GamePhase::Playing => {
                self.bird_vy = FLAP_VELOCITY;
            }
            GamePhase::GameOver => {
                let over_at = self.game_over_at_ms.unwrap_or(0);
                if now.saturating_sub(over_at) >= RESTART_COOLDOWN_MS {
                    self.phase = GamePhase::Idle;
                    self.bird_y = BIRD_START_Y;
                    self.bird_vy = 0.0;
                    self.play_started_ms = None;
                    self.game_over_at_ms = None;
                    self.obstacles.clear();
                    self.next_spawn_ms = None;
                    self.idle_since_ms = Some(now);
                }
            }
        }
    }

    fn enter_game_over(&mut self, now: u64) {
        self.phase = GamePhase::GameOver;
        self.game_over_at_ms = Some(now);
    }

    fn update_obstacles(&mut self, now: u64) {
        // Spawn at the right edge on a fixed cadence once warmed up.
        if let (Some(next_spawn), Some(_)) = (self.next_spawn_ms, self.play_started_ms) {
            if now >= next_spawn {
                let right_edge = LOGICAL_W - PAD_X;
                if let Some(line_y) = self.line_y_at_x(right_edge, now) {
                    let max_height = line_y - OBSTACLE_MIN_CLEARANCE;
                    if max_height >= OBSTACLE_MIN_HEIGHT {
                        let height = self.rng.random_range(OBSTACLE_MIN_HEIGHT..=max_height);
                        self.obstacles.push(Obstacle::new(now, height, line_y));
                    }
                }
                self.next_spawn_ms = Some(next_spawn + OBSTACLE_INTERVAL_MS);
            }
        }

        // Drop columns that have fully left the window.
        let window = self.series.window_ms();
        self.obstacles
            .retain(|o| o.spawn_ms + window + 1_000 >= now);

        // Heights follow the current line; stale heights persist through
        // line-less frames.
        let tracked: Vec<(usize, f64)> = self
            .obstacles
            .iter()
            .enumerate()
            .filter_map(|(i, o)| {
                let x = self.time_to_x(o.spawn_ms, now);
                self.line_y_at_x(x, now).map(|line_y| (i, line_y))
            })
            .collect();
        for (i, line_y) in tracked {
            self.obstacles[i].track_line(line_y);
        }

        // Obstacle collision: overlap in x and the bird's top above the
        // column's lower edge.
        let bird_top = self.bird_y - BIRD_SIZE / 2.0;
        let hit = self.obstacles.iter().any(|o| {
            let x = self.time_to_x(o.spawn_ms, now);
            let half_w = o.revealed_width(now) / 2.0;
            (BIRD_X - x).abs() <= half_w + BIRD_SIZE / 2.0 && bird_top <= o.height
        });
        if hit {
            self.enter_game_over(now);
        }
    }

    /// Build the frame's view model.
    pub fn scene(&self, now_ms: u64) -> Scene {
        let axis = self.axis.range();
        let line = match &axis {
            Some(range) => self
                .series
                .visible(now_ms)
                .iter()
                .map(|s| {
                    (
                        self.time_to_x(s.timestamp_ms, now_ms),
                        self.value_to_y(s.value, range),
                    )
                })
                .collect(),
            None => Vec::new(),
        };

        let obstacles = self
            .obstacles
            .iter()
            .map(|o| ObstacleView {
                x: self.time_to_x(o.spawn_ms, now_ms),
                width: o.revealed_width(now_ms),
                height: o.height,
            })
            .collect();

        let idle_hint_x = match (self.phase, self.idle_since_ms) {
            (GamePhase::Idle, Some(since)) => {
                let elapsed = now_ms.saturating_sub(since);
                (elapsed >= IDLE_HINT_DELAY_MS).then(|| {
                    let scrolled =
                        (elapsed - IDLE_HINT_DELAY_MS) as f64 / 1_000.0 * IDLE_HINT_SPEED;
                    // wrap so the hint keeps marching across
                    LOGICAL_W - scrolled % (LOGICAL_W + 200.0)
                })
            }
            _ => None,
        };

        let bird_y = if self.phase == GamePhase::Idle {
            PAD_Y
        } else {
            self.bird_y
        };

        Scene {
            phase: self.phase,
            axis,
            line,
            bird: (BIRD_X, bird_y),
            obstacles,
            score_secs: self.score_secs(now_ms),
            idle_hint_x,
        }
    }
}
