pub mod engine;
pub mod obstacle;

pub use engine::{FrameInput, GameEngine, GamePhase, ObstacleView, Scene};
pub use obstacle::Obstacle;
