use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::game::engine::{GamePhase, Scene, LOGICAL_H, LOGICAL_W};

const IDLE_HINT: &str = "* press space to start *";

/// Rasterizes the engine's logical scene into terminal cells: price line,
/// obstacle columns, the dodging marker and the phase overlays.
pub struct GameChart<'a> {
    scene: &'a Scene,
}

impl<'a> GameChart<'a> {
    pub fn new(scene: &'a Scene) -> Self {
        Self { scene }
    }
}

fn axis_label(value: f64) -> String {
    if value.abs() < 1.0 {
        format!("{:.6}", value)
    } else {
        format!("{:.2}", value)
    }
}

impl Widget for GameChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Live Chart ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 8 || inner.height < 4 {
            return;
        }

        let to_col = |x: f64| -> Option<u16> {
            if x < 0.0 || x >= LOGICAL_W {
                return None;
            }
            let col = (x / LOGICAL_W * inner.width as f64) as u16;
            Some(inner.x + col.min(inner.width - 1))
        };
        let to_row = |y: f64| -> Option<u16> {
            if y < 0.0 || y >= LOGICAL_H {
                return None;
            }
            let row = (y / LOGICAL_H * inner.height as f64) as u16;
            Some(inner.y + row.min(inner.height - 1))
        };

        // Obstacle columns hang from the ceiling down to their tracked height.
        for obstacle in &self.scene.obstacles {
            let half_w = obstacle.width / 2.0;
            let left = obstacle.x - half_w;
            let right = obstacle.x + half_w;
            let (Some(c0), Some(c1)) = (
                to_col(left.max(0.0)),
                to_col(right.min(LOGICAL_W - 1.0)),
            ) else {
                continue;
            };
            let bottom_row = (obstacle.height / LOGICAL_H * inner.height as f64) as u16;
            for col in c0..=c1 {
                for row in 0..bottom_row.min(inner.height) {
                    buf.set_string(
                        col,
                        inner.y + row,
                        "█",
                        Style::default().fg(Color::Red),
                    );
                }
            }
        }

        // Price line.
        for &(x, y) in &self.scene.line {
            if let (Some(col), Some(row)) = (to_col(x), to_row(y)) {
                buf.set_string(col, row, "•", Style::default().fg(Color::Yellow));
            }
        }

        // Marker.
        let (bird_x, bird_y) = self.scene.bird;
        if let (Some(col), Some(row)) = (to_col(bird_x), to_row(bird_y)) {
            buf.set_string(
                col,
                row,
                "◆",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            );
        }

        // Axis labels.
        if let Some(range) = &self.scene.axis {
            buf.set_string(
                inner.x,
                inner.y,
                axis_label(range.max()),
                Style::default().fg(Color::DarkGray),
            );
            buf.set_string(
                inner.x,
                inner.y + inner.height - 1,
                axis_label(range.min()),
                Style::default().fg(Color::DarkGray),
            );
        }

        // Phase overlays.
        match self.scene.phase {
            GamePhase::Idle => {
                if let Some(hint_x) = self.scene.idle_hint_x {
                    if let Some(col) = to_col(hint_x.max(0.0)) {
                        buf.set_string(
                            col,
                            inner.y,
                            IDLE_HINT,
                            Style::default().fg(Color::White),
                        );
                    }
                }
            }
            GamePhase::Playing => {
                let score = format!("Score: {}s", self.scene.score_secs);
                let col = inner.x + inner.width.saturating_sub(score.len() as u16 + 1);
                buf.set_string(col, inner.y, score, Style::default().fg(Color::White));
            }
            GamePhase::GameOver => {
                let center_y = inner.y + inner.height / 2;
                let lines = [
                    ("GAME OVER".to_string(), Color::Red),
                    (format!("Score: {}s", self.scene.score_secs), Color::White),
                    ("press space to play again".to_string(), Color::Gray),
                ];
                for (i, (text, color)) in lines.iter().enumerate() {
                    let col = inner.x
                        + inner
                            .width
                            .saturating_sub(text.len() as u16)
                            / 2;
                    let row = (center_y + i as u16).saturating_sub(1);
                    if row < inner.y + inner.height {
                        buf.set_string(
                            col,
                            row,
                            text,
                            Style::default().fg(*color).add_modifier(Modifier::BOLD),
                        );
                    }
                }
            }
        }
    }
}
