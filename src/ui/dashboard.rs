use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::event::WsConnectionStatus;

pub struct StatusBar<'a> {
    pub feed_name: Option<&'a str>,
    pub status: WsConnectionStatus,
    pub update_count: u64,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let conn_status = match self.status {
            WsConnectionStatus::Connected => {
                Span::styled("CONNECTED", Style::default().fg(Color::Green))
            }
            WsConnectionStatus::Connecting => {
                Span::styled("CONNECTING", Style::default().fg(Color::Yellow))
            }
            WsConnectionStatus::Disconnected => {
                Span::styled("DISCONNECTED", Style::default().fg(Color::Red))
            }
        };

        let line = Line::from(vec![
            Span::styled(
                " lazer-watch ",
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("| ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.feed_name.unwrap_or("no feed"),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            conn_status,
            Span::styled(" | ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("updates: {}", self.update_count),
                Style::default().fg(Color::DarkGray),
            ),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}

pub struct LogPanel<'a> {
    messages: &'a [String],
}

impl<'a> LogPanel<'a> {
    pub fn new(messages: &'a [String]) -> Self {
        Self { messages }
    }
}

impl Widget for LogPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Log ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let visible = inner.height as usize;
        let start = self.messages.len().saturating_sub(visible);
        let lines: Vec<Line> = self.messages[start..]
            .iter()
            .map(|m| Line::from(Span::styled(m.as_str(), Style::default().fg(Color::Gray))))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

pub struct KeybindBar;

impl Widget for KeybindBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let line = Line::from(vec![
            Span::styled(" [Q]", Style::default().fg(Color::Yellow)),
            Span::styled("uit  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[F]", Style::default().fg(Color::Yellow)),
            Span::styled("eeds  ", Style::default().fg(Color::DarkGray)),
            Span::styled("[Space]", Style::default().fg(Color::Yellow)),
            Span::styled(" flap / start  ", Style::default().fg(Color::DarkGray)),
        ]);

        buf.set_line(area.x, area.y, &line, area.width);
    }
}
