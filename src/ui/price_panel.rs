use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::catalog::FeedDescriptor;

/// Big formatted price plus the derived account address and update metrics.
pub struct PricePanel<'a> {
    pub feed: Option<&'a FeedDescriptor>,
    pub formatted_price: Option<String>,
    pub feed_address: Option<&'a str>,
    pub update_count: u64,
    pub updates_per_second: f64,
    pub ms_per_update: f64,
}

impl Widget for PricePanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.feed {
            Some(feed) => format!(" {} — {} ", feed.name, feed.description),
            None => " Price ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let price_line = match (&self.feed, &self.formatted_price) {
            (Some(_), Some(price)) => Line::from(vec![
                Span::styled("$ ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    price.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            (Some(_), None) => Line::from(Span::styled(
                "awaiting data...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
            (None, _) => Line::from(Span::styled(
                "select a price feed",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
        };

        let address_line = match self.feed_address {
            Some(address) => Line::from(vec![
                Span::styled("account: ", Style::default().fg(Color::DarkGray)),
                Span::styled(address, Style::default().fg(Color::Cyan)),
            ]),
            None => Line::default(),
        };

        let metrics_line = Line::from(vec![
            Span::styled("updates: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.update_count.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::styled("   upd/s: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.2}", self.updates_per_second),
                Style::default().fg(Color::White),
            ),
            Span::styled("   ms/upd: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{:.0}", self.ms_per_update),
                Style::default().fg(Color::White),
            ),
        ]);

        Paragraph::new(vec![price_line, address_line, metrics_line])
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}
