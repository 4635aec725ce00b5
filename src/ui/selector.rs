use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};

use crate::catalog::FeedDescriptor;

/// Searchable feed picker popup.
pub struct FeedSelector<'a> {
    pub search_term: &'a str,
    pub feeds: &'a [&'a FeedDescriptor],
    pub selected_index: usize,
}

impl Widget for FeedSelector<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .title(" Select Price Feed ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 {
            return;
        }

        let search_line = Line::from(vec![
            Span::styled("search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.search_term, Style::default().fg(Color::White)),
            Span::styled("_", Style::default().fg(Color::DarkGray)),
        ]);
        buf.set_line(inner.x, inner.y, &search_line, inner.width);

        let list_area = Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: inner.height - 1,
        };

        if self.feeds.is_empty() {
            let line = Line::from(Span::styled(
                "no price feeds found",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            buf.set_line(list_area.x, list_area.y, &line, list_area.width);
            return;
        }

        // Keep the selection visible when the list is taller than the popup.
        let visible = list_area.height as usize;
        let scroll = self
            .selected_index
            .saturating_sub(visible.saturating_sub(1));
        let lines: Vec<Line> = self
            .feeds
            .iter()
            .enumerate()
            .skip(scroll)
            .take(visible)
            .map(|(i, feed)| {
                let selected = i == self.selected_index;
                let style = if selected {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                Line::from(vec![
                    Span::styled(format!(" {:<10}", feed.name), style),
                    Span::styled(
                        format!(" {}", feed.description),
                        if selected {
                            style
                        } else {
                            Style::default().fg(Color::DarkGray)
                        },
                    ),
                ])
            })
            .collect();
        Paragraph::new(lines).render(list_area, buf);
    }
}

/// Centered popup rectangle, clamped to the surrounding area.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(area, 60, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 10);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
    }

    #[test]
    fn centered_rect_clamps_to_small_areas() {
        let area = Rect::new(0, 0, 10, 5);
        let popup = centered_rect(area, 60, 20);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }
}
