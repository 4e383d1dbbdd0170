//! Centered popup frame for prompts and banners drawn over a page.

use crate::styles::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

/// Popup with a fixed size, clamped to the parent area.
pub struct Popup<'a> {
    width: u16,
    height: u16,
    title: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> Popup<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            width: 50,
            height: 7,
            title: None,
            theme,
        }
    }

    pub fn size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Centered popup area inside `area`.
    pub fn area(&self, area: Rect) -> Rect {
        let width = self.width.min(area.width);
        let height = self.height.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width, height)
    }

    /// Clear the popup area, draw its border and title, and return the
    /// content area.
    pub fn render(&self, frame: &mut Frame, area: Rect) -> Rect {
        let popup_area = self.area(area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Thick)
            .border_style(self.theme.border_focused_style())
            .style(self.theme.background_style());
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let Some(title) = self.title else {
            return inner;
        };
        let [title_area, content_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        frame.render_widget(
            Paragraph::new(title)
                .alignment(Alignment::Center)
                .style(self.theme.title_style()),
            title_area,
        );
        content_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_is_centered_and_clamped() {
        let theme = Theme::default();
        let popup = Popup::new(&theme).size(20, 4);
        let area = popup.area(Rect::new(0, 0, 40, 10));
        assert_eq!(area, Rect::new(10, 3, 20, 4));

        let clamped = Popup::new(&theme).size(80, 40).area(Rect::new(0, 0, 40, 10));
        assert_eq!(clamped, Rect::new(0, 0, 40, 10));
    }
}
