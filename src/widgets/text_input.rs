//! Text input widget for rendering `TextInput` instances.

use crate::styles::Theme;
use crate::utils::text_input::TextInput;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

/// A bordered single-line input.
pub struct TextInputWidget<'a> {
    input: &'a TextInput,
    theme: &'a Theme,
    title: Option<&'a str>,
    placeholder: Option<&'a str>,
    focused: bool,
}

impl<'a> TextInputWidget<'a> {
    pub fn new(input: &'a TextInput, theme: &'a Theme) -> Self {
        Self {
            input,
            theme,
            title: None,
            placeholder: None,
            focused: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    fn display_text(&self) -> &str {
        if self.input.text().is_empty() {
            self.placeholder.unwrap_or("")
        } else {
            self.input.text()
        }
    }

    fn block(&self) -> Block<'a> {
        let border_style = if self.focused {
            self.theme.border_focused_style()
        } else {
            self.theme.border_style()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);
        match self.title {
            Some(title) => block.title(format!(" {} ", title)),
            None => block,
        }
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.input.text().is_empty() {
            self.theme.muted_style()
        } else {
            self.theme.text_style()
        };
        Paragraph::new(self.display_text().to_string())
            .block(self.block())
            .style(style)
            .render(area, buf);
    }
}

/// Frame extension that also places the terminal cursor.
pub trait TextInputWidgetExt {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect);
}

impl TextInputWidgetExt for Frame<'_> {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect) {
        let focused = widget.focused;
        let cursor = widget.input.cursor();
        let inner = widget.block().inner(area);

        self.render_widget(widget, area);

        if focused && inner.width > 0 {
            let x = inner.x + (cursor as u16).min(inner.width - 1);
            self.set_cursor_position((x, inner.y));
        }
    }
}
