//! Tab bar presenting every module's root view as a selectable page.

use crate::modules::ModuleKind;
use crate::styles::Theme;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, Tabs};
use ratatui::Frame;

/// Navigation container: the ordered pages and the active one.
///
/// Only the running coordinator mutates the selection.
#[derive(Debug, Default)]
pub struct NavigationContainer {
    pages: Vec<ModuleKind>,
    selected: usize,
}

impl NavigationContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pages. The selection is reset to the first page.
    pub fn set_pages(&mut self, pages: Vec<ModuleKind>) {
        self.pages = pages;
        self.selected = 0;
    }

    pub fn pages(&self) -> &[ModuleKind] {
        &self.pages
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_kind(&self) -> Option<ModuleKind> {
        self.pages.get(self.selected).copied()
    }

    /// Select a page by position. Out of range positions are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.pages.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        if !self.pages.is_empty() {
            self.selected = (self.selected + 1) % self.pages.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.pages.is_empty() {
            self.selected = (self.selected + self.pages.len() - 1) % self.pages.len();
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let titles: Vec<Line> = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, kind)| Line::from(format!(" {} {} ", i + 1, kind.title())))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.selected)
            .style(theme.muted_style())
            .highlight_style(theme.title_style())
            .divider("│")
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .border_type(BorderType::Rounded)
                    .border_style(theme.border_style()),
            );
        frame.render_widget(tabs, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> NavigationContainer {
        let mut nav = NavigationContainer::new();
        nav.set_pages(ModuleKind::ORDER.to_vec());
        nav
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut nav = container();
        assert!(nav.select(2));
        assert!(!nav.select(9));
        assert_eq!(nav.selected_index(), 2);
        assert_eq!(nav.selected_kind(), Some(ModuleKind::Settings));
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let mut nav = container();
        nav.select_previous();
        assert_eq!(nav.selected_kind(), Some(ModuleKind::Profile));
        nav.select_next();
        assert_eq!(nav.selected_kind(), Some(ModuleKind::Contacts));
    }

    #[test]
    fn test_empty_container() {
        let mut nav = NavigationContainer::new();
        nav.select_next();
        nav.select_previous();
        assert_eq!(nav.selected_kind(), None);
        assert!(!nav.select(0));
    }
}
