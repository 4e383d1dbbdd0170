//! List navigation helpers shared by the module lists.

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

/// Extension trait for `ListState` with the navigation the module lists use.
pub trait ListStateExt {
    /// Move selection up, stopping at the first item.
    fn move_up_by(&mut self, count: usize, total_items: usize);

    /// Move selection down, stopping at the last item.
    fn move_down_by(&mut self, count: usize, total_items: usize);

    /// Keep the selection inside `0..total_items`, selecting the first item
    /// when nothing is selected yet.
    fn clamp_to(&mut self, total_items: usize);

    /// Apply a navigation key. Returns true if the key moved the selection.
    fn navigate(&mut self, key: KeyCode, total_items: usize) -> bool;
}

impl ListStateExt for ListState {
    fn move_up_by(&mut self, count: usize, total_items: usize) {
        if total_items == 0 {
            return;
        }
        let current = self.selected().unwrap_or(0);
        self.select(Some(current.saturating_sub(count)));
    }

    fn move_down_by(&mut self, count: usize, total_items: usize) {
        if total_items == 0 {
            return;
        }
        let current = self.selected().unwrap_or(0);
        self.select(Some((current + count).min(total_items - 1)));
    }

    fn clamp_to(&mut self, total_items: usize) {
        if total_items == 0 {
            self.select(None);
            return;
        }
        let current = self.selected().unwrap_or(0);
        self.select(Some(current.min(total_items - 1)));
    }

    fn navigate(&mut self, key: KeyCode, total_items: usize) -> bool {
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.move_up_by(1, total_items),
            KeyCode::Down | KeyCode::Char('j') => self.move_down_by(1, total_items),
            KeyCode::PageUp => self.move_up_by(DEFAULT_PAGE_SIZE, total_items),
            KeyCode::PageDown => self.move_down_by(DEFAULT_PAGE_SIZE, total_items),
            KeyCode::Home => self.move_up_by(total_items, total_items),
            KeyCode::End => self.move_down_by(total_items, total_items),
            _ => return false,
        }
        true
    }
}

/// Default page size for page up/down navigation.
pub const DEFAULT_PAGE_SIZE: usize = 10;
