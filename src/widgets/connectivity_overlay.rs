//! Connectivity overlay.
//!
//! A banner drawn over everything else while the messaging service is not
//! connected. It is independent of which tab is active and holds no state
//! beyond visible/hidden and an optional running transition.

use crate::messaging::ConnectionStatus;
use crate::styles::Theme;
use ratatui::layout::{Alignment, Rect};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};
use ratatui::Frame;
use std::time::{Duration, Instant};

/// How long an animated show/hide takes.
pub const OVERLAY_TRANSITION: Duration = Duration::from_millis(300);

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

#[derive(Debug, Clone, Copy)]
struct Transition {
    started: Instant,
    to_visible: bool,
}

#[derive(Debug)]
pub struct ConnectivityOverlay {
    theme: Theme,
    visible: bool,
    status: ConnectionStatus,
    transition: Option<Transition>,
    ticks: usize,
}

impl ConnectivityOverlay {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            visible: false,
            status: ConnectionStatus::Offline,
            transition: None,
            ticks: 0,
        }
    }

    /// Show or hide the "connecting" banner.
    pub fn show_connecting_view(&mut self, visible: bool, animated: bool) {
        self.transition = if animated && visible != self.visible {
            Some(Transition {
                started: Instant::now(),
                to_visible: visible,
            })
        } else {
            None
        };
        self.visible = visible;
    }

    /// Record the latest status for the banner text.
    pub fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_animating(&self) -> bool {
        self.transition
            .is_some_and(|t| t.started.elapsed() < OVERLAY_TRANSITION)
    }

    /// Fraction of the banner to draw, 0.0 (hidden) to 1.0 (fully shown).
    fn coverage(&self) -> f32 {
        match self.transition {
            Some(t) if t.started.elapsed() < OVERLAY_TRANSITION => {
                let progress =
                    t.started.elapsed().as_secs_f32() / OVERLAY_TRANSITION.as_secs_f32();
                if t.to_visible {
                    progress
                } else {
                    1.0 - progress
                }
            }
            _ => {
                if self.visible {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let coverage = self.coverage();
        if coverage <= 0.0 {
            return;
        }
        self.ticks = self.ticks.wrapping_add(1);

        let full_width = 44u16.min(area.width);
        let width = ((full_width as f32 * coverage) as u16).max(1);
        let height = 3u16.min(area.height);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let banner = Rect::new(x, area.y, width, height);

        let spinner = SPINNER[self.ticks / 4 % SPINNER.len()];
        let text = format!("{} Connecting to the network ({})", spinner, self.status.label());

        frame.render_widget(Clear, banner);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.warning_style())
            .style(self.theme.background_style());
        let paragraph = Paragraph::new(text)
            .block(block)
            .style(self.theme.warning_style())
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, banner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_starts_hidden() {
        let overlay = ConnectivityOverlay::new(Theme::default());
        assert!(!overlay.is_visible());
        assert!(!overlay.is_animating());
    }

    #[test]
    fn test_show_without_animation() {
        let mut overlay = ConnectivityOverlay::new(Theme::default());
        overlay.show_connecting_view(true, false);
        assert!(overlay.is_visible());
        assert!(!overlay.is_animating());
    }

    #[test]
    fn test_animated_transition_only_on_change() {
        let mut overlay = ConnectivityOverlay::new(Theme::default());
        overlay.show_connecting_view(true, false);

        overlay.show_connecting_view(true, true);
        assert!(overlay.is_visible());
        assert!(!overlay.is_animating());

        overlay.show_connecting_view(false, true);
        assert!(!overlay.is_visible());
        assert!(overlay.is_animating());
    }

    #[test]
    fn test_renders_banner_when_visible() {
        let mut overlay = ConnectivityOverlay::new(Theme::default());
        overlay.set_status(ConnectionStatus::Connecting);
        overlay.show_connecting_view(true, false);

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| overlay.render(f, f.area())).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(rendered.contains("Connecting"));
    }

    #[test]
    fn test_renders_nothing_when_hidden() {
        let mut overlay = ConnectivityOverlay::new(Theme::default());

        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| overlay.render(f, f.area())).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(!rendered.contains("Connecting"));
    }
}
