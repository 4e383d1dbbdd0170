//! Profile tab: who you are, how you are connected, and logout.

use super::{key_press, ModuleAction, ModuleCoordinator, ModuleKind, ProfileEvent};
use crate::messaging::UserService;
use crate::styles::Theme;
use crate::widgets::Popup;
use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use std::rc::Rc;

pub struct ProfileModule {
    theme: Theme,
    user: Rc<dyn UserService>,
    confirming_logout: bool,
}

impl ProfileModule {
    pub fn new(theme: Theme, user: Rc<dyn UserService>) -> Self {
        Self {
            theme,
            user,
            confirming_logout: false,
        }
    }

    pub fn is_confirming_logout(&self) -> bool {
        self.confirming_logout
    }
}

impl ModuleCoordinator for ProfileModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Profile
    }

    fn start(&mut self) -> Result<()> {
        self.confirming_logout = false;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let status = self.user.connection_status();
        let status_style = if status.is_connected() {
            self.theme.success_style()
        } else {
            self.theme.warning_style()
        };

        let lines = vec![
            Line::from(vec![
                Span::styled("Nickname  ", self.theme.muted_style()),
                Span::styled(self.user.nickname(), self.theme.name_style()),
            ]),
            Line::from(vec![
                Span::styled("Address   ", self.theme.muted_style()),
                Span::styled(self.user.address(), self.theme.emphasis_style()),
            ]),
            Line::from(vec![
                Span::styled("Network   ", self.theme.muted_style()),
                Span::styled(status.label(), status_style),
            ]),
            Line::default(),
            Line::from(Span::styled("Press L to log out", self.theme.text_style())),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focused_style())
            .title(" Profile ")
            .title_style(self.theme.title_style());
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if self.confirming_logout {
            let content = Popup::new(&self.theme)
                .size(40, 5)
                .title("Log out?")
                .render(frame, area);
            frame.render_widget(
                Paragraph::new("y: log out   n/Esc: stay")
                    .alignment(Alignment::Center)
                    .style(self.theme.text_style()),
                content,
            );
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<ModuleAction> {
        let Some(key) = key_press(event) else {
            return Ok(ModuleAction::None);
        };

        if self.confirming_logout {
            return Ok(match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.confirming_logout = false;
                    ModuleAction::Profile(ProfileEvent::LogoutRequested)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.confirming_logout = false;
                    ModuleAction::None
                }
                _ => ModuleAction::None,
            });
        }

        if matches!(key.code, KeyCode::Char('l') | KeyCode::Char('L')) {
            self.confirming_logout = true;
        }
        Ok(ModuleAction::None)
    }

    /// The logout confirmation is modal: global keys must not leave it open
    /// in the background.
    fn is_input_focused(&self) -> bool {
        self.confirming_logout
    }

    fn footer_hint(&self) -> &'static str {
        if self.confirming_logout {
            "Confirm: y | Cancel: n/Esc"
        } else {
            "Log out: L"
        }
    }
}
