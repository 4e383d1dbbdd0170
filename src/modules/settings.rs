//! Settings tab.
//!
//! Preferences here live for the session only.

use super::{key_press, ModuleAction, ModuleCoordinator, ModuleKind};
use crate::styles::{Theme, LIST_HIGHLIGHT_SYMBOL};
use crate::utils::ListStateExt;
use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preference {
    pub label: &'static str,
    pub enabled: bool,
}

pub struct SettingsModule {
    theme: Theme,
    preferences: Vec<Preference>,
    list_state: ListState,
}

impl SettingsModule {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            preferences: vec![
                Preference {
                    label: "Notifications",
                    enabled: true,
                },
                Preference {
                    label: "Message previews",
                    enabled: true,
                },
                Preference {
                    label: "Typing indicators",
                    enabled: false,
                },
            ],
            list_state: ListState::default(),
        }
    }

    pub fn preferences(&self) -> &[Preference] {
        &self.preferences
    }

    fn toggle_selected(&mut self) -> ModuleAction {
        let Some(pref) = self
            .list_state
            .selected()
            .and_then(|i| self.preferences.get_mut(i))
        else {
            return ModuleAction::None;
        };
        pref.enabled = !pref.enabled;
        ModuleAction::Notify(format!(
            "{} {}",
            pref.label,
            if pref.enabled { "enabled" } else { "disabled" }
        ))
    }
}

impl ModuleCoordinator for SettingsModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Settings
    }

    fn start(&mut self) -> Result<()> {
        self.list_state.clamp_to(self.preferences.len());
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let [list_area, about_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(2)]).areas(area);

        let items: Vec<ListItem> = self
            .preferences
            .iter()
            .map(|p| {
                let (mark, style) = if p.enabled {
                    ("[x] ", self.theme.success_style())
                } else {
                    ("[ ] ", self.theme.muted_style())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(mark, style),
                    Span::styled(p.label, self.theme.text_style()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(self.theme.border_focused_style())
                    .title(" Settings ")
                    .title_style(self.theme.title_style()),
            )
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        let about = Paragraph::new(format!(
            "parlor {} · theme: {}",
            env!("CARGO_PKG_VERSION"),
            self.theme.theme_type
        ))
        .style(self.theme.muted_style());
        frame.render_widget(about, about_area);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<ModuleAction> {
        let Some(key) = key_press(event) else {
            return Ok(ModuleAction::None);
        };
        if self.list_state.navigate(key.code, self.preferences.len()) {
            return Ok(ModuleAction::None);
        }
        let action = match key.code {
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            _ => ModuleAction::None,
        };
        Ok(action)
    }

    fn footer_hint(&self) -> &'static str {
        "Toggle: Space/Enter | Move: ↑/↓"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};

    #[test]
    fn test_toggle_selected_preference() {
        let mut settings = SettingsModule::new(Theme::default());
        settings.start().unwrap();

        let down = Event::Key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE));
        let space = Event::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));
        settings.handle_event(&down).unwrap();
        let action = settings.handle_event(&space).unwrap();

        assert_eq!(
            action,
            ModuleAction::Notify("Message previews disabled".to_string())
        );
        assert!(!settings.preferences()[1].enabled);
        assert!(settings.preferences()[0].enabled);
    }
}
