//! Login screen shown while no session is running.

use crate::modules::key_press;
use crate::styles::Theme;
use crate::utils::TextInput;
use crate::widgets::{Footer, TextInputWidget, TextInputWidgetExt};
use crossterm::event::{Event, KeyCode, KeyModifiers};
use indoc::indoc;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const LOGO: &str = indoc! {"
    ┏━┓┏━┓┏━┓╻  ┏━┓┏━┓
    ┣━┛┣━┫┣┳┛┃  ┃ ┃┣┳┛
    ╹  ╹ ╹╹┗╸┗━╸┗━┛╹┗╸
"};

const MAX_NICKNAME_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit(String),
    Quit,
}

pub struct LoginScreen {
    theme: Theme,
    nickname: TextInput,
    error: Option<String>,
}

impl LoginScreen {
    /// Create the screen, prefilled with the last used nickname.
    pub fn new(theme: Theme, last_nickname: Option<&str>) -> Self {
        Self {
            theme,
            nickname: TextInput::with_text(last_nickname.unwrap_or_default()),
            error: None,
        }
    }

    /// Show a login failure under the input.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_event(&mut self, event: &Event) -> LoginAction {
        let Some(key) = key_press(event) else {
            return LoginAction::None;
        };
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return LoginAction::Quit;
        }

        match key.code {
            KeyCode::Esc => LoginAction::Quit,
            KeyCode::Enter => {
                let nickname = self.nickname.text_trimmed();
                if nickname.is_empty() {
                    self.error = Some("Nickname cannot be empty".to_string());
                    LoginAction::None
                } else if nickname.chars().count() > MAX_NICKNAME_LEN {
                    self.error = Some(format!(
                        "Nickname must be at most {} characters",
                        MAX_NICKNAME_LEN
                    ));
                    LoginAction::None
                } else {
                    self.error = None;
                    LoginAction::Submit(nickname.to_string())
                }
            }
            code => {
                if self.nickname.handle_key(code) {
                    self.error = None;
                }
                LoginAction::None
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [_, logo_area, input_area, error_area, _, footer_area] = Layout::vertical([
            Constraint::Percentage(30),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(LOGO)
                .style(self.theme.title_style())
                .alignment(Alignment::Center),
            logo_area,
        );

        let [_, input_col, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(40),
            Constraint::Fill(1),
        ])
        .areas(input_area);
        let input = TextInputWidget::new(&self.nickname, &self.theme)
            .title("Nickname")
            .placeholder("Pick a nickname")
            .focused(true);
        frame.render_text_input_widget(input, input_col);

        if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(error.as_str())
                    .style(self.theme.error_style())
                    .alignment(Alignment::Center),
                error_area,
            );
        }

        Footer::render(frame, footer_area, "Log in: Enter | Quit: Esc", &self.theme);
    }
}
