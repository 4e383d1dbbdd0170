//! Call coordinator.
//!
//! Owns the single active or pending call and the banner shown for it over
//! whatever tab is active.

use crate::messaging::{CallId, CallService, ConversationId, ObjectStore};
use crate::modules::key_press;
use crate::styles::Theme;
use crate::widgets::Popup;
use anyhow::{bail, Result};
use crossterm::event::{Event, KeyCode};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, info};

/// The call currently owned by the coordinator.
#[derive(Debug, Clone)]
pub struct ActiveCall {
    pub id: CallId,
    pub conversation: ConversationId,
    pub peer: String,
    pub video: bool,
    pub started_at: Instant,
}

pub struct CallCoordinator {
    theme: Theme,
    calls: Rc<dyn CallService>,
    objects: Rc<dyn ObjectStore>,
    active: Option<ActiveCall>,
    started: bool,
}

impl CallCoordinator {
    pub fn new(theme: Theme, calls: Rc<dyn CallService>, objects: Rc<dyn ObjectStore>) -> Self {
        Self {
            theme,
            calls,
            objects,
            active: None,
            started: false,
        }
    }

    pub fn start(&mut self) {
        self.started = true;
        debug!("Call coordinator started");
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn active_call(&self) -> Option<&ActiveCall> {
        self.active.as_ref()
    }

    /// Place a call in `conversation`, with video when `enable_video` is set.
    ///
    /// Fails while another call is active.
    pub fn place_call(&mut self, conversation: ConversationId, enable_video: bool) -> Result<CallId> {
        if let Some(active) = &self.active {
            bail!("Already in a call with {}", active.peer);
        }

        let id = self.calls.call(conversation, enable_video)?;
        let peer = self
            .objects
            .conversation(conversation)
            .map(|c| c.title)
            .unwrap_or_else(|| conversation.to_string());

        info!("Calling {} (video: {})", peer, enable_video);
        self.active = Some(ActiveCall {
            id,
            conversation,
            peer,
            video: enable_video,
            started_at: Instant::now(),
        });
        Ok(id)
    }

    /// Hang up the active call, if any.
    pub fn end_call(&mut self) -> Result<()> {
        let Some(active) = self.active.take() else {
            return Ok(());
        };
        info!("Hanging up call with {}", active.peer);
        self.calls.end_call(active.id)
    }

    /// Handle keys meant for the call banner.
    ///
    /// Returns true if the event was consumed.
    pub fn handle_event(&mut self, event: &Event) -> Result<bool> {
        if self.active.is_none() {
            return Ok(false);
        }
        match key_press(event).map(|k| k.code) {
            Some(KeyCode::Esc | KeyCode::Char('h')) => {
                self.end_call()?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(active) = &self.active else {
            return;
        };

        let elapsed = active.started_at.elapsed().as_secs();
        let kind = if active.video { "Video call" } else { "Call" };
        let title = format!("{} with {}", kind, active.peer);
        let content = Popup::new(&self.theme)
            .size(44, 5)
            .title(&title)
            .render(frame, area);

        let body = vec![
            Line::from(Span::styled(
                format!("{:02}:{:02}", elapsed / 60, elapsed % 60),
                self.theme.emphasis_style(),
            )),
            Line::from(Span::styled("Hang up: h/Esc", self.theme.muted_style())),
        ];
        frame.render_widget(Paragraph::new(body).alignment(Alignment::Center), content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::local::demo_contacts;
    use crate::messaging::{ChatService, ContactId, LocalMessenger, LocalMessengerOptions};
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn setup() -> (Rc<LocalMessenger>, CallCoordinator) {
        let engine = Rc::new(LocalMessenger::new(
            LocalMessengerOptions {
                contacts: demo_contacts(),
                ..LocalMessengerOptions::default()
            },
            None,
        ));
        let mut call = CallCoordinator::new(Theme::default(), engine.clone(), engine.clone());
        call.start();
        (engine, call)
    }

    #[test]
    fn test_place_call_records_active_call() {
        let (engine, mut call) = setup();
        let conversation = engine
            .get_or_create_conversation(&ContactId::new("alice"))
            .unwrap();

        call.place_call(conversation, true).unwrap();
        let active = call.active_call().unwrap();
        assert_eq!(active.peer, "Alice");
        assert!(active.video);
        assert_eq!(active.conversation, conversation);
    }

    #[test]
    fn test_second_call_is_rejected_while_active() {
        let (engine, mut call) = setup();
        let alice = engine
            .get_or_create_conversation(&ContactId::new("alice"))
            .unwrap();
        let bob = engine
            .get_or_create_conversation(&ContactId::new("bob"))
            .unwrap();

        call.place_call(alice, false).unwrap();
        assert!(call.place_call(bob, false).is_err());
        assert_eq!(call.active_call().unwrap().conversation, alice);
    }

    #[test]
    fn test_hang_up_key_ends_call() {
        let (engine, mut call) = setup();
        let alice = engine
            .get_or_create_conversation(&ContactId::new("alice"))
            .unwrap();
        call.place_call(alice, false).unwrap();

        let hang_up = Event::Key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE));
        assert!(call.handle_event(&hang_up).unwrap());
        assert!(call.active_call().is_none());
        assert!(!call.handle_event(&hang_up).unwrap());

        // The engine is free again
        assert!(call.place_call(alice, true).is_ok());
    }
}
