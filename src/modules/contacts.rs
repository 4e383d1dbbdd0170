//! Contacts tab: the friend list and the entry point for chats and calls.

use super::{key_press, ContactsEvent, ModuleAction, ModuleCoordinator, ModuleKind};
use crate::messaging::{Contact, ContactId, ObjectStore, UserService};
use crate::styles::{Theme, LIST_HIGHLIGHT_SYMBOL};
use crate::utils::ListStateExt;
use anyhow::Result;
use crossterm::event::{Event, KeyCode};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use std::rc::Rc;
use tracing::debug;

pub struct ContactsModule {
    theme: Theme,
    objects: Rc<dyn ObjectStore>,
    user: Rc<dyn UserService>,
    contacts: Vec<Contact>,
    list_state: ListState,
}

impl ContactsModule {
    pub fn new(theme: Theme, objects: Rc<dyn ObjectStore>, user: Rc<dyn UserService>) -> Self {
        Self {
            theme,
            objects,
            user,
            contacts: Vec::new(),
            list_state: ListState::default(),
        }
    }

    fn reload(&mut self) {
        self.contacts = self.objects.contacts();
        self.list_state.clamp_to(self.contacts.len());
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.list_state
            .selected()
            .and_then(|i| self.contacts.get(i))
    }

    fn request(&self, make: fn(ContactId) -> ContactsEvent) -> ModuleAction {
        match self.selected_contact() {
            Some(contact) => ModuleAction::Contacts(make(contact.id.clone())),
            None => ModuleAction::None,
        }
    }
}

impl ModuleCoordinator for ContactsModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Contacts
    }

    fn start(&mut self) -> Result<()> {
        self.reload();
        debug!("Contacts module started with {} contacts", self.contacts.len());
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        // Presence changes under us, so the list is refreshed every frame
        self.reload();

        let [header_area, list_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(area);

        let header = Line::from(vec![
            Span::styled("Your address: ", self.theme.muted_style()),
            Span::styled(self.user.address(), self.theme.emphasis_style()),
        ]);
        frame.render_widget(Paragraph::new(header), header_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focused_style())
            .title(format!(" Contacts ({}) ", self.contacts.len()))
            .title_style(self.theme.title_style());

        if self.contacts.is_empty() {
            let empty = Paragraph::new("No contacts yet.")
                .style(self.theme.muted_style())
                .block(block);
            frame.render_widget(empty, list_area);
            return Ok(());
        }

        let items: Vec<ListItem> = self
            .contacts
            .iter()
            .map(|contact| {
                let (marker, marker_style) = if contact.online {
                    ("● ", self.theme.success_style())
                } else {
                    ("○ ", self.theme.muted_style())
                };
                let mut spans = vec![
                    Span::styled(marker, marker_style),
                    Span::styled(contact.name.clone(), self.theme.name_style()),
                ];
                if !contact.status_message.is_empty() {
                    spans.push(Span::styled(
                        format!("  {}", contact.status_message),
                        self.theme.muted_style(),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, list_area, &mut self.list_state);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<ModuleAction> {
        let Some(key) = key_press(event) else {
            return Ok(ModuleAction::None);
        };

        if self.list_state.navigate(key.code, self.contacts.len()) {
            return Ok(ModuleAction::None);
        }

        let action = match key.code {
            KeyCode::Enter => self.request(ContactsEvent::OpenConversation),
            KeyCode::Char('c') => self.request(ContactsEvent::AudioCall),
            KeyCode::Char('v') => self.request(ContactsEvent::VideoCall),
            KeyCode::Char('r') => {
                self.reload();
                ModuleAction::Notify(format!("{} contacts", self.contacts.len()))
            }
            _ => ModuleAction::None,
        };
        Ok(action)
    }

    fn footer_hint(&self) -> &'static str {
        "Chat: Enter | Call: c | Video: v | Refresh: r"
    }
}
