//! Conversations tab.
//!
//! A small navigation stack: the conversation list at the root and open
//! chats pushed on top of it. Only the object store and chat sub-services
//! are reachable from here.

use super::{key_press, ModuleAction, ModuleCoordinator, ModuleKind, Presentation};
use crate::messaging::{Author, ChatService, Conversation, ConversationId, ObjectStore};
use crate::styles::{Theme, LIST_HIGHLIGHT_SYMBOL};
use crate::utils::{ListStateExt, TextInput};
use crate::widgets::{TextInputWidget, TextInputWidgetExt};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{Event, KeyCode};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};
use std::rc::Rc;
use tracing::{debug, info, warn};

pub struct ConversationsModule {
    theme: Theme,
    objects: Rc<dyn ObjectStore>,
    chats: Rc<dyn ChatService>,
    conversations: Vec<Conversation>,
    list_state: ListState,
    /// Open chats, top of the stack is visible. Empty shows the list.
    stack: Vec<ConversationId>,
    composer: TextInput,
}

impl ConversationsModule {
    pub fn new(theme: Theme, objects: Rc<dyn ObjectStore>, chats: Rc<dyn ChatService>) -> Self {
        Self {
            theme,
            objects,
            chats,
            conversations: Vec::new(),
            list_state: ListState::default(),
            stack: Vec::new(),
            composer: TextInput::new(),
        }
    }

    /// Show a conversation.
    pub fn show_conversation(&mut self, conversation: ConversationId, presentation: Presentation) {
        match presentation {
            Presentation::Immediate => {
                self.stack.clear();
                self.stack.push(conversation);
            }
            Presentation::Animated => {
                if self.stack.last() != Some(&conversation) {
                    self.stack.push(conversation);
                }
            }
        }
        self.composer.clear();
        debug!("Showing {} ({:?})", conversation, presentation);
    }

    /// The conversation currently on screen, if a chat is open.
    pub fn current_conversation(&self) -> Option<ConversationId> {
        self.stack.last().copied()
    }

    /// Depth of the navigation stack, not counting the list.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    fn reload(&mut self) {
        self.conversations = self.objects.conversations();
        self.list_state.clamp_to(self.conversations.len());
    }

    fn handle_list_key(&mut self, code: KeyCode) -> ModuleAction {
        if self.list_state.navigate(code, self.conversations.len()) {
            return ModuleAction::None;
        }
        if code == KeyCode::Enter {
            let selected = self
                .list_state
                .selected()
                .and_then(|i| self.conversations.get(i))
                .map(|c| c.id);
            if let Some(id) = selected {
                self.show_conversation(id, Presentation::Animated);
            }
        }
        ModuleAction::None
    }

    fn handle_chat_key(&mut self, conversation: ConversationId, code: KeyCode) -> ModuleAction {
        match code {
            KeyCode::Esc => {
                self.stack.pop();
                self.composer.clear();
                ModuleAction::None
            }
            KeyCode::Enter => {
                if self.composer.is_empty() {
                    return ModuleAction::None;
                }
                let text = self.composer.take();
                match self.chats.send_message(conversation, &text) {
                    Ok(()) => {
                        info!("Sent message in {}", conversation);
                        ModuleAction::None
                    }
                    Err(e) => {
                        warn!("Failed to send message in {}: {:#}", conversation, e);
                        // Keep the draft so the user can retry
                        self.composer = TextInput::with_text(text);
                        ModuleAction::Failed(format!("Message not sent: {}", e))
                    }
                }
            }
            other => {
                self.composer.handle_key(other);
                ModuleAction::None
            }
        }
    }

    fn render_list(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_focused_style())
            .title(" Chats ")
            .title_style(self.theme.title_style());

        if self.conversations.is_empty() {
            let empty = Paragraph::new("No conversations. Pick a contact to start one.")
                .style(self.theme.muted_style())
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .conversations
            .iter()
            .map(|c| {
                let when = c
                    .last_activity
                    .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
                    .unwrap_or_default();
                ListItem::new(Line::from(vec![
                    Span::styled(c.title.clone(), self.theme.name_style()),
                    Span::styled(format!("  {}", when), self.theme.muted_style()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(self.theme.highlight_style())
            .highlight_symbol(LIST_HIGHLIGHT_SYMBOL);
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_chat(&self, frame: &mut Frame, area: Rect, conversation: ConversationId) {
        let [history_area, input_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

        let peer = self
            .objects
            .conversation(conversation)
            .and_then(|c| self.objects.contact(&c.contact))
            .map(|c| c.name)
            .unwrap_or_else(|| conversation.to_string());

        let lines: Vec<Line> = self
            .objects
            .messages(conversation)
            .into_iter()
            .map(|m| {
                let (name, style) = match &m.author {
                    Author::Me => ("you".to_string(), self.theme.emphasis_style()),
                    Author::Contact(_) => (peer.clone(), self.theme.name_style()),
                };
                Line::from(vec![
                    Span::styled(
                        format!("[{}] ", m.sent_at.with_timezone(&Local).format("%H:%M")),
                        self.theme.muted_style(),
                    ),
                    Span::styled(format!("{}: ", name), style),
                    Span::styled(m.text, self.theme.text_style()),
                ])
            })
            .collect();

        // Keep the newest messages in view
        let visible = history_area.height.saturating_sub(2) as usize;
        let skip = lines.len().saturating_sub(visible);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.theme.border_style())
            .title(format!(" {} ", peer))
            .title_style(self.theme.title_style());
        let history = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(history, history_area);

        let input = TextInputWidget::new(&self.composer, &self.theme)
            .placeholder("Type a message")
            .focused(true);
        frame.render_text_input_widget(input, input_area);
    }
}

impl ModuleCoordinator for ConversationsModule {
    fn kind(&self) -> ModuleKind {
        ModuleKind::Conversations
    }

    fn start(&mut self) -> Result<()> {
        self.reload();
        debug!(
            "Conversations module started with {} conversations",
            self.conversations.len()
        );
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        self.reload();
        match self.current_conversation() {
            Some(conversation) => self.render_chat(frame, area, conversation),
            None => self.render_list(frame, area),
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) -> Result<ModuleAction> {
        let Some(key) = key_press(event) else {
            return Ok(ModuleAction::None);
        };
        let action = match self.current_conversation() {
            Some(conversation) => self.handle_chat_key(conversation, key.code),
            None => {
                self.reload();
                self.handle_list_key(key.code)
            }
        };
        Ok(action)
    }

    fn is_input_focused(&self) -> bool {
        self.current_conversation().is_some()
    }

    fn footer_hint(&self) -> &'static str {
        if self.current_conversation().is_some() {
            "Send: Enter | Back: Esc"
        } else {
            "Open: Enter | Move: ↑/↓"
        }
    }
}
