//! Shared test utilities for coordinator integration tests.
//!
//! Provides `FakeMessenger`, a messaging engine that records every command
//! it receives and lets a test push connectivity statuses, and
//! `RecordingSession`, a session store that counts lifecycle writes.

#![allow(dead_code)]

use anyhow::{bail, Result};
use parlor::messaging::{
    BootstrapService, CallId, CallService, ChatService, ConnectionStatus, Contact, ContactId,
    Conversation, ConversationId, Message, MessagingService, ObjectStore, UserService,
};
use parlor::modules::ModuleKind;
use parlor::session::SessionStore;
use parlor::styles::Theme;
use parlor::RunningCoordinator;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Messaging engine double.
#[derive(Default)]
pub struct FakeMessenger {
    contacts: Vec<Contact>,
    conversations: RefCell<Vec<Conversation>>,
    /// Contacts passed to `get_or_create_conversation`, in call order.
    pub resolved: RefCell<Vec<ContactId>>,
    /// `(conversation, enable_video)` for every placed call.
    pub calls: RefCell<Vec<(ConversationId, bool)>>,
    /// Every message sent, with its conversation.
    pub sent: RefCell<Vec<(ConversationId, String)>>,
    pub bootstraps: Cell<usize>,
    pub node_registrations: Cell<usize>,
    /// Make every conversation lookup fail.
    pub fail_resolution: Cell<bool>,
    subscribers: RefCell<Vec<UnboundedSender<ConnectionStatus>>>,
    status: Cell<ConnectionStatus>,
}

impl FakeMessenger {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            contacts: vec![
                Contact::new("alice", "Alice").online(true),
                Contact::new("bob", "Bob"),
            ],
            ..Self::default()
        })
    }

    /// Deliver a status to every subscriber, as the engine would.
    pub fn emit(&self, status: ConnectionStatus) {
        self.status.set(status);
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.send(status).is_ok());
    }

    pub fn resolved_count(&self, contact: &str) -> usize {
        self.resolved
            .borrow()
            .iter()
            .filter(|c| c.as_str() == contact)
            .count()
    }

    pub fn conversation_for(&self, contact: &str) -> Option<ConversationId> {
        self.conversations
            .borrow()
            .iter()
            .find(|c| c.contact.as_str() == contact)
            .map(|c| c.id)
    }
}

impl ObjectStore for FakeMessenger {
    fn contacts(&self) -> Vec<Contact> {
        self.contacts.clone()
    }

    fn contact(&self, id: &ContactId) -> Option<Contact> {
        self.contacts.iter().find(|c| &c.id == id).cloned()
    }

    fn conversations(&self) -> Vec<Conversation> {
        self.conversations.borrow().clone()
    }

    fn conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.conversations
            .borrow()
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    fn messages(&self, _conversation: ConversationId) -> Vec<Message> {
        Vec::new()
    }
}

impl ChatService for FakeMessenger {
    fn get_or_create_conversation(&self, contact: &ContactId) -> Result<ConversationId> {
        self.resolved.borrow_mut().push(contact.clone());
        if self.fail_resolution.get() {
            bail!("engine unavailable");
        }
        if let Some(id) = self.conversation_for(contact.as_str()) {
            return Ok(id);
        }
        let mut conversations = self.conversations.borrow_mut();
        let id = ConversationId::new(conversations.len() as u64 + 100);
        conversations.push(Conversation {
            id,
            contact: contact.clone(),
            title: contact.to_string(),
            last_activity: None,
        });
        Ok(id)
    }

    fn send_message(&self, conversation: ConversationId, text: &str) -> Result<()> {
        self.sent.borrow_mut().push((conversation, text.to_string()));
        Ok(())
    }
}

impl CallService for FakeMessenger {
    fn call(&self, conversation: ConversationId, enable_video: bool) -> Result<CallId> {
        let mut calls = self.calls.borrow_mut();
        calls.push((conversation, enable_video));
        Ok(CallId::new(calls.len() as u64))
    }

    fn end_call(&self, _call: CallId) -> Result<()> {
        Ok(())
    }
}

impl UserService for FakeMessenger {
    fn nickname(&self) -> String {
        "tester".to_string()
    }

    fn address(&self) -> String {
        "0000TEST".to_string()
    }

    fn connection_status(&self) -> ConnectionStatus {
        self.status.get()
    }

    fn subscribe_connectivity(&self) -> UnboundedReceiver<ConnectionStatus> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.borrow_mut().push(tx);
        rx
    }
}

impl BootstrapService for FakeMessenger {
    fn add_predefined_nodes(&self) -> usize {
        self.node_registrations.set(self.node_registrations.get() + 1);
        1
    }

    fn bootstrap(&self) {
        self.bootstraps.set(self.bootstraps.get() + 1);
    }
}

/// Counts of session lifecycle writes, shared with the test.
#[derive(Debug, Default)]
pub struct SessionLog {
    pub begun: Cell<usize>,
    pub ended: Cell<usize>,
}

/// Session store that records writes instead of persisting them.
pub struct RecordingSession {
    log: Rc<SessionLog>,
    fail_end: bool,
}

impl RecordingSession {
    pub fn new() -> (Self, Rc<SessionLog>) {
        let log = Rc::new(SessionLog::default());
        (
            Self {
                log: Rc::clone(&log),
                fail_end: false,
            },
            log,
        )
    }

    /// A store whose `end_session` always fails after counting the attempt.
    pub fn failing() -> (Self, Rc<SessionLog>) {
        let (mut store, log) = Self::new();
        store.fail_end = true;
        (store, log)
    }
}

impl SessionStore for RecordingSession {
    fn is_logged_in(&self) -> bool {
        self.log.begun.get() > self.log.ended.get()
    }

    fn begin_session(&mut self, _nickname: &str) -> Result<()> {
        self.log.begun.set(self.log.begun.get() + 1);
        Ok(())
    }

    fn end_session(&mut self) -> Result<()> {
        self.log.ended.set(self.log.ended.get() + 1);
        if self.fail_end {
            bail!("disk full");
        }
        Ok(())
    }
}

/// A coordinator over a fresh fake engine, not yet started.
pub struct Harness {
    pub engine: Rc<FakeMessenger>,
    pub session: Rc<SessionLog>,
    pub coordinator: RunningCoordinator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_default_tab(ModuleKind::Conversations)
    }

    pub fn with_default_tab(default_tab: ModuleKind) -> Self {
        let engine = FakeMessenger::new();
        let (store, session) = RecordingSession::new();
        Self::build(engine, store, session, default_tab)
    }

    pub fn with_session(store: RecordingSession, session: Rc<SessionLog>) -> Self {
        Self::build(FakeMessenger::new(), store, session, ModuleKind::Conversations)
    }

    fn build(
        engine: Rc<FakeMessenger>,
        store: RecordingSession,
        session: Rc<SessionLog>,
        default_tab: ModuleKind,
    ) -> Self {
        let coordinator = RunningCoordinator::new(
            Theme::default(),
            MessagingService::from_engine(Rc::clone(&engine)),
            Box::new(store),
            default_tab,
        )
        .expect("coordinator builds");
        Self {
            engine,
            session,
            coordinator,
        }
    }

    /// Build and start.
    pub fn started() -> Self {
        let mut harness = Self::new();
        harness.coordinator.start().expect("coordinator starts");
        harness
    }
}
