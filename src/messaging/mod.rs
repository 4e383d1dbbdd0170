//! Messaging service boundary.
//!
//! The running session only talks to the messaging engine through the narrow
//! sub-service traits in this module. Each module receives just the
//! sub-services it needs, taken from a [`MessagingService`] handle.
//!
//! ```text
//! ┌──────────────────────── MessagingService ───────────────────────┐
//! │ ObjectStore │ ChatService │ CallService │ UserService │ Bootstrap │
//! └──────┬──────────────┬─────────────┬────────────┬────────────┬────┘
//!        │              │             │            │            │
//!   contacts,      conversations   CallCoordinator  profile,   RunningCoordinator
//!   conversations                                  coordinator
//! ```

pub mod local;

pub use local::{LocalMessenger, LocalMessengerOptions};

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Identifier of a contact (friend) known to the messaging engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque conversation reference handed out by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConversationId(u64);

impl ConversationId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversation#{}", self.0)
    }
}

/// Identifier of a placed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallId(u64);

impl CallId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call#{}", self.0)
    }
}

/// Connection status reported by the engine.
///
/// Only `Tcp` and `Udp` count as connected; everything else keeps the
/// connectivity overlay up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Offline,
    Connecting,
    Tcp,
    Udp,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionStatus::Tcp | ConnectionStatus::Udp)
    }

    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Offline => "offline",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Tcp => "online (tcp)",
            ConnectionStatus::Udp => "online (udp)",
        }
    }
}

/// A contact as exposed by the object store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub online: bool,
}

impl Contact {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: ContactId::new(id),
            name: name.into(),
            status_message: String::new(),
            online: false,
        }
    }

    pub fn online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status_message = status.into();
        self
    }
}

/// A one-to-one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub id: ConversationId,
    pub contact: ContactId,
    pub title: String,
    pub last_activity: Option<DateTime<Utc>>,
}

/// Who wrote a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Author {
    Me,
    Contact(ContactId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub author: Author,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

/// Read access to contacts, conversations and message history.
pub trait ObjectStore {
    fn contacts(&self) -> Vec<Contact>;
    fn contact(&self, id: &ContactId) -> Option<Contact>;
    fn conversations(&self) -> Vec<Conversation>;
    fn conversation(&self, id: ConversationId) -> Option<Conversation>;
    fn messages(&self, conversation: ConversationId) -> Vec<Message>;
}

/// Conversation commands.
pub trait ChatService {
    /// Resolve the conversation with `contact`, creating it on first use.
    fn get_or_create_conversation(&self, contact: &ContactId) -> Result<ConversationId>;

    fn send_message(&self, conversation: ConversationId, text: &str) -> Result<()>;
}

/// Call commands.
pub trait CallService {
    fn call(&self, conversation: ConversationId, enable_video: bool) -> Result<CallId>;
    fn end_call(&self, call: CallId) -> Result<()>;
}

/// The local user and their connection to the network.
pub trait UserService {
    fn nickname(&self) -> String;
    fn address(&self) -> String;
    fn connection_status(&self) -> ConnectionStatus;

    /// Subscribe to connection status updates.
    ///
    /// Statuses arrive in emission order. Dropping the receiver ends the
    /// subscription.
    fn subscribe_connectivity(&self) -> UnboundedReceiver<ConnectionStatus>;
}

/// Network bootstrap.
pub trait BootstrapService {
    /// Register the predefined rendezvous nodes, returning how many are known.
    fn add_predefined_nodes(&self) -> usize;

    /// Start connecting. Returns immediately; progress is reported through
    /// [`UserService::subscribe_connectivity`].
    fn bootstrap(&self);
}

/// Shared handle to every sub-service of the messaging engine.
///
/// Cloning is cheap. Holders only observe and issue commands; nothing here
/// lets a caller change the engine's connection state directly.
#[derive(Clone)]
pub struct MessagingService {
    objects: Rc<dyn ObjectStore>,
    chats: Rc<dyn ChatService>,
    calls: Rc<dyn CallService>,
    user: Rc<dyn UserService>,
    bootstrap: Rc<dyn BootstrapService>,
}

impl MessagingService {
    pub fn new(
        objects: Rc<dyn ObjectStore>,
        chats: Rc<dyn ChatService>,
        calls: Rc<dyn CallService>,
        user: Rc<dyn UserService>,
        bootstrap: Rc<dyn BootstrapService>,
    ) -> Self {
        Self {
            objects,
            chats,
            calls,
            user,
            bootstrap,
        }
    }

    /// Build a handle from a single engine that implements every sub-service.
    pub fn from_engine<E>(engine: Rc<E>) -> Self
    where
        E: ObjectStore + ChatService + CallService + UserService + BootstrapService + 'static,
    {
        Self {
            objects: engine.clone(),
            chats: engine.clone(),
            calls: engine.clone(),
            user: engine.clone(),
            bootstrap: engine,
        }
    }

    pub fn objects(&self) -> Rc<dyn ObjectStore> {
        Rc::clone(&self.objects)
    }

    pub fn chats(&self) -> Rc<dyn ChatService> {
        Rc::clone(&self.chats)
    }

    pub fn calls(&self) -> Rc<dyn CallService> {
        Rc::clone(&self.calls)
    }

    pub fn user(&self) -> Rc<dyn UserService> {
        Rc::clone(&self.user)
    }

    pub fn bootstrap(&self) -> Rc<dyn BootstrapService> {
        Rc::clone(&self.bootstrap)
    }
}
