//! In-process messaging engine.
//!
//! `LocalMessenger` keeps contacts, conversations and calls in memory and
//! simulates network bootstrap on the tokio runtime. It lets the terminal
//! client run end to end without a network stack behind it.

use super::{
    Author, BootstrapService, CallId, CallService, ChatService, ConnectionStatus, Contact,
    ContactId, Conversation, ConversationId, Message, ObjectStore, UserService,
};
use anyhow::{bail, Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// A rendezvous node used to join the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapNode {
    pub host: String,
    pub port: u16,
    pub public_key: String,
}

/// Nodes registered by `add_predefined_nodes` when the config lists none.
pub fn predefined_nodes() -> Vec<BootstrapNode> {
    vec![
        BootstrapNode {
            host: "node.parlor.chat".to_string(),
            port: 33445,
            public_key: "8E7D0B859922EF569298B4D261A8CCB5FEA14FB91ED412A7603A585A25698832"
                .to_string(),
        },
        BootstrapNode {
            host: "relay.parlor.chat".to_string(),
            port: 443,
            public_key: "3F0A45A268367C1BEA652F258C85F4A66DA76BCAA667A49E770BCC4917AB6A25"
                .to_string(),
        },
    ]
}

/// Options for building a [`LocalMessenger`].
#[derive(Debug, Clone)]
pub struct LocalMessengerOptions {
    pub nickname: String,
    pub contacts: Vec<Contact>,
    pub nodes: Vec<BootstrapNode>,
    /// Never reach the connected state.
    pub offline: bool,
    /// Delay between `bootstrap()` and reporting a connection.
    pub connect_delay: Duration,
}

impl Default for LocalMessengerOptions {
    fn default() -> Self {
        Self {
            nickname: "me".to_string(),
            contacts: Vec::new(),
            nodes: Vec::new(),
            offline: false,
            connect_delay: Duration::from_millis(1500),
        }
    }
}

/// Load a contact seed file (a JSON array of contacts).
pub fn load_contacts(path: &Path) -> Result<Vec<Contact>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read contacts file: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse contacts file: {:?}", path))
}

/// Contacts used when neither the config nor a seed file provide any.
pub fn demo_contacts() -> Vec<Contact> {
    vec![
        Contact::new("alice", "Alice")
            .online(true)
            .with_status("brewing coffee"),
        Contact::new("bob", "Bob").with_status("away"),
        Contact::new("carol", "Carol").online(true),
    ]
}

/// Connection state shared with the bootstrap task.
#[derive(Default)]
struct StatusHub {
    status: ConnectionStatus,
    subscribers: Vec<UnboundedSender<ConnectionStatus>>,
}

impl StatusHub {
    fn publish(&mut self, status: ConnectionStatus) {
        self.status = status;
        self.subscribers.retain(|tx| tx.send(status).is_ok());
    }
}

fn publish(hub: &Mutex<StatusHub>, status: ConnectionStatus) {
    debug!("Connection status -> {}", status.label());
    hub.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .publish(status);
}

#[derive(Default)]
struct EngineState {
    contacts: Vec<Contact>,
    conversations: Vec<Conversation>,
    messages: HashMap<ConversationId, Vec<Message>>,
    active_calls: HashSet<CallId>,
    nodes: Vec<BootstrapNode>,
    next_conversation: u64,
    next_call: u64,
}

/// In-memory messaging engine.
pub struct LocalMessenger {
    nickname: String,
    address: String,
    offline: bool,
    connect_delay: Duration,
    configured_nodes: Vec<BootstrapNode>,
    runtime: Option<Handle>,
    state: RefCell<EngineState>,
    hub: Arc<Mutex<StatusHub>>,
}

impl LocalMessenger {
    /// Create an engine. With no runtime handle, `bootstrap()` never reports
    /// a connection.
    pub fn new(options: LocalMessengerOptions, runtime: Option<Handle>) -> Self {
        let address = derive_address(&options.nickname);
        Self {
            nickname: options.nickname,
            address,
            offline: options.offline,
            connect_delay: options.connect_delay,
            configured_nodes: options.nodes,
            runtime,
            state: RefCell::new(EngineState {
                contacts: options.contacts,
                ..EngineState::default()
            }),
            hub: Arc::new(Mutex::new(StatusHub::default())),
        }
    }

    /// Inject an incoming message, as if sent by the conversation's contact.
    pub fn receive_message(&self, conversation: ConversationId, text: &str) -> Result<()> {
        let mut state = self.state.borrow_mut();
        let contact = state
            .conversations
            .iter()
            .find(|c| c.id == conversation)
            .map(|c| c.contact.clone())
            .with_context(|| format!("Unknown {}", conversation))?;
        push_message(&mut state, conversation, Author::Contact(contact), text);
        Ok(())
    }
}

fn push_message(state: &mut EngineState, conversation: ConversationId, author: Author, text: &str) {
    let now = Utc::now();
    state
        .messages
        .entry(conversation)
        .or_default()
        .push(Message {
            author,
            text: text.to_string(),
            sent_at: now,
        });
    if let Some(c) = state.conversations.iter_mut().find(|c| c.id == conversation) {
        c.last_activity = Some(now);
    }
}

fn derive_address(nickname: &str) -> String {
    let mut hasher = DefaultHasher::new();
    nickname.hash(&mut hasher);
    format!("{:016X}", hasher.finish())
}

impl ObjectStore for LocalMessenger {
    fn contacts(&self) -> Vec<Contact> {
        self.state.borrow().contacts.clone()
    }

    fn contact(&self, id: &ContactId) -> Option<Contact> {
        self.state
            .borrow()
            .contacts
            .iter()
            .find(|c| &c.id == id)
            .cloned()
    }

    fn conversations(&self) -> Vec<Conversation> {
        let mut conversations = self.state.borrow().conversations.clone();
        // Most recent first; never-active conversations keep creation order
        conversations.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        conversations
    }

    fn conversation(&self, id: ConversationId) -> Option<Conversation> {
        self.state
            .borrow()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    fn messages(&self, conversation: ConversationId) -> Vec<Message> {
        self.state
            .borrow()
            .messages
            .get(&conversation)
            .cloned()
            .unwrap_or_default()
    }
}

impl ChatService for LocalMessenger {
    fn get_or_create_conversation(&self, contact: &ContactId) -> Result<ConversationId> {
        let mut state = self.state.borrow_mut();

        if let Some(existing) = state.conversations.iter().find(|c| &c.contact == contact) {
            return Ok(existing.id);
        }

        let Some(title) = state
            .contacts
            .iter()
            .find(|c| &c.id == contact)
            .map(|c| c.name.clone())
        else {
            bail!("Unknown contact: {}", contact);
        };

        state.next_conversation += 1;
        let id = ConversationId::new(state.next_conversation);
        state.conversations.push(Conversation {
            id,
            contact: contact.clone(),
            title,
            last_activity: None,
        });
        info!("Created {} with {}", id, contact);
        Ok(id)
    }

    fn send_message(&self, conversation: ConversationId, text: &str) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            bail!("Cannot send an empty message");
        }
        let mut state = self.state.borrow_mut();
        if !state.conversations.iter().any(|c| c.id == conversation) {
            bail!("Unknown {}", conversation);
        }
        push_message(&mut state, conversation, Author::Me, text);
        Ok(())
    }
}

impl CallService for LocalMessenger {
    fn call(&self, conversation: ConversationId, enable_video: bool) -> Result<CallId> {
        let mut state = self.state.borrow_mut();
        if !state.conversations.iter().any(|c| c.id == conversation) {
            bail!("Unknown {}", conversation);
        }
        if !state.active_calls.is_empty() {
            bail!("A call is already in progress");
        }
        state.next_call += 1;
        let id = CallId::new(state.next_call);
        state.active_calls.insert(id);
        info!(
            "Placed {} in {} (video: {})",
            id, conversation, enable_video
        );
        Ok(id)
    }

    fn end_call(&self, call: CallId) -> Result<()> {
        if !self.state.borrow_mut().active_calls.remove(&call) {
            bail!("Unknown {}", call);
        }
        info!("Ended {}", call);
        Ok(())
    }
}

impl UserService for LocalMessenger {
    fn nickname(&self) -> String {
        self.nickname.clone()
    }

    fn address(&self) -> String {
        self.address.clone()
    }

    fn connection_status(&self) -> ConnectionStatus {
        self.hub
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .status
    }

    fn subscribe_connectivity(&self) -> UnboundedReceiver<ConnectionStatus> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.hub
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .push(tx);
        rx
    }
}

impl BootstrapService for LocalMessenger {
    fn add_predefined_nodes(&self) -> usize {
        let mut state = self.state.borrow_mut();
        let nodes = if self.configured_nodes.is_empty() {
            predefined_nodes()
        } else {
            self.configured_nodes.clone()
        };
        for node in nodes {
            if !state.nodes.contains(&node) {
                debug!("Registered bootstrap node {}:{}", node.host, node.port);
                state.nodes.push(node);
            }
        }
        state.nodes.len()
    }

    fn bootstrap(&self) {
        publish(&self.hub, ConnectionStatus::Connecting);

        if self.state.borrow().nodes.is_empty() {
            warn!("Bootstrap requested with no known nodes");
            return;
        }
        if self.offline {
            info!("Offline mode: staying in connecting state");
            return;
        }
        let Some(runtime) = &self.runtime else {
            warn!("No runtime available, bootstrap cannot progress");
            return;
        };

        let hub = Arc::clone(&self.hub);
        let delay = self.connect_delay;
        runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            publish(&hub, ConnectionStatus::Udp);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messenger() -> LocalMessenger {
        LocalMessenger::new(
            LocalMessengerOptions {
                contacts: demo_contacts(),
                ..LocalMessengerOptions::default()
            },
            None,
        )
    }

    #[test]
    fn test_get_or_create_conversation_is_stable() {
        let m = messenger();
        let alice = ContactId::new("alice");
        let first = m.get_or_create_conversation(&alice).unwrap();
        let second = m.get_or_create_conversation(&alice).unwrap();
        assert_eq!(first, second);
        assert_eq!(m.conversations().len(), 1);
        assert_eq!(m.conversation(first).unwrap().title, "Alice");
    }

    #[test]
    fn test_get_or_create_conversation_unknown_contact_fails() {
        let m = messenger();
        assert!(m
            .get_or_create_conversation(&ContactId::new("mallory"))
            .is_err());
        assert!(m.conversations().is_empty());
    }

    #[test]
    fn test_send_and_receive_messages() {
        let m = messenger();
        let id = m
            .get_or_create_conversation(&ContactId::new("bob"))
            .unwrap();
        m.send_message(id, "  hi bob ").unwrap();
        m.receive_message(id, "hey").unwrap();
        let messages = m.messages(id);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].author, Author::Me);
        assert_eq!(messages[0].text, "hi bob");
        assert_eq!(messages[1].author, Author::Contact(ContactId::new("bob")));
        assert!(m.send_message(id, "   ").is_err());
    }

    #[test]
    fn test_only_one_call_at_a_time() {
        let m = messenger();
        let id = m
            .get_or_create_conversation(&ContactId::new("carol"))
            .unwrap();
        let call = m.call(id, false).unwrap();
        assert!(m.call(id, true).is_err());
        m.end_call(call).unwrap();
        assert!(m.end_call(call).is_err());
        assert!(m.call(id, true).is_ok());
    }

    #[test]
    fn test_bootstrap_without_runtime_stays_connecting() {
        let m = messenger();
        let mut rx = m.subscribe_connectivity();
        assert!(m.add_predefined_nodes() >= 1);
        m.bootstrap();
        assert_eq!(rx.try_recv().unwrap(), ConnectionStatus::Connecting);
        assert!(rx.try_recv().is_err());
        assert_eq!(m.connection_status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn test_add_predefined_nodes_is_idempotent() {
        let m = messenger();
        let first = m.add_predefined_nodes();
        assert_eq!(m.add_predefined_nodes(), first);
    }

    #[tokio::test]
    async fn test_bootstrap_reports_connected() {
        let m = LocalMessenger::new(
            LocalMessengerOptions {
                connect_delay: Duration::from_millis(5),
                ..LocalMessengerOptions::default()
            },
            Some(Handle::current()),
        );
        let mut rx = m.subscribe_connectivity();
        m.add_predefined_nodes();
        m.bootstrap();
        assert_eq!(rx.recv().await, Some(ConnectionStatus::Connecting));
        assert_eq!(rx.recv().await, Some(ConnectionStatus::Udp));
    }

    #[test]
    fn test_load_contacts_from_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, r#"[{"id": "dave", "name": "Dave", "online": true}]"#).unwrap();
        let contacts = load_contacts(&path).unwrap();
        assert_eq!(contacts, vec![Contact::new("dave", "Dave").online(true)]);
    }
}
