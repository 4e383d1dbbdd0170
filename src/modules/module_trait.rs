//! Module coordinator trait and the events modules emit.
//!
//! Modules never call each other. Handling an input event returns a
//! [`ModuleAction`], and the running coordinator decides what happens next:
//!
//! 1. Modules own their screens and state
//! 2. Cross-module requests are values, scoped per module ([`ContactsEvent`],
//!    [`ProfileEvent`])
//! 3. The active tab is only ever changed by the coordinator

use crate::messaging::ContactId;
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::Frame;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The feature modules a running session is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Contacts,
    Conversations,
    Settings,
    Profile,
}

impl ModuleKind {
    /// Construction order, which is also tab order.
    pub const ORDER: [ModuleKind; 4] = [
        ModuleKind::Contacts,
        ModuleKind::Conversations,
        ModuleKind::Settings,
        ModuleKind::Profile,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ModuleKind::Contacts => "Contacts",
            ModuleKind::Conversations => "Chats",
            ModuleKind::Settings => "Settings",
            ModuleKind::Profile => "Profile",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Requests emitted by the contacts module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactsEvent {
    OpenConversation(ContactId),
    AudioCall(ContactId),
    VideoCall(ContactId),
}

/// Requests emitted by the profile module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileEvent {
    LogoutRequested,
}

/// What a module asks for after handling an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModuleAction {
    /// Nothing to route.
    #[default]
    None,
    Contacts(ContactsEvent),
    Profile(ProfileEvent),
    /// Show a transient status message.
    Notify(String),
    /// Report a local action that failed.
    Failed(String),
}

/// How a module should present a screen it is asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Push on top of whatever the module currently shows.
    Animated,
    /// Reset to the module's root and show the screen directly. Used for
    /// cross-tab jumps.
    Immediate,
}

/// A feature module: owns its screens and presents a root view as one tab.
pub trait ModuleCoordinator {
    fn kind(&self) -> ModuleKind;

    fn title(&self) -> &'static str {
        self.kind().title()
    }

    /// Prepare the initial view. Called once, before the first render.
    fn start(&mut self) -> Result<()>;

    /// Render the module's current view.
    fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;

    /// Handle an input event while this module's tab is active.
    fn handle_event(&mut self, event: &Event) -> Result<ModuleAction>;

    /// Check if a text input is currently focused.
    ///
    /// When true, tab switching keys are passed through so users can type.
    fn is_input_focused(&self) -> bool {
        false
    }

    /// Key hints for the footer, `Label: keys` pairs separated by ` | `.
    fn footer_hint(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_kind_serde_names() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            tab: ModuleKind,
        }
        let parsed: Wrapper = toml::from_str(r#"tab = "conversations""#).unwrap();
        assert_eq!(parsed.tab, ModuleKind::Conversations);
        let out = toml::to_string(&Wrapper {
            tab: ModuleKind::Profile,
        })
        .unwrap();
        assert!(out.contains("\"profile\""));
    }

    #[test]
    fn test_order_has_each_kind_once() {
        for kind in ModuleKind::ORDER {
            assert_eq!(ModuleKind::ORDER.iter().filter(|k| **k == kind).count(), 1);
        }
    }
}
