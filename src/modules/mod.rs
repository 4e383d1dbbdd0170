//! Feature modules.
//!
//! Each module owns one tab's screens. Modules receive only the messaging
//! sub-services they need and report cross-module requests as
//! [`ModuleAction`] values.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   RunningCoordinator                      │
//! │  match action {                                           │
//! │    Contacts(OpenConversation(c)) => switch tab + show     │
//! │    Contacts(AudioCall(c) | VideoCall(c)) => call          │
//! │    Profile(LogoutRequested) => end session                │
//! │  }                                                        │
//! └──────────▲──────────────▲──────────────▲─────────────▲────┘
//!            │ ModuleAction │              │             │
//!      ┌─────┴────┐  ┌──────┴──────┐  ┌────┴────┐  ┌─────┴───┐
//!      │ Contacts │  │Conversations│  │Settings │  │ Profile │
//!      └──────────┘  └─────────────┘  └─────────┘  └─────────┘
//! ```

pub mod contacts;
pub mod conversations;
pub mod module_trait;
pub mod profile;
pub mod settings;

pub use contacts::ContactsModule;
pub use conversations::ConversationsModule;
pub use module_trait::{
    ContactsEvent, ModuleAction, ModuleCoordinator, ModuleKind, Presentation, ProfileEvent,
};
pub use profile::ProfileModule;
pub use settings::SettingsModule;

use crossterm::event::{Event, KeyEvent, KeyEventKind};

/// The key of a key-press event. Releases and repeats are ignored.
pub(crate) fn key_press(event: &Event) -> Option<KeyEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(*key),
        _ => None,
    }
}
