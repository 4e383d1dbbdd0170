//! The running session.
//!
//! [`RunningCoordinator`] exists from login to logout. It owns every feature
//! module, the call coordinator, the tab bar and the connectivity overlay,
//! and it is the only place where one module's request turns into another
//! module's work.
//!
//! Modules report requests as [`ModuleAction`] values; the coordinator
//! answers its owner with a [`CoordinatorAction`]. Nothing holds a reference
//! back to the coordinator.

pub mod module_set;

pub use module_set::{Module, ModuleSet};

use crate::call::CallCoordinator;
use crate::messaging::{ConnectionStatus, ContactId, ConversationId, MessagingService};
use crate::modules::{
    key_press, ContactsEvent, ContactsModule, ConversationsModule, ModuleAction, ModuleKind,
    Presentation, ProfileEvent, ProfileModule, SettingsModule,
};
use crate::session::SessionStore;
use crate::styles::Theme;
use crate::widgets::{ConnectivityOverlay, Footer, NavigationContainer, ToastManager};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyModifiers};
use ratatui::prelude::*;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

const GLOBAL_HINT: &str = "Tabs: Tab/1-4 | Quit: q";

/// What the owner of a running session has to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinatorAction {
    #[default]
    None,
    /// The session ended. Emitted at most once per coordinator; the owner
    /// drops the coordinator and returns to login.
    LoggedOut,
    /// The user asked to leave the application.
    Quit,
}

pub struct RunningCoordinator {
    theme: Theme,
    messaging: MessagingService,
    session: Box<dyn SessionStore>,
    navigation: NavigationContainer,
    overlay: ConnectivityOverlay,
    modules: ModuleSet,
    call: CallCoordinator,
    connectivity: UnboundedReceiver<ConnectionStatus>,
    default_tab: ModuleKind,
    toasts: ToastManager,
    started: bool,
    logged_out: bool,
}

impl RunningCoordinator {
    /// Build the session. No I/O happens until [`start`](Self::start).
    pub fn new(
        theme: Theme,
        messaging: MessagingService,
        session: Box<dyn SessionStore>,
        default_tab: ModuleKind,
    ) -> Result<Self> {
        // Each module only gets the sub-services it uses
        let modules: Vec<Module> = ModuleKind::ORDER
            .iter()
            .map(|kind| match kind {
                ModuleKind::Contacts => Module::Contacts(ContactsModule::new(
                    theme.clone(),
                    messaging.objects(),
                    messaging.user(),
                )),
                ModuleKind::Conversations => Module::Conversations(ConversationsModule::new(
                    theme.clone(),
                    messaging.objects(),
                    messaging.chats(),
                )),
                ModuleKind::Settings => Module::Settings(SettingsModule::new(theme.clone())),
                ModuleKind::Profile => {
                    Module::Profile(ProfileModule::new(theme.clone(), messaging.user()))
                }
            })
            .collect();
        let modules = ModuleSet::new(modules)?;

        let call = CallCoordinator::new(theme.clone(), messaging.calls(), messaging.objects());
        let connectivity = messaging.user().subscribe_connectivity();

        Ok(Self {
            overlay: ConnectivityOverlay::new(theme.clone()),
            navigation: NavigationContainer::new(),
            theme,
            messaging,
            session,
            modules,
            call,
            connectivity,
            default_tab,
            toasts: ToastManager::new(),
            started: false,
            logged_out: false,
        })
    }

    /// Start every module, build the tabs and kick off the network bootstrap.
    ///
    /// Only the first call has any effect.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            warn!("Running coordinator already started");
            return Ok(());
        }

        for module in self.modules.iter_mut() {
            module.as_coordinator_mut().start()?;
        }
        self.call.start();

        self.navigation.set_pages(self.modules.kinds());
        let default_index = match self.modules.find(self.default_tab) {
            Some((index, _)) => index,
            None => {
                warn!(
                    "Default tab {} is not registered, using the first tab",
                    self.default_tab
                );
                0
            }
        };
        self.navigation.select(default_index);
        self.started = true;

        // Not connected until the engine says otherwise
        self.overlay.set_status(self.messaging.user().connection_status());
        self.overlay.show_connecting_view(true, false);

        let bootstrap = self.messaging.bootstrap();
        let nodes = bootstrap.add_predefined_nodes();
        bootstrap.bootstrap();
        info!(
            "Session started with {} tabs, bootstrapping with {} nodes",
            self.modules.len(),
            nodes
        );
        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// React to one connectivity update from the messaging engine.
    pub fn handle_connection_status(&mut self, status: ConnectionStatus) {
        debug!("Connection status: {:?}", status);
        self.overlay.set_status(status);
        self.overlay.show_connecting_view(!status.is_connected(), true);
    }

    /// Apply every connectivity update received since the last call, in
    /// emission order. Returns how many were applied.
    pub fn poll_connectivity(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.connectivity.try_recv() {
                Ok(status) => {
                    self.handle_connection_status(status);
                    applied += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Connectivity subscription closed");
                    break;
                }
            }
        }
        applied
    }

    /// Route a request emitted by a module.
    pub fn handle_module_action(&mut self, action: ModuleAction) -> CoordinatorAction {
        if self.logged_out {
            return CoordinatorAction::None;
        }
        match action {
            ModuleAction::None => {}
            ModuleAction::Contacts(ContactsEvent::OpenConversation(contact)) => {
                self.open_conversation(&contact);
            }
            ModuleAction::Contacts(ContactsEvent::AudioCall(contact)) => {
                self.place_call(&contact, false);
            }
            ModuleAction::Contacts(ContactsEvent::VideoCall(contact)) => {
                self.place_call(&contact, true);
            }
            ModuleAction::Profile(ProfileEvent::LogoutRequested) => return self.logout(),
            ModuleAction::Notify(message) => self.toasts.info(message),
            ModuleAction::Failed(message) => self.toasts.error(message),
        }
        CoordinatorAction::None
    }

    fn resolve_conversation(&mut self, contact: &ContactId) -> Option<ConversationId> {
        match self.messaging.chats().get_or_create_conversation(contact) {
            Ok(conversation) => Some(conversation),
            Err(e) => {
                error!("Failed to open conversation with {}: {:#}", contact, e);
                self.toasts
                    .error(format!("Could not open conversation with {}", contact));
                None
            }
        }
    }

    fn open_conversation(&mut self, contact: &ContactId) {
        let Some(conversation) = self.resolve_conversation(contact) else {
            return;
        };
        let Some((index, conversations)) = self.modules.conversations_mut() else {
            error!("Conversations module is not registered");
            return;
        };
        conversations.show_conversation(conversation, Presentation::Immediate);
        self.navigation.select(index);
        info!("Opened {} with {}", conversation, contact);
    }

    fn place_call(&mut self, contact: &ContactId, enable_video: bool) {
        let Some(conversation) = self.resolve_conversation(contact) else {
            return;
        };
        match self.call.place_call(conversation, enable_video) {
            Ok(_) => {
                let peer = self
                    .call
                    .active_call()
                    .map_or_else(|| contact.to_string(), |c| c.peer.clone());
                self.toasts.success(format!("Calling {}", peer));
            }
            Err(e) => {
                warn!("Call to {} not placed: {:#}", contact, e);
                self.toasts.error(format!("Call failed: {}", e));
            }
        }
    }

    /// End the session and tell the owner. Later calls do nothing.
    pub fn logout(&mut self) -> CoordinatorAction {
        if self.logged_out {
            debug!("Logout already handled");
            return CoordinatorAction::None;
        }
        self.logged_out = true;

        if let Err(e) = self.call.end_call() {
            warn!("Failed to hang up during logout: {:#}", e);
        }
        // The owner still tears the session down if the flag cannot be written
        if let Err(e) = self.session.end_session() {
            error!("Failed to record logout: {:#}", e);
        }
        info!("Logged out");
        CoordinatorAction::LoggedOut
    }

    pub fn is_logged_out(&self) -> bool {
        self.logged_out
    }

    /// Handle an input event for the whole session.
    pub fn handle_event(&mut self, event: &Event) -> Result<CoordinatorAction> {
        if self.logged_out || !self.started {
            return Ok(CoordinatorAction::None);
        }

        if let Some(key) = key_press(event) {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(CoordinatorAction::Quit);
            }
            let input_focused = self
                .active_module()
                .is_some_and(|m| m.as_coordinator().is_input_focused());
            // The call banner only sees keys nobody is typing
            if !input_focused && self.call.handle_event(event)? {
                return Ok(CoordinatorAction::None);
            }
            match key.code {
                KeyCode::Tab => {
                    self.navigation.select_next();
                    return Ok(CoordinatorAction::None);
                }
                KeyCode::BackTab => {
                    self.navigation.select_previous();
                    return Ok(CoordinatorAction::None);
                }
                KeyCode::Char('q') if !input_focused => return Ok(CoordinatorAction::Quit),
                KeyCode::Char(c @ '1'..='9') if !input_focused => {
                    let index = c as usize - '1' as usize;
                    self.navigation.select(index);
                    return Ok(CoordinatorAction::None);
                }
                _ => {}
            }
        }

        let index = self.navigation.selected_index();
        let Some(module) = self.modules.get_mut(index) else {
            return Ok(CoordinatorAction::None);
        };
        let action = module.as_coordinator_mut().handle_event(event)?;
        Ok(self.handle_module_action(action))
    }

    fn active_module(&self) -> Option<&Module> {
        let kind = self.navigation.selected_kind()?;
        self.modules.find(kind).map(|(_, module)| module)
    }

    /// Per-frame housekeeping: apply connectivity updates and expire toasts.
    pub fn tick(&mut self) {
        if self.logged_out {
            return;
        }
        self.poll_connectivity();
        self.toasts.tick();
    }

    pub fn render(&mut self, frame: &mut Frame) -> Result<()> {
        if !self.started {
            return Ok(());
        }
        let area = frame.area();
        let [tabs_area, body_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .areas(area);

        self.navigation.render(frame, tabs_area, &self.theme);

        let index = self.navigation.selected_index();
        let mut hint = String::new();
        if let Some(module) = self.modules.get_mut(index) {
            let module = module.as_coordinator_mut();
            module.render(frame, body_area)?;
            hint.push_str(module.footer_hint());
            hint.push_str(" | ");
        }
        hint.push_str(GLOBAL_HINT);
        Footer::render(frame, footer_area, &hint, &self.theme);

        self.call.render(frame, body_area);
        self.toasts.render(frame, area, &self.theme);
        self.overlay.render(frame, area);
        Ok(())
    }

    pub fn navigation(&self) -> &NavigationContainer {
        &self.navigation
    }

    pub fn overlay(&self) -> &ConnectivityOverlay {
        &self.overlay
    }

    pub fn modules(&self) -> &ModuleSet {
        &self.modules
    }

    pub fn call(&self) -> &CallCoordinator {
        &self.call
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }
}
