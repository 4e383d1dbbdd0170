//! Application owner.
//!
//! `App` owns the terminal, the tokio runtime and the session lifecycle. It
//! shows the login screen until a session starts, then hands input and
//! drawing to a [`RunningCoordinator`] until that coordinator reports a
//! logout.

use crate::config::Config;
use crate::coordinator::{CoordinatorAction, RunningCoordinator};
use crate::login::{LoginAction, LoginScreen};
use crate::messaging::local::demo_contacts;
use crate::messaging::{LocalMessenger, LocalMessengerOptions, MessagingService};
use crate::session::{begin_session_after, ConfigSessionStore, SessionStore};
use crate::styles::{Theme, ThemeType};
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::Event;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{error, info};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Command line overrides for a run.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Keep the messaging engine in the connecting state.
    pub offline: bool,
    /// Theme to use instead of the configured one.
    pub theme: Option<ThemeType>,
}

enum AppState {
    Login(LoginScreen),
    Running(Box<RunningCoordinator>),
}

/// Main application state
pub struct App {
    config: Config,
    config_path: PathBuf,
    options: AppOptions,
    theme: Theme,
    tui: Tui,
    runtime: Runtime,
    state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config_path: PathBuf, options: AppOptions) -> Result<Self> {
        let config = Config::load_or_create(&config_path)?;
        let theme = Theme::new(options.theme.unwrap_or(config.theme));
        let tui = Tui::new()?;
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        let state = AppState::Login(LoginScreen::new(theme.clone(), config.nickname.as_deref()));

        Ok(Self {
            config,
            config_path,
            options,
            theme,
            tui,
            runtime,
            state,
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.tui.enter()?;

        // Resume the previous session if the user never logged out
        if self.config.is_user_logged_in {
            if let Some(nickname) = self.config.nickname.clone() {
                info!("Resuming session for {}", nickname);
                self.login(&nickname);
            }
        }

        // Main event loop
        loop {
            if let AppState::Running(coordinator) = &mut self.state {
                coordinator.tick();
            }
            self.draw()?;

            if self.should_quit {
                break;
            }

            if let Some(event) = self.tui.poll_event(POLL_INTERVAL)? {
                self.handle_event(&event)?;
            }
        }

        self.tui.exit()?;
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = &mut self.state;
        let mut render_result = Ok(());
        self.tui.terminal_mut().draw(|frame| match state {
            AppState::Login(login) => login.render(frame),
            AppState::Running(coordinator) => render_result = coordinator.render(frame),
        })?;
        render_result
    }

    fn handle_event(&mut self, event: &Event) -> Result<()> {
        match &mut self.state {
            AppState::Login(login) => match login.handle_event(event) {
                LoginAction::None => {}
                LoginAction::Quit => self.should_quit = true,
                LoginAction::Submit(nickname) => self.login(&nickname),
            },
            AppState::Running(coordinator) => match coordinator.handle_event(event)? {
                CoordinatorAction::None => {}
                CoordinatorAction::Quit => self.should_quit = true,
                CoordinatorAction::LoggedOut => self.end_session(),
            },
        }
        Ok(())
    }

    /// Start a session, reporting failures on the login screen.
    fn login(&mut self, nickname: &str) {
        match self.start_session(nickname) {
            Ok(coordinator) => self.state = AppState::Running(Box::new(coordinator)),
            Err(e) => {
                error!("Failed to start session: {:#}", e);
                let mut login = LoginScreen::new(self.theme.clone(), Some(nickname));
                login.set_error(format!("Login failed: {}", e));
                self.state = AppState::Login(login);
            }
        }
    }

    fn start_session(&mut self, nickname: &str) -> Result<RunningCoordinator> {
        let mut session = ConfigSessionStore::new(&self.config_path);
        let coordinator =
            begin_session_after(&mut session, nickname, || self.build_session(nickname))?;
        self.config = Config::load_or_create(&self.config_path)?;
        Ok(coordinator)
    }

    fn build_session(&mut self, nickname: &str) -> Result<RunningCoordinator> {
        self.config = Config::load_or_create(&self.config_path)?;

        let mut contacts = self.config.seed_contacts()?;
        if contacts.is_empty() {
            contacts = demo_contacts();
        }
        let engine = LocalMessenger::new(
            LocalMessengerOptions {
                nickname: nickname.to_string(),
                contacts,
                nodes: self.config.bootstrap_nodes.clone(),
                offline: self.options.offline,
                ..LocalMessengerOptions::default()
            },
            Some(self.runtime.handle().clone()),
        );

        let mut coordinator = RunningCoordinator::new(
            self.theme.clone(),
            MessagingService::from_engine(Rc::new(engine)),
            Box::new(ConfigSessionStore::new(&self.config_path)),
            self.config.default_tab,
        )?;
        coordinator.start()?;
        Ok(coordinator)
    }

    /// Drop the running session and go back to the login screen.
    fn end_session(&mut self) {
        info!("Returning to login");
        // The session store already cleared the flag; keep the nickname
        if let Ok(config) = Config::load_or_create(&self.config_path) {
            self.config = config;
        }
        self.state = AppState::Login(LoginScreen::new(
            self.theme.clone(),
            self.config.nickname.as_deref(),
        ));
    }
}

/// Clear the logged in flag without starting the interface.
pub fn logout(config_path: PathBuf) -> Result<()> {
    let mut session = ConfigSessionStore::new(config_path);
    if !session.is_logged_in() {
        println!("Not logged in.");
        return Ok(());
    }
    session.end_session()?;
    println!("Logged out.");
    Ok(())
}
