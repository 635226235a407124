//! Application core: event loop, splash → dashboard hand-off, action
//! dispatch onto the [`DashboardSession`].

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pidash_core::{DashboardConfig, DashboardSession, StatePresenter};
use ratatui::Frame;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::spawn_display_bridge;
use crate::event::{Event, EventReader};
use crate::screens::splash::SESSION_START_DELAY;
use crate::screens::{DashboardScreen, SplashScreen};
use crate::tui::Tui;

pub struct App {
    session: DashboardSession,
    /// Present until the startup sequence has finished.
    splash: Option<SplashScreen>,
    dashboard: DashboardScreen,
    running: bool,
    session_started: bool,
    /// Last focus state reported by the terminal.
    visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    cancel: CancellationToken,
}

impl App {
    pub fn new(config: &DashboardConfig, show_splash: bool) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let presenter = Arc::new(StatePresenter::new());
        let session = DashboardSession::connect(config, presenter)?;

        Ok(Self {
            session,
            splash: show_splash.then(SplashScreen::new),
            dashboard: DashboardScreen::new(config.host.clone()),
            running: true,
            session_started: false,
            visible: true,
            action_tx,
            action_rx,
            cancel: CancellationToken::new(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let bridge = tokio::spawn(spawn_display_bridge(
            self.session.subscribe(),
            self.action_tx.clone(),
            self.cancel.clone(),
        ));
        if self.splash.is_none() {
            self.action_tx.send(Action::StartSession)?;
        }

        let mut events = EventReader::new(
            Duration::from_millis(100), // splash resolution
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Focus(focused) => self.action_tx.send(Action::FocusChanged(focused))?,
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.cancel.cancel();
        self.session.shutdown();
        let _ = bridge.await;
        info!("event loop ended");
        Ok(())
    }

    /// Global keys first; the rest go to the dashboard once the splash is
    /// gone.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            _ => {}
        }

        if self.splash.is_some() {
            return Ok(None);
        }
        self.dashboard.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        if let Some(splash) = self.splash.as_mut() {
            if let Some(follow_up) = splash.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        if let Some(follow_up) = self.dashboard.update(action)? {
            self.action_tx.send(follow_up)?;
        }

        match action {
            Action::Quit => self.running = false,
            Action::SplashFinished => {
                self.splash = None;
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    tokio::time::sleep(SESSION_START_DELAY).await;
                    let _ = tx.send(Action::StartSession);
                });
            }
            Action::StartSession => {
                if !self.session_started {
                    self.session_started = true;
                    info!("starting dashboard session");
                    drop(self.session.initialize());
                    self.pause_if_hidden();
                }
            }
            Action::FocusChanged(focused) => {
                if self.visible != *focused {
                    self.visible = *focused;
                    if self.session_started {
                        self.session.set_visible(*focused);
                    }
                }
            }
            Action::Reload => {
                if self.session_started {
                    drop(self.session.reload());
                    self.pause_if_hidden();
                }
            }
            Action::Refresh => {
                if self.session_started {
                    drop(self.session.manual_refresh());
                }
            }
            Action::RequestPower(power) => {
                if let Err(e) = self.session.request_power(*power) {
                    debug!(error = %e, "power request ignored");
                }
            }
            Action::ConfirmPower(confirmed) => match self.session.respond_power(*confirmed) {
                Ok(driver) => drop(driver),
                Err(e) => warn!(error = %e, "power confirmation ignored"),
            },
            Action::Tick
            | Action::Render
            | Action::Resize(..)
            | Action::DisplayUpdated(_) => {}
        }

        Ok(())
    }

    /// Focus may have been lost before the timer was (re)started.
    fn pause_if_hidden(&self) {
        if !self.visible {
            self.session.stop();
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        match &self.splash {
            Some(splash) => splash.render(frame, area),
            None => self.dashboard.render(frame, area),
        }
    }
}
