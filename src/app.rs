/// Main TUI application

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use crate::core::{PollingHandle, ServiceRegistry};
use crate::screens::Dashboard;
use crate::utils::Settings;

/// How long a status message stays in the footer
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

pub struct App {
    dashboard: Dashboard,
    polling: Option<PollingHandle>,
    snapshots: watch::Receiver<ServiceRegistry>,
    should_quit: bool,
    show_help: bool,
    status_message: Option<(String, Instant)>,
}

impl App {
    /// Must be called inside a tokio runtime: polling starts immediately
    pub fn new(settings: &Settings) -> Result<Self> {
        let polling = settings.scheduler()?.spawn();
        let snapshots = polling.subscribe();

        let mut dashboard = Dashboard::new(settings.lang, settings.target_host.clone());
        dashboard.update_services(polling.snapshot());

        Ok(Self {
            dashboard,
            polling: Some(polling),
            snapshots,
            should_quit: false,
            show_help: false,
            status_message: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        // Unmount: stop the polling task before returning
        if let Some(polling) = self.polling.take() {
            polling.cancel().await;
        }

        result
    }

    async fn run_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<()> {
        loop {
            self.sync_snapshot();
            self.expire_status();

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind == KeyEventKind::Press {
                        self.handle_key(key_event.code);
                    }
                }
            }

            if self.should_quit {
                break;
            }

            // Let the polling task run between frames
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Pull the latest snapshot from the polling task (non-blocking)
    fn sync_snapshot(&mut self) {
        if self.snapshots.has_changed().unwrap_or(false) {
            let snapshot = self.snapshots.borrow_and_update().clone();
            self.dashboard.update_services(snapshot);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.show_help {
            if matches!(key, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) {
                self.show_help = false;
            } else if key == KeyCode::Char('q') {
                self.should_quit = true;
            }
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('r') => {
                if let Some(polling) = &self.polling {
                    polling.refresh();
                }
                self.set_status("Checking all services...".to_string());
            }
            KeyCode::Char('l') => {
                self.dashboard.toggle_locale();
                self.set_status(format!("Language: {:?}", self.dashboard.locale()));
            }
            _ => {}
        }
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    fn expire_status(&mut self) {
        if let Some((_, since)) = &self.status_message {
            if since.elapsed() >= STATUS_MESSAGE_TTL {
                self.status_message = None;
            }
        }
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        self.dashboard.render(
            frame,
            self.status_message.as_ref().map(|(m, _)| m.as_str()),
            self.show_help,
        );
    }
}
