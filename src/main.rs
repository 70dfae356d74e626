mod catalog;
mod config;
mod engine;
mod log_util;
mod question_bank;
mod ui_renderer;
mod view_managers;

use catalog::Catalog;
use color_eyre::Result;
use config::ConfigForm;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use engine::challenge::{ChallengePhase, ChallengeSession};
use engine::practice::PracticeSession;
use log_util::log_debug;
use ratatui::{DefaultTerminal, Frame};
use std::time::{Duration, Instant};
use ui_renderer::UiRenderer;
use view_managers::library_manager::LibraryLevel;
use view_managers::{
    ChallengeManager, ConfigManager, LibraryManager, MenuManager, PracticeManager,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppView {
    Menu,
    Library,
    Practice,
    Challenge,
    Config,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let terminal = ratatui::init();
    let result = App::new().run(terminal);
    ratatui::restore();
    result
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    pub(crate) running: bool,
    /// Current view being displayed.
    pub(crate) view: AppView,
    /// Currently selected index in the main menu.
    pub(crate) menu_index: usize,
    /// Course content tree shipped with the binary.
    pub(crate) catalog: Catalog,
    /// Catalog indices of library subjects, preferred exam first.
    pub(crate) library_subjects: Vec<usize>,
    /// Browser depth within the library.
    pub(crate) library_level: LibraryLevel,
    /// Cursor into `library_subjects`.
    pub(crate) subject_cursor: usize,
    /// Cursor into the selected subject's units.
    pub(crate) unit_cursor: usize,
    /// Cursor into the selected unit's chapters.
    pub(crate) chapter_cursor: usize,
    /// Active practice run, if any. Owned exclusively by this view state.
    pub(crate) practice_session: Option<PracticeSession>,
    /// Chapter title shown over the practice view.
    pub(crate) practice_title: String,
    /// Transient celebration line for the practice view.
    pub(crate) practice_flash: Option<String>,
    /// Active challenge run, if any. Dropping it cancels the countdown.
    pub(crate) challenge_session: Option<ChallengeSession>,
    /// Title shown over the challenge view.
    pub(crate) challenge_title: String,
    /// Wall-clock anchor the one-second challenge ticks are folded from.
    pub(crate) challenge_clock: Option<Instant>,
    /// Any error encountered while loading configuration or content.
    pub(crate) error: Option<String>,
    /// Holds the editable configuration state when rendering the config view.
    pub(crate) config_form: ConfigForm,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new() -> Self {
        let mut aggregated_error: Option<String> = None;

        if let Err(err) = config::initialize() {
            Self::push_error(
                &mut aggregated_error,
                format!("Configuration load failed: {}", err),
            );
        }

        let catalog = match catalog::load_default() {
            Ok(catalog) => catalog,
            Err(err) => {
                Self::push_error(
                    &mut aggregated_error,
                    format!("Catalog load failed: {}", err),
                );
                Catalog {
                    subjects: Vec::new(),
                }
            }
        };

        let library_subjects =
            catalog.ordered_subject_indices(config::current().preferred_exam.label());

        Self {
            running: false,
            view: AppView::Menu,
            menu_index: 0,
            catalog,
            library_subjects,
            library_level: LibraryLevel::Subjects,
            subject_cursor: 0,
            unit_cursor: 0,
            chapter_cursor: 0,
            practice_session: None,
            practice_title: String::new(),
            practice_flash: None,
            challenge_session: None,
            challenge_title: String::new(),
            challenge_clock: None,
            error: aggregated_error,
            config_form: ConfigForm::from_config(config::current()),
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        self.running = true;
        let tick_rate = Duration::from_millis(120);
        while self.running {
            self.advance_challenge_clock();
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events(tick_rate)?;
        }
        Ok(())
    }

    /// Dispatch rendering based on the active view.
    fn render(&mut self, frame: &mut Frame) {
        UiRenderer::new(self).render(frame);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self, tick_rate: Duration) -> Result<()> {
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(_) => {}
                Event::Resize(_, _) => {}
                _ => {}
            }
            self.advance_challenge_clock();
        } else {
            self.on_tick();
        }
        Ok(())
    }

    fn on_tick(&mut self) {
        self.advance_challenge_clock();
    }

    /// Fold wall-clock time into one-second engine ticks. User input and the
    /// countdown share this single-threaded loop, so a tick can never
    /// interleave with a half-applied key handler.
    fn advance_challenge_clock(&mut self) {
        let Some(session) = self.challenge_session.as_mut() else {
            return;
        };
        if session.phase() != ChallengePhase::Running {
            return;
        }
        let Some(anchor) = self.challenge_clock else {
            return;
        };

        let elapsed = anchor.elapsed().as_secs();
        if elapsed == 0 {
            return;
        }
        self.challenge_clock = Some(anchor + Duration::from_secs(elapsed));

        for _ in 0..elapsed {
            if session.tick() {
                self.challenge_clock = None;
                log_debug("App: challenge submitted by timeout");
                break;
            }
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            _ => match self.view {
                AppView::Menu => MenuManager::new(self).handle_key(key),
                AppView::Library => LibraryManager::new(self).handle_key(key),
                AppView::Practice => PracticeManager::new(self).handle_key(key),
                AppView::Challenge => ChallengeManager::new(self).handle_key(key),
                AppView::Config => ConfigManager::new(self).handle_key(key),
            },
        }
    }

    pub(crate) fn return_to_menu(&mut self) {
        if matches!(self.view, AppView::Config) {
            self.config_form = ConfigForm::from_config(config::current());
        }
        self.view = AppView::Menu;
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }

    /// Append a message to an optional error slot.
    pub(crate) fn push_error(slot: &mut Option<String>, message: String) {
        if let Some(existing) = slot {
            existing.push_str(" | ");
            existing.push_str(&message);
        } else {
            *slot = Some(message);
        }
    }

    /// A fully wired `App` over the embedded catalog, without touching the
    /// filesystem. Config stays at compiled-in defaults.
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        let catalog = catalog::load_default().expect("embedded catalog must parse");
        let library_subjects =
            catalog.ordered_subject_indices(config::current().preferred_exam.label());
        Self {
            running: false,
            view: AppView::Menu,
            menu_index: 0,
            catalog,
            library_subjects,
            library_level: LibraryLevel::Subjects,
            subject_cursor: 0,
            unit_cursor: 0,
            chapter_cursor: 0,
            practice_session: None,
            practice_title: String::new(),
            practice_flash: None,
            challenge_session: None,
            challenge_title: String::new(),
            challenge_clock: None,
            error: None,
            config_form: ConfigForm::from_config(config::AppConfig::default()),
        }
    }
}
