use crate::engine::practice::{Advance, CheckResult, PracticeSession, QuestionStatus};
use crate::{App, AppView, config, log_util::log_debug};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub(crate) struct PracticeManager<'a> {
    app: &'a mut App,
}

impl<'a> PracticeManager<'a> {
    pub(crate) fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Launch a practice run over a chapter's question bank.
    pub(crate) fn start_for_chapter(
        app: &'a mut App,
        subject_index: usize,
        unit_index: usize,
        chapter_index: usize,
    ) {
        let Some(chapter) = app
            .catalog
            .subjects
            .get(subject_index)
            .and_then(|subject| subject.units.get(unit_index))
            .and_then(|unit| unit.chapters.get(chapter_index))
        else {
            App::push_error(
                &mut app.error,
                "Selected chapter no longer exists in the catalog.".to_string(),
            );
            return;
        };

        let questions = chapter.practice_questions(config::practice_question_count());
        let title = chapter.title.clone();
        let count = questions.len();

        app.practice_session = Some(PracticeSession::new(questions));
        app.practice_title = title;
        app.practice_flash = None;
        app.view = AppView::Practice;
        log_debug(&format!(
            "App: started practice on '{}' with {} question(s)",
            app.practice_title, count
        ));
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char(digit @ '1'..='4')) => {
                self.select_option(digit as usize - '1' as usize)
            }
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char(' ')) => self.confirm(),
            (KeyModifiers::NONE, KeyCode::Char('d')) => self.mark_stuck(),
            (KeyModifiers::NONE, KeyCode::Char('h')) => self.reveal_hint(),
            (KeyModifiers::NONE, KeyCode::Char('s')) => self.skip_question(),
            (KeyModifiers::NONE, KeyCode::Char('r')) => self.retry(),
            (KeyModifiers::NONE, KeyCode::Backspace | KeyCode::Char('b')) => self.exit_to_library(),
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.exit_to_menu(),
            _ => {}
        }
    }

    fn select_option(&mut self, option_index: usize) {
        if let Some(session) = self.app.practice_session.as_mut() {
            session.select_option(option_index);
            self.app.practice_flash = None;
        }
    }

    /// Enter either grades the current selection or, once the question is
    /// correct, moves on.
    fn confirm(&mut self) {
        let Some(session) = self.app.practice_session.as_mut() else {
            return;
        };

        if session.status() == QuestionStatus::Correct {
            match session.next() {
                Some(Advance::Finished) => {
                    log_debug(&format!(
                        "App: practice on '{}' complete at {}%",
                        self.app.practice_title,
                        session.percentage()
                    ));
                }
                Some(Advance::Moved) => {
                    self.app.practice_flash = None;
                }
                None => {}
            }
            return;
        }

        match session.check() {
            Some(CheckResult::Correct) => {
                self.app.practice_flash = Some("🎉 Nice work! You got it right.".to_string());
                log_debug("App: practice answer graded correct");
            }
            Some(CheckResult::Incorrect) => {
                self.app.practice_flash = None;
                log_debug("App: practice answer graded incorrect");
            }
            None => {}
        }
    }

    fn mark_stuck(&mut self) {
        if let Some(session) = self.app.practice_session.as_mut() {
            session.mark_stuck();
        }
    }

    fn reveal_hint(&mut self) {
        if let Some(session) = self.app.practice_session.as_mut() {
            session.reveal_hint();
        }
    }

    fn skip_question(&mut self) {
        let Some(session) = self.app.practice_session.as_mut() else {
            return;
        };
        match session.skip_question() {
            Some(Advance::Finished) => {
                log_debug(&format!(
                    "App: practice on '{}' complete at {}%",
                    self.app.practice_title,
                    session.percentage()
                ));
            }
            Some(Advance::Moved) => {
                self.app.practice_flash = None;
            }
            None => {}
        }
    }

    fn retry(&mut self) {
        if let Some(session) = self.app.practice_session.as_mut() {
            session.retry();
            self.app.practice_flash = None;
            log_debug("App: practice session restarted");
        }
    }

    fn exit_to_library(&mut self) {
        self.app.practice_session = None;
        self.app.practice_flash = None;
        self.app.view = AppView::Library;
    }

    fn exit_to_menu(&mut self) {
        self.app.practice_session = None;
        self.app.practice_flash = None;
        self.app.return_to_menu();
    }
}
