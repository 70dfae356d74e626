use crate::engine::challenge::{ChallengePhase, ChallengeSession};
use crate::{App, AppView, config, log_util::log_debug, question_bank};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Palette page size for coarse jumps through the paper.
const PALETTE_JUMP: usize = 5;

pub(crate) struct ChallengeManager<'a> {
    app: &'a mut App,
}

impl<'a> ChallengeManager<'a> {
    pub(crate) fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    /// Quick-start a challenge for the preferred exam's default subject.
    pub(crate) fn start_default_challenge(app: &'a mut App) {
        let preferred = config::current().preferred_exam;
        let Some(position) = app
            .catalog
            .ordered_subject_indices(preferred.label())
            .first()
            .copied()
        else {
            App::push_error(
                &mut app.error,
                "No subject available for a course challenge.".to_string(),
            );
            return;
        };
        Self::start_for_subject(app, position);
    }

    /// Assemble a fresh paper for the subject and open the intro screen. The
    /// countdown only starts once the user confirms.
    pub(crate) fn start_for_subject(app: &'a mut App, subject_index: usize) {
        let Some(subject) = app.catalog.subjects.get(subject_index) else {
            App::push_error(
                &mut app.error,
                "Selected subject no longer exists in the catalog.".to_string(),
            );
            return;
        };

        let questions = question_bank::questions_for_challenge(subject);
        let topic_map = subject.topic_map();
        let title = format!("Course Challenge: {}", subject.subject);
        let count = questions.len();

        app.challenge_session = Some(ChallengeSession::new(questions, topic_map));
        app.challenge_title = title;
        app.challenge_clock = None;
        app.view = AppView::Challenge;
        log_debug(&format!(
            "App: prepared '{}' with {} question(s)",
            app.challenge_title, count
        ));
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        let Some(phase) = self.app.challenge_session.as_ref().map(|s| s.phase()) else {
            if matches!(key.code, KeyCode::Char('m')) {
                self.app.return_to_menu();
            }
            return;
        };

        match phase {
            ChallengePhase::NotStarted => self.handle_intro_key(key),
            ChallengePhase::Running => self.handle_running_key(key),
            ChallengePhase::Results => self.handle_results_key(key),
        }
    }

    fn handle_intro_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char('s')) => self.begin(),
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.abandon(),
            _ => {}
        }
    }

    fn handle_running_key(&mut self, key: KeyEvent) {
        let Some(session) = self.app.challenge_session.as_mut() else {
            return;
        };
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char(digit @ '1'..='4')) => {
                let option = digit as usize - '1' as usize;
                session.select_option(session.current_index(), option);
            }
            (KeyModifiers::NONE, KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n')) => {
                session.next_question()
            }
            (KeyModifiers::NONE, KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p')) => {
                session.previous_question()
            }
            (KeyModifiers::NONE, KeyCode::Home) => session.navigate(0),
            (KeyModifiers::NONE, KeyCode::End) => {
                let last = session.len().saturating_sub(1);
                session.navigate(last);
            }
            (KeyModifiers::NONE, KeyCode::PageDown) => {
                let target = (session.current_index() + PALETTE_JUMP)
                    .min(session.len().saturating_sub(1));
                session.navigate(target);
            }
            (KeyModifiers::NONE, KeyCode::PageUp) => {
                let target = session.current_index().saturating_sub(PALETTE_JUMP);
                session.navigate(target);
            }
            (KeyModifiers::NONE, KeyCode::Char('s')) => {
                if session.submit() {
                    self.app.challenge_clock = None;
                    log_debug("App: challenge submitted by user");
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.abandon(),
            _ => {}
        }
    }

    fn handle_results_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                if let Some(session) = self.app.challenge_session.as_mut() {
                    session.retry();
                    self.app.challenge_clock = None;
                    log_debug("App: challenge reset for a retake");
                }
            }
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char('m')) => {
                // Exit-to-course from the results screen.
                self.app.challenge_session = None;
                self.app.challenge_clock = None;
                self.app.return_to_menu();
            }
            _ => {}
        }
    }

    fn begin(&mut self) {
        let Some(session) = self.app.challenge_session.as_mut() else {
            return;
        };
        if session.start() {
            self.app.challenge_clock = Some(Instant::now());
            log_debug("App: challenge countdown started");
        }
    }

    /// Drop the session entirely. This is the cancellation path: without a
    /// session there is nothing left for the clock to tick.
    fn abandon(&mut self) {
        self.app.challenge_session = None;
        self.app.challenge_clock = None;
        self.app.return_to_menu();
        log_debug("App: challenge abandoned; countdown cancelled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::challenge::CHALLENGE_DURATION_SECS;
    use crate::engine::diagnostics::TopicMap;
    use crate::question_bank::Question;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::{fs, path::Path};

    fn load_questions(filename: &str) -> Vec<Question> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("test_fixtures")
            .join(filename);
        let contents = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read {}: {}", path.display(), err));
        serde_json::from_str(&contents).unwrap_or_else(|err| {
            panic!(
                "failed to parse {} as a question list: {}",
                path.display(),
                err
            )
        })
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with_challenge() -> App {
        let mut app = App::for_tests();
        let questions = load_questions("challenge_mixed_topics.json");
        app.challenge_session = Some(ChallengeSession::new(
            questions,
            TopicMap::new("lectures/jee/jee-mathematics-11"),
        ));
        app.challenge_title = "Course Challenge: Mathematics".to_string();
        app.view = AppView::Challenge;
        app
    }

    #[test]
    fn intro_enter_starts_the_countdown() {
        let mut app = app_with_challenge();
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Enter));

        let session = app.challenge_session.as_ref().unwrap();
        assert_eq!(session.phase(), ChallengePhase::Running);
        assert_eq!(session.time_remaining(), CHALLENGE_DURATION_SECS);
        assert!(app.challenge_clock.is_some(), "clock anchor installed");
    }

    #[test]
    fn answers_navigation_and_user_submit_flow() {
        let mut app = app_with_challenge();
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Enter));

        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Char('1')));
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Right));
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Char('2')));
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::End));
        {
            let session = app.challenge_session.as_ref().unwrap();
            assert_eq!(session.answer(0), Some(0));
            assert_eq!(session.answer(1), Some(1));
            assert_eq!(session.current_index(), session.len() - 1);
        }

        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Char('s')));
        let session = app.challenge_session.as_ref().unwrap();
        assert_eq!(session.phase(), ChallengePhase::Results);
        assert!(session.outcome().is_some());
        assert!(app.challenge_clock.is_none(), "clock anchor released");
    }

    #[test]
    fn results_retake_resets_and_returns_to_the_intro() {
        let mut app = app_with_challenge();
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Enter));
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Char('1')));
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Char('s')));

        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Char('r')));
        let session = app.challenge_session.as_ref().unwrap();
        assert_eq!(session.phase(), ChallengePhase::NotStarted);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.time_remaining(), CHALLENGE_DURATION_SECS);
    }

    #[test]
    fn abandoning_mid_paper_cancels_everything() {
        let mut app = app_with_challenge();
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Enter));
        ChallengeManager::new(&mut app).handle_key(key(KeyCode::Char('m')));

        assert!(app.challenge_session.is_none());
        assert!(app.challenge_clock.is_none());
        assert_eq!(app.view, AppView::Menu);
    }

    #[test]
    fn quick_start_prefers_the_configured_exam() {
        let mut app = App::for_tests();
        ChallengeManager::start_default_challenge(&mut app);

        assert_eq!(app.view, AppView::Challenge);
        let session = app.challenge_session.as_ref().expect("session prepared");
        assert_eq!(session.phase(), ChallengePhase::NotStarted);
        assert!(!session.is_empty());
        assert!(app.challenge_title.starts_with("Course Challenge:"));
    }
}
