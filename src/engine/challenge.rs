use crate::engine::diagnostics::{self, ChapterStat, ScoreSummary, TopicMap};
use crate::question_bank::Question;
use std::collections::HashMap;

/// Fixed length of a course challenge: 45 minutes.
pub const CHALLENGE_DURATION_SECS: u32 = 45 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengePhase {
    /// Intro screen; the clock has not started.
    NotStarted,
    /// The paper is live and the clock is counting down.
    Running,
    /// Submitted (by the user or the clock); score and diagnostics are final.
    Results,
}

/// Who ended the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    User,
    Timeout,
}

/// Everything the results screen needs, computed once at submit time.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeOutcome {
    pub summary: ScoreSummary,
    pub chapters: Vec<ChapterStat>,
    pub trigger: SubmitTrigger,
}

/// One timed, negative-marked mock exam over a fixed question list. Feedback
/// is deferred: while running, selections are only recorded; grading happens
/// in a single pass when the session is submitted.
#[derive(Debug)]
pub struct ChallengeSession {
    questions: Vec<Question>,
    topic_map: TopicMap,
    current_index: usize,
    answers: HashMap<usize, usize>,
    time_remaining: u32,
    phase: ChallengePhase,
    outcome: Option<ChallengeOutcome>,
}

impl ChallengeSession {
    pub fn new(questions: Vec<Question>, topic_map: TopicMap) -> Self {
        Self {
            questions,
            topic_map,
            current_index: 0,
            answers: HashMap::new(),
            time_remaining: CHALLENGE_DURATION_SECS,
            phase: ChallengePhase::NotStarted,
            outcome: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn phase(&self) -> ChallengePhase {
        self.phase
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question on screen. None for an empty paper or a runaway index;
    /// callers render a fallback instead of panicking.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// The recorded answer for a question, if any.
    pub fn answer(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn outcome(&self) -> Option<&ChallengeOutcome> {
        self.outcome.as_ref()
    }

    /// Begin the countdown. Refused for an empty paper and after the first
    /// start. Returns whether the session actually started.
    pub fn start(&mut self) -> bool {
        if self.phase != ChallengePhase::NotStarted || self.questions.is_empty() {
            return false;
        }
        self.phase = ChallengePhase::Running;
        true
    }

    /// Advance the clock by one second. Reaching zero force-submits the paper
    /// with whatever answers stand. Returns true only on the tick that ends
    /// the session; after submission the clock is frozen.
    pub fn tick(&mut self) -> bool {
        if self.phase != ChallengePhase::Running {
            return false;
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            self.finalize(SubmitTrigger::Timeout);
            return true;
        }
        false
    }

    /// Record (or overwrite) an answer. Last write wins; never grades and
    /// never moves the cursor. Ignored outside the running phase.
    pub fn select_option(&mut self, question_index: usize, option_index: usize) {
        if self.phase != ChallengePhase::Running {
            return;
        }
        let Some(question) = self.questions.get(question_index) else {
            return;
        };
        if option_index >= question.options.len() {
            return;
        }
        self.answers.insert(question_index, option_index);
    }

    /// Jump straight to any question (the palette). Answers are untouched.
    pub fn navigate(&mut self, target_index: usize) {
        if self.phase == ChallengePhase::Running && target_index < self.questions.len() {
            self.current_index = target_index;
        }
    }

    pub fn next_question(&mut self) {
        if self.phase == ChallengePhase::Running && self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        }
    }

    pub fn previous_question(&mut self) {
        if self.phase == ChallengePhase::Running && self.current_index > 0 {
            self.current_index -= 1;
        }
    }

    /// Submit the paper. Idempotent: the first call (user or timeout) wins and
    /// later calls change nothing. Returns true only on the call that actually
    /// ended the session.
    pub fn submit(&mut self) -> bool {
        if self.phase != ChallengePhase::Running {
            return false;
        }
        self.finalize(SubmitTrigger::User);
        true
    }

    fn finalize(&mut self, trigger: SubmitTrigger) {
        let summary = diagnostics::score_summary(&self.questions, &self.answers);
        let chapters = diagnostics::chapter_breakdown(&self.questions, &self.answers, &self.topic_map);
        self.outcome = Some(ChallengeOutcome {
            summary,
            chapters,
            trigger,
        });
        self.phase = ChallengePhase::Results;
    }

    /// Reinitialize for a retake over the identical paper: empty answers,
    /// cursor at the first question, full clock.
    pub fn retry(&mut self) {
        self.current_index = 0;
        self.answers.clear();
        self.time_remaining = CHALLENGE_DURATION_SECS;
        self.phase = ChallengePhase::NotStarted;
        self.outcome = None;
    }
}

/// Render seconds as "m:ss" for the countdown display.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::diagnostics::TopicStatus;

    fn question(topic: &str, correct_answer: usize) -> Question {
        Question {
            id: String::new(),
            text: format!("[{}] Q: pick the right option", topic),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            correct_answer,
            explanation: String::new(),
            hint: String::new(),
            topic: Some(topic.to_string()),
        }
    }

    fn spec_example_session() -> ChallengeSession {
        // Topic A x3, topic B x2; correct answer is option 0 throughout.
        let questions = vec![
            question("A", 0),
            question("A", 0),
            question("A", 0),
            question("B", 0),
            question("B", 0),
        ];
        ChallengeSession::new(questions, TopicMap::new("lectures/jee/mathematics-11"))
    }

    fn answer_spec_example(session: &mut ChallengeSession) {
        session.select_option(0, 0); // correct
        session.select_option(1, 1); // wrong
        // q2 unattempted
        session.select_option(3, 0); // correct
        session.select_option(4, 2); // wrong
    }

    #[test]
    fn submitted_paper_matches_the_worked_example() {
        let mut session = spec_example_session();
        assert!(session.start());
        answer_spec_example(&mut session);

        assert!(session.submit());
        let outcome = session.outcome().expect("outcome after submit");

        assert_eq!(outcome.summary.total_score, 6);
        assert_eq!(outcome.summary.correct, 2);
        assert_eq!(outcome.summary.incorrect, 2);
        assert_eq!(outcome.summary.unattempted, 1);
        assert_eq!(outcome.trigger, SubmitTrigger::User);

        assert_eq!(outcome.chapters.len(), 2);
        assert_eq!(outcome.chapters[0].topic, "A");
        assert_eq!(outcome.chapters[0].status, TopicStatus::NeedsImprovement);
        assert_eq!(outcome.chapters[1].topic, "B");
        assert_eq!(outcome.chapters[1].status, TopicStatus::NeedsImprovement);
    }

    #[test]
    fn submit_is_idempotent_across_user_and_timeout() {
        let mut session = spec_example_session();
        session.start();
        answer_spec_example(&mut session);

        assert!(session.submit());
        let first = session.outcome().cloned();

        // A racing second submission or a late clock tick changes nothing.
        assert!(!session.submit());
        assert!(!session.tick());
        assert_eq!(session.outcome().cloned(), first);
        assert_eq!(session.phase(), ChallengePhase::Results);
    }

    #[test]
    fn timeout_forces_submission_and_freezes_the_clock() {
        let mut session = spec_example_session();
        session.start();
        session.select_option(0, 0);

        let mut ended = false;
        for _ in 0..CHALLENGE_DURATION_SECS {
            ended = session.tick();
        }
        assert!(ended, "the final tick must end the session");
        assert_eq!(session.phase(), ChallengePhase::Results);
        assert_eq!(session.time_remaining(), 0);

        let outcome = session.outcome().expect("outcome after timeout");
        assert_eq!(outcome.trigger, SubmitTrigger::Timeout);
        assert_eq!(outcome.summary.correct, 1);
        assert_eq!(outcome.summary.unattempted, 4);

        assert!(!session.tick());
        assert_eq!(session.time_remaining(), 0, "no decrements after submission");
    }

    #[test]
    fn selections_overwrite_with_last_write_wins() {
        let mut session = spec_example_session();
        session.start();

        session.select_option(2, 1);
        session.select_option(2, 3);
        assert_eq!(session.answer(2), Some(3));
        assert_eq!(session.answered_count(), 1);
        assert_eq!(session.current_index(), 0, "selection never moves the cursor");
    }

    #[test]
    fn selections_are_ignored_outside_the_running_phase() {
        let mut session = spec_example_session();
        session.select_option(0, 0);
        assert_eq!(session.answer(0), None, "paper not started yet");

        session.start();
        session.submit();
        session.select_option(0, 0);
        assert_eq!(session.answer(0), None, "paper already submitted");
    }

    #[test]
    fn navigation_jumps_freely_and_clamps_at_the_ends() {
        let mut session = spec_example_session();
        session.start();

        session.navigate(4);
        assert_eq!(session.current_index(), 4);
        session.navigate(99);
        assert_eq!(session.current_index(), 4, "out-of-range jump ignored");
        session.next_question();
        assert_eq!(session.current_index(), 4);
        session.navigate(0);
        session.previous_question();
        assert_eq!(session.current_index(), 0);
    }

    #[test]
    fn retry_restores_the_initial_state_with_the_same_paper() {
        let mut session = spec_example_session();
        session.start();
        answer_spec_example(&mut session);
        session.navigate(3);
        for _ in 0..100 {
            session.tick();
        }
        session.submit();

        session.retry();
        assert_eq!(session.phase(), ChallengePhase::NotStarted);
        assert_eq!(session.answered_count(), 0);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.time_remaining(), CHALLENGE_DURATION_SECS);
        assert!(session.outcome().is_none());
        assert_eq!(session.len(), 5, "same question list, no reshuffle");

        // And the retaken paper behaves like a fresh one.
        assert!(session.start());
        assert_eq!(session.time_remaining(), CHALLENGE_DURATION_SECS);
    }

    #[test]
    fn empty_paper_cannot_start_tick_or_submit() {
        let mut session = ChallengeSession::new(Vec::new(), TopicMap::default());
        assert!(session.is_empty());
        assert!(!session.start());
        assert_eq!(session.phase(), ChallengePhase::NotStarted);
        assert!(!session.tick());
        assert_eq!(session.time_remaining(), CHALLENGE_DURATION_SECS);
        assert!(!session.submit());
        assert!(session.outcome().is_none());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn clock_renders_minutes_and_padded_seconds() {
        assert_eq!(format_clock(CHALLENGE_DURATION_SECS), "45:00");
        assert_eq!(format_clock(299), "4:59");
        assert_eq!(format_clock(61), "1:01");
        assert_eq!(format_clock(0), "0:00");
    }
}
