use crate::question_bank::Question;

/// Interaction state of the question currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    /// Nothing graded yet; a tentative selection may be held.
    Idle,
    /// Graded right. The question is locked and `next` becomes available.
    Correct,
    /// Graded wrong. The selection is kept so the retry UI can show it.
    Incorrect,
    /// The user asked for help; hint and skip become available.
    Stuck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    Correct,
    Incorrect,
}

/// Result of moving past the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved,
    /// The session just reached its terminal state. Reported exactly once.
    Finished,
}

/// One untimed practice run over a fixed question list: immediate feedback,
/// unlimited retries on wrong answers, hint/skip from the stuck state, binary
/// scoring. Owns all mutable state; rendering stays outside.
#[derive(Debug)]
pub struct PracticeSession {
    questions: Vec<Question>,
    current_index: usize,
    selected_option: Option<usize>,
    status: QuestionStatus,
    hint_revealed: bool,
    score: usize,
    finished: bool,
}

impl PracticeSession {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            current_index: 0,
            selected_option: None,
            status: QuestionStatus::Idle,
            hint_revealed: false,
            score: 0,
            finished: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The question on screen. None for an empty session or an index that
    /// somehow ran past the end; callers render a fallback instead of panicking.
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    pub fn hint_revealed(&self) -> bool {
        self.hint_revealed
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Record a tentative selection. Ignored once the question is answered
    /// correctly, and never grades on its own.
    pub fn select_option(&mut self, option_index: usize) {
        if self.finished || self.status == QuestionStatus::Correct {
            return;
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return;
        };
        if option_index >= question.options.len() {
            return;
        }
        self.selected_option = Some(option_index);
        self.status = QuestionStatus::Idle;
    }

    /// Grade the tentative selection. No-op without a selection or after the
    /// question is already correct.
    pub fn check(&mut self) -> Option<CheckResult> {
        if self.finished || self.status == QuestionStatus::Correct {
            return None;
        }
        let question = self.questions.get(self.current_index)?;
        let selected = self.selected_option?;

        if selected == question.correct_answer {
            self.status = QuestionStatus::Correct;
            self.score += 1;
            Some(CheckResult::Correct)
        } else {
            self.status = QuestionStatus::Incorrect;
            Some(CheckResult::Incorrect)
        }
    }

    /// The explicit "I don't know" action. Unreachable once the question is
    /// answered correctly.
    pub fn mark_stuck(&mut self) {
        if self.finished || self.current_question().is_none() {
            return;
        }
        if matches!(self.status, QuestionStatus::Idle | QuestionStatus::Incorrect) {
            self.status = QuestionStatus::Stuck;
        }
    }

    /// Reveal the hint. One-way and idempotent; only available while stuck.
    pub fn reveal_hint(&mut self) {
        if self.status == QuestionStatus::Stuck {
            self.hint_revealed = true;
        }
    }

    /// Skip the current question without grading it. Only available while
    /// stuck; a skipped question contributes nothing to the score.
    pub fn skip_question(&mut self) -> Option<Advance> {
        if self.finished || self.status != QuestionStatus::Stuck {
            return None;
        }
        Some(self.advance())
    }

    /// Move on after a correct answer, or finish the session on the last
    /// question. Only reachable from the correct state.
    pub fn next(&mut self) -> Option<Advance> {
        if self.finished || self.status != QuestionStatus::Correct {
            return None;
        }
        Some(self.advance())
    }

    fn advance(&mut self) -> Advance {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.selected_option = None;
            self.status = QuestionStatus::Idle;
            self.hint_revealed = false;
            Advance::Moved
        } else {
            self.finished = true;
            Advance::Finished
        }
    }

    /// Restart from scratch over the identical question list.
    pub fn retry(&mut self) {
        self.current_index = 0;
        self.selected_option = None;
        self.status = QuestionStatus::Idle;
        self.hint_revealed = false;
        self.score = 0;
        self.finished = false;
    }

    /// Score as a percentage of the full question list, rounded to the
    /// nearest integer for display.
    pub fn percentage(&self) -> u32 {
        if self.questions.is_empty() {
            return 0;
        }
        (self.score as f64 / self.questions.len() as f64 * 100.0).round() as u32
    }
}
