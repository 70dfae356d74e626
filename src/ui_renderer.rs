use crate::engine::challenge::{ChallengePhase, SubmitTrigger, format_clock};
use crate::engine::diagnostics::TopicStatus;
use crate::engine::practice::QuestionStatus;
use crate::question_bank::Question;
use crate::view_managers::library_manager::LibraryLevel;
use crate::view_managers::menu_manager::MENU_OPTIONS;
use crate::{App, AppView, config};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, List, ListItem, ListState, Paragraph, Wrap},
};

/// Countdown threshold below which the challenge clock renders red.
const CLOCK_WARNING_SECS: u32 = 300;

pub(crate) struct UiRenderer<'a> {
    app: &'a mut App,
}

impl<'a> UiRenderer<'a> {
    pub(crate) fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub(crate) fn render(&mut self, frame: &mut Frame) {
        match self.app.view {
            AppView::Menu => self.render_menu(frame),
            AppView::Library => self.render_library(frame),
            AppView::Practice => self.render_practice(frame),
            AppView::Challenge => self.render_challenge(frame),
            AppView::Config => self.render_config(frame),
        }
    }

    fn standard_layout(frame: &Frame) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(4),
            ])
            .split(frame.area())
    }

    fn header_title(context: &str) -> Line<'static> {
        Line::from(format!("Prepdeck • {}", context))
            .bold()
            .blue()
            .centered()
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, mut lines: Vec<String>) {
        if let Some(error) = &self.app.error {
            lines.insert(0, format!("Error: {}", error));
        }
        frame.render_widget(
            Paragraph::new(lines.join("\n")).block(Block::bordered().title(Line::from("Status"))),
            area,
        );
    }

    fn render_menu(&mut self, frame: &mut Frame) {
        let layout = Self::standard_layout(frame);

        frame.render_widget(
            Paragraph::new(
                "Structured prep for JEE & NEET: lectures, practice drills, and mock challenges.",
            )
            .block(Block::bordered().title(Self::header_title("Home")))
            .centered(),
            layout[0],
        );

        let items: Vec<ListItem> = MENU_OPTIONS
            .iter()
            .map(|label| ListItem::new(*label))
            .collect();
        let mut state = ListState::default();
        state.select(Some(self.app.menu_index));

        frame.render_stateful_widget(
            List::new(items)
                .block(Block::bordered().title(Line::from("Actions")))
                .highlight_symbol("▶ ")
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            layout[1],
            &mut state,
        );

        let mut status_lines = vec![
            "Use ↑/↓ or j/k to choose. Press Enter to select.".to_string(),
            "Press 1, 2, or 3 for quick selection. Esc, Ctrl-C, or q to quit.".to_string(),
        ];
        status_lines.push(format!(
            "Preferred exam: {}. Press c to configure details.",
            config::current().preferred_exam.label()
        ));
        self.render_status(frame, layout[2], status_lines);
    }

    fn render_library(&mut self, frame: &mut Frame) {
        let layout = Self::standard_layout(frame);
        let app = &*self.app;

        let subject_index = app.library_subjects.get(app.subject_cursor).copied();
        let subject = subject_index.map(|index| &app.catalog.subjects[index]);

        let context = match (app.library_level, subject) {
            (LibraryLevel::Subjects, _) => "Course Library".to_string(),
            (LibraryLevel::Units, Some(subject)) => subject.title.clone(),
            (LibraryLevel::Chapters, Some(subject)) => {
                let unit_title = subject
                    .units
                    .get(app.unit_cursor)
                    .map(|unit| unit.title.as_str())
                    .unwrap_or("Units");
                format!("{} • {}", subject.title, unit_title)
            }
            _ => "Course Library".to_string(),
        };

        frame.render_widget(
            Paragraph::new("Pick a chapter to practice, or press c to take the course challenge.")
                .block(Block::bordered().title(Self::header_title(&context)))
                .centered(),
            layout[0],
        );

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(layout[1]);

        let (items, selected, detail_text) = match app.library_level {
            LibraryLevel::Subjects => {
                let items: Vec<ListItem> = app
                    .library_subjects
                    .iter()
                    .map(|&index| {
                        let subject = &app.catalog.subjects[index];
                        ListItem::new(format!(
                            "{} [{} • {}]",
                            subject.title, subject.exam, subject.grade
                        ))
                    })
                    .collect();
                let detail = subject
                    .map(|subject| {
                        format!(
                            "{}\n\nExam: {}\nGrade: {}\nUnits: {}",
                            subject.title,
                            subject.exam,
                            subject.grade,
                            subject.units.len()
                        )
                    })
                    .unwrap_or_else(|| "The catalog is empty.".to_string());
                (items, app.subject_cursor, detail)
            }
            LibraryLevel::Units => {
                let units = subject.map(|subject| subject.units.as_slice()).unwrap_or(&[]);
                let items: Vec<ListItem> = units
                    .iter()
                    .map(|unit| {
                        ListItem::new(format!("{} ({} chapters)", unit.title, unit.chapters.len()))
                    })
                    .collect();
                let detail = units
                    .get(app.unit_cursor)
                    .map(|unit| {
                        let chapters: Vec<String> = unit
                            .chapters
                            .iter()
                            .map(|chapter| format!("• {}", chapter.title))
                            .collect();
                        format!("{}\n\n{}", unit.title, chapters.join("\n"))
                    })
                    .unwrap_or_else(|| "This subject has no units yet.".to_string());
                (items, app.unit_cursor, detail)
            }
            LibraryLevel::Chapters => {
                let chapters = subject
                    .and_then(|subject| subject.units.get(app.unit_cursor))
                    .map(|unit| unit.chapters.as_slice())
                    .unwrap_or(&[]);
                let items: Vec<ListItem> = chapters
                    .iter()
                    .map(|chapter| ListItem::new(chapter.title.clone()))
                    .collect();
                let detail = chapters
                    .get(app.chapter_cursor)
                    .map(|chapter| {
                        let resources: Vec<String> = chapter
                            .resources
                            .iter()
                            .map(|resource| {
                                let extra = resource
                                    .duration
                                    .as_deref()
                                    .map(|d| format!(" ({})", d))
                                    .or_else(|| {
                                        resource
                                            .question_count
                                            .map(|count| format!(" ({} Qs)", count))
                                    })
                                    .unwrap_or_default();
                                format!("• [{}] {}{}", resource.kind.label(), resource.title, extra)
                            })
                            .collect();
                        format!(
                            "{}\n{}\n\nResources:\n{}",
                            chapter.title,
                            chapter.description,
                            resources.join("\n")
                        )
                    })
                    .unwrap_or_else(|| "This unit has no chapters yet.".to_string());
                (items, app.chapter_cursor, detail)
            }
        };

        let mut state = ListState::default();
        if !items.is_empty() {
            state.select(Some(selected.min(items.len() - 1)));
        }

        frame.render_stateful_widget(
            List::new(items)
                .block(Block::bordered().title(Line::from("Browse")))
                .highlight_symbol("▶ ")
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            body[0],
            &mut state,
        );

        frame.render_widget(
            Paragraph::new(detail_text)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Details"))),
            body[1],
        );

        let status_lines = vec![
            "Use ↑/↓ or j/k to move. Enter descends, Backspace/h goes back.".to_string(),
            "Enter on a chapter starts practice. c starts the course challenge.".to_string(),
            "Press m for the menu.".to_string(),
        ];
        self.render_status(frame, layout[2], status_lines);
    }

    fn render_practice(&mut self, frame: &mut Frame) {
        let layout = Self::standard_layout(frame);
        let app = &*self.app;

        let title = if app.practice_title.is_empty() {
            "Practice".to_string()
        } else {
            format!("Practice • {}", app.practice_title)
        };

        let mut question_text =
            String::from("No practice session is active. Start one from the library.");
        let mut feedback_text = String::new();
        let mut status_lines: Vec<String> = Vec::new();

        if let Some(session) = &app.practice_session {
            if session.is_empty() {
                question_text =
                    String::from("No questions available yet.\nCheck back later!");
            } else if session.is_finished() {
                let percentage = session.percentage();
                let filled = (percentage as usize * 20) / 100;
                let bar = format!("[{}{}]", "█".repeat(filled), "░".repeat(20 - filled));
                question_text = format!(
                    "🏆 Practice Complete!\n\nYou've leveled up your skills on {}.\nScore: {}/{} ({}%)\n\n{}",
                    app.practice_title,
                    session.score(),
                    session.len(),
                    percentage,
                    bar
                );
                status_lines.push("Press r to practice again, b for the library, m for the menu.".to_string());
            } else if let Some(question) = session.current_question() {
                let progress: String = (0..session.len())
                    .map(|index| {
                        if index < session.current_index() {
                            '■'
                        } else if index == session.current_index() {
                            '▣'
                        } else {
                            '□'
                        }
                    })
                    .collect();

                let hint_block = if session.hint_revealed() {
                    let hint = if question.hint.is_empty() {
                        "No hint available for this question."
                    } else {
                        question.hint.as_str()
                    };
                    format!("\nHint: {}\n", hint)
                } else {
                    String::new()
                };

                question_text = format!(
                    "Question {}/{}  {}\n\n{}\n{}\nOptions:\n{}",
                    session.current_index() + 1,
                    session.len(),
                    progress,
                    question.text,
                    hint_block,
                    Self::practice_option_lines(session.status(), session.selected_option(), question)
                );

                feedback_text = match session.status() {
                    QuestionStatus::Correct => {
                        let flash = app
                            .practice_flash
                            .clone()
                            .unwrap_or_else(|| "Nice work! You got it right.".to_string());
                        format!("{}\nPress Enter for the next question.", flash)
                    }
                    QuestionStatus::Incorrect => format!(
                        "Not quite yet... {}\nRe-select an option and press Enter to try again.",
                        if question.explanation.is_empty() {
                            "Try again or get help."
                        } else {
                            question.explanation.as_str()
                        }
                    ),
                    QuestionStatus::Stuck => {
                        "Stuck? Press h to reveal the hint or s to skip for now.".to_string()
                    }
                    QuestionStatus::Idle => {
                        "Select an option with 1-4, then press Enter to check.".to_string()
                    }
                };

                status_lines.push(
                    "1-4 select • Enter check/next • d I-don't-know • r restart".to_string(),
                );
                status_lines.push("b back to library • m menu • Esc/q quit".to_string());
            } else {
                question_text = String::from("Error loading question.");
            }
        }

        frame.render_widget(
            Paragraph::new("Untimed drill: unlimited retries, hints when you are stuck.")
                .block(Block::bordered().title(Self::header_title(&title)))
                .centered(),
            layout[0],
        );

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(4)])
            .split(layout[1]);

        frame.render_widget(
            Paragraph::new(question_text)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Question"))),
            sections[0],
        );

        frame.render_widget(
            Paragraph::new(feedback_text)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Feedback"))),
            sections[1],
        );

        self.render_status(frame, layout[2], status_lines);
    }

    fn practice_option_lines(
        status: QuestionStatus,
        selected: Option<usize>,
        question: &Question,
    ) -> String {
        question
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let is_selected = selected == Some(index);
                let marker = match status {
                    QuestionStatus::Correct if index == question.correct_answer => "[✓]",
                    QuestionStatus::Incorrect if is_selected => "[✗]",
                    _ if is_selected => "[•]",
                    _ => "[ ]",
                };
                let prefix = if is_selected { "▶" } else { " " };
                format!("{} {} {}. {}", prefix, marker, index + 1, option)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_challenge(&mut self, frame: &mut Frame) {
        let Some(session) = self.app.challenge_session.as_ref() else {
            let layout = Self::standard_layout(frame);
            frame.render_widget(
                Paragraph::new("No challenge is active. Start one from the menu.")
                    .block(Block::bordered().title(Self::header_title("Challenge")))
                    .centered(),
                layout[0],
            );
            self.render_status(frame, layout[2], vec!["Press m for the menu.".to_string()]);
            return;
        };

        match session.phase() {
            ChallengePhase::NotStarted => self.render_challenge_intro(frame),
            ChallengePhase::Running => self.render_challenge_running(frame),
            ChallengePhase::Results => self.render_challenge_results(frame),
        }
    }

    fn render_challenge_intro(&mut self, frame: &mut Frame) {
        let layout = Self::standard_layout(frame);
        let app = &*self.app;
        let Some(session) = app.challenge_session.as_ref() else {
            return;
        };

        let body_text = if session.is_empty() {
            "Preparing challenge...\n\nNo questions are available for this subject yet.".to_string()
        } else {
            format!(
                "🏆 {}\n\nImportant instructions:\n\
                 • You have {} minutes to complete this challenge.\n\
                 • There are {} questions in total.\n\
                 • +4 marks for every correct answer.\n\
                 • -1 mark for every incorrect answer (negative marking).\n\
                 • 0 marks for unattempted questions.\n\n\
                 A detailed chapter-wise analysis follows your submission.",
                app.challenge_title,
                crate::engine::challenge::CHALLENGE_DURATION_SECS / 60,
                session.len()
            )
        };

        frame.render_widget(
            Paragraph::new("Timed environment • Detailed analysis report")
                .block(Block::bordered().title(Self::header_title(&app.challenge_title)))
                .centered(),
            layout[0],
        );

        frame.render_widget(
            Paragraph::new(body_text)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Course Challenge"))),
            layout[1],
        );

        let status_lines = if session.is_empty() {
            vec!["Press m to go back.".to_string()]
        } else {
            vec![
                "Press Enter to start the challenge now.".to_string(),
                "Press m to cancel and return to the menu.".to_string(),
            ]
        };
        self.render_status(frame, layout[2], status_lines);
    }

    fn render_challenge_running(&mut self, frame: &mut Frame) {
        let layout = Self::standard_layout(frame);
        let app = &*self.app;
        let Some(session) = app.challenge_session.as_ref() else {
            return;
        };

        let clock = format_clock(session.time_remaining());
        let header = format!(
            "Question {} of {}   ⏱ {}",
            session.current_index() + 1,
            session.len(),
            clock
        );
        let header_line = if session.time_remaining() < CLOCK_WARNING_SECS {
            Line::from(header).bold().red().centered()
        } else {
            Line::from(header).bold().blue().centered()
        };

        frame.render_widget(
            Paragraph::new("Single correct type (+4, -1)")
                .block(Block::bordered().title(header_line))
                .centered(),
            layout[0],
        );

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(26)])
            .split(layout[1]);

        let question_text = match session.current_question() {
            Some(question) => {
                let options = question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(index, option)| {
                        let is_chosen = session.answer(session.current_index()) == Some(index);
                        let marker = if is_chosen { "[•]" } else { "[ ]" };
                        format!("{} {}. {}", marker, index + 1, option)
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("{}\n\n{}", question.text, options)
            }
            None => "Error loading question.".to_string(),
        };

        frame.render_widget(
            Paragraph::new(question_text)
                .wrap(Wrap { trim: false })
                .block(Block::bordered().title(Line::from("Question"))),
            body[0],
        );

        // Palette: ▸ current, ● answered, · unattempted.
        let palette = (0..session.len())
            .map(|index| {
                let marker = if index == session.current_index() {
                    '▸'
                } else if session.answer(index).is_some() {
                    '●'
                } else {
                    '·'
                };
                format!("{:>2}{}", index + 1, marker)
            })
            .collect::<Vec<_>>()
            .chunks(5)
            .map(|row| row.join(" "))
            .collect::<Vec<_>>()
            .join("\n");

        frame.render_widget(
            Paragraph::new(format!(
                "{}\n\n▸ current\n● attempted\n· unattempted",
                palette
            ))
            .block(Block::bordered().title(Line::from("Palette"))),
            body[1],
        );

        let status_lines = vec![
            format!(
                "Attempted {} of {}.",
                session.answered_count(),
                session.len()
            ),
            "1-4 answer • ←/→ move • Home/End/PgUp/PgDn jump".to_string(),
            "s submit • m abandon".to_string(),
        ];
        self.render_status(frame, layout[2], status_lines);
    }

    fn render_challenge_results(&mut self, frame: &mut Frame) {
        let layout = Self::standard_layout(frame);
        let app = &*self.app;
        let Some(outcome) = app
            .challenge_session
            .as_ref()
            .and_then(|session| session.outcome())
        else {
            return;
        };

        let trigger_note = match outcome.trigger {
            SubmitTrigger::User => "Submitted by you.",
            SubmitTrigger::Timeout => "Time expired: the paper was submitted automatically.",
        };

        frame.render_widget(
            Paragraph::new(format!("🎉 Challenge Complete! {}", trigger_note))
                .block(Block::bordered().title(Self::header_title(&app.challenge_title)))
                .centered(),
            layout[0],
        );

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(6)])
            .split(layout[1]);

        frame.render_widget(
            Paragraph::new(format!(
                "Total Score: {}\nCorrect: {}   Incorrect: {}   Unattempted: {}",
                outcome.summary.total_score,
                outcome.summary.correct,
                outcome.summary.incorrect,
                outcome.summary.unattempted
            ))
            .centered()
            .block(Block::bordered().title(Line::from("Performance"))),
            sections[0],
        );

        let rows: Vec<ListItem> = outcome
            .chapters
            .iter()
            .map(|stat| {
                let verdict = match stat.status {
                    TopicStatus::Strong => "✅ Strong Understanding. Keep it up!".to_string(),
                    TopicStatus::NeedsImprovement => format!(
                        "⚠ Needs Improvement. Improve this chapter: {}",
                        stat.remediation.as_deref().unwrap_or("the chapter")
                    ),
                    TopicStatus::Weak => format!(
                        "❌ Weak Area. Revise & watch lecture: {}",
                        stat.remediation.as_deref().unwrap_or("the chapter")
                    ),
                };
                ListItem::new(format!(
                    "{}: {} Qs, {} wrong ({}%) | {}",
                    stat.topic,
                    stat.total,
                    stat.wrong,
                    stat.wrong_percentage.round() as i64,
                    verdict
                ))
            })
            .collect();

        frame.render_widget(
            List::new(rows).block(Block::bordered().title(Line::from("Chapter Breakdown"))),
            sections[1],
        );

        let status_lines = vec![
            "Press r to retake the challenge with a fresh clock.".to_string(),
            "Press Enter or m to go back to the course.".to_string(),
        ];
        self.render_status(frame, layout[2], status_lines);
    }

    fn render_config(&mut self, frame: &mut Frame) {
        let layout = Self::standard_layout(frame);
        let app = &*self.app;

        let config_path = config::config_file_path();
        let header_text = format!(
            "Config file: {}\nAdjust defaults used for practice sessions and the library.",
            config_path.display()
        );

        frame.render_widget(
            Paragraph::new(header_text)
                .block(Block::bordered().title(Self::header_title("Configuration")))
                .centered(),
            layout[0],
        );

        let items = vec![
            ListItem::new(format!(
                "Practice questions per chapter: {}",
                app.config_form.practice_question_count
            )),
            ListItem::new(format!(
                "Preferred exam: {}",
                app.config_form.preferred_exam.label()
            )),
            ListItem::new(format!(
                "Write debug log: {}",
                if app.config_form.write_debug_log {
                    "Enabled"
                } else {
                    "Disabled"
                }
            )),
        ];

        let mut state = ListState::default();
        state.select(Some(app.config_form.selected_index()));

        frame.render_stateful_widget(
            List::new(items)
                .block(Block::bordered().title(Line::from("Defaults")))
                .highlight_symbol("▶ ")
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            layout[1],
            &mut state,
        );

        let mut status_lines = vec![
            "↑/↓ or j/k choose field. ←/→ or h/l adjust the value.".to_string(),
            "Press s to save, r to reset, m to return to the menu.".to_string(),
        ];
        if app.config_form.dirty {
            status_lines.push("Unsaved changes".to_string());
        }
        if let Some(config_status) = &app.config_form.status {
            status_lines.push(config_status.clone());
        }
        self.render_status(frame, layout[2], status_lines);
    }
}
