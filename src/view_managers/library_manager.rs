use super::{challenge_manager::ChallengeManager, practice_manager::PracticeManager};
use crate::{App, AppView, log_util::log_debug};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Depth of the library browser: subjects hold units hold chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LibraryLevel {
    Subjects,
    Units,
    Chapters,
}

pub(crate) struct LibraryManager<'a> {
    app: &'a mut App,
}

impl<'a> LibraryManager<'a> {
    pub(crate) fn new(app: &'a mut App) -> Self {
        Self { app }
    }

    pub(crate) fn show_library(app: &'a mut App) {
        if app.library_subjects.is_empty() {
            App::push_error(
                &mut app.error,
                "The course library is empty. Check the embedded catalog.".to_string(),
            );
            return;
        }
        app.view = AppView::Library;
        Self::new(app).clamp_cursors();
        log_debug("App: opened course library");
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Down | KeyCode::Char('j')) => self.select_next(),
            (KeyModifiers::NONE, KeyCode::Up | KeyCode::Char('k')) => self.select_previous(),
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Right | KeyCode::Char('l')) => {
                self.descend()
            }
            (KeyModifiers::NONE, KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h')) => {
                self.ascend()
            }
            (KeyModifiers::NONE, KeyCode::Char('c') | KeyCode::Char('C')) => {
                if let Some(subject_index) = self.selected_subject_index() {
                    ChallengeManager::start_for_subject(self.app, subject_index);
                }
            }
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.app.return_to_menu(),
            _ => {}
        }
    }

    /// Catalog index of the subject under the cursor.
    pub(crate) fn selected_subject_index(&self) -> Option<usize> {
        self.app
            .library_subjects
            .get(self.app.subject_cursor)
            .copied()
    }

    fn row_count(&self) -> usize {
        let Some(subject_index) = self.selected_subject_index() else {
            return 0;
        };
        let subject = &self.app.catalog.subjects[subject_index];
        match self.app.library_level {
            LibraryLevel::Subjects => self.app.library_subjects.len(),
            LibraryLevel::Units => subject.units.len(),
            LibraryLevel::Chapters => subject
                .units
                .get(self.app.unit_cursor)
                .map(|unit| unit.chapters.len())
                .unwrap_or(0),
        }
    }

    fn cursor_mut(&mut self) -> &mut usize {
        match self.app.library_level {
            LibraryLevel::Subjects => &mut self.app.subject_cursor,
            LibraryLevel::Units => &mut self.app.unit_cursor,
            LibraryLevel::Chapters => &mut self.app.chapter_cursor,
        }
    }

    fn select_next(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let cursor = self.cursor_mut();
        *cursor = (*cursor + 1) % count;
    }

    fn select_previous(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let cursor = self.cursor_mut();
        *cursor = if *cursor == 0 { count - 1 } else { *cursor - 1 };
    }

    fn descend(&mut self) {
        match self.app.library_level {
            LibraryLevel::Subjects => {
                if self.row_count() > 0 {
                    self.app.library_level = LibraryLevel::Units;
                    self.app.unit_cursor = 0;
                    self.app.chapter_cursor = 0;
                }
            }
            LibraryLevel::Units => {
                let Some(subject_index) = self.selected_subject_index() else {
                    return;
                };
                let has_chapters = self.app.catalog.subjects[subject_index]
                    .units
                    .get(self.app.unit_cursor)
                    .map(|unit| !unit.chapters.is_empty())
                    .unwrap_or(false);
                if has_chapters {
                    self.app.library_level = LibraryLevel::Chapters;
                    self.app.chapter_cursor = 0;
                }
            }
            LibraryLevel::Chapters => {
                let Some(subject_index) = self.selected_subject_index() else {
                    return;
                };
                let unit_index = self.app.unit_cursor;
                let chapter_index = self.app.chapter_cursor;
                PracticeManager::start_for_chapter(self.app, subject_index, unit_index, chapter_index);
            }
        }
    }

    fn ascend(&mut self) {
        match self.app.library_level {
            LibraryLevel::Subjects => self.app.return_to_menu(),
            LibraryLevel::Units => self.app.library_level = LibraryLevel::Subjects,
            LibraryLevel::Chapters => self.app.library_level = LibraryLevel::Units,
        }
    }

    fn clamp_cursors(&mut self) {
        if self.app.subject_cursor >= self.app.library_subjects.len() {
            self.app.subject_cursor = 0;
            self.app.library_level = LibraryLevel::Subjects;
        }
        let Some(subject_index) = self.selected_subject_index() else {
            return;
        };
        let subject = &self.app.catalog.subjects[subject_index];
        if self.app.unit_cursor >= subject.units.len() {
            self.app.unit_cursor = 0;
            if self.app.library_level == LibraryLevel::Chapters {
                self.app.library_level = LibraryLevel::Units;
            }
        }
        let chapter_count = subject
            .units
            .get(self.app.unit_cursor)
            .map(|unit| unit.chapters.len())
            .unwrap_or(0);
        if self.app.chapter_cursor >= chapter_count {
            self.app.chapter_cursor = 0;
        }
    }
}
