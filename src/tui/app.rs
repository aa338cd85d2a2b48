use std::time::Instant;

use chrono::Local;

use crate::config::Config;
use crate::input::{parse_count_or_zero, parse_or_zero};
use crate::output::{self, ExportData, ExportFormat};
use crate::state::{reduce, Action, CalculatorState, Derived};
use crate::store::{self, KvStore};
use crate::tui::theme::Theme;

/// Which value the edit popup is capturing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    EntryName,
    EntryValue,
    EntryWeight,
    ExamWeight,
    ExamGrade,
    FutureCount,
    FuturePercent,
}

impl EditField {
    pub fn title(&self) -> &'static str {
        match self {
            EditField::EntryName => "Entry name",
            EditField::EntryValue => "Grade (10-70)",
            EditField::EntryWeight => "Weight (%)",
            EditField::ExamWeight => "Exam weight (%)",
            EditField::ExamGrade => "Exam grade",
            EditField::FutureCount => "Future evaluations",
            EditField::FuturePercent => "Future percent (%)",
        }
    }

    /// Text fields take anything printable; the rest are numeric.
    pub fn is_text(&self) -> bool {
        matches!(self, EditField::EntryName)
    }

    fn needs_selection(&self) -> bool {
        matches!(
            self,
            EditField::EntryName | EditField::EntryValue | EditField::EntryWeight
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing(EditField),
    Help,
}

pub struct App {
    pub state: CalculatorState,
    pub derived: Derived,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub edit_buffer: String,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub config: Config,
    pub theme: Theme,
    pub store: KvStore,
    pub autosave: bool,
    pub verbose: bool,
}

impl App {
    pub fn new(
        state: CalculatorState,
        config: Config,
        store: KvStore,
        theme: Theme,
        verbose: bool,
    ) -> Self {
        let derived = Derived::compute(&state);
        let mut table_state = ratatui::widgets::TableState::default();
        if !state.entries.is_empty() {
            table_state.select(Some(0));
        }
        let autosave = config.autosave();

        Self {
            state,
            derived,
            table_state,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            flash_message: None,
            should_quit: false,
            config,
            theme,
            store,
            autosave,
            verbose,
        }
    }

    /// Run an action through the reducer, recompute every derived value
    /// and autosave. The previous state is dropped; nothing displays
    /// stale numbers.
    pub fn dispatch(&mut self, action: Action) {
        self.state = reduce(&self.state, action);
        self.derived = Derived::compute(&self.state);

        if self.autosave {
            if let Err(e) = store::save_session(&mut self.store, &self.state) {
                self.show_flash(format!("Failed to save session: {}", e));
            }
        }
    }

    pub fn next_row(&mut self) {
        let len = self.state.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.state.entries.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_entry_id(&self) -> Option<u64> {
        self.table_state
            .selected()
            .and_then(|i| self.state.entries.get(i).map(|e| e.id))
    }

    pub fn add_entry(&mut self) {
        self.dispatch(Action::AddEntry);
        // Jump to the fresh entry so the next edit lands on it.
        self.table_state.select(Some(self.state.entries.len() - 1));
    }

    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected_entry_id() else {
            return;
        };
        self.dispatch(Action::RemoveEntry { id });
        self.clamp_selection();
        self.show_flash("Entry removed".to_string());
    }

    fn clamp_selection(&mut self) {
        let len = self.state.entries.len();
        if len == 0 {
            self.table_state.select(None);
        } else if let Some(selected) = self.table_state.selected() {
            if selected >= len {
                self.table_state.select(Some(len - 1));
            }
        }
    }

    /// Open the edit popup for a field. Name editing starts from the
    /// current text; numeric fields start blank.
    pub fn start_edit(&mut self, field: EditField) {
        if field.needs_selection() {
            let Some(id) = self.selected_entry_id() else {
                return;
            };
            if field == EditField::EntryName {
                if let Some(entry) = self.state.entries.iter().find(|e| e.id == id) {
                    self.edit_buffer = entry.name.clone();
                }
            } else {
                self.edit_buffer.clear();
            }
        } else {
            self.edit_buffer.clear();
        }
        self.input_mode = InputMode::Editing(field);
    }

    /// Commit the edit buffer. Raw text is coerced at this boundary and
    /// nowhere else; garbage reverts the field to blank (0).
    pub fn confirm_edit(&mut self) {
        let InputMode::Editing(field) = self.input_mode else {
            return;
        };
        let buffer = std::mem::take(&mut self.edit_buffer);

        match field {
            EditField::EntryName => {
                if let Some(id) = self.selected_entry_id() {
                    self.dispatch(Action::UpdateName { id, name: buffer });
                }
            }
            EditField::EntryValue => {
                if let Some(id) = self.selected_entry_id() {
                    let value = parse_or_zero(&buffer);
                    self.dispatch(Action::UpdateValue { id, value });
                }
            }
            EditField::EntryWeight => {
                if let Some(id) = self.selected_entry_id() {
                    let weight = parse_or_zero(&buffer);
                    self.dispatch(Action::UpdateWeight { id, weight });
                }
            }
            EditField::ExamWeight => {
                self.dispatch(Action::SetExamWeight(parse_or_zero(&buffer)));
            }
            EditField::ExamGrade => {
                self.dispatch(Action::SetExamGrade(parse_or_zero(&buffer)));
            }
            EditField::FutureCount => {
                self.dispatch(Action::SetFutureCount(parse_count_or_zero(&buffer)));
            }
            EditField::FuturePercent => {
                self.dispatch(Action::SetFuturePercent(parse_or_zero(&buffer)));
            }
        }

        self.input_mode = InputMode::Normal;
    }

    pub fn cancel_edit(&mut self) {
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
    }

    pub fn toggle_exam_mode(&mut self) {
        let turning_on = !self.state.exam_mode;
        self.dispatch(Action::SetExamMode(turning_on));
        if turning_on && self.state.exam_weight <= 0.0 {
            self.dispatch(Action::SetExamWeight(self.config.exam_weight()));
        }
        self.show_flash(if turning_on {
            "Exam mode on".to_string()
        } else {
            "Exam mode off".to_string()
        });
    }

    pub fn cycle_pass_grade(&mut self) {
        let next = self.state.next_pass_grade();
        self.dispatch(Action::SetPassGrade(next));
        self.show_flash(format!("Pass grade: {}", next));
    }

    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        if let Err(e) = store::save_theme(&mut self.store, self.theme.name()) {
            self.show_flash(format!("Failed to save theme: {}", e));
        } else {
            self.show_flash(format!("Theme: {}", self.theme.name()));
        }
    }

    /// Write a snapshot export next to wherever the app was launched.
    pub fn export(&mut self, format: ExportFormat) {
        let timestamp = Local::now();
        let data = ExportData::from_state(&self.state, &self.derived, timestamp);

        let rendered = match output::render_export(&data, format) {
            Ok(r) => r,
            Err(e) => {
                self.show_flash(format!("Export failed: {}", e));
                return;
            }
        };

        let filename = output::export_filename(format, timestamp);
        match std::fs::write(&filename, rendered) {
            Ok(()) => self.show_flash(format!("Exported: {}", filename)),
            Err(e) => self.show_flash(format!("Export failed: {}", e)),
        }
    }

    pub fn reset(&mut self) {
        self.dispatch(Action::Reset);
        self.table_state.select(Some(0));
        self.show_flash("Cleared. Starting fresh".to_string());
    }

    pub fn save_now(&mut self) {
        match store::save_session(&mut self.store, &self.state) {
            Ok(()) => self.show_flash("Session saved".to_string()),
            Err(e) => self.show_flash(format!("Failed to save session: {}", e)),
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn test_app(name: &str) -> App {
        let path: PathBuf = std::env::temp_dir().join(format!("promedia_app_{}.json", name));
        let _ = std::fs::remove_file(&path);
        let store = KvStore::load(&path).unwrap();
        App::new(
            CalculatorState::default(),
            Config::default(),
            store,
            Theme::Dark,
            false,
        )
    }

    #[test]
    fn test_dispatch_recomputes_derived() {
        let mut app = test_app("dispatch");
        let id = app.state.entries[0].id;
        app.dispatch(Action::UpdateValue { id, value: 50.0 });
        app.dispatch(Action::UpdateWeight { id, weight: 40.0 });
        assert_eq!(app.derived.current_average, 20.0);
    }

    #[test]
    fn test_add_entry_selects_it() {
        let mut app = test_app("add");
        app.add_entry();
        assert_eq!(app.state.entries.len(), 4);
        assert_eq!(app.table_state.selected(), Some(3));
    }

    #[test]
    fn test_remove_clamps_selection() {
        let mut app = test_app("remove");
        app.table_state.select(Some(2));
        app.remove_selected();
        app.remove_selected();
        app.remove_selected();
        assert!(app.state.entries.is_empty());
        assert_eq!(app.table_state.selected(), None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = test_app("nav");
        assert_eq!(app.table_state.selected(), Some(0));
        app.previous_row();
        assert_eq!(app.table_state.selected(), Some(2));
        app.next_row();
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_edit_flow_commits_value() {
        let mut app = test_app("edit");
        app.start_edit(EditField::EntryValue);
        assert_eq!(app.input_mode, InputMode::Editing(EditField::EntryValue));
        app.edit_buffer.push_str("62.5");
        app.confirm_edit();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state.entries[0].value, 62.5);
    }

    #[test]
    fn test_edit_garbage_reverts_to_blank() {
        let mut app = test_app("garbage");
        let id = app.state.entries[0].id;
        app.dispatch(Action::UpdateValue { id, value: 50.0 });
        app.start_edit(EditField::EntryValue);
        app.edit_buffer.push_str("fifty");
        app.confirm_edit();
        assert_eq!(app.state.entries[0].value, 0.0);
    }

    #[test]
    fn test_name_edit_prefills_buffer() {
        let mut app = test_app("prefill");
        let id = app.state.entries[0].id;
        app.dispatch(Action::UpdateName {
            id,
            name: "Lab".to_string(),
        });
        app.start_edit(EditField::EntryName);
        assert_eq!(app.edit_buffer, "Lab");
    }

    #[test]
    fn test_cancel_edit_discards_buffer() {
        let mut app = test_app("cancel");
        app.start_edit(EditField::ExamGrade);
        app.edit_buffer.push_str("44");
        app.cancel_edit();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state.exam_grade, 0.0);
    }

    #[test]
    fn test_cycle_pass_grade_flashes() {
        let mut app = test_app("pass");
        app.cycle_pass_grade();
        assert_eq!(app.state.pass_grade, 45.0);
        assert!(app.flash_message.is_some());
    }

    #[test]
    fn test_toggle_exam_mode() {
        let mut app = test_app("exam");
        app.toggle_exam_mode();
        assert!(app.state.exam_mode);
        app.toggle_exam_mode();
        assert!(!app.state.exam_mode);
    }
}
