use anyhow::Result;

use crate::buffered_eprintln;
use crate::engine::GradeEntry;
use crate::state::CalculatorState;

use super::kv::KvStore;

/// Bumped when the persisted layout changes shape.
const SESSION_VERSION: u32 = 1;

const KEY_VERSION: &str = "version";
const KEY_ENTRIES: &str = "entries";
const KEY_EXAM_MODE: &str = "exam_mode";
const KEY_EXAM_WEIGHT: &str = "exam_weight";
const KEY_EXAM_GRADE: &str = "exam_grade";
const KEY_PASS_GRADE: &str = "pass_grade";
const KEY_FUTURE_COUNT: &str = "future_count";
const KEY_FUTURE_PERCENT: &str = "future_percent";
const KEY_THEME: &str = "theme";

/// Rebuild the calculator state from the session store, one key per
/// knob. Any missing or broken key silently takes its default; an
/// unknown session version discards the whole document (with a warning)
/// rather than guessing at its layout.
pub fn load_session(store: &KvStore) -> CalculatorState {
    let version = store.get(KEY_VERSION, SESSION_VERSION);
    if version != SESSION_VERSION {
        buffered_eprintln!(
            "Ignoring saved session with unsupported version {} (expected {})",
            version,
            SESSION_VERSION
        );
        return CalculatorState::default();
    }

    let defaults = CalculatorState::default();
    let entries: Vec<GradeEntry> = store.get(KEY_ENTRIES, defaults.entries.clone());

    CalculatorState::from_parts(
        entries,
        store.get(KEY_EXAM_MODE, defaults.exam_mode),
        store.get(KEY_EXAM_WEIGHT, defaults.exam_weight),
        store.get(KEY_EXAM_GRADE, defaults.exam_grade),
        store.get(KEY_PASS_GRADE, defaults.pass_grade),
        store.get(KEY_FUTURE_COUNT, defaults.future_count),
        store.get(KEY_FUTURE_PERCENT, defaults.future_percent),
    )
}

/// Stage every knob and flush the document to disk atomically.
pub fn save_session(store: &mut KvStore, state: &CalculatorState) -> Result<()> {
    store.set(KEY_VERSION, &SESSION_VERSION)?;
    store.set(KEY_ENTRIES, &state.entries)?;
    store.set(KEY_EXAM_MODE, &state.exam_mode)?;
    store.set(KEY_EXAM_WEIGHT, &state.exam_weight)?;
    store.set(KEY_EXAM_GRADE, &state.exam_grade)?;
    store.set(KEY_PASS_GRADE, &state.pass_grade)?;
    store.set(KEY_FUTURE_COUNT, &state.future_count)?;
    store.set(KEY_FUTURE_PERCENT, &state.future_percent)?;
    store.persist()
}

/// Theme preference rides in the same document under its own key.
pub fn load_theme(store: &KvStore) -> Option<String> {
    store.get(KEY_THEME, None)
}

pub fn save_theme(store: &mut KvStore, theme: &str) -> Result<()> {
    store.set(KEY_THEME, &theme)?;
    store.persist()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{reduce, Action};
    use std::env;
    use std::path::PathBuf;

    fn temp_store(name: &str) -> KvStore {
        let path: PathBuf = env::temp_dir().join(format!("promedia_session_{}.json", name));
        let _ = std::fs::remove_file(&path);
        KvStore::load(&path).unwrap()
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let store = temp_store("defaults");
        assert_eq!(load_session(&store), CalculatorState::default());
    }

    #[test]
    fn test_session_roundtrip() {
        let mut store = temp_store("roundtrip");

        let state = CalculatorState::default();
        let id = state.entries[0].id;
        let state = reduce(&state, Action::UpdateValue { id, value: 62.0 });
        let state = reduce(&state, Action::UpdateWeight { id, weight: 35.0 });
        let state = reduce(&state, Action::SetExamMode(true));
        let state = reduce(&state, Action::SetPassGrade(50.0));

        save_session(&mut store, &state).unwrap();

        let reloaded = KvStore::load(store.path()).unwrap();
        let loaded = load_session(&reloaded);
        assert_eq!(loaded.entries, state.entries);
        assert!(loaded.exam_mode);
        assert_eq!(loaded.pass_grade, 50.0);

        let _ = std::fs::remove_file(store.path());
    }

    #[test]
    fn test_unknown_version_falls_back_to_defaults() {
        let mut store = temp_store("version");
        store.set("version", &99_u32).unwrap();
        store.set("pass_grade", &60.0_f64).unwrap();

        let loaded = load_session(&store);
        assert_eq!(loaded, CalculatorState::default());
    }

    #[test]
    fn test_theme_roundtrip() {
        let mut store = temp_store("theme");
        assert_eq!(load_theme(&store), None);

        save_theme(&mut store, "ocean").unwrap();
        let reloaded = KvStore::load(store.path()).unwrap();
        assert_eq!(load_theme(&reloaded), Some("ocean".to_string()));

        let _ = std::fs::remove_file(store.path());
    }
}
