use std::sync::Mutex;

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

/// Activate buffering. While the TUI owns the terminal, warnings are
/// stored here instead of being printed over the interface.
pub fn activate() {
    *BUFFER.lock().unwrap() = Some(Vec::new());
}

/// Deactivate buffering and return all collected messages, to be
/// flushed once the terminal is restored.
pub fn drain() -> Vec<String> {
    BUFFER.lock().unwrap().take().unwrap_or_default()
}

/// Write a warning message. If buffering is active the message is stored;
/// otherwise it is printed to stderr immediately.
pub fn warn(msg: String) {
    let mut guard = BUFFER.lock().unwrap();
    if let Some(buf) = guard.as_mut() {
        buf.push(msg);
    } else {
        drop(guard);
        eprintln!("{}", msg);
    }
}

/// Convenience macro that works like `eprintln!` but routes through the
/// stderr buffer when it is active.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the buffer is a process-wide static, and parallel
    // tests would race on it.
    #[test]
    fn test_buffer_lifecycle() {
        activate();
        warn("session file was stale".to_string());
        warn("autosave skipped".to_string());
        let messages = drain();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "session file was stale");

        // Drained and deactivated: nothing left.
        assert!(drain().is_empty());
    }
}
