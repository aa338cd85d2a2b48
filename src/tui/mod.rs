pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::output::ExportFormat;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250); // 250ms tick

    if app.verbose {
        let msg = format!("Session: {}", app.store.path().display());
        app.show_flash(msg);
    }

    // Main loop
    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break;
        }
    }

    // The session survives a quit even with autosave off.
    let final_save = crate::store::save_session(&mut app.store, &app.state);

    // Restore terminal
    ratatui::restore();

    if let Err(e) = final_save {
        eprintln!("Failed to save session on exit: {}", e);
    }

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.should_quit = true
                }

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Entry management
                KeyCode::Char('a') => app.add_entry(),
                KeyCode::Char('d') => app.remove_selected(),

                // Entry field editors
                KeyCode::Char('n') => app.start_edit(app::EditField::EntryName),
                KeyCode::Char('g') | KeyCode::Enter => app.start_edit(app::EditField::EntryValue),
                KeyCode::Char('w') => app.start_edit(app::EditField::EntryWeight),

                // Exam controls
                KeyCode::Char('e') => app.toggle_exam_mode(),
                KeyCode::Char('E') => app.start_edit(app::EditField::ExamWeight),
                KeyCode::Char('x') => app.start_edit(app::EditField::ExamGrade),

                // Pass grade presets
                KeyCode::Char('p') => app.cycle_pass_grade(),

                // Future simulation knobs
                KeyCode::Char('f') => app.start_edit(app::EditField::FutureCount),
                KeyCode::Char('F') => app.start_edit(app::EditField::FuturePercent),

                // Theme
                KeyCode::Char('t') => app.cycle_theme(),

                // Export
                KeyCode::Char('1') => app.export(ExportFormat::Csv),
                KeyCode::Char('2') => app.export(ExportFormat::Json),
                KeyCode::Char('3') => app.export(ExportFormat::Txt),

                // Session
                KeyCode::Char('s') => app.save_now(),
                KeyCode::Char('R') => app.reset(),

                // Help
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::Editing(field) => {
            match key.code {
                KeyCode::Enter => app.confirm_edit(),
                KeyCode::Esc => app.cancel_edit(),
                KeyCode::Backspace => {
                    app.edit_buffer.pop();
                }

                // Text fields take anything printable, numeric fields
                // only what could be part of a number. Everything else
                // is swallowed so Normal-mode keys don't fire.
                KeyCode::Char(c) if field.is_text() && !c.is_control() => {
                    app.edit_buffer.push(c);
                }
                KeyCode::Char(c) if !field.is_text() && (c.is_ascii_digit() || c == '.' || c == '-') => {
                    app.edit_buffer.push(c);
                }

                _ => {}
            }
        }
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
