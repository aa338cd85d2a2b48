use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::engine::{self, ValidationState};
use crate::tui::app::{App, EditField, InputMode};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 14 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    let colors = app.theme.colors();

    // Layout: Title(1) + Table(fill) + Weight bar(1) + Results(8) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app, &colors);
    render_table(frame, chunks[1], app, &colors);
    render_weight_bar(frame, chunks[2], app, &colors);
    render_results(frame, chunks[3], app, &colors);
    render_status_bar(frame, chunks[4], app, &colors);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::Editing(field) => render_edit_popup(frame, app, field, &colors),
        InputMode::Help => render_help_popup(frame, &colors),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App, colors: &ThemeColors) {
    let mut spans = vec![Span::styled(
        "promedia",
        Style::default().fg(colors.title_color).bold(),
    )];

    // Theme name on the right
    let theme_text = format!("theme: {}", app.theme.name());
    let left_len = "promedia".len();
    let padding_len = (area.width as usize).saturating_sub(left_len + theme_text.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(theme_text, Style::default().fg(colors.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App, colors: &ThemeColors) {
    if app.state.entries.is_empty() {
        let empty_msg = Paragraph::new("No entries. Press 'a' to add one.")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    let available = app.derived.available_weight;

    let rows: Vec<Row> = app
        .state
        .entries
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let index = format!("{}.", idx + 1);
            let validation = engine::entry_validation(entry, available);
            let marker = match validation {
                ValidationState::Valid => "ok",
                ValidationState::Invalid => "!!",
                ValidationState::Warning => "..",
                ValidationState::Neutral => "",
            };

            let name = if entry.name.is_empty() {
                Span::styled("Unnamed", Style::default().fg(colors.muted))
            } else {
                Span::raw(entry.name.clone())
            };

            let value = if entry.value > 0.0 {
                format!("{}", entry.value)
            } else {
                "-".to_string()
            };
            let weight = if entry.weight > 0.0 {
                format!("{}%", entry.weight)
            } else {
                "-".to_string()
            };
            let contribution = if entry.is_filled() {
                format!("{:.2}", entry.contribution())
            } else {
                String::new()
            };

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(colors.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(index).style(Style::default().fg(colors.index_color)),
                Cell::from(name),
                Cell::from(value),
                Cell::from(weight),
                Cell::from(contribution),
                Cell::from(marker).style(Style::default().fg(colors.validation_color(validation))),
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Index: "99."
        Constraint::Fill(1),    // Name
        Constraint::Length(7),  // Grade
        Constraint::Length(8),  // Weight
        Constraint::Length(8),  // Contribution
        Constraint::Length(3),  // Validation marker
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["#", "Name", "Grade", "Weight", "Points", ""])
                .style(colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

/// One-line weight usage bar: how much of the available percentage the
/// entries currently occupy. Overflow renders in the error color.
fn render_weight_bar(frame: &mut Frame, area: Rect, app: &App, colors: &ThemeColors) {
    let total = app.derived.total_weight;
    let limit = if app.state.exam_mode {
        app.derived.available_weight
    } else {
        100.0
    };

    let label = if app.state.exam_mode {
        format!(" {}% of {}% (exam takes {}%)", total, limit, app.state.exam_weight)
    } else {
        format!(" {}% of {}%", total, limit)
    };

    let bar_width = (area.width as usize).saturating_sub(label.len() + 1).min(40);
    let over = limit > 0.0 && total > limit;
    let ratio = if limit > 0.0 {
        (total / limit).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * bar_width as f64).round() as usize;
    let empty = bar_width.saturating_sub(filled);

    let bar_color = if over { colors.bar_over } else { colors.bar_filled };

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled(
            "█".repeat(filled),
            Style::default().fg(bar_color),
        ));
    }
    if empty > 0 {
        spans.push(Span::styled(
            "░".repeat(empty),
            Style::default().fg(colors.bar_empty),
        ));
    }
    let state = engine::total_weight_validation(total, app.state.exam_mode, app.derived.available_weight);
    spans.push(Span::styled(
        label,
        Style::default().fg(colors.validation_color(state)),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App, colors: &ThemeColors) {
    let state = &app.state;
    let derived = &app.derived;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Current average   ", Style::default().fg(colors.muted)),
        Span::styled(
            format!("{:.2}", derived.current_average),
            Style::default()
                .fg(colors.grade_color(derived.current_average, state.pass_grade))
                .bold(),
        ),
    ]));

    if state.exam_mode {
        let passed = derived.passed(state.pass_grade);
        lines.push(Line::from(vec![
            Span::styled("Final average     ", Style::default().fg(colors.muted)),
            Span::styled(
                format!("{:.2}", derived.final_average),
                Style::default()
                    .fg(colors.grade_color(derived.final_average, state.pass_grade))
                    .bold(),
            ),
            Span::raw("  "),
            if state.exam_grade > 0.0 {
                Span::styled(
                    if passed { "PASSED" } else { "FAILED" },
                    Style::default()
                        .fg(if passed {
                            colors.pass_color
                        } else {
                            colors.fail_color
                        })
                        .bold(),
                )
            } else {
                Span::styled("exam grade pending", Style::default().fg(colors.muted))
            },
        ]));
        lines.push(Line::from(vec![
            Span::styled("Needed on exam    ", Style::default().fg(colors.muted)),
            Span::styled(
                format!("{:.1}", derived.needed_exam_grade),
                Style::default().fg(if derived.needed_exam_grade <= engine::GRADE_MAX {
                    colors.pass_color
                } else {
                    colors.fail_color
                }),
            ),
            Span::styled(
                format!("  (exam {}% of the total)", state.exam_weight),
                Style::default().fg(colors.muted),
            ),
        ]));
    }

    if derived.projected.remaining_percent > 0.0 {
        lines.push(Line::from(vec![
            Span::styled("Projected average ", Style::default().fg(colors.muted)),
            Span::raw(format!("{:.2}", derived.projected.average)),
            Span::styled(
                format!(
                    "  ({}% unentered at the minimum)",
                    derived.projected.remaining_percent
                ),
                Style::default().fg(colors.muted),
            ),
        ]));
    }

    lines.push(Line::from(vec![
        Span::styled("Recovery          ", Style::default().fg(colors.muted)),
        Span::styled(
            derived.recovery.message.clone(),
            Style::default().fg(if derived.recovery.feasible {
                colors.pass_color
            } else {
                colors.fail_color
            }),
        ),
    ]));

    match &derived.simulation {
        Some(sim) => {
            lines.push(Line::from(vec![
                Span::styled("Simulation        ", Style::default().fg(colors.muted)),
                Span::styled(
                    format!(
                        "need {:.1} across {} evaluation(s) worth {}%",
                        sim.needed_grade, state.future_count, state.future_percent
                    ),
                    Style::default().fg(if sim.feasible {
                        colors.pass_color
                    } else {
                        colors.fail_color
                    }),
                ),
            ]));
        }
        None if state.future_count > 0 || state.future_percent > 0.0 => {
            // Knobs set but nothing to show: the request exceeds what is
            // left.
            lines.push(Line::from(vec![
                Span::styled("Simulation        ", Style::default().fg(colors.muted)),
                Span::styled(
                    "not possible with the remaining percentage",
                    Style::default().fg(colors.warning),
                ),
            ]));
        }
        None => {}
    }

    lines.push(Line::from(Span::styled(
        format!("Pass grade {}  |  scale 10-70", state.pass_grade),
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, colors: &ThemeColors) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Export failed") {
            colors.flash_error
        } else {
            colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: Vec<(&str, &str)> = vec![
            ("j/k", ":nav "),
            ("a/d", ":add/del "),
            ("n/g/w", ":edit "),
            ("e", ":exam "),
            ("p", ":pass "),
            ("f/F", ":simulate "),
            ("1/2/3", ":export "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = Vec::new();
        for (key, label) in hints {
            spans.push(Span::styled(key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Render the field edit popup
fn render_edit_popup(frame: &mut Frame, app: &App, field: EditField, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(40, 5, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(field.title())
        .border_style(Style::default().fg(colors.popup_border))
        .title_style(colors.popup_title);
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Input line
        Constraint::Length(1), // Help text
    ])
    .split(inner);

    let input_text = format!("{}|", app.edit_buffer);
    frame.render_widget(Paragraph::new(input_text), chunks[0]);

    let hint = if field.is_text() {
        "Enter: confirm | Esc: cancel".to_string()
    } else if matches!(field, EditField::EntryValue | EditField::ExamGrade) {
        engine::validation::grade_range_message()
    } else {
        "Enter: confirm | Esc: cancel | empty = blank".to_string()
    };
    frame.render_widget(
        Paragraph::new(hint).style(Style::default().fg(colors.muted)),
        chunks[1],
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(52, 20, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .border_style(Style::default().fg(colors.popup_border));
    frame.render_widget(block.clone(), popup_area);

    let inner = block.inner(popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entries: Vec<(&str, &str)> = vec![
        ("j / Down      ", "Move down"),
        ("k / Up        ", "Move up"),
        ("a             ", "Add entry"),
        ("d             ", "Delete entry"),
        ("n             ", "Edit entry name"),
        ("g             ", "Edit entry grade"),
        ("w             ", "Edit entry weight"),
        ("e             ", "Toggle exam mode"),
        ("E             ", "Edit exam weight"),
        ("x             ", "Edit exam grade"),
        ("p             ", "Cycle pass grade"),
        ("f             ", "Edit future evaluation count"),
        ("F             ", "Edit future percent"),
        ("t             ", "Cycle theme"),
        ("1 / 2 / 3     ", "Export CSV / JSON / TXT"),
        ("s             ", "Save session"),
        ("R             ", "Reset everything"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .into_iter()
        .map(|(key, label)| Line::from(vec![Span::styled(key, key_style), Span::raw(label)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
