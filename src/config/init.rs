use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{ensure_config_dir, get_config_path, Config};
use crate::state::PASS_GRADE_PRESETS;
use crate::tui::Theme;

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise writes to the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    let config_path = default_path.unwrap_or_else(get_config_path);

    println!();
    println!("promedia configuration");
    println!("======================");
    println!();

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!("{} already exists. Overwrite?", config_path.display()),
            false,
        )?;
        if !overwrite {
            println!("Keeping the existing config.");
            return Ok(());
        }
    }

    // Pass grade
    println!("The pass grade is the minimum average required to pass a course.");
    println!("Common values: 40, 45, 50, 55, 60.");
    let pass_grade: f64 = loop {
        let input = prompt_with_default("Pass grade", "40")?;
        match input.parse::<f64>() {
            Ok(v) if (0.0..=100.0).contains(&v) => break v,
            Ok(_) => println!("  Invalid: must be between 0 and 100. Try again."),
            Err(_) => println!("  Invalid: must be a number. Try again."),
        }
    };
    if !PASS_GRADE_PRESETS.contains(&pass_grade) {
        println!("  Note: {} is not one of the quick-cycle presets in the TUI.", pass_grade);
    }

    // Default exam weight
    println!();
    println!("When exam mode is switched on, the exam starts at this weight.");
    let exam_weight: f64 = loop {
        let input = prompt_with_default("Default exam weight (%)", "30")?;
        match input.parse::<f64>() {
            Ok(v) if (1.0..=100.0).contains(&v) => break v,
            Ok(_) => println!("  Invalid: must be between 1 and 100. Try again."),
            Err(_) => println!("  Invalid: must be a number. Try again."),
        }
    };

    // Theme
    println!();
    println!("Themes: light, dark, ocean, forest, sunset. Leave empty to auto-detect.");
    let theme: Option<String> = loop {
        let input = prompt("Theme []: ")?;
        if input.is_empty() {
            break None;
        }
        match Theme::from_name(&input) {
            Some(_) => break Some(input),
            None => println!("  Unknown theme '{}'. Try again.", input),
        }
    };

    let autosave = prompt_yes_no("Autosave the session after every change?", true)?;

    let config = Config {
        pass_grade: Some(pass_grade),
        exam_weight: Some(exam_weight),
        theme,
        autosave: Some(autosave),
    };

    let yaml = serde_saphyr::to_string(&config).context("Failed to serialize config")?;

    ensure_config_dir()?;
    std::fs::write(&config_path, yaml)
        .with_context(|| format!("Failed to write config to {}", config_path.display()))?;

    println!();
    println!("Config written to {}", config_path.display());
    Ok(())
}
