mod init;
mod schema;

pub use init::run_init_wizard;
pub use schema::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/promedia/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Could not determine home directory");
    home.join(".config").join("promedia")
}

/// Get the default config file path (~/.config/promedia/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Ensure the config directory exists
pub fn ensure_config_dir() -> Result<()> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir).with_context(|| {
            format!(
                "Failed to create config directory at {}",
                config_dir.display()
            )
        })?;
    }
    Ok(())
}

/// Load configuration from a YAML file.
///
/// A missing file is not an error: the calculator runs on built-in
/// defaults. An explicitly passed path that does not exist IS an error,
/// since the user asked for that specific file.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let (config_path, explicit) = match path {
        Some(p) => (p, true),
        None => (get_config_path(), false),
    };

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(pass) = config.pass_grade {
        if !(0.0..=100.0).contains(&pass) {
            errors.push(format!(
                "pass_grade: must be between 0 and 100, got {}",
                pass
            ));
        }
    }

    if let Some(weight) = config.exam_weight {
        if !(1.0..=100.0).contains(&weight) {
            errors.push(format!(
                "exam_weight: must be between 1 and 100, got {}",
                weight
            ));
        }
    }

    if let Some(ref theme) = config.theme {
        if crate::tui::Theme::from_name(theme).is_none() {
            errors.push(format!(
                "theme: unknown theme '{}' (expected light, dark, ocean, forest or sunset)",
                theme
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_pass_grade_out_of_range() {
        let config = Config {
            pass_grade: Some(120.0),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("pass_grade"));
    }

    #[test]
    fn test_exam_weight_zero_rejected() {
        let config = Config {
            exam_weight: Some(0.0),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("exam_weight"));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let config = Config {
            theme: Some("solarized".to_string()),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("theme"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            pass_grade: Some(-5.0),
            exam_weight: Some(150.0),
            theme: Some("neon".to_string()),
            autosave: None,
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }
}
