use serde::{Deserialize, Serialize};

/// Startup configuration.
///
/// Everything is optional; the calculator runs fine with no config file
/// at all. These are institution-level defaults applied when no saved
/// session exists.
///
/// Example YAML:
/// ```yaml
/// pass_grade: 40
/// exam_weight: 30
/// theme: dark
/// autosave: true
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minimum average required to pass (default: 40)
    #[serde(default)]
    pub pass_grade: Option<f64>,

    /// Default exam weight percentage when exam mode is switched on
    /// (default: 30)
    #[serde(default)]
    pub exam_weight: Option<f64>,

    /// Theme name: light, dark, ocean, forest or sunset.
    /// Unset means auto-detect from the terminal background.
    #[serde(default)]
    pub theme: Option<String>,

    /// Save the session after every change in the TUI (default: true)
    #[serde(default)]
    pub autosave: Option<bool>,
}

impl Config {
    pub fn pass_grade(&self) -> f64 {
        self.pass_grade.unwrap_or(40.0)
    }

    pub fn exam_weight(&self) -> f64 {
        self.exam_weight.unwrap_or(30.0)
    }

    pub fn autosave(&self) -> bool {
        self.autosave.unwrap_or(true)
    }
}
