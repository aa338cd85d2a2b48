pub mod derived;
pub mod types;

pub use derived::Derived;
pub use types::{reduce, Action, CalculatorState, PASS_GRADE_PRESETS};
