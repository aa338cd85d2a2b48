pub mod kv;
pub mod session;

pub use kv::{get_session_path, KvStore};
pub use session::{load_session, load_theme, save_session, save_theme};
