pub mod commands;
pub mod core;

pub use crate::commands::{parse_command, FinderSession, PageView, UserCommand};
pub use crate::core::config::FinderConfig;
pub use crate::core::widget::SearchWidget;
