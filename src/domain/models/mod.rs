mod action;
mod backend;
mod context;
mod event;
mod message;
mod session;
mod slash_commands;
mod storage;
mod suggestion;

pub use action::*;
pub use backend::*;
pub use context::*;
pub use event::*;
pub use message::*;
pub use session::*;
pub use slash_commands::*;
pub use storage::*;
pub use suggestion::*;
