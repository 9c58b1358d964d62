pub mod actions;
pub mod events;
mod persistence;
mod prompts;
mod session_store;
mod suggestions;

pub use persistence::*;
pub use prompts::*;
pub use session_store::*;
pub use suggestions::*;
