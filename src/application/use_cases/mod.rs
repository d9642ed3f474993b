mod chat_exchange;
mod end_session;
mod evict_idle_sessions;
mod send_message;
mod session_history;
mod start_session;

pub use chat_exchange::*;
pub use end_session::*;
pub use evict_idle_sessions::*;
pub use send_message::*;
pub use session_history::*;
pub use start_session::*;
