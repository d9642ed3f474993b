mod client_config;
mod completion_request;
mod conversation_session;
mod turn;

pub use client_config::*;
pub use completion_request::*;
pub use conversation_session::*;
pub use turn::*;
