mod completion_client;
mod session_repository;

pub use completion_client::*;
pub use session_repository::*;
