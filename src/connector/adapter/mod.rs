mod in_memory_session_repository;
mod mock_completion_client;
mod openai_compatible_client;
pub mod web;

pub use in_memory_session_repository::*;
pub use mock_completion_client::*;
pub use openai_compatible_client::*;
pub use web::ChatWebServer;
