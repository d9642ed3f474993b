use anyhow::Result;

use crate::Commands;

use super::container::Container;
use super::controller::{ChatController, ServeController};

pub struct Router<'a> {
    chat_controller: ChatController<'a>,
    serve_controller: ServeController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            chat_controller: ChatController::new(container),
            serve_controller: ServeController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Serve { port, public } => self.serve_controller.serve(port, public).await,
            Commands::Chat => self.chat_controller.chat().await,
        }
    }
}
