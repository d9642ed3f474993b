use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::connector::adapter::ChatWebServer;

use super::super::Container;

pub struct ServeController<'a> {
    container: &'a Container,
}

impl<'a> ServeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn serve(&self, port: u16, public: bool) -> Result<String> {
        let addr = bind_address(port, public);
        info!(
            "Starting web chat surface (client: {}, model: {})",
            self.container.client_name(),
            self.container.client_config().model_id()
        );

        let server = ChatWebServer::new(Arc::new(self.container.clone()));
        server.serve(addr).await?;

        Ok("Server stopped.".to_string())
    }
}

fn bind_address(port: u16, public: bool) -> SocketAddr {
    let ip = if public {
        IpAddr::V4(Ipv4Addr::UNSPECIFIED)
    } else {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    };
    SocketAddr::new(ip, port)
}
