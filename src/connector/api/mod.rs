pub mod container;
pub mod controller;
pub mod router;

pub use container::{Container, ContainerConfig, DEFAULT_SESSION_TTL_SECS};
pub use router::Router;
