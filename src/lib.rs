pub mod config;
pub mod error;
pub mod handler;
pub mod server;


pub use error::ProxyError;
pub use handler::{ProxyHandler, ProxyResponse};
pub type Result<T> = std::result::Result<T, ProxyError>;
