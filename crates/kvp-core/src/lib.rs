pub mod config;
pub mod error;
pub mod export;
pub mod io;
pub mod paths;
pub mod phase;
pub mod progress;
pub mod project;
pub mod role;
pub mod session;
pub mod store;
pub mod task;
pub mod types;

pub use error::{KvpError, Result};
