pub mod config;
pub mod demo;
pub mod dictionary;
pub mod error;
pub mod gateway;
pub mod persistence;
pub mod server;

pub use dictionary::Dictionary;
pub use error::{GatewayError, PersistError, ServerError};
pub use gateway::{AddRequest, Entry, Gateway};
pub use persistence::Snapshot;
