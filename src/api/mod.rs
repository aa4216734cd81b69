pub mod adapter;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod gateway;

pub use client::ApiClient;
pub use endpoints::MasterKind;
pub use error::ApiError;
pub use gateway::{Outcome, WriteAck, interpret};
