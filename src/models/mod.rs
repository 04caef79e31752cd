//! Data models for customer-service entities

mod message;
mod staff;

pub use message::*;
pub use staff::*;
