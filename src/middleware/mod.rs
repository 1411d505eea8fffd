pub mod auth;

pub use auth::{identify, Identity};
