pub mod admin;
pub mod auth;
pub mod comment;
pub mod conversation;
pub mod item;

pub use auth::*;
