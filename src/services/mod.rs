pub mod auth;
pub mod bootstrap_admin;
pub mod comment;
pub mod conversation;
pub mod item;
pub mod upload;
