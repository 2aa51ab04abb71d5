pub mod cookie;
pub mod jwt;
pub mod markdown;
pub mod password;

pub use jwt::encode_token;
pub use markdown::render_markdown;
pub use password::{hash_password, verify_password};
