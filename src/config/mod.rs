pub mod database;
pub mod jwt;
pub mod rate_limit;
pub mod upload;
