pub mod auth;
pub mod question;
pub mod token;
pub mod user;
