pub mod question;
pub mod token;
pub mod user;

pub use question::PostgresQuestionRepository;
pub use token::PostgresTokenRepository;
pub use user::PostgresUserRepository;
