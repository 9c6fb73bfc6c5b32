pub mod mailer;
pub mod password;
pub mod token;

pub use mailer::Mailer;
pub use token::{Claims, TokenKeys};
