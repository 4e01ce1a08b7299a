pub mod password;
pub mod token;

pub use password::{HashCost, PasswordHasher};
pub use token::TokenIssuer;
