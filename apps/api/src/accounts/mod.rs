// Credential Store: user records, salted password hashes, login checks.

pub mod handlers;
pub mod password;
pub mod store;
