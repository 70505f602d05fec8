pub mod application;
pub mod resume;
pub mod user;
