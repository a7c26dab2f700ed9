pub mod dashboard;
pub mod error;
pub mod post;
pub mod session;
