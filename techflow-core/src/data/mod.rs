pub mod post_repository;
pub mod store;
pub mod stores;
