//! Core engine for the TechFlow single-admin blog.
//!
//! Everything here is UI-agnostic: the domain model, the key-value
//! persistence layer with the post repository on top of it, the admin
//! session manager, and the Gemini draft client. The presentation layer
//! lives in `techflow-cli` and only ever goes through these modules.

pub mod ai;
pub mod application;
pub mod data;
pub mod domain;
pub mod infrastructure;
