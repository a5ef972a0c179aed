//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the independent stores into view-layer operations.
//! - Keep cascading behavior out of the stores themselves.

pub mod project_service;
