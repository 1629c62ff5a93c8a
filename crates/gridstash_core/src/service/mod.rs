//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Normalize user input before it reaches storage.
//! - Drive placement commits from the workflow state machine.

pub mod drawer_service;
pub mod item_service;
