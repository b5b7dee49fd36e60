//! Domain model for the task-tracking core.
//!
//! # Responsibility
//! - Define the canonical task record and its partial-update payload.
//! - Define the Eisenhower evaluation state and quadrant classification.
//!
//! # Invariants
//! - `completed` and `status` always agree on whether a task is done.
//! - Evaluation state distinguishes absent, valid, and undecodable
//!   payloads so aggregation can count them differently.

pub mod eisenhower;
pub mod task;
