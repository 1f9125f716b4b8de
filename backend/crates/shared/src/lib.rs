//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of vocabulary shared by the
//! linky backend crates:
//! - Common error types and result aliases
//! - Common primitive value objects (ID types, etc.)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
