//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, Base64/hex codecs, secure randomness)
//! - Password hashing (Argon2id with zeroization)
//! - Cookie string building
//! - Injectable clock for deterministic expiry handling

pub mod clock;
pub mod cookie;
pub mod crypto;
pub mod password;
