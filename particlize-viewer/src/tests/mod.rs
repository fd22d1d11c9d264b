//! Lifecycle test suite for the scene session
//!
//! The session is exercised end to end against deterministic stand-ins
//! for its collaborators; no GPU or window is involved.

pub mod mocks;
