//! Typed wrappers over values stored in the tower-sessions session.

pub mod user;
