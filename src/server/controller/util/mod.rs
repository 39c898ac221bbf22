//! Helpers shared by the controllers: session lookup, body extraction and
//! response envelopes.

pub mod get_user;
pub mod json;
pub mod response;
