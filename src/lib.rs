//! Bounded byte transcoders for an embedded HTTP server.
//!
//! Five independent functions move untrusted strings across trust
//! boundaries: [`html::encode`], [`url::encode`], [`url::decode`],
//! [`base64::encode`] and [`base64::decode`]. Each takes an input slice and a
//! caller-owned output slice, never allocates, never writes past the output
//! slice, and returns the number of bytes written or a [`common::Error`].
//!
//! Diagnostics go through the `log` facade; nothing is printed unless the
//! host application installs a logger.

pub mod base64;
pub mod common;
pub mod html;
pub mod url;

pub use common::{Error, OutBuf, Result, nul_terminate};
