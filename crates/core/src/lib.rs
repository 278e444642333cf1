//! Core domain types, errors, and constants for `idstore`.
//!
//! Every other crate in the workspace builds on the pieces defined here:
//!
//! - **`errors`**: the `Error` enum and `Result` alias shared by the signer,
//!   the cache and the data store, including the structured `ProtocolError`
//!   decoded from non-2xx responses.
//! - **`types`**: resource graph helpers, the `ApiKey` credential and the
//!   injectable `Clock`/`NonceGenerator` seams.
//! - **`constants`**: property names, header names and environment variables.
//! - **`testing`**: deterministic clock and nonce implementations for tests.

pub mod constants;
pub mod errors;
pub mod testing;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, ProtocolError, Result},
    types::*,
};
