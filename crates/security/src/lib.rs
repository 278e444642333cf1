//! Request signing for idstore
//!
//! This crate provides:
//! - The `Request` model every outbound call is built as
//! - Canonical percent-encoding of paths and query strings
//! - The SAuthc1 signer binding a request to an API key, a timestamp and a
//!   single-use nonce

pub mod encoding;
pub mod request;
pub mod signer;

pub use encoding::{canonicalize_query_string, canonicalize_resource_path, encode_url};
pub use request::{Headers, HttpMethod, Request};
pub use signer::{Sauthc1Signer, AUTHORIZATION_HEADER, HOST_HEADER, STORMPATH_DATE_HEADER};
