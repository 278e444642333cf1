//! Domain types shared across the workspace

pub mod clock;
pub mod credentials;
pub mod graph;

pub use clock::{Clock, NonceGenerator, SystemClock, UuidNonceGenerator};
pub use credentials::ApiKey;
pub use graph::{href_of, is_cacheable, stub, ResourceGraph};
