//! Remote data gateway for Roster.
//!
//! [`HttpStore`] speaks the `/users` REST contract; [`Gateway`] layers the
//! process-wide, invalidate-on-mutation cache over any
//! [`roster_core::store::ContactStore`].

pub mod gateway;
pub mod http;

pub use gateway::{Gateway, Snapshot};
pub use http::{ApiConfig, HttpStore};

#[cfg(test)]
mod tests;
