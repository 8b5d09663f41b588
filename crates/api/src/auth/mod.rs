//! Session-token management.
//!
//! Identity itself comes from the wallet provider in the client; the server
//! only receives an email + display name and issues its own expiring
//! credentials against the provisioned user row.

pub mod jwt;
