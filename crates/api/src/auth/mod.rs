//! Principal resolution.
//!
//! Token issuance (login, registration, password handling) lives outside
//! this service; the API only validates inbound HS256 access tokens and
//! extracts the trusted `user_id`. Handlers never parse credentials.

pub mod jwt;
