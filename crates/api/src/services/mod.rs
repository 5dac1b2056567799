//! Application services: authentication primitives and outbound email.

pub mod auth;
pub mod email;
