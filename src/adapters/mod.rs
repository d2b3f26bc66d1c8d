//! Adapters - Concrete implementations of ports.

pub mod bunny;
pub mod http;
pub mod sqlite;
