//! Bunny Stream adapter for the `VideoProvider` port.

mod client;

pub use client::BunnyClient;
