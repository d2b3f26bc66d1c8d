//! Domain layer - Video records, provider documents and status rules.

pub mod remote;
pub mod video;
