pub mod config;
pub mod discover;
pub mod inject;
pub mod mover;
pub mod report;
pub mod runtime;
pub mod wrappers;
