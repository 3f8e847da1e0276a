//! Snapshot provider implementations

pub mod replay;

pub use replay::ReplayProvider;
