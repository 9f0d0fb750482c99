//! Starchart data

pub mod drawing;

pub use drawing::{Drawing, DrawingContainer, DrawingKind};
