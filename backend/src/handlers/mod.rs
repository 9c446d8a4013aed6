//! HTTP handlers for the Vertical Farm Platform

pub mod crop;
pub mod farm;
pub mod health;

pub use crop::*;
pub use farm::*;
pub use health::*;
