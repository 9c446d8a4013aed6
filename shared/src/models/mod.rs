//! Domain models for the Vertical Farm Platform

mod crop;
mod farm;
mod reading;

pub use crop::*;
pub use farm::*;
pub use reading::*;
