//! Business logic services for the Vertical Farm Platform

pub mod crop;
pub mod farm;

pub use crop::CropCatalog;
pub use farm::FarmService;
