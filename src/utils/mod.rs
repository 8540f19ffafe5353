//! Utility modules

pub mod embedded_assets;
