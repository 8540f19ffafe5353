//! iconforge
pub mod core;
pub mod data;
pub mod font;
pub mod geometry;
pub mod logging;
pub mod pipeline;
pub mod render;
#[cfg(test)]
mod tests;
pub mod utils;
