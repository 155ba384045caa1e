//! Pixgrid - numbered pixel-grid art from photos
//!
//! Shrinks an image to a small grid, maps every cell onto an editable
//! palette and draws the result as spaced squares with row and column
//! numbers. This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
