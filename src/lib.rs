//! Shelf application library
//!
//! Feature modules served by the `shelf-app` binary.

pub mod modules;

pub use modules::register_all;
