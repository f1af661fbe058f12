//! Utility functions for payload and image handling.

pub mod image;

pub use image::{decode_payload, dynamic_to_gray};
