//! Shared types, errors, channels and seam traits

pub mod channels;
pub mod errors;
pub mod traits;
pub mod types;
