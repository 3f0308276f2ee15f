//! Image intake stages that run before the classifier:
//! - **validate**: existence, size and signature checks
//! - **decode**: load and decode images from various formats
//! - **timeout**: blocking stages bounded by a deadline

pub mod decode;
pub(crate) mod timeout;
pub mod validate;

pub use decode::{decode_file, DecodedImage, ImageDecoder};
pub use validate::Validator;

pub(crate) use timeout::run_blocking;
