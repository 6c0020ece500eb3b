pub mod buffer2;
pub mod file_format;
pub mod log_setup;
pub mod serde;

pub use buffer2::Buffer2;
pub use file_format::{FileExtensionError, SerdeFormat};
