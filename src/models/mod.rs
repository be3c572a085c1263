pub mod common;
pub mod gemini;
pub mod image;
pub mod request;

pub use self::common::*;
pub use self::image::*;
pub use self::request::*;
