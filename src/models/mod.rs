pub mod image;
pub mod notification;
pub mod params;

pub use image::*;
pub use notification::*;
pub use params::*;
