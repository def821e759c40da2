pub mod decode;
pub mod dimensions;
pub mod encode;
pub mod orientation;
pub mod params;
pub mod resize;

pub use decode::decode_image;
pub use dimensions::{plan_dimensions, Dimensions, ResizePlan};
pub use encode::encode_surface;
pub use orientation::{apply_orientation, read_orientation, Orientation};
pub use params::{CompressionOptions, OutputFormat};
pub use resize::RasterSurface;
