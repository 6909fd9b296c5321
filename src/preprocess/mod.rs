pub mod image;

pub use self::image::{decode_image, image_to_grayscale_tensor, image_to_tensor};
