//! Texture normalization - rescale to the cell width, then crop to a square

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Rescale `image` so its width is exactly `width`, keeping the aspect ratio.
///
/// The new height is rounded to the nearest pixel and never drops below 1.
/// Images that already have the target width are returned untouched.
pub fn rescale_to_width(image: RgbaImage, width: u32, filter: FilterType) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w == width || w == 0 {
        return image;
    }

    let height = ((h as f64) * (width as f64) / (w as f64)).round().max(1.0) as u32;
    imageops::resize(&image, width, height, filter)
}

/// Crop `image` to a `width × width` square anchored at the top-left corner.
///
/// Tall images (animation strips) keep their first frame. Images shorter than
/// they are wide are extended with transparent rows at the bottom.
pub fn crop_square(image: RgbaImage) -> RgbaImage {
    let (w, h) = image.dimensions();
    if w == h {
        return image;
    }

    if h > w {
        return imageops::crop_imm(&image, 0, 0, w, w).to_image();
    }

    let mut square = RgbaImage::from_pixel(w, w, Rgba([0, 0, 0, 0]));
    imageops::replace(&mut square, &image, 0, 0);
    square
}

/// Bring an arbitrary texture to a `cell_size × cell_size` cell image.
pub fn normalize(image: RgbaImage, cell_size: u32, filter: FilterType) -> RgbaImage {
    crop_square(rescale_to_width(image, cell_size, filter))
}
