//! Image helpers
//!
//! Pixel dimensions for descriptors and fixed-size PNG thumbnails.

use std::io::Cursor;
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::ConnectorError;

/// Edge length of the square thumbnail canvas
pub const THUMBNAIL_SIZE: u32 = 64;

/// Extensions treated as images, compared case-sensitively
pub const IMAGE_EXTENSIONS: [&str; 4] = ["gif", "jpg", "jpeg", "png"];

pub fn is_image_name(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext))
}

/// Width and height of the image at `path`
pub fn image_dimensions(path: &Path, virtual_path: &str) -> Result<(u32, u32), ConnectorError> {
    image::image_dimensions(path).map_err(|e| ConnectorError::ImageReadError {
        path: virtual_path.to_string(),
        reason: e.to_string(),
    })
}

/// Scale the image to fit a `size`x`size` square, keeping its aspect ratio,
/// and centre it on a transparent canvas of exactly that size.
pub fn resize_pad(image: &DynamicImage, size: u32) -> RgbaImage {
    let scaled = image.resize(size, size, FilterType::Lanczos3).to_rgba8();
    let mut canvas = RgbaImage::new(size, size);
    let x = (size - scaled.width().min(size)) / 2;
    let y = (size - scaled.height().min(size)) / 2;
    imageops::overlay(&mut canvas, &scaled, i64::from(x), i64::from(y));
    canvas
}

/// Render the PNG thumbnail of the image at `path`
pub fn make_thumbnail(path: &Path, virtual_path: &str) -> Result<Vec<u8>, ConnectorError> {
    let read_error = |reason: String| ConnectorError::ImageReadError {
        path: virtual_path.to_string(),
        reason,
    };

    let source = image::open(path).map_err(|e| read_error(e.to_string()))?;
    let canvas = resize_pad(&source, THUMBNAIL_SIZE);

    let mut encoded = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut encoded), ImageFormat::Png)
        .map_err(|e| ConnectorError::OperationFailed(e.to_string()))?;
    Ok(encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};

    #[test]
    fn recognizes_image_extensions_case_sensitively() {
        assert!(is_image_name("cat.png"));
        assert!(is_image_name("photo.jpeg"));
        assert!(!is_image_name("cat.PNG"));
        assert!(!is_image_name("png"));
        assert!(!is_image_name("notes.txt"));
    }

    #[test]
    fn wide_image_is_padded_not_cropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(200, 50, Rgb([255, 0, 0])).save(&path).unwrap();

        let png = make_thumbnail(&path, "/wide.png").unwrap();
        let thumb = image::load_from_memory(&png).unwrap();
        assert_eq!(thumb.dimensions(), (THUMBNAIL_SIZE, THUMBNAIL_SIZE));

        // Top row is padding, middle row carries the image.
        assert_eq!(thumb.get_pixel(32, 0)[3], 0);
        assert_eq!(thumb.get_pixel(32, 32)[3], 255);
    }

    #[test]
    fn unreadable_image_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();

        assert!(matches!(
            make_thumbnail(&path, "/broken.png"),
            Err(ConnectorError::ImageReadError { .. })
        ));
        assert!(image_dimensions(&path, "/broken.png").is_err());
    }
}
