use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::canvas::{BrushMask, BrushSet, Canvas};
use crate::error::{Error, Result};

/// decode any supported image and keep its 8-bit luma as the alpha template
pub fn load_brush_mask(path: &Path) -> Result<BrushMask> {
    profiling::scope!("load_brush_mask");
    let img = image::open(path).map_err(|source| load_error(path, source))?;
    let luma = img.to_luma8();
    let (w, h) = luma.dimensions();
    BrushMask::new(w, h, luma.into_raw())
}

/// load every brush in order; the order defines the stroke's brush index
pub fn load_brush_set<P: AsRef<Path>>(paths: &[P]) -> Result<BrushSet> {
    let masks = paths
        .iter()
        .map(|p| load_brush_mask(p.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    BrushSet::new(masks)
}

/// decode the target as RGB8; its size becomes the working resolution
pub fn load_target_image(path: &Path) -> Result<Canvas> {
    profiling::scope!("load_target_image");
    let img = image::open(path).map_err(|source| load_error(path, source))?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    Canvas::from_rgb(w, h, rgb.into_raw()).ok_or_else(|| Error::InvalidParameter {
        name: "target",
        value: format!("{w}x{h}"),
        expected: "an image decodable to 3 bytes per pixel",
    })
}

/// encode the canvas, format picked from the file extension
pub fn save_image(canvas: &Canvas, path: &Path) -> Result<()> {
    profiling::scope!("save_image");
    let img = RgbImage::from_raw(canvas.width, canvas.height, canvas.rgb.clone())
        .ok_or_else(|| Error::InvalidParameter {
            name: "canvas",
            value: format!("{}x{} with {} bytes", canvas.width, canvas.height, canvas.rgb.len()),
            expected: "width * height * 3 bytes",
        })?;
    img.save(path).map_err(|source| Error::Save { path: path.to_path_buf(), source })
}

fn load_error(path: &Path, source: image::ImageError) -> Error {
    Error::ResourceLoad { path: PathBuf::from(path), source }
}
