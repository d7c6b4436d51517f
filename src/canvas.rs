use crate::error::{Error, Result};

/// white, the background every render starts from
pub const WHITE: [u8; 3] = [255, 255, 255];

/// RGB8 pixel buffer, row-major, 3 bytes per pixel. starts out white.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>, // len = width * height * 3
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            rgb: vec![255; width as usize * height as usize * 3],
        }
    }

    /// wrap an existing RGB8 buffer. returns None if the length doesn't match the dimensions.
    pub fn from_rgb(width: u32, height: u32, rgb: Vec<u8>) -> Option<Self> {
        if rgb.len() != width as usize * height as usize * 3 {
            return None;
        }
        Some(Self { width, height, rgb })
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    pub fn clear(&mut self, color: [u8; 3]) {
        profiling::scope!("Canvas::clear");
        for px in self.rgb.chunks_exact_mut(3) {
            px.copy_from_slice(&color);
        }
    }

    /// out-of-range coordinates are ignored
    pub fn set_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = self.index(x as u32, y as u32);
        self.rgb[idx..idx + 3].copy_from_slice(&color);
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = self.index(x, y);
        [self.rgb[idx], self.rgb[idx + 1], self.rgb[idx + 2]]
    }

    #[inline]
    pub(crate) fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 3
    }
}

/// grayscale coverage template. each byte is alpha in 0..=255, read as value/255.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrushMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BrushMask {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || data.len() != width as usize * height as usize {
            return Err(Error::EmptyBrush { width, height });
        }
        Ok(Self { width, height, data })
    }

    /// a mask with every texel set to `value`
    pub fn filled(width: u32, height: u32, value: u8) -> Result<Self> {
        Self::new(width, height, vec![value; width as usize * height as usize])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// normalized alpha of one texel; coordinates are clamped to the mask edges
    #[inline]
    pub fn alpha_at(&self, x: i32, y: i32) -> f32 {
        let x = x.clamp(0, self.width as i32 - 1) as usize;
        let y = y.clamp(0, self.height as i32 - 1) as usize;
        self.data[y * self.width as usize + x] as f32 / 255.0
    }

    /// bilinear interpolation of the 4 texels around fractional coords (fu, fv)
    pub fn sample_bilinear(&self, fu: f32, fv: f32) -> f32 {
        let x0 = fu.floor() as i32;
        let y0 = fv.floor() as i32;
        let ax = fu - x0 as f32;
        let ay = fv - y0 as f32;

        let m00 = self.alpha_at(x0, y0);
        let m10 = self.alpha_at(x0 + 1, y0);
        let m01 = self.alpha_at(x0, y0 + 1);
        let m11 = self.alpha_at(x0 + 1, y0 + 1);

        (1.0 - ax) * (1.0 - ay) * m00
            + ax * (1.0 - ay) * m10
            + (1.0 - ax) * ay * m01
            + ax * ay * m11
    }
}

/// the fixed set of brush shapes a run can use. `brush_index` on a stroke indexes into this.
#[derive(Clone, Debug)]
pub struct BrushSet {
    brushes: Vec<BrushMask>,
}

impl BrushSet {
    pub fn new(brushes: Vec<BrushMask>) -> Result<Self> {
        if brushes.is_empty() {
            return Err(Error::NoBrushes);
        }
        Ok(Self { brushes })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.brushes.len()
    }

    // never true for a constructed set, kept for clippy's len_without_is_empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&BrushMask> {
        self.brushes.get(index)
    }
}
