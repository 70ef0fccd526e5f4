use image::{
    imageops::{self, FilterType},
    DynamicImage, GrayImage, Luma,
};

use crate::regions::Rect;

/// Tuning for the grayscale → upscale → sharpen pass run before OCR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessParams {
    pub scale: f32,
    pub sharpen_amount: f32,
    pub sharpen_sigma: f32,
    pub confidence_threshold: f32,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            scale: 2.0,
            sharpen_amount: 1.2,
            sharpen_sigma: 1.0,
            confidence_threshold: 0.3,
        }
    }
}

pub fn upscale_gray(img: &DynamicImage, scale: f32) -> GrayImage {
    let gray = img.to_luma8();
    if scale == 1.0 {
        return gray;
    }
    let (w, h) = gray.dimensions();
    let w = ((w as f32 * scale).round() as u32).max(1);
    let h = ((h as f32 * scale).round() as u32).max(1);
    imageops::resize(&gray, w, h, FilterType::CatmullRom)
}

/// `(1 + amount) * pixel - amount * blurred`, clamped to the u8 range.
pub fn unsharp_mask(img: &GrayImage, amount: f32, sigma: f32) -> GrayImage {
    let blurred = imageops::blur(img, sigma);
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let p = img.get_pixel(x, y)[0] as f32;
        let b = blurred.get_pixel(x, y)[0] as f32;
        let v = (1.0 + amount) * p - amount * b;
        Luma([v.round().clamp(0.0, 255.0) as u8])
    })
}

pub fn sharpen_for_ocr(img: &DynamicImage, params: &PreprocessParams) -> GrayImage {
    unsharp_mask(
        &upscale_gray(img, params.scale),
        params.sharpen_amount,
        params.sharpen_sigma,
    )
}

/// Crops an already scaled rectangle, clamped to the image bounds.
pub fn crop_region(img: &GrayImage, rect: &Rect) -> GrayImage {
    let (w, h) = img.dimensions();
    let x0 = rect.x.min(w);
    let y0 = rect.y.min(h);
    let rw = rect.width.min(w - x0);
    let rh = rect.height.min(h - y0);
    imageops::crop_imm(img, x0, y0, rw, rh).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upscale_doubles_and_drops_color() {
        let img = DynamicImage::new_rgb8(10, 4);
        let out = upscale_gray(&img, 2.0);
        assert_eq!(out.dimensions(), (20, 8));
    }

    #[test]
    fn unsharp_leaves_flat_image_alone() {
        let img = GrayImage::from_pixel(8, 8, Luma([120]));
        let out = unsharp_mask(&img, 1.2, 1.0);
        assert!(out.pixels().all(|p| p[0] == 120));
    }

    #[test]
    fn unsharp_raises_edge_contrast() {
        let img = GrayImage::from_fn(16, 1, |x, _| if x < 8 { Luma([60]) } else { Luma([180]) });
        let out = unsharp_mask(&img, 1.2, 1.0);
        assert!(out.get_pixel(7, 0)[0] <= 60);
        assert!(out.get_pixel(8, 0)[0] >= 180);
    }

    #[test]
    fn crop_region_clamps() {
        let img = GrayImage::from_fn(100, 100, |x, y| Luma([(x + y) as u8]));
        let cropped = crop_region(&img, &Rect::from([90, 95, 50, 50]));
        assert_eq!(cropped.dimensions(), (10, 5));
        assert_eq!(cropped.get_pixel(0, 0)[0], 185);

        let outside = crop_region(&img, &Rect::from([200, 200, 10, 10]));
        assert_eq!(outside.dimensions(), (0, 0));
    }
}
