use image::{ Rgba, RgbaImage };
use qrcode::{ Color, EcLevel, QrCode };

use crate::config::{ Config, PadConfig };
use crate::error::Result;

mod logo;
pub use logo::{ compose, load_logo_or_none };

/// Quiet zones below 4 modules risk scanner failures; never render thinner.
pub const MIN_QUIET_ZONE: u32 = 4;

/// Visual parameters for a rendered code. Geometry is in modules and pixels,
/// the logo knobs mirror what the compositor needs.
#[derive(Debug, Clone)]
pub struct QrStyle {
    pub box_size: u32,
    pub border: u32,
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
    pub logo_scale: f32,
    pub pad: PadConfig,
}

impl QrStyle {
    pub fn new(box_size: u32, border: u32, logo_scale: f32, pad: PadConfig) -> Self {
        let border = if border < MIN_QUIET_ZONE {
            tracing::warn!(
                "QR_BORDER {} is below the {}-module minimum quiet zone, clamping",
                border,
                MIN_QUIET_ZONE
            );
            MIN_QUIET_ZONE
        } else {
            border
        };

        Self {
            box_size: box_size.max(1),
            border,
            dark: Rgba([0, 0, 0, 255]),
            light: Rgba([255, 255, 255, 255]),
            logo_scale,
            pad,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.box_size, config.border, config.logo_scale, config.pad.clone())
    }
}

pub struct QrRenderer {
    style: QrStyle,
}

impl QrRenderer {
    pub fn new(style: QrStyle) -> Self {
        Self { style }
    }

    /// Render `payload` as a styled QR image: circular modules, solid
    /// two-color fill, error correction level H, automatic version selection.
    /// A missing logo yields the plain code unmodified.
    pub fn render(&self, payload: &str, logo: Option<&RgbaImage>) -> Result<RgbaImage> {
        let code = QrCode::with_error_correction_level(payload, EcLevel::H)?;

        let modules = code.width() as u32;
        let box_size = self.style.box_size;
        let size = (modules + 2 * self.style.border) * box_size;

        let mut img = RgbaImage::from_pixel(size, size, self.style.light);

        for my in 0..modules {
            for mx in 0..modules {
                if code[(mx as usize, my as usize)] == Color::Dark {
                    let x0 = (self.style.border + mx) * box_size;
                    let y0 = (self.style.border + my) * box_size;
                    draw_module_dot(&mut img, x0, y0, box_size, self.style.dark);
                }
            }
        }

        match logo {
            Some(logo) => Ok(compose(&img, logo, &self.style)),
            None => Ok(img),
        }
    }

    pub fn style(&self) -> &QrStyle {
        &self.style
    }
}

/// Fill the circle inscribed in the `box_size`-pixel module cell at
/// `(x0, y0)`, sampling at pixel centers.
fn draw_module_dot(img: &mut RgbaImage, x0: u32, y0: u32, box_size: u32, color: Rgba<u8>) {
    let r = (box_size as f32) / 2.0;
    for dy in 0..box_size {
        for dx in 0..box_size {
            let cx = (dx as f32) + 0.5 - r;
            let cy = (dy as f32) + 0.5 - r;
            if cx * cx + cy * cy <= r * r {
                img.put_pixel(x0 + dx, y0 + dy, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pad() -> PadConfig {
        PadConfig { enabled: true, ratio: 1.15, alpha: 255, rounded: true }
    }

    #[test]
    fn test_border_below_minimum_is_clamped() {
        let style = QrStyle::new(12, 1, 0.2, test_pad());
        assert_eq!(style.border, MIN_QUIET_ZONE);

        let style = QrStyle::new(12, 0, 0.2, test_pad());
        assert_eq!(style.border, MIN_QUIET_ZONE);
    }

    #[test]
    fn test_border_at_or_above_minimum_is_kept() {
        assert_eq!(QrStyle::new(12, 4, 0.2, test_pad()).border, 4);
        assert_eq!(QrStyle::new(12, 6, 0.2, test_pad()).border, 6);
    }

    #[test]
    fn test_rendered_geometry_includes_quiet_zone() {
        let renderer = QrRenderer::new(QrStyle::new(10, 4, 0.2, test_pad()));
        let img = renderer.render("https://x/?token=abc123", None).unwrap();

        let code = QrCode::with_error_correction_level("https://x/?token=abc123", EcLevel::H)
            .unwrap();
        let expected = ((code.width() as u32) + 8) * 10;
        assert_eq!(img.dimensions(), (expected, expected));
    }

    #[test]
    fn test_quiet_zone_pixels_are_light() {
        let renderer = QrRenderer::new(QrStyle::new(10, 4, 0.2, test_pad()));
        let img = renderer.render("hello", None).unwrap();

        // First 40 pixels on each edge belong to the 4-module quiet zone
        let light = Rgba([255u8, 255, 255, 255]);
        for i in 0..img.width() {
            assert_eq!(*img.get_pixel(i, 0), light);
            assert_eq!(*img.get_pixel(i, 39), light);
            assert_eq!(*img.get_pixel(0, i), light);
            assert_eq!(*img.get_pixel(39, i), light);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = QrRenderer::new(QrStyle::new(8, 4, 0.2, test_pad()));
        let a = renderer.render("https://x/?token=abc123", None).unwrap();
        let b = renderer.render("https://x/?token=abc123", None).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_logo_absent_matches_plain_render() {
        // A logo that failed to load renders identically to no logo at all
        let renderer = QrRenderer::new(QrStyle::new(8, 4, 0.2, test_pad()));
        let missing = load_logo_or_none(Some(std::path::Path::new("/no/such/logo.png")));
        assert!(missing.is_none());

        let plain = renderer.render("payload", None).unwrap();
        let fallback = renderer.render("payload", missing.as_ref()).unwrap();
        assert_eq!(plain.as_raw(), fallback.as_raw());
    }
}
