use std::path::Path;

use image::{ imageops, imageops::FilterType, Rgba, RgbaImage };

use crate::config::PadConfig;

use super::QrStyle;

/// Load the center logo, or `None` if the path is unset, the file is missing,
/// or the file cannot be decoded. Callers cannot distinguish the failure
/// modes; a bad logo must never abort code generation.
pub fn load_logo_or_none(path: Option<&Path>) -> Option<RgbaImage> {
    let path = path?;
    match image::open(path) {
        Ok(img) => Some(img.to_rgba8()),
        Err(err) => {
            tracing::debug!("logo {} unusable ({}), rendering without it", path.display(), err);
            None
        }
    }
}

/// Center `logo` over `qr`, resized to `logo_scale` of the QR width and
/// optionally backed by an opaque contrast pad. Pure: identical inputs give
/// pixel-identical output.
pub fn compose(qr: &RgbaImage, logo: &RgbaImage, style: &QrStyle) -> RgbaImage {
    let mut out = qr.clone();

    // Resize preserving aspect ratio, clamped to 1px per axis
    let target_w = (((qr.width() as f32) * style.logo_scale) as u32).max(1);
    let aspect = (logo.height() as f32) / (logo.width().max(1) as f32);
    let target_h = (((target_w as f32) * aspect) as u32).max(1);
    let resized = imageops::resize(logo, target_w, target_h, FilterType::Lanczos3);

    let overlay = if style.pad.enabled { pad_behind(&resized, &style.pad) } else { resized };

    let x = out.width().saturating_sub(overlay.width()) / 2;
    let y = out.height().saturating_sub(overlay.height()) / 2;
    // overlay() respects the overlay's alpha channel, so transparent logo
    // pixels leave the QR modules underneath intact
    imageops::overlay(&mut out, &overlay, x as i64, y as i64);

    out
}

/// Opaque white backing behind the logo so it does not merge with adjacent
/// dark modules. The canvas is `ratio` times the logo, at least 2px larger on
/// each axis, masked to a rounded or plain rectangle.
fn pad_behind(logo: &RgbaImage, pad: &PadConfig) -> RgbaImage {
    let (lw, lh) = logo.dimensions();
    let pad_w = (((lw as f32) * pad.ratio) as u32).max(lw + 2);
    let pad_h = (((lh as f32) * pad.ratio) as u32).max(lh + 2);

    let mut canvas = RgbaImage::from_pixel(pad_w, pad_h, Rgba([255, 255, 255, 0]));

    let radius = if pad.rounded { (pad_w.min(pad_h) / 6).max(8) } else { 0 };
    let fill = Rgba([255, 255, 255, pad.alpha]);
    for y in 0..pad_h {
        for x in 0..pad_w {
            if inside_rounded_rect(x, y, pad_w, pad_h, radius) {
                canvas.put_pixel(x, y, fill);
            }
        }
    }

    let lx = ((pad_w - lw) / 2) as i64;
    let ly = ((pad_h - lh) / 2) as i64;
    imageops::overlay(&mut canvas, logo, lx, ly);

    canvas
}

fn inside_rounded_rect(x: u32, y: u32, w: u32, h: u32, radius: u32) -> bool {
    if radius == 0 {
        return true;
    }
    let w = w as f32;
    let h = h as f32;
    let r = (radius as f32).min(w / 2.0).min(h / 2.0);
    let px = (x as f32) + 0.5;
    let py = (y as f32) + 0.5;
    // Distance from the nearest corner-arc center; points in the central
    // cross clamp to themselves and always pass
    let dx = px - px.clamp(r, w - r);
    let dy = py - py.clamp(r, h - r);
    dx * dx + dy * dy <= r * r
}
