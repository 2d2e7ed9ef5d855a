use anyhow::{Context, Result};
use std::path::Path;

/// Decode PNG/JPEG bytes into an egui image.
pub fn decode_image(bytes: &[u8]) -> Result<egui::ColorImage> {
    let img = image::load_from_memory(bytes)?;
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

pub fn load_image(path: &Path) -> Result<egui::ColorImage> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    decode_image(&bytes).with_context(|| format!("decoding {}", path.display()))
}

/// Upload an optional image file as a texture. Missing or broken images
/// yield `None` so the caller can draw a placeholder instead.
pub fn load_texture(
    ctx: &egui::Context,
    name: &str,
    path: Option<&Path>,
) -> Option<egui::TextureHandle> {
    let path = path?;
    match load_image(path) {
        Ok(image) => {
            log::info!(
                "Loaded {} image {} ({}x{})",
                name,
                path.display(),
                image.size[0],
                image.size[1]
            );
            Some(ctx.load_texture(name, image, egui::TextureOptions::LINEAR))
        }
        Err(e) => {
            log::warn!("Failed to load {} image: {:#}", name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_png() {
        let image = decode_image(&png_bytes(4, 2)).unwrap();
        assert_eq!(image.size, [4, 2]);
        assert_eq!(image.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_load_texture_fallbacks() {
        let ctx = egui::Context::default();
        assert!(load_texture(&ctx, "icon", None).is_none());

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.png");
        assert!(load_texture(&ctx, "icon", Some(&missing)).is_none());

        let good = dir.path().join("icon.png");
        std::fs::write(&good, png_bytes(8, 8)).unwrap();
        let texture = load_texture(&ctx, "icon", Some(&good)).unwrap();
        assert_eq!(texture.size(), [8, 8]);
    }
}
