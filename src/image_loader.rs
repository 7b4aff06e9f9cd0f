use std::path::Path;

use anyhow::{anyhow, Context, Result};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat, ImageReader};

/// RGBA8 pixels ready to become a texture.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `path` and shrink it to fit within `max_size` on its longest side.
/// `None` keeps the original resolution. The format comes from the file
/// contents, so a mislabelled extension still decodes. Animated GIFs give
/// their first frame.
pub fn decode_rgba(path: &Path, max_size: Option<u32>) -> Result<DecodedImage> {
    let reader = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .with_context(|| format!("Cannot open {}", path.display()))?;

    let img = if reader.format() == Some(ImageFormat::Gif) {
        let frame = GifDecoder::new(reader.into_inner())
            .and_then(|gif| gif.into_frames().next().transpose())
            .with_context(|| format!("Bad GIF {}", path.display()))?
            .ok_or_else(|| anyhow!("GIF without frames: {}", path.display()))?;
        DynamicImage::ImageRgba8(frame.into_buffer())
    } else {
        reader
            .decode()
            .with_context(|| format!("Cannot decode {}", path.display()))?
    };

    let img = match max_size {
        Some(max) if img.width().max(img.height()) > max => img.thumbnail(max, max),
        _ => img,
    };
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(anyhow!("Empty image: {}", path.display()));
    }
    Ok(DecodedImage {
        rgba: img.into_rgba8().into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_missing_file_fails() {
        let err = decode_rgba(Path::new("/nonexistent/photo.jpeg"), None).unwrap_err();
        assert!(err.to_string().contains("Cannot open"));
    }

    #[test]
    fn test_decode_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpeg");
        std::fs::write(&path, b"definitely not an image").unwrap();
        assert!(decode_rgba(&path, None).is_err());
    }

    #[test]
    fn test_decode_and_downscale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        image::RgbaImage::from_pixel(64, 32, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let full = decode_rgba(&path, None).unwrap();
        assert_eq!((full.width, full.height), (64, 32));
        assert_eq!(full.rgba.len(), 64 * 32 * 4);

        let small = decode_rgba(&path, Some(16)).unwrap();
        assert_eq!(small.width, 16);
        assert!(small.height <= 16);
        assert_eq!(small.rgba.len(), (small.width * small.height * 4) as usize);
    }

    #[test]
    fn test_format_comes_from_contents() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("real.png");
        image::RgbaImage::from_pixel(8, 4, image::Rgba([200, 0, 0, 255]))
            .save(&png)
            .unwrap();
        let mislabelled = dir.path().join("photo.jpeg");
        std::fs::rename(&png, &mislabelled).unwrap();

        let decoded = decode_rgba(&mislabelled, None).unwrap();
        assert_eq!((decoded.width, decoded.height), (8, 4));
        assert_eq!(&decoded.rgba[..4], &[200, 0, 0, 255]);
    }

    #[test]
    fn test_gif_decodes_first_frame() {
        use image::codecs::gif::GifEncoder;
        use image::{Delay, Frame, Rgba, RgbaImage};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.gif");
        {
            let file = std::fs::File::create(&path).unwrap();
            let mut encoder = GifEncoder::new(file);
            let frames = [Rgba([255, 0, 0, 255]), Rgba([0, 0, 255, 255])].map(|color| {
                Frame::from_parts(
                    RgbaImage::from_pixel(6, 6, color),
                    0,
                    0,
                    Delay::from_numer_denom_ms(100, 1),
                )
            });
            encoder.encode_frames(frames).unwrap();
        }

        let decoded = decode_rgba(&path, None).unwrap();
        assert_eq!((decoded.width, decoded.height), (6, 6));
        let first = &decoded.rgba[..4];
        assert!(first[0] > 200 && first[2] < 50, "expected red, got {first:?}");
    }
}
