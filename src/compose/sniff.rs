//! Image format detection from content.
//!
//! Attachments declared as images get their media subtype from the bytes
//! themselves rather than from the file extension, so a PNG saved as
//! `photo.jpg` still goes out as `image/png`.

/// Returns the media subtype for a recognized image format, or `None` when
/// the content does not start with a known signature.
#[must_use]
pub fn image_subtype(content: &[u8]) -> Option<&'static str> {
    if content.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if content.starts_with(b"\xff\xd8\xff") {
        Some("jpeg")
    } else if content.starts_with(b"GIF87a") || content.starts_with(b"GIF89a") {
        Some("gif")
    } else if content.len() >= 12 && &content[..4] == b"RIFF" && &content[8..12] == b"WEBP" {
        Some("webp")
    } else if content.starts_with(b"II*\x00") || content.starts_with(b"MM\x00*") {
        Some("tiff")
    } else if content.starts_with(b"BM") {
        Some("bmp")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::image_subtype;

    #[test]
    fn recognizes_png() {
        assert_eq!(
            image_subtype(b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR"),
            Some("png")
        );
    }

    #[test]
    fn recognizes_jpeg() {
        assert_eq!(image_subtype(b"\xff\xd8\xff\xe0\x00\x10JFIF"), Some("jpeg"));
        assert_eq!(image_subtype(b"\xff\xd8\xff\xe1\x00\x18Exif"), Some("jpeg"));
    }

    #[test]
    fn recognizes_gif_variants() {
        assert_eq!(image_subtype(b"GIF87a\x01\x00"), Some("gif"));
        assert_eq!(image_subtype(b"GIF89a\x01\x00"), Some("gif"));
    }

    #[test]
    fn recognizes_webp() {
        assert_eq!(image_subtype(b"RIFF\x24\x00\x00\x00WEBPVP8 "), Some("webp"));
        // RIFF alone is not enough
        assert_eq!(image_subtype(b"RIFF\x24\x00\x00\x00WAVE"), None);
    }

    #[test]
    fn recognizes_tiff_either_endianness() {
        assert_eq!(image_subtype(b"II*\x00\x08\x00\x00\x00"), Some("tiff"));
        assert_eq!(image_subtype(b"MM\x00*\x00\x00\x00\x08"), Some("tiff"));
    }

    #[test]
    fn recognizes_bmp() {
        assert_eq!(image_subtype(b"BM\x36\x00\x0c\x00"), Some("bmp"));
    }

    #[test]
    fn unknown_content_is_none() {
        assert_eq!(image_subtype(b"plain text, not an image"), None);
        assert_eq!(image_subtype(b""), None);
        assert_eq!(image_subtype(b"\x89PN"), None);
    }
}
