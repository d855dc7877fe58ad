use std::path::Path;

/// Content type a file picker would declare for `path`, based on its extension.
pub fn declared_type_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg" | "jpeg" | "jpe" | "jfif" | "pjpeg" | "pjp") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("svg" | "svgz") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("tif" | "tiff") => "image/tiff",
        Some("avif") => "image/avif",
        Some("heic") => "image/heic",
        Some("heif") => "image/heif",
        Some("txt") => "text/plain",
        Some("htm" | "html") => "text/html",
        Some("json") => "application/json",
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("mp4") => "video/mp4",
        _ => "application/octet-stream",
    }
}

pub fn is_image_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

/// Strips parameters such as `; charset=...` from a `Content-Type` value.
pub fn media_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_image_extensions() {
        assert_eq!(declared_type_for_path(Path::new("leaf.jpg")), "image/jpeg");
        assert_eq!(declared_type_for_path(Path::new("leaf.JPEG")), "image/jpeg");
        assert_eq!(declared_type_for_path(Path::new("leaf.png")), "image/png");
        assert_eq!(declared_type_for_path(Path::new("leaf.webp")), "image/webp");
        assert_eq!(declared_type_for_path(Path::new("leaf.gif")), "image/gif");
    }

    #[test]
    fn test_non_image_extensions() {
        assert_eq!(declared_type_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(
            declared_type_for_path(Path::new("report.pdf")),
            "application/pdf"
        );
    }

    #[test]
    fn test_missing_extension_falls_back_to_octet_stream() {
        assert_eq!(
            declared_type_for_path(Path::new("photo")),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_media_type_drops_parameters() {
        assert_eq!(media_type("image/jpeg; charset=binary"), "image/jpeg");
        assert_eq!(media_type("image/png"), "image/png");
    }

    #[test]
    fn test_is_image_type() {
        assert!(is_image_type("image/png"));
        assert!(!is_image_type("text/html"));
        assert!(!is_image_type(""));
    }
}
