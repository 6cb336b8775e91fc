use mime::Mime;

/// Extension used when an image media type has no registered extension.
pub const DEFAULT_EXTENSION: &str = "bin";

/// Parsed declared media type, parameters kept.
pub fn parse(media_type: &str) -> Option<Mime> {
    media_type.trim().to_ascii_lowercase().parse().ok()
}

fn is_servable(m: &Mime) -> bool {
    // SVG can carry script; it is stored as `.bin` and served as a download.
    m.type_() == mime::IMAGE && m.subtype() != mime::SVG
}

pub fn is_image(media_type: &str) -> bool {
    parse(media_type).is_some_and(|m| m.type_() == mime::IMAGE && !m.subtype().as_str().is_empty())
}

pub fn extension_for(media_type: &str) -> &'static str {
    let Some(m) = parse(media_type).filter(is_servable) else {
        return DEFAULT_EXTENSION;
    };
    let Some(extensions) = mime_guess::get_mime_extensions_str(m.essence_str()) else {
        return DEFAULT_EXTENSION;
    };
    extensions
        .iter()
        .find(|ext| **ext == m.subtype().as_str())
        .or_else(|| extensions.first())
        .copied()
        .unwrap_or(DEFAULT_EXTENSION)
}

/// Media type to serve a stored asset with, from its extension.
pub fn media_type_for_name(name: &str) -> Mime {
    let guessed = mime_guess::from_path(name).first_or_octet_stream();
    if is_servable(&guessed) {
        guessed
    } else {
        mime::APPLICATION_OCTET_STREAM
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_types_map_to_extensions() {
        assert_eq!(extension_for("image/png"), "png");
        assert_eq!(extension_for("IMAGE/PNG; charset=binary"), "png");
        assert_eq!(extension_for("image/gif"), "gif");
        assert_eq!(extension_for("image/jpeg"), "jpeg");
    }

    #[test]
    fn unknown_image_type_falls_back() {
        assert_eq!(extension_for("image/x-made-up"), DEFAULT_EXTENSION);
        assert_eq!(extension_for("image/svg+xml"), DEFAULT_EXTENSION);
        assert_eq!(extension_for("text/html"), DEFAULT_EXTENSION);
    }

    #[test]
    fn image_detection() {
        assert!(is_image("image/png"));
        assert!(is_image("image/x-made-up"));
        assert!(!is_image("image/"));
        assert!(!is_image("text/html"));
        assert!(!is_image("application/octet-stream"));
        assert!(!is_image("not a media type"));
    }

    #[test]
    fn serving_type_from_name() {
        assert_eq!(media_type_for_name("1-a.jpeg"), mime::IMAGE_JPEG);
        assert_eq!(media_type_for_name("1-a.jpg"), mime::IMAGE_JPEG);
        assert_eq!(media_type_for_name("1-a.PNG"), mime::IMAGE_PNG);
        assert_eq!(media_type_for_name("1-a.svg"), mime::APPLICATION_OCTET_STREAM);
        assert_eq!(media_type_for_name("1-a.html"), mime::APPLICATION_OCTET_STREAM);
        assert_eq!(media_type_for_name("1-a.bin"), mime::APPLICATION_OCTET_STREAM);
        assert_eq!(media_type_for_name("noext"), mime::APPLICATION_OCTET_STREAM);
    }
}
