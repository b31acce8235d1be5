//! Attachment classification
//!
//! Decides how an attachment renders (inline image, video chip, or generic
//! file row) from its file name alone. The stored file is never inspected.

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi", "mkv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Video,
    File,
}

/// Classify a file name by the substring after its last dot, lower-cased.
/// Names with no dot classify as generic files.
pub fn classify(name: &str) -> AttachmentKind {
    match extension_of(name) {
        Some(ext) if is_image_extension(&ext) => AttachmentKind::Image,
        Some(ext) if is_video_extension(&ext) => AttachmentKind::Video,
        _ => AttachmentKind::File,
    }
}

pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

pub fn is_video_extension(ext: &str) -> bool {
    VIDEO_EXTENSIONS.contains(&ext.to_lowercase().as_str())
}

fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_all_image_extensions() {
        for ext in IMAGE_EXTENSIONS {
            let name = format!("shot.{}", ext);
            assert_eq!(classify(&name), AttachmentKind::Image, "{}", name);
        }
    }

    #[test]
    fn classifies_all_video_extensions() {
        for ext in VIDEO_EXTENSIONS {
            let name = format!("clip.{}", ext);
            assert_eq!(classify(&name), AttachmentKind::Video, "{}", name);
        }
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(classify("photo.PNG"), AttachmentKind::Image);
        assert_eq!(classify("movie.MP4"), AttachmentKind::Video);
        assert_eq!(classify("archive.JpG"), AttachmentKind::Image);
    }

    #[test]
    fn unknown_extensions_are_generic_files() {
        assert_eq!(classify("report.pdf"), AttachmentKind::File);
        assert_eq!(classify("notes.txt"), AttachmentKind::File);
        assert_eq!(classify("binary.exe"), AttachmentKind::File);
    }

    #[test]
    fn names_without_a_dot_are_generic_files() {
        assert_eq!(classify("README"), AttachmentKind::File);
        assert_eq!(classify(""), AttachmentKind::File);
    }

    #[test]
    fn only_the_last_extension_counts() {
        assert_eq!(classify("backup.png.old"), AttachmentKind::File);
        assert_eq!(classify("video.tar.mp4"), AttachmentKind::Video);
    }
}
