//! Accepted upload formats.
//!
//! The service only forwards files whose extension is in a fixed allow-list.
//! Everything else is rejected before a temporary file is created or the
//! converter is touched.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// A file type the converter accepts, keyed by lower-case extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Pdf,
    Docx,
    Doc,
    Png,
    Jpg,
    Jpeg,
    Tiff,
    Txt,
    Html,
}

impl FileType {
    /// Every accepted type, in declaration order.
    pub const ALL: [FileType; 9] = [
        FileType::Pdf,
        FileType::Docx,
        FileType::Doc,
        FileType::Png,
        FileType::Jpg,
        FileType::Jpeg,
        FileType::Tiff,
        FileType::Txt,
        FileType::Html,
    ];

    /// Map a bare extension (no dot, any case) to a file type.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            "png" => Some(Self::Png),
            "jpg" => Some(Self::Jpg),
            "jpeg" => Some(Self::Jpeg),
            "tiff" => Some(Self::Tiff),
            "txt" => Some(Self::Txt),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    /// Extension without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Jpeg => "jpeg",
            Self::Tiff => "tiff",
            Self::Txt => "txt",
            Self::Html => "html",
        }
    }

    /// Extension with the leading dot, as reported in `file_type`.
    pub fn dotted(&self) -> String {
        format!(".{}", self.extension())
    }

    /// Raster images go through OCR and get the shorter timeout.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpg | Self::Jpeg | Self::Tiff)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}

/// Lower-cased extension of `filename` including the leading dot, or an
/// empty string when there is none.
///
/// Only the final path component is considered, so `archive.tar/notes` has
/// no extension and `.bashrc` is treated as a bare name.
pub fn dotted_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

/// The allowed extensions, dotted and sorted, joined for error messages.
pub fn allowed_extensions_list() -> String {
    let mut exts: Vec<String> = FileType::ALL.iter().map(FileType::dotted).collect();
    exts.sort();
    exts.join(", ")
}

/// One row of the `/supported-formats` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedFormat {
    pub extension: &'static str,
    pub description: &'static str,
}

/// Static table served by `/supported-formats`. JPEG variants share a row.
pub const SUPPORTED_FORMATS: [SupportedFormat; 8] = [
    SupportedFormat {
        extension: ".pdf",
        description: "PDF documents (native and scanned)",
    },
    SupportedFormat {
        extension: ".docx",
        description: "Microsoft Word (2007+)",
    },
    SupportedFormat {
        extension: ".doc",
        description: "Microsoft Word (legacy)",
    },
    SupportedFormat {
        extension: ".png",
        description: "PNG images",
    },
    SupportedFormat {
        extension: ".jpg/.jpeg",
        description: "JPEG images",
    },
    SupportedFormat {
        extension: ".tiff",
        description: "TIFF images",
    },
    SupportedFormat {
        extension: ".txt",
        description: "Plain text files",
    },
    SupportedFormat {
        extension: ".html",
        description: "HTML documents",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_extension_is_lowercased() {
        assert_eq!(dotted_extension("Report.PDF"), ".pdf");
        assert_eq!(dotted_extension("scan.final.TiFF"), ".tiff");
    }

    #[test]
    fn dotted_extension_missing() {
        assert_eq!(dotted_extension("README"), "");
        assert_eq!(dotted_extension(""), "");
        assert_eq!(dotted_extension(".bashrc"), "");
        assert_eq!(dotted_extension("dir.d/notes"), "");
    }

    #[test]
    fn from_extension_accepts_allowed_set_only() {
        for ft in FileType::ALL {
            assert_eq!(FileType::from_extension(ft.extension()), Some(ft));
        }
        assert_eq!(FileType::from_extension("JPEG"), Some(FileType::Jpeg));
        assert_eq!(FileType::from_extension("xyz"), None);
        assert_eq!(FileType::from_extension("xlsx"), None);
        assert_eq!(FileType::from_extension(""), None);
    }

    #[test]
    fn images_are_flagged() {
        let images: Vec<_> = FileType::ALL.into_iter().filter(|f| f.is_image()).collect();
        assert_eq!(
            images,
            vec![FileType::Png, FileType::Jpg, FileType::Jpeg, FileType::Tiff]
        );
    }

    #[test]
    fn allowed_list_is_sorted() {
        assert_eq!(
            allowed_extensions_list(),
            ".doc, .docx, .html, .jpeg, .jpg, .pdf, .png, .tiff, .txt"
        );
    }

    #[test]
    fn supported_formats_table() {
        assert_eq!(SUPPORTED_FORMATS.len(), 8);
        assert_eq!(SUPPORTED_FORMATS[0].extension, ".pdf");
        assert_eq!(SUPPORTED_FORMATS[4].extension, ".jpg/.jpeg");
        assert!(SUPPORTED_FORMATS.iter().all(|f| !f.description.is_empty()));
    }
}
