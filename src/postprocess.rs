//! Post-processing: transport-level cleanup of converter Markdown.
//!
//! The converter's Markdown is returned as written. Only noise that carries
//! no content is touched, so hard line breaks (two trailing spaces), blank
//! lines and fenced code blocks survive unchanged:
//!
//! 1. Strip invisible Unicode (BOM, zero-width spaces, soft hyphens)
//! 2. Normalise line endings (CRLF → LF)
//! 3. Replace inline base64 images with Docling's `<!-- image -->` placeholder
//!
//! Rules run in this order and the result is idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder Docling writes for pictures when images are not embedded.
pub const IMAGE_PLACEHOLDER: &str = "<!-- image -->";

/// Apply all post-processing rules.
pub fn clean_markdown(input: &str) -> String {
    let s = remove_invisible_chars(input);
    let s = normalise_line_endings(&s);
    replace_embedded_images(&s)
}

// ── Rule 1: Remove invisible Unicode characters ─────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        [
            '\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}',
        ],
        "",
    )
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Replace embedded images ─────────────────────────────────────────
//
// A single scanned figure exported with `image_mode=embedded` can add
// megabytes of base64 to the response. Linked images are left alone.

static RE_DATA_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\(data:image/[^)]*\)").unwrap());

fn replace_embedded_images(input: &str) -> String {
    RE_DATA_IMAGE
        .replace_all(input, IMAGE_PLACEHOLDER)
        .into_owned()
}
