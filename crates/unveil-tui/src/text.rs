//! Column-aware text helpers.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Cuts `text` to at most `max_width` terminal columns, ending in `…` when
/// anything was dropped. Never splits a grapheme cluster.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let w = grapheme.width();
        if used + w + 1 > max_width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }
    out.push('…');
    out
}
