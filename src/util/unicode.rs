use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells <= 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = UnicodeWidthStr::width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Truncate or right-pad with spaces to exactly `cells` terminal cells.
pub fn pad_to_width(s: &str, cells: usize) -> String {
    let truncated = truncate_to_width(s, cells);
    let w = display_width(&truncated);
    format!("{}{}", truncated, " ".repeat(cells.saturating_sub(w)))
}

/// Left-pad with spaces to at least `cells` terminal cells. Never truncates.
pub fn pad_left_to_width(s: &str, cells: usize) -> String {
    let w = display_width(s);
    format!("{}{}", " ".repeat(cells.saturating_sub(w)), s)
}
