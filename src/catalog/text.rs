//! Text measuring against the embedded catalog faces

use super::fonts::advance_em;

/// One typographic point in millimetres
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Rendered width of `text` in millimetres
pub fn text_width_mm(text: &str, size_pt: f32, bold: bool) -> f32 {
    text.chars().map(|c| advance_em(c, bold)).sum::<f32>() * size_pt * PT_TO_MM
}

/// Keep at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Greedy word wrap to `max_width_mm`. Words wider than a line are split.
pub fn wrap(text: &str, max_width_mm: f32, size_pt: f32, bold: bool) -> Vec<String> {
    let width = |s: &str| text_width_mm(s, size_pt, bold);

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word = word.to_string();

        // Hard-split words that cannot fit on an empty line
        while width(&word) > max_width_mm {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head = longest_fitting_prefix(&word, max_width_mm, &width);
            let rest = word.split_off(head);
            lines.push(word);
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        if current.is_empty() {
            current = word;
        } else {
            let joined = format!("{} {}", current, word);
            if width(&joined) > max_width_mm {
                lines.push(std::mem::replace(&mut current, word));
            } else {
                current = joined;
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Byte length of the longest prefix of `word` within `max_width_mm`,
/// never less than one character
fn longest_fitting_prefix(word: &str, max_width_mm: f32, width: &dyn Fn(&str) -> f32) -> usize {
    let mut end = 0;
    for (idx, c) in word.char_indices() {
        let next = idx + c.len_utf8();
        if end > 0 && width(&word[..next]) > max_width_mm {
            break;
        }
        end = next;
    }
    end
}
