//! Shared pure helpers: money parsing and greedy word wrap.
//!
//! Both composers funnel their string handling through these two functions
//! so the degrade-don't-fail policy lives in exactly one place. Neither
//! function can fail or panic; malformed input yields a defined fallback
//! value (`0.0`, or the input's own words re-flowed).

/// Parse a free-form price string into a number, returning `0.0` on any
/// input that carries no usable amount.
///
/// The separator policy handles the formats real payloads mix freely:
/// the rightmost `.` or `,` is treated as the decimal separator when it is
/// followed by one or two digits; every other `.`/`,` is thousands grouping
/// and dropped. Whitespace (including non-breaking spaces used as grouping)
/// is ignored. Negative amounts parse as negative.
///
/// ```rust
/// use artisan_docgen::safe_parse_money;
///
/// assert_eq!(safe_parse_money("12,5"), 12.5);
/// assert_eq!(safe_parse_money("5,000"), 5000.0);
/// assert_eq!(safe_parse_money("1.000,50"), 1000.5);
/// assert_eq!(safe_parse_money("abc"), 0.0);
/// ```
pub fn safe_parse_money(s: &str) -> f64 {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return 0.0;
    }

    let last_sep = cleaned.rfind(['.', ',']);
    let normalized = match last_sep {
        None => cleaned,
        Some(last) => {
            let tail = &cleaned[last + 1..];
            let is_decimal =
                (1..=2).contains(&tail.len()) && tail.bytes().all(|b| b.is_ascii_digit());
            let mut out = String::with_capacity(cleaned.len());
            for (i, c) in cleaned.char_indices() {
                match c {
                    '.' | ',' if i == last && is_decimal => out.push('.'),
                    '.' | ',' => {}
                    other => out.push(other),
                }
            }
            out
        }
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Greedy word wrap: split `s` into lines of at most `max_chars` characters,
/// breaking only at whitespace.
///
/// Words longer than the limit occupy a line of their own, unbroken — no
/// word is ever lost, split, or duplicated, so joining the returned lines
/// with single spaces reproduces the input's words in order. Empty or
/// whitespace-only input yields no lines.
pub fn wrap_text(s: &str, max_chars: usize) -> Vec<String> {
    let max = max_chars.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in s.split_whitespace() {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
