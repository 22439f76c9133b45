pub mod batch;
pub mod stats;
pub mod suggest;

/// Cut `text` to `width` characters, marking the cut with `~`.
pub(crate) fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

#[cfg(test)]
mod tests {
    use super::clip;

    #[test]
    fn clip_keeps_short_text() {
        assert_eq!(clip("Cúrcuma", 10), "Cúrcuma");
    }

    #[test]
    fn clip_counts_chars_not_bytes() {
        assert_eq!(clip("Pimentón dulce", 8), "Pimentó~");
    }
}
