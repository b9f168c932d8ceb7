/// Greedy word wrap; words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..width).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let current_len = current.chars().count();
        if current.is_empty() {
            current = word;
        } else if current_len + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shortens `s` to at most `max_len` characters, ending in `…` when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    match max_len {
        0 => return String::new(),
        1 if s.chars().nth(1).is_some() => return "…".to_string(),
        _ => {}
    }
    if s.chars().nth(max_len).is_none() {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_len - 1).collect();
    out.push('…');
    out
}

/// `1234567` → `1,234,567`.
pub fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_joins_words_up_to_width() {
        assert_eq!(wrap("hello world", 20), ["hello world"]);
        assert_eq!(wrap("the quick brown fox", 10), ["the quick", "brown fox"]);
    }

    #[test]
    fn wrap_splits_long_tokens() {
        assert_eq!(
            wrap("see /a/very/long/path ok", 8),
            ["see", "/a/very/", "long/pat", "h ok"]
        );
        assert_eq!(wrap("", 5), [""]);
    }

    #[test]
    fn truncate_marks_cuts() {
        assert_eq!(truncate("hello", 5), "hello");
        assert_eq!(truncate("hello world", 8), "hello w…");
        assert_eq!(truncate("日本語テスト", 4), "日本語…");
        assert_eq!(truncate("ab", 1), "…");
        assert_eq!(truncate("a", 1), "a");
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }
}
