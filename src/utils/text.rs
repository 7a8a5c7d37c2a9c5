pub fn truncate_utf8_prefix(value: &str, max_bytes: usize) -> String {
    if max_bytes == 0 {
        return String::new();
    }
    if value.len() <= max_bytes {
        return value.to_string();
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    value[..end].to_string()
}

/// Returns the trimmed value, or `None` when nothing but whitespace is left.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Splits a comma separated list, dropping blank entries.
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_utf8_prefix_does_not_split_utf8() {
        assert_eq!(truncate_utf8_prefix("héllo", 2), "h");
        assert_eq!(truncate_utf8_prefix("héllo", 3), "hé");
    }

    #[test]
    fn split_csv_drops_blank_entries() {
        assert_eq!(
            split_csv("root0001, test0001,, ,root0067"),
            vec!["root0001", "test0001", "root0067"]
        );
        assert!(split_csv(" , ").is_empty());
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank("  x "), Some("x"));
        assert_eq!(non_blank("   "), None);
    }
}
