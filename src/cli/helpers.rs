//! Shared helper functions for CLI commands

use std::io::{self, BufRead, IsTerminal};

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Normalize operator initials: trimmed, upper-case, letters only
///
/// Returns `None` for anything that is not 1-4 ASCII letters.
pub fn normalize_initials(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || trimmed.len() > 4
        || !trimmed.chars().all(|c| c.is_ascii_alphabetic())
    {
        return None;
    }
    Some(trimmed.to_ascii_uppercase())
}

/// Read accessions from stdin if it is piped
///
/// Enables pipelines like:
/// ```bash
/// lqc case list --status pending --format id | lqc case complete --screened 2025-05-20 ...
/// ```
///
/// Lines are trimmed; blank lines are ignored.
pub fn read_lines_from_stdin() -> Option<Vec<String>> {
    let stdin = io::stdin();

    if stdin.is_terminal() {
        return None;
    }

    let lines: Vec<String> = stdin
        .lock()
        .lines()
        .map_while(|line| line.ok())
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

/// Check if stdin has piped input available
pub fn stdin_has_data() -> bool {
    !io::stdin().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Papanicolaou", 6), "Pap...");
    }

    #[test]
    fn test_normalize_initials() {
        assert_eq!(normalize_initials(" ab "), Some("AB".to_string()));
        assert_eq!(normalize_initials("JQP"), Some("JQP".to_string()));
        assert_eq!(normalize_initials(""), None);
        assert_eq!(normalize_initials("A1"), None);
        assert_eq!(normalize_initials("ABCDE"), None);
    }
}
