use regex::Regex;

// Provider text is untrusted: strip ANSI escape sequences and control
// characters, collapse whitespace, and cap the length before it reaches the
// terminal.
pub fn sanitize_for_terminal(s: &str) -> String {
    // Strips CSI (ESC[ ... cmd) sequences; covers the styling/movement
    // sequences that matter. On the (impossible) compile failure, fall back
    // to the raw string.
    let re = Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").ok();
    let no_ansi = match &re {
        Some(r) => r.replace_all(s, "").into_owned(),
        None => s.to_string(),
    };

    // Turn line breaks and tabs into spaces before the control-character
    // filter, which would otherwise delete them outright
    let collapsed = no_ansi.replace(['\n', '\r', '\t'], " ");

    // Drop remaining control characters (C0 and DEL)
    let cleaned: String = collapsed
        .chars()
        .filter(|&ch| ch >= ' ' && ch != '\x7f')
        .collect();

    cleaned.trim().chars().take(200).collect()
}

/// Cap `s` at `max` characters, appending an ellipsis when anything was cut.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi_and_control_chars() {
        let hostile = "\x1B[31mred\x1B[0m title\x07 with\x7f noise";
        assert_eq!(sanitize_for_terminal(hostile), "red title with noise");
    }

    #[test]
    fn collapses_newlines_and_trims() {
        assert_eq!(sanitize_for_terminal("a\nb"), "a b");
        assert_eq!(sanitize_for_terminal("  a\nb\tc\r\n "), "a b c");
    }

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn truncate_cuts_and_marks() {
        let out = truncate_chars("abcdefghij", 6);
        assert_eq!(out, "abcde…");
        assert_eq!(out.chars().count(), 6);
    }
}
