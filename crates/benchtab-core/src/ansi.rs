use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static SGR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("SGR pattern is valid"));

/// Remove terminal color sequences (`ESC [ ... m`) from a line.
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    SGR_RE.replace_all(line, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_codes() {
        assert_eq!(strip_ansi("\x1b[1m\x1b[32mFinished\x1b[0m bench"), "Finished bench");
        assert_eq!(strip_ansi("\x1b[38;5;10mok\x1b[m"), "ok");
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(strip_ansi("plain"), Cow::Borrowed("plain")));
    }
}
