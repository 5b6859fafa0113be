//! Output redirection: `cmd args > path`.
//!
//! Only the first `>` in a line is special. Any later `>` is ordinary
//! token text.

use crate::lexer::token_bounds;
use std::io;
use std::path::PathBuf;

/// Longest accepted redirection target, in bytes.
pub const MAX_TARGET_LEN: usize = 4096;

/// Failure to set up output redirection. The command never runs.
#[derive(Debug, thiserror::Error)]
pub enum RedirectError {
    #[error("redirect: missing target after '>'")]
    MissingTarget,

    #[error("redirect: target is {0} bytes long, limit is {limit}", limit = MAX_TARGET_LEN)]
    TooLong(usize),

    #[error("redirect: {}: {source}", path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Split a raw line into the command text and its redirection target.
///
/// The `>` marker and the token following it are cut out of the line. A
/// single space is left in their place so the tokens on either side of the
/// cut stay separate words. Text after the first newline is dropped
/// before the marker is looked for.
pub fn split_redirect(line: &str) -> Result<(String, Option<PathBuf>), RedirectError> {
    let line = line.split('\n').next().unwrap_or_default();
    let Some(marker) = line.find('>') else {
        return Ok((line.to_owned(), None));
    };
    let (start, end) = token_bounds(line, marker + 1);
    if start == end {
        return Err(RedirectError::MissingTarget);
    }
    if end - start > MAX_TARGET_LEN {
        return Err(RedirectError::TooLong(end - start));
    }

    let mut command = String::with_capacity(line.len());
    command.push_str(&line[..marker]);
    command.push(' ');
    command.push_str(&line[end..]);
    Ok((command, Some(PathBuf::from(&line[start..end]))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Line;

    fn tokens(s: &str) -> Vec<&str> {
        Line::new(s).collect()
    }

    #[test]
    fn test_no_marker_is_passthrough() {
        let (command, target) = split_redirect("echo hi").unwrap();
        assert_eq!(command, "echo hi");
        assert!(target.is_none());
    }

    #[test]
    fn test_trailing_redirect_is_removed() {
        let (command, target) = split_redirect("echo hi > out.txt").unwrap();
        assert_eq!(tokens(&command), vec!["echo", "hi"]);
        assert_eq!(target, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_leading_redirect_keeps_command() {
        let (command, target) = split_redirect(">out.txt echo hi").unwrap();
        assert_eq!(tokens(&command), vec!["echo", "hi"]);
        assert_eq!(target, Some(PathBuf::from("out.txt")));
    }

    #[test]
    fn test_redirect_without_spaces_keeps_boundaries() {
        let (command, target) = split_redirect("echo a>out b").unwrap();
        assert_eq!(tokens(&command), vec!["echo", "a", "b"]);
        assert_eq!(target, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_missing_target() {
        assert!(matches!(
            split_redirect("echo a > "),
            Err(RedirectError::MissingTarget)
        ));
        assert!(matches!(
            split_redirect("echo a >"),
            Err(RedirectError::MissingTarget)
        ));
    }

    #[test]
    fn test_target_too_long() {
        let line = format!("echo > {}", "x".repeat(MAX_TARGET_LEN + 1));
        assert!(matches!(
            split_redirect(&line),
            Err(RedirectError::TooLong(n)) if n == MAX_TARGET_LEN + 1
        ));
    }

    #[test]
    fn test_marker_after_newline_is_ignored() {
        let (command, target) = split_redirect("echo one\necho two > keep.txt").unwrap();
        assert_eq!(command, "echo one");
        assert!(target.is_none());

        let (command, target) = split_redirect("echo a > out\n> other").unwrap();
        assert_eq!(tokens(&command), vec!["echo", "a"]);
        assert_eq!(target, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_too_long_message_names_limit() {
        let message = RedirectError::TooLong(5000).to_string();
        assert_eq!(message, format!("redirect: target is 5000 bytes long, limit is {MAX_TARGET_LEN}"));
    }

    #[test]
    fn test_second_marker_is_literal() {
        let (command, target) = split_redirect("echo a > first > second").unwrap();
        assert_eq!(target, Some(PathBuf::from("first")));
        assert_eq!(tokens(&command), vec!["echo", "a", ">", "second"]);
    }
}
