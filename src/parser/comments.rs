// Comment text extraction and MARKER(uid) note collection

use crate::parser::ast::SourceNote;
use once_cell::sync::Lazy;
use regex::Regex;

/// A note marker at the very start of a raw comment
static NOTE_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[/*][ \t]*([A-Z][A-Z]+)\(([^)]+)\):?").unwrap());

/// A note marker at the start of comment text
static NOTE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[ \t]*([A-Z][A-Z]+)\(([^)]+)\):?").unwrap());

/// `//go:generate`, `//nolint:errcheck` and friends, with the `//` removed
static DIRECTIVE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9]+:[a-z0-9]").unwrap());

/// Convert a group of adjacent raw comments into doc text.
///
/// Comment markers are removed, along with the first space after `//`.
/// Tool directives are dropped. Trailing whitespace is trimmed on every line,
/// leading blank lines are removed and runs of blank lines collapse into one.
/// Non-empty text always ends with a newline.
pub fn comment_text(comments: &[&str]) -> String {
    let mut lines: Vec<&str> = Vec::new();

    for raw in comments {
        let body = if let Some(rest) = raw.strip_prefix("//") {
            if let Some(rest) = rest.strip_prefix(' ') {
                rest
            } else if is_directive(rest) {
                continue;
            } else {
                rest
            }
        } else if raw.starts_with("/*") && raw.ends_with("*/") && raw.len() >= 4 {
            &raw[2..raw.len() - 2]
        } else {
            raw
        };

        for line in body.split('\n') {
            lines.push(line.trim_end_matches(&[' ', '\t', '\n', '\r'][..]));
        }
    }

    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    for line in lines {
        if !line.is_empty() || kept.last().map_or(false, |last| !last.is_empty()) {
            kept.push(line);
        }
    }

    if kept.is_empty() {
        return String::new();
    }
    if kept.last() != Some(&"") {
        kept.push("");
    }
    kept.join("\n")
}

fn is_directive(text: &str) -> bool {
    text.starts_with("line ")
        || text.starts_with("extern ")
        || text.starts_with("export ")
        || DIRECTIVE.is_match(text)
}

/// Collect notes from comment groups.
///
/// A note starts at a comment beginning with `MARKER(uid)` and ends at the end
/// of its group or at the next note start in the same group.
pub fn collect_notes(groups: &[Vec<&str>]) -> Vec<(String, SourceNote)> {
    let mut notes = Vec::new();

    for group in groups {
        let mut start: Option<usize> = None;
        for (i, comment) in group.iter().enumerate() {
            if NOTE_COMMENT.is_match(comment) {
                if let Some(s) = start {
                    notes.extend(read_note(&group[s..i]));
                }
                start = Some(i);
            }
        }
        if let Some(s) = start {
            notes.extend(read_note(&group[s..]));
        }
    }

    notes
}

fn read_note(comments: &[&str]) -> Option<(String, SourceNote)> {
    let text = comment_text(comments);
    let caps = NOTE_MARKER.captures(&text)?;
    let end = caps.get(0)?.end();

    let body = clean_body(&text[end..]);
    if body.is_empty() {
        return None;
    }

    Some((
        caps[1].to_string(),
        SourceNote {
            uid: caps[2].to_string(),
            body,
        },
    ))
}

/// Collapse runs of spaces, tabs and carriage returns; newlines survive.
fn clean_body(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = ' ';

    for c in text.chars() {
        let c = if c == '\t' || c == '\r' { ' ' } else { c };
        if c != ' ' || prev != ' ' {
            out.push(c);
            prev = c;
        }
    }

    if prev == ' ' {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comments() {
        let text = comment_text(&["// Add returns the sum.", "// It never fails."]);
        assert_eq!(text, "Add returns the sum.\nIt never fails.\n");
    }

    #[test]
    fn test_block_comment() {
        let text = comment_text(&["/* Point is a 2D point. */"]);
        assert_eq!(text, " Point is a 2D point.\n");
    }

    #[test]
    fn test_blank_lines_collapse() {
        let text = comment_text(&["//", "// first", "//", "//", "// second", "//"]);
        assert_eq!(text, "first\n\nsecond\n");
    }

    #[test]
    fn test_directives_dropped() {
        let text = comment_text(&["// Run does work.", "//go:noinline"]);
        assert_eq!(text, "Run does work.\n");
    }

    #[test]
    fn test_no_space_after_slashes_kept() {
        let text = comment_text(&["//plain"]);
        assert_eq!(text, "plain\n");
    }

    #[test]
    fn test_empty_group() {
        assert_eq!(comment_text(&[]), "");
        assert_eq!(comment_text(&["//", "//"]), "");
    }

    #[test]
    fn test_collect_single_note() {
        let groups = vec![vec!["// BUG(alice): overflows on large input"]];
        let notes = collect_notes(&groups);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].0, "BUG");
        assert_eq!(notes[0].1.uid, "alice");
        assert_eq!(notes[0].1.body, "overflows on large input\n");
    }

    #[test]
    fn test_note_spans_rest_of_group() {
        let groups = vec![vec!["// TODO(bob): split this", "// into two passes"]];
        let notes = collect_notes(&groups);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].1.body, "split this\ninto two passes\n");
    }

    #[test]
    fn test_two_notes_in_one_group() {
        let groups = vec![vec![
            "// TODO(bob): first",
            "// NOTE(carol): second",
        ]];
        let notes = collect_notes(&groups);
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].0, "TODO");
        assert_eq!(notes[0].1.body, "first\n");
        assert_eq!(notes[1].0, "NOTE");
        assert_eq!(notes[1].1.uid, "carol");
    }

    #[test]
    fn test_note_without_colon() {
        let groups = vec![vec!["// FIXME(dave) handle EOF"]];
        let notes = collect_notes(&groups);
        assert_eq!(notes[0].1.body, "handle EOF\n");
    }

    #[test]
    fn test_note_needs_marker_at_comment_start() {
        let groups = vec![vec!["// see BUG(alice): not a note"]];
        assert!(collect_notes(&groups).is_empty());
    }

    #[test]
    fn test_single_letter_marker_ignored() {
        let groups = vec![vec!["// X(alice): too short"]];
        assert!(collect_notes(&groups).is_empty());
    }

    #[test]
    fn test_marker_without_text_kept() {
        let groups = vec![vec!["// TODO(bob):"]];
        let notes = collect_notes(&groups);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].0, "TODO");
        assert_eq!(notes[0].1.uid, "bob");
        assert_eq!(notes[0].1.body, "\n");
    }

    #[test]
    fn test_clean_body() {
        assert_eq!(clean_body("  a \t b  \n c "), "a b \n c");
    }
}
