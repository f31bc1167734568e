use crate::executor::MatchRecord;
use crate::parser::capture_groups::CaptureGroupInfo;
use serde::{Deserialize, Serialize};

pub const MATCH_STYLE_CLASS: &str = "regex-match";
const GROUP_STYLE_COUNT: usize = 5;

/// A 1-based line/column position in a displayed text.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

/// A styling instruction for an editor, addressed by line and column.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub range: Range,
    pub style_class: String,
}

/// Maps a character offset in `text` to a line/column position. Offsets past
/// the end map to the end of the last line.
pub fn offset_to_position(text: &str, index: usize) -> Position {
    let mut line_start = 0;
    let mut last_len = 0;
    let mut line_count = 0;

    for (line, content) in text.split('\n').enumerate() {
        let len = content.chars().count();
        if index <= line_start + len {
            return Position {
                line: line + 1,
                column: index - line_start + 1,
            };
        }
        line_start += len + 1;
        last_len = len;
        line_count = line + 1;
    }

    Position {
        line: line_count,
        column: last_len + 1,
    }
}

fn range_between(text: &str, start: usize, end: usize) -> Range {
    let start = offset_to_position(text, start);
    let end = offset_to_position(text, end);
    Range {
        start_line: start.line,
        start_col: start.column,
        end_line: end.line,
        end_col: end.column,
    }
}

/// Highlights for every match in the test string.
pub fn match_decorations(text: &str, matches: &[MatchRecord]) -> Vec<Decoration> {
    matches
        .iter()
        .map(|record| Decoration {
            range: range_between(text, record.index, record.end()),
            style_class: MATCH_STYLE_CLASS.to_string(),
        })
        .collect()
}

/// Highlights for the capture groups of the pattern. Styles cycle so that
/// neighbouring groups get different colors.
pub fn group_decorations(pattern: &str, groups: &[CaptureGroupInfo]) -> Vec<Decoration> {
    groups
        .iter()
        .map(|group| Decoration {
            range: range_between(pattern, group.start, group.end),
            style_class: group_style_class(group.group_index),
        })
        .collect()
}

pub fn group_style_class(group_index: usize) -> String {
    format!("regex-group-{}", group_index % GROUP_STYLE_COUNT)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::capture_groups::parse_capture_groups;

    #[test]
    fn positions_on_first_line() {
        assert_eq!(
            offset_to_position("hello", 0),
            Position { line: 1, column: 1 }
        );
        assert_eq!(
            offset_to_position("hello", 5),
            Position { line: 1, column: 6 }
        );
    }

    #[test]
    fn positions_across_lines() {
        let text = "ab\ncde\n\nf";
        assert_eq!(offset_to_position(text, 2), Position { line: 1, column: 3 });
        assert_eq!(offset_to_position(text, 3), Position { line: 2, column: 1 });
        assert_eq!(offset_to_position(text, 5), Position { line: 2, column: 3 });
        assert_eq!(offset_to_position(text, 7), Position { line: 3, column: 1 });
        assert_eq!(offset_to_position(text, 8), Position { line: 4, column: 1 });
    }

    #[test]
    fn offsets_past_the_end_clamp() {
        assert_eq!(
            offset_to_position("ab\ncd", 50),
            Position { line: 2, column: 3 }
        );
    }

    #[test]
    fn match_ranges() {
        let text = "one\ntwo";
        let record = MatchRecord {
            text: "two".to_string(),
            index: 4,
            numbered_groups: vec![],
            named_groups: Default::default(),
            full_match: "two".to_string(),
        };
        assert_eq!(
            match_decorations(text, &[record]),
            vec![Decoration {
                range: Range {
                    start_line: 2,
                    start_col: 1,
                    end_line: 2,
                    end_col: 4,
                },
                style_class: "regex-match".to_string(),
            }]
        );
    }

    #[test]
    fn group_ranges() {
        let pattern = "(a)(?<b>c)";
        let decorations = group_decorations(pattern, &parse_capture_groups(pattern));
        assert_eq!(decorations.len(), 2);
        assert_eq!(decorations[0].range.start_col, 1);
        assert_eq!(decorations[0].range.end_col, 4);
        assert_eq!(decorations[1].style_class, "regex-group-1");
        assert_eq!(group_style_class(6), "regex-group-1");
    }
}
