use crate::parser::lexer::PatternLexer;
use serde::{Deserialize, Serialize};

/// A capturing group found in the pattern text. Offsets are character offsets
/// into the pattern, `end` is exclusive (one past the closing paren).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaptureGroupInfo {
    pub start: usize,
    pub end: usize,
    /// 0-based among capturing groups only. `match[group_index + 1]` in engine terms.
    pub group_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub is_named: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum GroupKind {
    Numbered,
    Named(String),
    NonCapturing,
}

struct OpenGroup {
    start: usize,
    kind: GroupKind,
}

/// Locates every capturing group in `pattern`, in order of their opening paren.
///
/// Escapes and character classes are respected, so `\(` and `[(]` never open a
/// group. Groups whose closing paren is missing are dropped, as are named groups
/// with an unterminated name: the pattern is often half-typed.
pub fn parse_capture_groups(pattern: &str) -> Vec<CaptureGroupInfo> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut lexer = PatternLexer::new();
    let mut open_groups: Vec<OpenGroup> = vec![];
    let mut closed: Vec<(usize, usize, Option<String>)> = vec![];

    for (i, &c) in chars.iter().enumerate() {
        if !lexer.advance(c) {
            continue;
        }
        match c {
            '(' => {
                if let Some(kind) = classify_group(&chars, i) {
                    open_groups.push(OpenGroup { start: i, kind });
                } else {
                    // still has to balance its closing paren
                    open_groups.push(OpenGroup {
                        start: i,
                        kind: GroupKind::NonCapturing,
                    });
                }
            }
            ')' => {
                if let Some(group) = open_groups.pop() {
                    match group.kind {
                        GroupKind::Numbered => closed.push((group.start, i + 1, None)),
                        GroupKind::Named(name) => closed.push((group.start, i + 1, Some(name))),
                        GroupKind::NonCapturing => {}
                    }
                }
            }
            _ => {}
        }
    }

    closed.sort_by_key(|(start, _, _)| *start);
    closed
        .into_iter()
        .enumerate()
        .map(|(group_index, (start, end, name))| CaptureGroupInfo {
            start,
            end,
            group_index,
            is_named: name.is_some(),
            name,
        })
        .collect()
}

/// Classifies the group opened at `open`. `None` means a named group whose name
/// is never terminated, which is not treated as capturing.
fn classify_group(chars: &[char], open: usize) -> Option<GroupKind> {
    if chars.get(open + 1) != Some(&'?') {
        return Some(GroupKind::Numbered);
    }
    let name_start = match (chars.get(open + 2), chars.get(open + 3)) {
        (Some('<'), Some('=' | '!')) => return Some(GroupKind::NonCapturing),
        (Some('<'), _) => open + 3,
        (Some('P'), Some('<')) => open + 4,
        _ => return Some(GroupKind::NonCapturing),
    };
    let name_end = chars[name_start..]
        .iter()
        .position(|c| *c == '>')
        .map(|offset| name_start + offset)?;
    if name_end == name_start {
        return None;
    }
    Some(GroupKind::Named(chars[name_start..name_end].iter().collect()))
}

#[cfg(test)]
mod test {
    use super::{parse_capture_groups, CaptureGroupInfo};

    fn numbered(start: usize, end: usize, group_index: usize) -> CaptureGroupInfo {
        CaptureGroupInfo {
            start,
            end,
            group_index,
            name: None,
            is_named: false,
        }
    }

    #[test]
    fn escaped_paren_is_not_a_group() {
        assert_eq!(parse_capture_groups(r"(a\(b)"), vec![numbered(0, 6, 0)]);
    }

    #[test]
    fn parens_inside_character_class_are_literal() {
        assert_eq!(parse_capture_groups("([()])"), vec![numbered(0, 6, 0)]);
    }

    #[test]
    fn named_and_numbered_share_index_space() {
        let groups = parse_capture_groups(r"(?<year>\d{4})-(\d{2})");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].group_index, 0);
        assert!(groups[0].is_named);
        assert_eq!(groups[0].name.as_deref(), Some("year"));
        assert_eq!((groups[0].start, groups[0].end), (0, 14));
        assert_eq!(groups[1], numbered(15, 22, 1));
    }

    #[test]
    fn non_capturing_and_lookaround_are_skipped() {
        let groups = parse_capture_groups("(?:a)(?=b)(?!c)(?<=d)(?<!e)(f)");
        assert_eq!(groups, vec![numbered(27, 30, 0)]);
    }

    #[test]
    fn captures_nested_inside_non_capturing_groups() {
        let groups = parse_capture_groups("(?:(a)|(b))");
        assert_eq!(groups, vec![numbered(3, 6, 0), numbered(7, 10, 1)]);
    }

    #[test]
    fn nested_groups_are_ordered_by_opening_paren() {
        let groups = parse_capture_groups("((a)(b))");
        assert_eq!(
            groups,
            vec![numbered(0, 8, 0), numbered(1, 4, 1), numbered(4, 7, 2)]
        );
    }

    #[test]
    fn unmatched_groups_are_dropped() {
        assert_eq!(parse_capture_groups("(abc"), vec![]);
        assert_eq!(parse_capture_groups("((a)"), vec![numbered(1, 4, 0)]);
        assert_eq!(parse_capture_groups("a)b"), vec![]);
    }

    #[test]
    fn unterminated_name_abandons_the_group() {
        assert_eq!(parse_capture_groups("(?<abc"), vec![]);
        // the paren still balances, so the outer group keeps its real span
        assert_eq!(parse_capture_groups("((?<)x)"), vec![numbered(0, 7, 0)]);
    }

    #[test]
    fn python_style_named_group() {
        let groups = parse_capture_groups("(?P<word>\\w+)");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name.as_deref(), Some("word"));
    }

    #[test]
    fn offsets_are_characters_not_bytes() {
        let groups = parse_capture_groups("é(ü)");
        assert_eq!(groups, vec![numbered(1, 4, 0)]);
    }
}
