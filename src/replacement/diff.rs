use crate::config::DiffConfig;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DiffKind {
    Unchanged,
    Removed,
    Added,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DiffSpan {
    pub kind: DiffKind,
    pub text: String,
}

impl DiffSpan {
    fn new(kind: DiffKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Diff between the original text and the text after replacement.
///
/// This is a greedy alignment rather than an LCS: common runs are extended
/// while characters agree, and on a mismatch the nearest point where the two
/// sides agree again (within `lookahead` characters) is used to resynchronize.
/// Inputs over `size_limit` characters are not aligned at all.
pub fn generate_replacement_diff(
    original: &str,
    replaced: &str,
    config: &DiffConfig,
) -> Vec<DiffSpan> {
    if original == replaced {
        return vec![DiffSpan::new(DiffKind::Unchanged, original)];
    }

    let before: Vec<char> = original.chars().collect();
    let after: Vec<char> = replaced.chars().collect();
    if before.len() > config.size_limit || after.len() > config.size_limit {
        return vec![
            DiffSpan::new(DiffKind::Removed, original),
            DiffSpan::new(DiffKind::Added, replaced),
        ];
    }

    let mut builder = SpanBuilder::default();
    let (mut i, mut j) = (0, 0);
    let mut iterations = 0;

    while (i < before.len() || j < after.len()) && iterations < config.max_iterations {
        iterations += 1;
        let start = i;

        if i >= before.len() {
            builder.push(DiffKind::Added, &after[j..]);
            j = after.len();
            continue;
        }
        if j >= after.len() {
            builder.push(DiffKind::Removed, &before[i..]);
            i = before.len();
            continue;
        }

        if before[i] == after[j] {
            let mut run = 0;
            while i < before.len()
                && j < after.len()
                && before[i] == after[j]
                && run < config.lookahead
            {
                i += 1;
                j += 1;
                run += 1;
            }
            builder.push(DiffKind::Unchanged, &before[start..i]);
            continue;
        }

        // nearest point where one side's current character shows up in the other
        let removed_until = find_within(&before[i..], after[j], config.lookahead);
        let added_until = find_within(&after[j..], before[i], config.lookahead);
        match (removed_until, added_until) {
            (Some(skip), Some(insert)) if skip <= insert => {
                builder.push(DiffKind::Removed, &before[i..i + skip]);
                i += skip;
            }
            (_, Some(insert)) => {
                builder.push(DiffKind::Added, &after[j..j + insert]);
                j += insert;
            }
            (Some(skip), None) => {
                builder.push(DiffKind::Removed, &before[i..i + skip]);
                i += skip;
            }
            (None, None) => {
                // nothing to resynchronize on, force both cursors forward
                builder.push(DiffKind::Removed, &before[i..=i]);
                builder.push(DiffKind::Added, &after[j..=j]);
                i += 1;
                j += 1;
            }
        }
    }

    // iteration cap reached, whatever is left is reported as-is
    if i < before.len() {
        builder.push(DiffKind::Removed, &before[i..]);
    }
    if j < after.len() {
        builder.push(DiffKind::Added, &after[j..]);
    }

    builder.spans
}

/// Offset (at least 1) of the first `target` in `chars`, searching no further
/// than `lookahead` characters.
fn find_within(chars: &[char], target: char, lookahead: usize) -> Option<usize> {
    chars
        .iter()
        .take(lookahead + 1)
        .skip(1)
        .position(|c| *c == target)
        .map(|offset| offset + 1)
}

/// Collects spans, merging neighbours of the same kind.
#[derive(Default)]
struct SpanBuilder {
    spans: Vec<DiffSpan>,
}

impl SpanBuilder {
    fn push(&mut self, kind: DiffKind, chars: &[char]) {
        if chars.is_empty() {
            return;
        }
        let len = self.spans.len();
        let target = match kind {
            // keep a changed region as one removed span followed by one added span
            DiffKind::Removed
                if len >= 2
                    && self.spans[len - 1].kind == DiffKind::Added
                    && self.spans[len - 2].kind == DiffKind::Removed =>
            {
                Some(len - 2)
            }
            _ if len >= 1 && self.spans[len - 1].kind == kind => Some(len - 1),
            _ => None,
        };
        match target {
            Some(index) => self.spans[index].text.extend(chars),
            None => self
                .spans
                .push(DiffSpan::new(kind, chars.iter().collect::<String>())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{generate_replacement_diff, DiffKind, DiffSpan};
    use crate::config::DiffConfig;

    fn diff(original: &str, replaced: &str) -> Vec<DiffSpan> {
        generate_replacement_diff(original, replaced, &DiffConfig::default())
    }

    fn span(kind: DiffKind, text: &str) -> DiffSpan {
        DiffSpan {
            kind,
            text: text.to_string(),
        }
    }

    /// Both sides can always be rebuilt from the spans.
    fn assert_reconstructs(original: &str, replaced: &str, spans: &[DiffSpan]) {
        let before: String = spans
            .iter()
            .filter(|s| s.kind != DiffKind::Added)
            .map(|s| s.text.as_str())
            .collect();
        let after: String = spans
            .iter()
            .filter(|s| s.kind != DiffKind::Removed)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(before, original);
        assert_eq!(after, replaced);
    }

    #[test]
    fn identical_strings_are_one_unchanged_span() {
        for s in ["", "abc", "Contact a@b.com"] {
            assert_eq!(diff(s, s), vec![span(DiffKind::Unchanged, s)]);
        }
    }

    #[test]
    fn oversized_inputs_are_not_aligned() {
        let original = "a".repeat(5_001);
        let replaced = format!("{}b", "a".repeat(5_000));
        assert_eq!(
            diff(&original, &replaced),
            vec![
                span(DiffKind::Removed, &original),
                span(DiffKind::Added, &replaced)
            ]
        );
    }

    #[test]
    fn replacement_in_the_middle() {
        let original = "Contact a@b.com or c@d.org";
        let replaced = "Contact [EMAIL] or [EMAIL]";
        let spans = diff(original, replaced);
        assert_eq!(spans[0], span(DiffKind::Unchanged, "Contact "));
        assert!(spans.iter().any(|s| s.kind == DiffKind::Removed));
        assert!(spans.iter().any(|s| s.kind == DiffKind::Added));
        assert_reconstructs(original, replaced, &spans);
    }

    #[test]
    fn simple_insert_and_delete() {
        assert_eq!(
            diff("ac", "abc"),
            vec![
                span(DiffKind::Unchanged, "a"),
                span(DiffKind::Added, "b"),
                span(DiffKind::Unchanged, "c"),
            ]
        );
        assert_eq!(
            diff("abc", "ac"),
            vec![
                span(DiffKind::Unchanged, "a"),
                span(DiffKind::Removed, "b"),
                span(DiffKind::Unchanged, "c"),
            ]
        );
    }

    #[test]
    fn completely_different() {
        let spans = diff("abc", "xyz");
        assert_eq!(
            spans,
            vec![span(DiffKind::Removed, "abc"), span(DiffKind::Added, "xyz")]
        );
    }

    #[test]
    fn one_side_empty() {
        assert_eq!(diff("", "new"), vec![span(DiffKind::Added, "new")]);
        assert_eq!(diff("old", ""), vec![span(DiffKind::Removed, "old")]);
    }

    #[test]
    fn iteration_cap_still_covers_everything() {
        let config = DiffConfig {
            max_iterations: 2,
            ..DiffConfig::default()
        };
        let spans = generate_replacement_diff("a1b2c3d4", "a9b8c7d6", &config);
        assert_reconstructs("a1b2c3d4", "a9b8c7d6", &spans);
    }

    #[test]
    fn long_common_runs() {
        let original = format!("{}X{}", "a".repeat(250), "b".repeat(10));
        let replaced = format!("{}Y{}", "a".repeat(250), "b".repeat(10));
        let spans = diff(&original, &replaced);
        assert_eq!(spans[0], span(DiffKind::Unchanged, &"a".repeat(250)));
        assert_reconstructs(&original, &replaced, &spans);
    }
}
