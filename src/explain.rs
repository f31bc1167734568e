use crate::flags::FlagSet;
use crate::heuristics::performance_warning_messages;
use crate::parser::capture_groups::parse_capture_groups;
use crate::parser::lexer::PatternLexer;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A human readable breakdown of a pattern.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PatternExplanation {
    pub pattern: String,
    pub explanation: String,
    pub components: Vec<PatternComponent>,
    pub warnings: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PatternComponent {
    pub part: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl PatternComponent {
    fn new(part: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            part: part.into(),
            description: description.into(),
            example: None,
        }
    }

    fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }
}

struct Detector {
    regex: Regex,
    describe: fn(&str) -> PatternComponent,
    // the `?` of `(?` is group syntax, not a quantifier
    skip_after_open_paren: bool,
}

lazy_static! {
    static ref DETECTORS: Result<Vec<Detector>, regex::Error> = build_detectors();
}

fn build_detectors() -> Result<Vec<Detector>, regex::Error> {
    Ok(vec![
        Detector {
            regex: Regex::new(r"\\[bBwWdDsS]")?,
            describe: describe_escape,
            skip_after_open_paren: false,
        },
        Detector {
            regex: Regex::new(r"\[\^?(?:\\.|[^\]\\])*\]")?,
            describe: describe_character_class,
            skip_after_open_paren: false,
        },
        Detector {
            regex: Regex::new(r"\{\d+(?:,\d*)?\}\??|[*+?]\??")?,
            describe: describe_quantifier,
            skip_after_open_paren: true,
        },
        Detector {
            regex: Regex::new(r"\(\?(?:<=|<!|[:=!])")?,
            describe: describe_special_group,
            skip_after_open_paren: false,
        },
    ])
}

/// Explains the pattern structure and the effect of `flags`. Never fails: if
/// the pattern cannot be broken down, a generic explanation is returned.
pub fn explain_regex(pattern: &str, flags: &FlagSet) -> PatternExplanation {
    let warnings = performance_warning_messages(pattern);
    match find_components(pattern) {
        Ok(components) => PatternExplanation {
            pattern: pattern.to_string(),
            explanation: summarize(&components, flags),
            components,
            warnings,
        },
        Err(err) => {
            debug!("falling back to a generic explanation: {err}");
            PatternExplanation {
                pattern: pattern.to_string(),
                explanation: "This regular expression matches text according to the pattern."
                    .to_string(),
                components: vec![],
                warnings,
            }
        }
    }
}

fn find_components(pattern: &str) -> Result<Vec<PatternComponent>, regex::Error> {
    let detectors = DETECTORS.as_ref().map_err(Clone::clone)?;
    let chars: Vec<char> = pattern.chars().collect();

    // (character offset, component)
    let mut found: Vec<(usize, PatternComponent)> = vec![];

    // byte offsets where a detector match may start
    let mut syntax_starts: Vec<usize> = Vec::with_capacity(pattern.len());
    let mut lexer = PatternLexer::new();
    for (i, (byte_offset, c)) in pattern.char_indices().enumerate() {
        if !lexer.escape_pending() && !lexer.in_character_class() {
            syntax_starts.push(byte_offset);
        }
        if !lexer.advance(c) {
            continue;
        }
        let component = match c {
            '^' if i == 0 => {
                PatternComponent::new("^", "Start of the string (or line, with the m flag)")
            }
            '$' if i + 1 == chars.len() => {
                PatternComponent::new("$", "End of the string (or line, with the m flag)")
            }
            '.' => PatternComponent::new(".", "Any character except line terminators")
                .with_example("a, 1, %"),
            '|' => PatternComponent::new("|", "Alternation: matches either side"),
            _ => continue,
        };
        found.push((i, component));
    }

    for group in parse_capture_groups(pattern) {
        let part: String = chars[group.start..group.end].iter().collect();
        let description = match &group.name {
            Some(name) => format!(
                "Named capture group '{}' (group {})",
                name,
                group.group_index + 1
            ),
            None => format!("Capture group {}", group.group_index + 1),
        };
        found.push((group.start, PatternComponent::new(part, description)));
    }

    for detector in detectors {
        for m in detector.regex.find_iter(pattern) {
            if syntax_starts.binary_search(&m.start()).is_err() {
                continue;
            }
            if detector.skip_after_open_paren && pattern[..m.start()].ends_with('(') {
                continue;
            }
            let offset = pattern[..m.start()].chars().count();
            found.push((offset, (detector.describe)(m.as_str())));
        }
    }

    found.sort_by_key(|(offset, _)| *offset);
    let mut components: Vec<PatternComponent> = vec![];
    for (_, component) in found {
        if !components.iter().any(|existing| existing.part == component.part) {
            components.push(component);
        }
    }
    Ok(components)
}

fn describe_escape(part: &str) -> PatternComponent {
    match part {
        r"\b" => PatternComponent::new(part, "Word boundary"),
        r"\B" => PatternComponent::new(part, "Not a word boundary"),
        r"\w" => PatternComponent::new(part, "Word character (letter, digit or underscore)")
            .with_example("a, Z, 5, _"),
        r"\W" => PatternComponent::new(part, "Any character that is not a word character"),
        r"\d" => PatternComponent::new(part, "Digit (0-9)").with_example("0, 7, 9"),
        r"\D" => PatternComponent::new(part, "Any character that is not a digit"),
        r"\s" => PatternComponent::new(part, "Whitespace (space, tab, line break)"),
        _ => PatternComponent::new(part, "Any character that is not whitespace"),
    }
}

fn describe_character_class(part: &str) -> PatternComponent {
    if part.starts_with("[^") {
        PatternComponent::new(part, "Any character not listed inside the brackets")
    } else {
        PatternComponent::new(part, "Any one of the characters listed inside the brackets")
    }
}

fn describe_quantifier(part: &str) -> PatternComponent {
    let (quantifier, lazy) = match part.strip_suffix('?') {
        Some(rest) if !rest.is_empty() => (rest, true),
        _ => (part, false),
    };
    let description = match quantifier {
        "*" => "Zero or more times".to_string(),
        "+" => "One or more times".to_string(),
        "?" => "Optional (zero or one time)".to_string(),
        range => {
            let inner = range.trim_start_matches('{').trim_end_matches('}');
            match inner.split_once(',') {
                None => format!("Exactly {inner} times"),
                Some((min, "")) => format!("{min} or more times"),
                Some((min, max)) => format!("Between {min} and {max} times"),
            }
        }
    };
    if lazy {
        PatternComponent::new(part, format!("{description} (lazy, as few as possible)"))
    } else {
        PatternComponent::new(part, description)
    }
}

fn describe_special_group(part: &str) -> PatternComponent {
    let description = match part {
        "(?:" => "Non-capturing group",
        "(?=" => "Positive lookahead: followed by",
        "(?!" => "Negative lookahead: not followed by",
        "(?<=" => "Positive lookbehind: preceded by",
        _ => "Negative lookbehind: not preceded by",
    };
    PatternComponent::new(part, description)
}

fn summarize(components: &[PatternComponent], flags: &FlagSet) -> String {
    let mut explanation = if components.is_empty() {
        "This pattern matches the literal text.".to_string()
    } else {
        format!(
            "This pattern is built from {} distinct element{}.",
            components.len(),
            if components.len() == 1 { "" } else { "s" }
        )
    };

    let flag_descriptions: Vec<String> = flags
        .enabled()
        .map(|flag| format!("{} ({})", flag.as_char(), flag.description()))
        .collect();
    if !flag_descriptions.is_empty() {
        explanation.push_str(" Flags: ");
        explanation.push_str(&flag_descriptions.join(", "));
        explanation.push('.');
    }
    explanation
}

#[cfg(test)]
mod test {
    use super::{explain_regex, PatternComponent};
    use crate::flags::FlagSet;

    fn parts(components: &[PatternComponent]) -> Vec<&str> {
        components.iter().map(|c| c.part.as_str()).collect()
    }

    #[test]
    fn email_pattern() {
        let explanation = explain_regex(r"\b\w+@\w+\.\w+\b", &FlagSet::default());
        assert_eq!(parts(&explanation.components), vec![r"\b", r"\w", "+"]);
        assert_eq!(explanation.pattern, r"\b\w+@\w+\.\w+\b");
    }

    #[test]
    fn anchors_groups_and_classes() {
        let explanation = explain_regex(r"^(?<year>\d{4})-[0-9]{2}$", &FlagSet::default());
        assert_eq!(
            parts(&explanation.components),
            vec!["^", r"(?<year>\d{4})", r"\d", "{4}", "[0-9]", "{2}", "$"]
        );
        assert_eq!(
            explanation.components[1].description,
            "Named capture group 'year' (group 1)"
        );
        assert_eq!(explanation.components[3].description, "Exactly 4 times");
    }

    #[test]
    fn quantifier_descriptions() {
        let explanation = explain_regex("a{2,}b{1,3}c*?", &FlagSet::default());
        let descriptions: Vec<&str> = explanation
            .components
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "2 or more times",
                "Between 1 and 3 times",
                "Zero or more times (lazy, as few as possible)"
            ]
        );
    }

    #[test]
    fn escaped_metacharacters_are_literal() {
        let explanation = explain_regex(r"a\.b\|c", &FlagSet::default());
        assert!(explanation.components.is_empty());
        assert_eq!(explanation.explanation, "This pattern matches the literal text.");
    }

    #[test]
    fn escaped_and_bracketed_syntax_is_not_described() {
        let explanation = explain_regex(r"a\+b", &FlagSet::default());
        assert!(explanation.components.is_empty());
        assert_eq!(explanation.explanation, "This pattern matches the literal text.");

        let explanation = explain_regex("[+*]x", &FlagSet::default());
        assert_eq!(parts(&explanation.components), vec!["[+*]"]);

        let explanation = explain_regex(r"\\d", &FlagSet::default());
        assert!(explanation.components.is_empty());

        let explanation = explain_regex(r"[\d]\d", &FlagSet::default());
        assert_eq!(parts(&explanation.components), vec![r"[\d]", r"\d"]);
    }

    #[test]
    fn lookarounds() {
        let explanation = explain_regex(r"(?<=\$)\d+(?!px)", &FlagSet::default());
        let found = parts(&explanation.components);
        assert!(found.contains(&"(?<="));
        assert!(found.contains(&"(?!"));
    }

    #[test]
    fn flags_are_summarized() {
        let flags = FlagSet {
            global: true,
            case_insensitive: true,
            ..FlagSet::default()
        };
        let explanation = explain_regex("abc", &flags);
        assert!(explanation
            .explanation
            .ends_with("Flags: g (find all matches), i (case-insensitive matching)."));
    }

    #[test]
    fn warnings_are_included() {
        let explanation = explain_regex("(a+)+", &FlagSet::default());
        assert!(!explanation.warnings.is_empty());
    }
}
