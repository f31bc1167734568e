use crate::flags::{flags_to_string, FlagSet};
use crate::parser::lexer::PatternLexer;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

/// Target language of a generated snippet.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CodeLanguage {
    JavaScript,
    Python,
}

/// A ready-to-paste snippet that runs `pattern` with `flags`.
pub fn generate_code(pattern: &str, flags: &FlagSet, language: CodeLanguage) -> String {
    match language {
        CodeLanguage::JavaScript => javascript(pattern, flags),
        CodeLanguage::Python => python(pattern, flags),
    }
}

fn javascript(pattern: &str, flags: &FlagSet) -> String {
    let literal = format!("/{}/{}", escape_slashes(pattern), flags_to_string(flags));
    let search = if flags.global {
        "const matches = [...text.matchAll(regex)];\n\
         for (const match of matches) {\n  \
           console.log(match[0], match.index);\n\
         }"
    } else {
        "const match = regex.exec(text);\n\
         if (match) {\n  \
           console.log(match[0], match.index);\n\
         }"
    };
    format!("const regex = {literal};\nconst text = \"\";\n{search}\n")
}

/// A `/` that is not escaped and not inside a character class would end the
/// literal early.
fn escape_slashes(pattern: &str) -> String {
    let mut lexer = PatternLexer::new();
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if lexer.advance(c) && c == '/' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn python(pattern: &str, flags: &FlagSet) -> String {
    let mut python_flags = vec![];
    if flags.case_insensitive {
        python_flags.push("re.IGNORECASE");
    }
    if flags.multiline {
        python_flags.push("re.MULTILINE");
    }
    if flags.dot_all {
        python_flags.push("re.DOTALL");
    }

    let literal = python_string(&python_group_names(pattern));
    let compile = if python_flags.is_empty() {
        format!("regex = re.compile({literal})")
    } else {
        format!("regex = re.compile({literal}, {})", python_flags.join(" | "))
    };

    let search = if flags.global {
        "for match in regex.finditer(text):\n    print(match.group(0), match.start())"
    } else {
        "match = regex.search(text)\nif match:\n    print(match.group(0), match.start())"
    };
    format!("import re\n\n{compile}\ntext = \"\"\n{search}\n")
}

/// Python spells named groups `(?P<name>`. Lookbehinds and escaped or
/// bracketed parens are left alone.
fn python_group_names(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut lexer = PatternLexer::new();
    let mut source = String::with_capacity(pattern.len() + 4);
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let live = lexer.advance(c);
        source.push(c);
        i += 1;
        if live
            && c == '('
            && chars.get(i) == Some(&'?')
            && chars.get(i + 1) == Some(&'<')
            && !matches!(chars.get(i + 2), Some('=' | '!'))
        {
            lexer.advance('?');
            lexer.advance('<');
            source.push_str("?P<");
            i += 2;
        }
    }
    source
}

/// A raw string when the pattern allows it, an escaped one otherwise.
fn python_string(source: &str) -> String {
    let raw_safe = !source.contains('"')
        && !source.contains('\n')
        && source.chars().rev().take_while(|c| *c == '\\').count() % 2 == 0;
    if raw_safe {
        format!("r\"{source}\"")
    } else {
        let mut escaped = String::with_capacity(source.len() + 2);
        escaped.push('"');
        for c in source.chars() {
            match c {
                '\\' => escaped.push_str("\\\\"),
                '"' => escaped.push_str("\\\""),
                '\n' => escaped.push_str("\\n"),
                '\r' => escaped.push_str("\\r"),
                c => escaped.push(c),
            }
        }
        escaped.push('"');
        escaped
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn javascript_global() {
        let flags = FlagSet {
            global: true,
            case_insensitive: true,
            ..FlagSet::default()
        };
        let code = generate_code(r"\d+", &flags, CodeLanguage::JavaScript);
        assert!(code.starts_with("const regex = /\\d+/gi;\n"));
        assert!(code.contains("text.matchAll(regex)"));
    }

    #[test]
    fn javascript_single_match() {
        let code = generate_code("a", &FlagSet::default(), CodeLanguage::JavaScript);
        assert!(code.starts_with("const regex = /a/;\n"));
        assert!(code.contains("regex.exec(text)"));
    }

    #[test]
    fn javascript_slashes_are_escaped() {
        assert_eq!(escape_slashes("a/b"), r"a\/b");
        assert_eq!(escape_slashes(r"a\/b"), r"a\/b");
        assert_eq!(escape_slashes("[/]"), "[/]");
    }

    #[test]
    fn python_flags_and_named_groups() {
        let flags = FlagSet {
            multiline: true,
            dot_all: true,
            ..FlagSet::default()
        };
        let code = generate_code(r"(?<year>\d{4})(?<=1)", &flags, CodeLanguage::Python);
        assert!(code.starts_with("import re\n\n"));
        assert!(code.contains(
            r#"regex = re.compile(r"(?P<year>\d{4})(?<=1)", re.MULTILINE | re.DOTALL)"#
        ));
        assert!(code.contains("regex.search(text)"));
    }

    #[test]
    fn python_named_groups_follow_the_lexer() {
        assert_eq!(python_group_names(r"(?<n>a)(?<!b)"), r"(?P<n>a)(?<!b)");
        assert_eq!(python_group_names(r"\(?<n>"), r"\(?<n>");
        assert_eq!(python_group_names("[(?<]x"), "[(?<]x");
        assert_eq!(python_group_names(r"\\(?<n>a)"), r"\\(?P<n>a)");
        assert_eq!(python_group_names("(?P<n>a)"), "(?P<n>a)");
    }

    #[test]
    fn python_global_uses_finditer() {
        let flags = FlagSet {
            global: true,
            ..FlagSet::default()
        };
        let code = generate_code("a", &flags, CodeLanguage::Python);
        assert!(code.contains("regex = re.compile(r\"a\")\n"));
        assert!(code.contains("regex.finditer(text)"));
    }

    #[test]
    fn python_falls_back_to_escaped_strings() {
        assert_eq!(python_string(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(python_string(r"a\\"), r#"r"a\\""#);
        assert_eq!(python_string("a\\"), r#""a\\""#);
    }

    #[test]
    fn language_names() {
        assert_eq!(CodeLanguage::JavaScript.to_string(), "javascript");
        assert_eq!(CodeLanguage::Python.as_ref(), "python");
    }
}
