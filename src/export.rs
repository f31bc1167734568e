use crate::config::DisplayOptions;
use crate::executor::{MatchRecord, NamedGroups};
use crate::tester::TestResult;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The JSON export document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchExport {
    pub match_count: usize,
    pub matches: Vec<ExportedMatch>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExportedMatch {
    pub text: String,
    pub index: usize,
    pub groups: Vec<Option<String>>,
    pub named_groups: NamedGroups,
}

impl From<&MatchRecord> for ExportedMatch {
    fn from(record: &MatchRecord) -> Self {
        Self {
            text: record.text.clone(),
            index: record.index,
            groups: record.numbered_groups.clone(),
            named_groups: record.named_groups.clone(),
        }
    }
}

pub fn export_matches_to_json(result: &TestResult) -> Result<String, serde_json::Error> {
    let export = MatchExport {
        match_count: result.match_count,
        matches: result.matches.iter().map(ExportedMatch::from).collect(),
    };
    serde_json::to_string_pretty(&export)
}

pub fn import_matches_from_json(json: &str) -> Result<MatchExport, serde_json::Error> {
    serde_json::from_str(json)
}

/// One row per match. Fields are quoted only when they contain a comma, a
/// quote or a line break; quotes are doubled.
pub fn export_matches_to_csv(result: &TestResult) -> String {
    let mut out = String::from("Match,Index,Length,Groups,Named Groups\n");
    for record in &result.matches {
        let groups = record
            .numbered_groups
            .iter()
            .map(|group| group.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("; ");
        let named_groups = record
            .named_groups
            .iter()
            .map(|(name, value)| format!("{}={}", name, value.unwrap_or("")))
            .collect::<Vec<_>>()
            .join("; ");

        let fields = [
            csv_field(&record.text),
            record.index.to_string(),
            record.len().to_string(),
            csv_field(&groups),
            csv_field(&named_groups),
        ];
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Matches as an XML document. Matched text is wrapped in CDATA sections.
pub fn export_matches_to_xml(result: &TestResult) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    // writing into a String cannot fail
    let _ = writeln!(out, "<matches count=\"{}\">", result.match_count);
    for record in &result.matches {
        let _ = writeln!(
            out,
            "  <match index=\"{}\" length=\"{}\">",
            record.index,
            record.len()
        );
        let _ = writeln!(out, "    <text>{}</text>", cdata(&record.text));
        if !record.numbered_groups.is_empty() || !record.named_groups.is_empty() {
            out.push_str("    <groups>\n");
            for (i, group) in record.numbered_groups.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "      <group index=\"{}\">{}</group>",
                    i + 1,
                    group.as_deref().map(cdata).unwrap_or_default()
                );
            }
            for (name, value) in record.named_groups.iter() {
                let _ = writeln!(
                    out,
                    "      <group name=\"{}\">{}</group>",
                    xml_attribute(name),
                    value.map(cdata).unwrap_or_default()
                );
            }
            out.push_str("    </groups>\n");
        }
        out.push_str("  </match>\n");
    }
    out.push_str("</matches>\n");
    out
}

fn cdata(value: &str) -> String {
    // a literal `]]>` has to be split across two sections
    format!("<![CDATA[{}]]>", value.replace("]]>", "]]]]><![CDATA[>"))
}

fn xml_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Plain text listing, for copying to the clipboard.
pub fn export_matches_to_text(result: &TestResult, options: &DisplayOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} match(es)", result.match_count);
    for (i, record) in result.matches.iter().enumerate() {
        let _ = write!(out, "Match {}: \"{}\"", i + 1, record.text);
        if options.show_positions {
            let _ = write!(out, " at {}-{}", record.index, record.end());
        }
        out.push('\n');
        if options.show_groups {
            for (group, value) in record.numbered_groups.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "  Group {}: {}",
                    group + 1,
                    value.as_deref().map_or("(no match)".to_string(), |v| format!("\"{v}\""))
                );
            }
            for (name, value) in record.named_groups.iter() {
                let _ = writeln!(
                    out,
                    "  {}: {}",
                    name,
                    value.map_or("(no match)".to_string(), |v| format!("\"{v}\""))
                );
            }
        }
    }
    out
}
