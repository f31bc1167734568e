use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, IntoEnumIterator};

/// The boolean regex modifiers selected for a test run.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase", default)]
pub struct FlagSet {
    pub global: bool,
    pub case_insensitive: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
    pub unicode_sets: bool,
    pub has_indices: bool,
}

/// A single flag. The declaration order is the canonical flag-string order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Flag {
    Multiline,
    DotAll,
    Global,
    CaseInsensitive,
    Sticky,
    Unicode,
    HasIndices,
    UnicodeSets,
}

impl Flag {
    pub fn as_char(self) -> char {
        match self {
            Flag::Multiline => 'm',
            Flag::DotAll => 's',
            Flag::Global => 'g',
            Flag::CaseInsensitive => 'i',
            Flag::Sticky => 'y',
            Flag::Unicode => 'u',
            Flag::HasIndices => 'd',
            Flag::UnicodeSets => 'v',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Flag::Multiline => "^ and $ match at line boundaries",
            Flag::DotAll => ". also matches line terminators",
            Flag::Global => "find all matches",
            Flag::CaseInsensitive => "case-insensitive matching",
            Flag::Sticky => "matches only at the current position",
            Flag::Unicode => "full Unicode matching",
            Flag::HasIndices => "report match indices",
            Flag::UnicodeSets => "extended Unicode set notation",
        }
    }
}

impl FlagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_set(&self, flag: Flag) -> bool {
        match flag {
            Flag::Multiline => self.multiline,
            Flag::DotAll => self.dot_all,
            Flag::Global => self.global,
            Flag::CaseInsensitive => self.case_insensitive,
            Flag::Sticky => self.sticky,
            Flag::Unicode => self.unicode,
            Flag::HasIndices => self.has_indices,
            Flag::UnicodeSets => self.unicode_sets,
        }
    }

    pub fn with(mut self, flag: Flag) -> Self {
        let slot = match flag {
            Flag::Multiline => &mut self.multiline,
            Flag::DotAll => &mut self.dot_all,
            Flag::Global => &mut self.global,
            Flag::CaseInsensitive => &mut self.case_insensitive,
            Flag::Sticky => &mut self.sticky,
            Flag::Unicode => &mut self.unicode,
            Flag::HasIndices => &mut self.has_indices,
            Flag::UnicodeSets => &mut self.unicode_sets,
        };
        *slot = true;
        self
    }

    /// Enabled flags, in canonical order.
    pub fn enabled(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::iter().filter(move |flag| self.is_set(*flag))
    }
}

/// Encodes the flag set as a flag string. Characters are always emitted in the
/// order `m, s, g, i, y, u, d, v`.
pub fn flags_to_string(flags: &FlagSet) -> String {
    flags.enabled().map(Flag::as_char).collect()
}

#[cfg(test)]
mod test {
    use super::{flags_to_string, Flag, FlagSet};

    #[test]
    fn empty_flag_set_encodes_to_empty_string() {
        assert_eq!(flags_to_string(&FlagSet::default()), "");
    }

    #[test]
    fn flags_are_emitted_in_canonical_order() {
        let flags = FlagSet {
            global: true,
            multiline: true,
            ..FlagSet::default()
        };
        assert_eq!(flags_to_string(&flags), "mg");

        let flags = FlagSet::new()
            .with(Flag::UnicodeSets)
            .with(Flag::CaseInsensitive)
            .with(Flag::DotAll);
        assert_eq!(flags_to_string(&flags), "siv");
    }

    #[test]
    fn all_flags() {
        let mut flags = FlagSet::new();
        for flag in [
            Flag::HasIndices,
            Flag::UnicodeSets,
            Flag::Unicode,
            Flag::Sticky,
            Flag::CaseInsensitive,
            Flag::Global,
            Flag::DotAll,
            Flag::Multiline,
        ] {
            flags = flags.with(flag);
        }
        assert_eq!(flags_to_string(&flags), "msgiyudv");
    }

    #[test]
    fn deserializes_from_camel_case_with_defaults() {
        let flags: FlagSet =
            serde_json::from_str(r#"{"global": true, "caseInsensitive": true}"#).unwrap();
        assert!(flags.global);
        assert!(flags.case_insensitive);
        assert!(!flags.multiline);
        assert_eq!(flags_to_string(&flags), "gi");
    }
}
