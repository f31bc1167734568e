use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One match of the pattern in the test string.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub text: String,
    /// Character offset of the match in the test string.
    pub index: usize,
    /// Capture groups 1.., `None` for groups that did not participate.
    pub numbered_groups: Vec<Option<String>>,
    pub named_groups: NamedGroups,
    pub full_match: String,
}

impl MatchRecord {
    /// Character length of the match.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Character offset one past the end of the match.
    pub fn end(&self) -> usize {
        self.index + self.len()
    }
}

/// Named capture groups in declaration order. Serialized as a JSON object whose
/// keys keep that order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamedGroups(Vec<(String, Option<String>)>);

impl NamedGroups {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.0.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.0
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for NamedGroups {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            state.serialize_entry(name, value)?;
        }
        state.end()
    }
}

impl<'de> Deserialize<'de> for NamedGroups {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NamedGroupsVisitor;

        impl<'de> Visitor<'de> for NamedGroupsVisitor {
            type Value = NamedGroups;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of group names to matched text")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = NamedGroups::new();
                while let Some((name, value)) = access.next_entry::<String, Option<String>>()? {
                    groups.insert(name, value);
                }
                Ok(groups)
            }
        }

        deserializer.deserialize_map(NamedGroupsVisitor)
    }
}
