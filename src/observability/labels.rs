use crate::error::ErrorKind;
use metrics::{IntoLabels, Label, SharedString};

const ERROR_KIND: &str = "kind";

/// Key/value labels attached to every metric a tester emits.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Labels(Vec<Label>);

pub const NO_LABEL: Labels = Labels(vec![]);

impl Labels {
    pub fn new(
        labels: &[(
            impl Into<SharedString> + Clone,
            impl Into<SharedString> + Clone,
        )],
    ) -> Self {
        Labels(labels.iter().map(Label::from).collect())
    }

    /// Adds one label, replacing any existing label with the same key.
    pub fn with(mut self, key: impl Into<SharedString>, value: impl Into<SharedString>) -> Self {
        let label = Label::new(key, value);
        self.0.retain(|existing| existing.key() != label.key());
        self.0.push(label);
        self
    }

    /// A copy of these labels identifying a failure kind.
    pub fn with_error_kind(&self, kind: ErrorKind) -> Labels {
        self.clone().with(ERROR_KIND, kind.to_string())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoLabels for Labels {
    fn into_labels(self) -> Vec<Label> {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::{Labels, NO_LABEL};
    use crate::error::ErrorKind;
    use metrics::{IntoLabels, Label};

    #[test]
    fn error_kind_is_added_without_touching_the_original() {
        let labels = Labels::new(&[("surface", "web")]);
        let failure = labels.with_error_kind(ErrorKind::TimeoutError);

        let list = failure.into_labels();
        assert!(list.contains(&Label::new("surface", "web")));
        assert!(list.contains(&Label::new("kind", "TimeoutError")));
        assert_eq!(labels.into_labels().len(), 1);
    }

    #[test]
    fn same_key_is_replaced() {
        let labels = NO_LABEL.with("kind", "a").with("kind", "b");
        assert_eq!(labels.into_labels(), vec![Label::new("kind", "b")]);
        assert!(NO_LABEL.is_empty());
    }
}
