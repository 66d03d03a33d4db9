use serde::{Deserialize, Serialize};

/// Per-view settings consulted by permission checks.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct View {
    #[serde(default)]
    pub name: String,

    /// Shared secrets accepted in the `Authorization` header. Only a list is
    /// a valid setting, see [`AuthorizedKeys`].
    #[serde(default)]
    pub authorized_keys: Option<AuthorizedKeys>,
}

/// Raw `authorized_keys` setting as written in the configuration.
///
/// A single string is accepted by the parser but rejected when a check
/// reads it: `authorized_keys = "K1"` is a configuration mistake and must
/// not degrade into a substring or single-key match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AuthorizedKeys {
    List(Vec<String>),
    Scalar(String),
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authorized_keys: None,
        }
    }

    pub fn with_authorized_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys = keys.into_iter().map(Into::into).collect();
        self.authorized_keys = Some(AuthorizedKeys::List(keys));
        self
    }
}
