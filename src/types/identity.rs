use serde::{Deserialize, Serialize};

/// The caller of a request, as established by the authentication layer.
///
/// An anonymous identity has every flag cleared. The staff and superuser
/// flags are only meaningful once `is_authenticated` is set; permission
/// checks never look at them for an anonymous caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    /// User identifier, empty for anonymous callers
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub is_authenticated: bool,

    #[serde(default)]
    pub is_staff: bool,

    #[serde(default)]
    pub is_superuser: bool,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_authenticated: true,
            is_staff: false,
            is_superuser: false,
        }
    }

    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    pub fn with_superuser(mut self, is_superuser: bool) -> Self {
        self.is_superuser = is_superuser;
        self
    }
}
