use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::CommonConfig;

/// Policy related configuration.
///
/// Each list holds permission names resolved by
/// [`PolicyFactory`](super::factory::PolicyFactory). A list left out keeps
/// the `deny_all` default.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Which policy to build. Defaults to `base`.
    #[serde(default = "PolicyKind::default")]
    pub kind: PolicyKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rw_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub write_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_permissions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_rw_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_read_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_write_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_add_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_change_permissions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_delete_permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolicyKind {
    /// Same lists for every method
    #[serde(rename = "base")]
    #[default]
    Base,

    /// Separate lists for safe and unsafe methods
    #[serde(rename = "rw")]
    ReadWrite,

    /// Separate lists for read, add, change and delete
    #[serde(rename = "crud")]
    Crud,
}

impl PolicyKind {
    /// Names of the lists this kind of policy has.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            PolicyKind::Base => &["rw_permissions", "object_rw_permissions"],
            PolicyKind::ReadWrite => &[
                "rw_permissions",
                "read_permissions",
                "write_permissions",
                "object_rw_permissions",
                "object_read_permissions",
                "object_write_permissions",
            ],
            PolicyKind::Crud => &[
                "rw_permissions",
                "read_permissions",
                "add_permissions",
                "change_permissions",
                "delete_permissions",
                "object_rw_permissions",
                "object_read_permissions",
                "object_add_permissions",
                "object_change_permissions",
                "object_delete_permissions",
            ],
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PolicyKind::Base => "base",
            PolicyKind::ReadWrite => "rw",
            PolicyKind::Crud => "crud",
        };
        f.write_str(name)
    }
}

impl CommonConfig for PolicyConfig {
    fn default() -> Self {
        Self {
            kind: PolicyKind::default(),
            rw_permissions: None,
            read_permissions: None,
            write_permissions: None,
            add_permissions: None,
            change_permissions: None,
            delete_permissions: None,
            object_rw_permissions: None,
            object_read_permissions: None,
            object_write_permissions: None,
            object_add_permissions: None,
            object_change_permissions: None,
            object_delete_permissions: None,
        }
    }

    fn complete(&mut self) -> Result<()> {
        self.validate()
    }
}

impl PolicyConfig {
    const FIELDS: [&'static str; 12] = [
        "rw_permissions",
        "read_permissions",
        "write_permissions",
        "add_permissions",
        "change_permissions",
        "delete_permissions",
        "object_rw_permissions",
        "object_read_permissions",
        "object_write_permissions",
        "object_add_permissions",
        "object_change_permissions",
        "object_delete_permissions",
    ];

    /// Returns the configured list for a field name, `None` when the field is
    /// not set (or unknown).
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        let list = match field {
            "rw_permissions" => &self.rw_permissions,
            "read_permissions" => &self.read_permissions,
            "write_permissions" => &self.write_permissions,
            "add_permissions" => &self.add_permissions,
            "change_permissions" => &self.change_permissions,
            "delete_permissions" => &self.delete_permissions,
            "object_rw_permissions" => &self.object_rw_permissions,
            "object_read_permissions" => &self.object_read_permissions,
            "object_write_permissions" => &self.object_write_permissions,
            "object_add_permissions" => &self.object_add_permissions,
            "object_change_permissions" => &self.object_change_permissions,
            "object_delete_permissions" => &self.object_delete_permissions,
            _ => return None,
        };
        list.as_ref()
    }

    /// Checks that only lists known to the selected kind are set and that no
    /// permission name is blank.
    pub fn validate(&self) -> Result<()> {
        let fields = self.kind.fields();
        for field in Self::FIELDS {
            let names = match self.get(field) {
                Some(names) => names,
                None => continue,
            };

            if !fields.contains(&field) {
                bail!("{field} is not used by a '{}' policy", self.kind);
            }

            if names.iter().any(|name| name.trim().is_empty()) {
                bail!("{field} contains an empty permission name");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let cfg: PolicyConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.kind, PolicyKind::Base);
        assert!(cfg.rw_permissions.is_none());
        assert!(cfg.validate().is_ok());

        let cfg = <PolicyConfig as CommonConfig>::default();
        assert_eq!(cfg.kind, PolicyKind::Base);
        assert!(cfg.get("object_rw_permissions").is_none());
    }

    #[test]
    fn test_parse() {
        let cfg: PolicyConfig = toml::from_str(
            r#"
            kind = "crud"
            rw_permissions = ["allow_superuser"]
            add_permissions = ["allow_staff", "allow_authorized_key"]
            object_rw_permissions = []
            "#,
        )
        .unwrap();
        assert_eq!(cfg.kind, PolicyKind::Crud);
        assert_eq!(
            cfg.get("add_permissions"),
            Some(&vec![
                "allow_staff".to_string(),
                "allow_authorized_key".to_string()
            ])
        );
        assert_eq!(cfg.get("object_rw_permissions"), Some(&vec![]));
        assert!(cfg.get("read_permissions").is_none());
        assert!(cfg.get("nope").is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_unknown_field() {
        let result = toml::from_str::<PolicyConfig>(r#"rw_permission = ["allow_all"]"#);
        assert!(result.is_err());

        let result = toml::from_str::<PolicyConfig>(r#"kind = "acl""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate() {
        let cases = [
            ("base", "read_permissions", false),
            ("base", "object_rw_permissions", true),
            ("rw", "write_permissions", true),
            ("rw", "add_permissions", false),
            ("rw", "object_delete_permissions", false),
            ("crud", "write_permissions", false),
            ("crud", "object_write_permissions", false),
            ("crud", "change_permissions", true),
        ];

        for (kind, field, ok) in cases {
            let s = format!("kind = \"{kind}\"\n{field} = [\"allow_staff\"]");
            let mut cfg: PolicyConfig = toml::from_str(&s).unwrap();
            assert_eq!(cfg.complete().is_ok(), ok, "{kind} policy with {field}");
        }

        let cfg: PolicyConfig = toml::from_str(r#"rw_permissions = ["allow_staff", " "]"#).unwrap();
        assert!(cfg.validate().is_err());
    }
}
