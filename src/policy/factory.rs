use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use log::{info, warn};

use crate::permission::predicates::{
    allow_all, allow_authenticated, allow_authorized_key, allow_staff, allow_superuser, deny_all,
};
use crate::permission::{named, Permission, PermissionList, PermissionRequest};

use super::config::{PolicyConfig, PolicyKind};
use super::union::UnionPolicy;
use super::{BasePolicy, CrudPolicy, ReadWritePolicy};

/// Builds policies from configuration, resolving permission names through a
/// registry.
///
/// The registry starts with the built-in permissions (`deny_all`,
/// `allow_all`, `allow_authenticated`, `allow_staff`, `allow_superuser`,
/// `allow_authorized_key`). Applications add their own with
/// [`register`](Self::register) before building.
pub struct PolicyFactory {
    registry: HashMap<String, Arc<dyn Permission>>,
}

impl PolicyFactory {
    pub fn new() -> Self {
        let mut factory = Self {
            registry: HashMap::new(),
        };
        factory.register("deny_all", deny_all);
        factory.register("allow_all", allow_all);
        factory.register("allow_authenticated", allow_authenticated);
        factory.register("allow_staff", allow_staff);
        factory.register("allow_superuser", allow_superuser);
        factory.register("allow_authorized_key", allow_authorized_key);
        factory
    }

    /// Registers a permission under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, f: F)
    where
        F: Fn(&PermissionRequest<'_>) -> crate::permission::Result<bool> + Send + Sync + 'static,
    {
        self.registry.insert(name.to_string(), named(name, f));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Builds one list. A list that is not configured is `deny_all`.
    pub fn build_list(&self, field: &str, names: Option<&Vec<String>>) -> Result<PermissionList> {
        let names = match names {
            Some(names) => names,
            None => return Ok(PermissionList::default()),
        };

        if names.is_empty() {
            warn!("{field} is empty, every request it covers will be denied");
        }

        let mut list = PermissionList::new(Vec::with_capacity(names.len()));
        for name in names {
            let permission = match self.registry.get(name.trim()) {
                Some(permission) => permission.clone(),
                None => bail!("unknown permission '{name}' in {field}"),
            };
            list.push(permission);
        }

        if field.ends_with("rw_permissions") && names.iter().any(|name| name.trim() == "allow_all")
        {
            warn!("{field} contains allow_all, every request passes regardless of method");
        }

        Ok(list)
    }

    pub fn build_policy(&self, cfg: &PolicyConfig) -> Result<UnionPolicy> {
        cfg.validate()?;

        let list = |field: &str| self.build_list(field, cfg.get(field));
        let policy = match cfg.kind {
            PolicyKind::Base => UnionPolicy::Base(BasePolicy {
                rw_permissions: list("rw_permissions")?,
                object_rw_permissions: list("object_rw_permissions")?,
            }),
            PolicyKind::ReadWrite => UnionPolicy::ReadWrite(ReadWritePolicy {
                rw_permissions: list("rw_permissions")?,
                read_permissions: list("read_permissions")?,
                write_permissions: list("write_permissions")?,
                object_rw_permissions: list("object_rw_permissions")?,
                object_read_permissions: list("object_read_permissions")?,
                object_write_permissions: list("object_write_permissions")?,
            }),
            PolicyKind::Crud => UnionPolicy::Crud(CrudPolicy {
                rw_permissions: list("rw_permissions")?,
                read_permissions: list("read_permissions")?,
                add_permissions: list("add_permissions")?,
                change_permissions: list("change_permissions")?,
                delete_permissions: list("delete_permissions")?,
                object_rw_permissions: list("object_rw_permissions")?,
                object_read_permissions: list("object_read_permissions")?,
                object_add_permissions: list("object_add_permissions")?,
                object_change_permissions: list("object_change_permissions")?,
                object_delete_permissions: list("object_delete_permissions")?,
            }),
        };

        info!("Built {} policy", cfg.kind);
        Ok(policy)
    }
}

impl Default for PolicyFactory {
    fn default() -> Self {
        Self::new()
    }
}
