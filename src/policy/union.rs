use std::any::Any;

use crate::permission::{PermissionList, Result};
use crate::types::request::Request;
use crate::types::view::View;

use super::config::PolicyKind;
use super::{BasePolicy, CrudPolicy, Policy, ReadWritePolicy};

/// A policy whose kind is chosen when the configuration is loaded.
#[derive(Debug, Clone)]
pub enum UnionPolicy {
    Base(BasePolicy),
    ReadWrite(ReadWritePolicy),
    Crud(CrudPolicy),
}

impl UnionPolicy {
    pub fn kind(&self) -> PolicyKind {
        match self {
            UnionPolicy::Base(_) => PolicyKind::Base,
            UnionPolicy::ReadWrite(_) => PolicyKind::ReadWrite,
            UnionPolicy::Crud(_) => PolicyKind::Crud,
        }
    }

    /// Every list of the policy with its field name, view level first.
    pub fn lists(&self) -> Vec<(&'static str, &PermissionList)> {
        match self {
            UnionPolicy::Base(p) => vec![
                ("rw_permissions", &p.rw_permissions),
                ("object_rw_permissions", &p.object_rw_permissions),
            ],
            UnionPolicy::ReadWrite(p) => vec![
                ("rw_permissions", &p.rw_permissions),
                ("read_permissions", &p.read_permissions),
                ("write_permissions", &p.write_permissions),
                ("object_rw_permissions", &p.object_rw_permissions),
                ("object_read_permissions", &p.object_read_permissions),
                ("object_write_permissions", &p.object_write_permissions),
            ],
            UnionPolicy::Crud(p) => vec![
                ("rw_permissions", &p.rw_permissions),
                ("read_permissions", &p.read_permissions),
                ("add_permissions", &p.add_permissions),
                ("change_permissions", &p.change_permissions),
                ("delete_permissions", &p.delete_permissions),
                ("object_rw_permissions", &p.object_rw_permissions),
                ("object_read_permissions", &p.object_read_permissions),
                ("object_add_permissions", &p.object_add_permissions),
                ("object_change_permissions", &p.object_change_permissions),
                ("object_delete_permissions", &p.object_delete_permissions),
            ],
        }
    }
}

impl Policy for UnionPolicy {
    fn has_permission(&self, request: &Request, view: &View) -> Result<bool> {
        match self {
            UnionPolicy::Base(p) => p.has_permission(request, view),
            UnionPolicy::ReadWrite(p) => p.has_permission(request, view),
            UnionPolicy::Crud(p) => p.has_permission(request, view),
        }
    }

    fn has_object_permission(
        &self,
        request: &Request,
        view: &View,
        obj: &dyn Any,
    ) -> Result<bool> {
        match self {
            UnionPolicy::Base(p) => p.has_object_permission(request, view, obj),
            UnionPolicy::ReadWrite(p) => p.has_object_permission(request, view, obj),
            UnionPolicy::Crud(p) => p.has_object_permission(request, view, obj),
        }
    }
}
