use std::fmt;
use std::sync::Arc;

use log::debug;
use once_cell::sync::Lazy;

use super::predicates::deny_all;
use super::{named, Permission, PermissionRequest, Result};

static DENY_ALL: Lazy<Arc<dyn Permission>> = Lazy::new(|| named("deny_all", deny_all));

/// An ordered list of permissions combined with OR.
///
/// Evaluation tries each permission in order and grants access as soon as
/// one of them does. Errors are returned immediately; a failing permission
/// is never treated as a denial. An empty list denies.
///
/// The default list holds only `deny_all`, so a policy nobody configured
/// refuses everything.
#[derive(Clone)]
pub struct PermissionList {
    permissions: Vec<Arc<dyn Permission>>,
}

impl PermissionList {
    pub fn new(permissions: Vec<Arc<dyn Permission>>) -> Self {
        Self { permissions }
    }

    pub fn deny_all() -> Self {
        Self::new(vec![DENY_ALL.clone()])
    }

    pub fn push(&mut self, permission: Arc<dyn Permission>) {
        self.permissions.push(permission);
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.permissions.iter().map(|p| p.name()).collect()
    }

    pub fn evaluate(&self, req: &PermissionRequest<'_>) -> Result<bool> {
        for permission in self.permissions.iter() {
            if permission.check(req)? {
                debug!(
                    "{} access granted by '{}'",
                    req.request.method,
                    permission.name()
                );
                return Ok(true);
            }
        }

        Ok(false)
    }
}

impl Default for PermissionList {
    fn default() -> Self {
        Self::deny_all()
    }
}

impl fmt::Debug for PermissionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
