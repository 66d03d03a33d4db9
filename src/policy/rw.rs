use std::any::Any;

use log::debug;

use crate::permission::{PermissionList, Result};
use crate::types::request::Request;
use crate::types::view::View;

use super::{check_object, check_view, Policy};

/// Read/write policy.
///
/// `rw_permissions` is tried first for every method. When it does not grant
/// access, safe methods (GET, HEAD, OPTIONS) are checked against
/// `read_permissions` and all other methods against `write_permissions`.
/// Object level checks follow the same shape with the `object_*` lists.
#[derive(Debug, Clone, Default)]
pub struct ReadWritePolicy {
    pub rw_permissions: PermissionList,
    pub read_permissions: PermissionList,
    pub write_permissions: PermissionList,

    pub object_rw_permissions: PermissionList,
    pub object_read_permissions: PermissionList,
    pub object_write_permissions: PermissionList,
}

impl ReadWritePolicy {
    fn select<'a>(
        request: &Request,
        read: &'a PermissionList,
        write: &'a PermissionList,
    ) -> &'a PermissionList {
        if request.method.is_safe() {
            read
        } else {
            write
        }
    }
}

impl Policy for ReadWritePolicy {
    fn has_permission(&self, request: &Request, view: &View) -> Result<bool> {
        if check_view(&self.rw_permissions, request, view)? {
            return Ok(true);
        }

        let list = Self::select(request, &self.read_permissions, &self.write_permissions);
        let allowed = check_view(list, request, view)?;
        if !allowed {
            debug!("{} on view '{}' denied", request.method, view.name);
        }
        Ok(allowed)
    }

    fn has_object_permission(
        &self,
        request: &Request,
        view: &View,
        obj: &dyn Any,
    ) -> Result<bool> {
        if check_object(&self.object_rw_permissions, request, view, obj)? {
            return Ok(true);
        }

        let list = Self::select(
            request,
            &self.object_read_permissions,
            &self.object_write_permissions,
        );
        let allowed = check_object(list, request, view, obj)?;
        if !allowed {
            debug!("{} on object of view '{}' denied", request.method, view.name);
        }
        Ok(allowed)
    }
}
