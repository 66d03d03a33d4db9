use std::any::Any;

use crate::permission::{PermissionList, Result};
use crate::types::request::Request;
use crate::types::view::View;

use super::{check_object, check_view, Policy};

/// Flat policy: one list for every request method.
///
/// If you only need view level checks, set `object_rw_permissions` to
/// `allow_all`, otherwise every object lookup is refused.
#[derive(Debug, Clone, Default)]
pub struct BasePolicy {
    pub rw_permissions: PermissionList,
    pub object_rw_permissions: PermissionList,
}

impl Policy for BasePolicy {
    fn has_permission(&self, request: &Request, view: &View) -> Result<bool> {
        check_view(&self.rw_permissions, request, view)
    }

    fn has_object_permission(
        &self,
        request: &Request,
        view: &View,
        obj: &dyn Any,
    ) -> Result<bool> {
        check_object(&self.object_rw_permissions, request, view, obj)
    }
}
