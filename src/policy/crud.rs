use std::any::Any;

use log::debug;

use crate::permission::{PermissionList, Result};
use crate::types::method::Operation;
use crate::types::request::Request;
use crate::types::view::View;

use super::{check_object, check_view, Policy};

/// Create/read/update/delete policy.
///
/// `rw_permissions` is tried first for every method. Otherwise the list is
/// chosen by method:
///
/// | Method              | List                 |
/// |---------------------|----------------------|
/// | GET, HEAD, OPTIONS  | `read_permissions`   |
/// | POST                | `add_permissions`    |
/// | PUT, PATCH          | `change_permissions` |
/// | DELETE              | `delete_permissions` |
///
/// Any other method is denied. Object level checks use the `object_*`
/// lists the same way.
#[derive(Debug, Clone, Default)]
pub struct CrudPolicy {
    pub rw_permissions: PermissionList,
    pub read_permissions: PermissionList,
    pub add_permissions: PermissionList,
    pub change_permissions: PermissionList,
    pub delete_permissions: PermissionList,

    pub object_rw_permissions: PermissionList,
    pub object_read_permissions: PermissionList,
    pub object_add_permissions: PermissionList,
    pub object_change_permissions: PermissionList,
    pub object_delete_permissions: PermissionList,
}

impl CrudPolicy {
    fn view_list(&self, op: Operation) -> &PermissionList {
        match op {
            Operation::Read => &self.read_permissions,
            Operation::Add => &self.add_permissions,
            Operation::Change => &self.change_permissions,
            Operation::Delete => &self.delete_permissions,
        }
    }

    fn object_list(&self, op: Operation) -> &PermissionList {
        match op {
            Operation::Read => &self.object_read_permissions,
            Operation::Add => &self.object_add_permissions,
            Operation::Change => &self.object_change_permissions,
            Operation::Delete => &self.object_delete_permissions,
        }
    }
}

impl Policy for CrudPolicy {
    fn has_permission(&self, request: &Request, view: &View) -> Result<bool> {
        if check_view(&self.rw_permissions, request, view)? {
            return Ok(true);
        }

        let op = match request.method.operation() {
            Some(op) => op,
            None => {
                debug!("{} on view '{}' has no CRUD list, denied", request.method, view.name);
                return Ok(false);
            }
        };

        let allowed = check_view(self.view_list(op), request, view)?;
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

        let op = match request.method.operation() {
            Some(op) => op,
            None => {
                debug!(
                    "{} on object of view '{}' has no CRUD list, denied",
                    request.method, view.name
                );
                return Ok(false);
            }
        };

        let allowed = check_object(self.object_list(op), request, view, obj)?;
        if !allowed {
            debug!("{} on object of view '{}' denied", request.method, view.name);
        }
        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use crate::permission::predicates::{
        allow_all, allow_authorized_key, allow_staff, allow_superuser,
    };
    use crate::permission::{PermissionError, PermissionRequest};
    use crate::permissions;
    use crate::types::identity::Identity;
    use crate::types::method::Method;

    use super::*;

    struct Document {
        allows_access: bool,
    }

    fn document_allows_access(req: &PermissionRequest<'_>) -> Result<bool> {
        Ok(req
            .object::<Document>()
            .is_some_and(|doc| doc.allows_access))
    }

    fn staff() -> Identity {
        Identity::authenticated("staff").with_staff(true)
    }

    fn check(policy: &CrudPolicy, method: Method, user: Identity) -> bool {
        let req = Request::new(method).with_user(user);
        policy.has_permission(&req, &View::default()).unwrap()
    }

    #[test]
    fn test_default_denies() {
        let policy = CrudPolicy::default();
        let root = staff().with_superuser(true);

        for method in ["GET", "HEAD", "OPTIONS", "POST", "PUT", "PATCH", "DELETE"] {
            assert!(!check(&policy, method.parse().unwrap(), root.clone()));
        }
    }

    #[test]
    fn test_add_staff() {
        let mut policy = CrudPolicy::default();
        policy.add_permissions = permissions![allow_staff];

        assert!(check(&policy, Method::Post, staff()));
        assert!(!check(&policy, Method::Put, staff()));
        assert!(!check(&policy, Method::Patch, staff()));
        assert!(!check(&policy, Method::Get, staff()));
        assert!(!check(&policy, Method::Delete, staff()));
        assert!(!check(&policy, Method::Post, Identity::anonymous()));
    }

    #[test]
    fn test_each_operation() {
        let cases = [
            (Method::Get, Operation::Read),
            (Method::Head, Operation::Read),
            (Method::Options, Operation::Read),
            (Method::Post, Operation::Add),
            (Method::Put, Operation::Change),
            (Method::Patch, Operation::Change),
            (Method::Delete, Operation::Delete),
        ];

        for (method, op) in cases {
            let mut policy = CrudPolicy::default();
            match op {
                Operation::Read => policy.read_permissions = permissions![allow_staff],
                Operation::Add => policy.add_permissions = permissions![allow_staff],
                Operation::Change => policy.change_permissions = permissions![allow_staff],
                Operation::Delete => policy.delete_permissions = permissions![allow_staff],
            }

            for other in [Method::Get, Method::Post, Method::Put, Method::Delete] {
                let expect = other.operation() == Some(op);
                assert_eq!(
                    check(&policy, other.clone(), staff()),
                    expect,
                    "{op:?} list, {other} request"
                );
            }
            assert!(check(&policy, method.clone(), staff()));
            assert!(!check(
                &policy,
                method,
                Identity::authenticated("superuser").with_superuser(true)
            ));
        }
    }

    #[test]
    fn test_unknown_method_denied() {
        let mut policy = CrudPolicy::default();
        policy.read_permissions = permissions![allow_all];
        policy.add_permissions = permissions![allow_all];
        policy.change_permissions = permissions![allow_all];
        policy.delete_permissions = permissions![allow_all];

        let trace = Method::Other("TRACE".to_string());
        assert!(!check(&policy, trace.clone(), staff()));

        let req = Request::new(trace.clone()).with_user(staff());
        policy.object_read_permissions = permissions![allow_all];
        assert!(!policy
            .has_object_permission(&req, &View::default(), &())
            .unwrap());

        // Only rw_permissions can open unknown methods
        policy.rw_permissions = permissions![allow_staff];
        assert!(check(&policy, trace, staff()));
    }

    #[test]
    fn test_rw_overrides() {
        let mut policy = CrudPolicy::default();
        policy.rw_permissions = permissions![allow_superuser];
        let superuser = Identity::authenticated("superuser").with_superuser(true);

        for method in [Method::Get, Method::Post, Method::Put, Method::Delete] {
            assert!(check(&policy, method.clone(), superuser.clone()));
            assert!(!check(&policy, method, staff()));
        }
    }

    #[test]
    fn test_object_operations() {
        let mut policy = CrudPolicy::default();
        policy.object_change_permissions = permissions![allow_staff, document_allows_access];
        policy.object_delete_permissions = permissions![allow_superuser];
        let view = View::default();
        let open = Document {
            allows_access: true,
        };
        let closed = Document {
            allows_access: false,
        };

        let req = Request::new(Method::Put).with_user(Identity::anonymous());
        assert!(policy.has_object_permission(&req, &view, &open).unwrap());
        assert!(!policy.has_object_permission(&req, &view, &closed).unwrap());

        let req = Request::new(Method::Patch).with_user(staff());
        assert!(policy.has_object_permission(&req, &view, &closed).unwrap());

        let req = Request::new(Method::Delete).with_user(staff());
        assert!(!policy.has_object_permission(&req, &view, &open).unwrap());

        let req = Request::new(Method::Get).with_user(staff());
        assert!(!policy.has_object_permission(&req, &view, &open).unwrap());

        let req = Request::new(Method::Post).with_user(staff());
        assert!(!policy.has_object_permission(&req, &view, &open).unwrap());
    }

    #[test]
    fn test_method_list_result() {
        let mut policy = CrudPolicy::default();
        policy.delete_permissions = permissions![allow_authorized_key];
        policy.object_delete_permissions = permissions![allow_authorized_key];
        let view = View::new("orders");

        // A plain denial from the method list is Ok(false)
        let req = Request::new(Method::Put).with_user(staff());
        assert!(!policy.has_permission(&req, &view).unwrap());
        assert!(!policy.has_object_permission(&req, &view, &()).unwrap());

        // Errors from the method list still reach the caller
        let req = Request::new(Method::Delete)
            .with_user(staff())
            .with_header("Authorization", "K1");
        assert!(matches!(
            policy.has_permission(&req, &view),
            Err(PermissionError::ImproperlyConfigured(_))
        ));
        assert!(matches!(
            policy.has_object_permission(&req, &view, &()),
            Err(PermissionError::ImproperlyConfigured(_))
        ));

        let view = View::new("orders").with_authorized_keys(["K1"]);
        assert!(policy.has_permission(&req, &view).unwrap());
        assert!(policy.has_object_permission(&req, &view, &()).unwrap());
    }
}
