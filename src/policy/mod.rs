mod base;
mod crud;
mod rw;

pub mod config;
pub mod factory;
pub mod union;

use std::any::Any;

use crate::permission::{PermissionList, PermissionRequest, Result};
use crate::types::request::Request;
use crate::types::view::View;

pub use base::BasePolicy;
pub use crud::CrudPolicy;
pub use rw::ReadWritePolicy;

/// Access policy consulted by the web layer.
///
/// `Ok(false)` means the request must be rejected as forbidden. Errors are
/// not access decisions and must not be turned into a denial by callers.
pub trait Policy: Send + Sync {
    /// View level check, run before the handler body and before any object
    /// is loaded.
    fn has_permission(&self, request: &Request, view: &View) -> Result<bool>;

    /// Object level check, run once the target object has been fetched.
    fn has_object_permission(&self, request: &Request, view: &View, obj: &dyn Any)
        -> Result<bool>;
}

/// Evaluates `list` for a view level check.
fn check_view(list: &PermissionList, request: &Request, view: &View) -> Result<bool> {
    list.evaluate(&PermissionRequest::new(request, view))
}

/// Evaluates `list` for an object level check, handing `obj` to every
/// permission.
fn check_object(
    list: &PermissionList,
    request: &Request,
    view: &View,
    obj: &dyn Any,
) -> Result<bool> {
    list.evaluate(&PermissionRequest::new(request, view).with_object(obj))
}
