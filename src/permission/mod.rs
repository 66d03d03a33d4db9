mod list;

pub mod guard;
pub mod predicates;

use std::any::Any;
use std::sync::Arc;

use thiserror::Error;

use crate::types::identity::Identity;
use crate::types::request::Request;
use crate::types::view::View;

pub use list::PermissionList;

/// Errors raised while evaluating a permission. None of them is an access
/// decision: a denied request is `Ok(false)`.
#[derive(Debug, Error)]
pub enum PermissionError {
    /// The view or policy is set up wrongly.
    #[error("improperly configured: {0}")]
    ImproperlyConfigured(String),

    /// A check was called in a way it cannot handle, e.g. a guarded
    /// predicate on a request that never went through authentication.
    #[error("invalid invocation: {0}")]
    InvalidInvocation(String),

    /// Error raised by a custom permission, passed through untouched.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PermissionError>;

/// Everything a single permission can inspect.
#[derive(Clone, Copy)]
pub struct PermissionRequest<'a> {
    pub request: &'a Request,
    pub view: &'a View,

    /// Target object, only present for object-level checks.
    pub obj: Option<&'a dyn Any>,
}

impl<'a> PermissionRequest<'a> {
    pub fn new(request: &'a Request, view: &'a View) -> Self {
        Self {
            request,
            view,
            obj: None,
        }
    }

    pub fn with_object(mut self, obj: &'a dyn Any) -> Self {
        self.obj = Some(obj);
        self
    }

    /// Returns the target object if it is present and of type `T`.
    pub fn object<T: Any>(&self) -> Option<&'a T> {
        self.obj.and_then(|obj| obj.downcast_ref::<T>())
    }

    /// Returns the identity attached to the request, failing when the
    /// request carries none.
    pub fn identity(&self) -> Result<&'a Identity> {
        match self.request.user.as_ref() {
            Some(user) => Ok(user),
            None => Err(PermissionError::InvalidInvocation(String::from(
                "request carries no identity, the authentication layer did not run",
            ))),
        }
    }
}

/// A single access check.
///
/// Implemented for every `Fn(&PermissionRequest) -> Result<bool>`, so plain
/// functions and closures can be put into a [`PermissionList`] directly.
/// Implementations must be side-effect free.
pub trait Permission: Send + Sync {
    fn check(&self, req: &PermissionRequest<'_>) -> Result<bool>;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> Permission for F
where
    F: Fn(&PermissionRequest<'_>) -> Result<bool> + Send + Sync,
{
    fn check(&self, req: &PermissionRequest<'_>) -> Result<bool> {
        self(req)
    }
}

/// Wraps a function or closure into a shareable permission.
pub fn permission<F>(f: F) -> Arc<dyn Permission>
where
    F: Fn(&PermissionRequest<'_>) -> Result<bool> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A permission with an explicit name, for closures whose type name means
/// nothing in a log line.
pub struct Named<P> {
    name: String,
    inner: P,
}

impl<P: Permission> Permission for Named<P> {
    fn check(&self, req: &PermissionRequest<'_>) -> Result<bool> {
        self.inner.check(req)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub fn named<F>(name: impl Into<String>, inner: F) -> Arc<dyn Permission>
where
    F: Fn(&PermissionRequest<'_>) -> Result<bool> + Send + Sync + 'static,
{
    Arc::new(Named {
        name: name.into(),
        inner,
    })
}

/// Builds a [`PermissionList`] from functions or closures, in order.
///
/// ```
/// use dapc::permissions;
/// use dapc::permission::predicates::{allow_staff, allow_superuser};
///
/// let list = permissions![allow_staff, allow_superuser];
/// assert_eq!(list.len(), 2);
/// ```
#[macro_export]
macro_rules! permissions {
    () => {
        $crate::permission::PermissionList::new(vec![])
    };

    ($($perm:expr),+ $(,)?) => {
        $crate::permission::PermissionList::new(vec![
            $($crate::permission::permission($perm)),+
        ])
    };
}
