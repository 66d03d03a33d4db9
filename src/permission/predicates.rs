//! Built-in permissions.
//!
//! Every function here has the [`Permission`](super::Permission) signature
//! and can be listed in any policy list, at view or object level. None of
//! them looks at the target object.

use crate::types::view::AuthorizedKeys;

use super::guard::authenticated_users;
use super::{PermissionError, PermissionRequest, Result};

/// Denies everyone. This is what every unset policy list holds.
pub fn deny_all(_req: &PermissionRequest<'_>) -> Result<bool> {
    Ok(false)
}

/// Allows everyone, authenticated or not.
pub fn allow_all(_req: &PermissionRequest<'_>) -> Result<bool> {
    Ok(true)
}

/// Allows any authenticated user.
pub fn allow_authenticated(req: &PermissionRequest<'_>) -> Result<bool> {
    authenticated_users(|_| Ok(true))(req)
}

/// Allows authenticated users with the staff flag.
pub fn allow_staff(req: &PermissionRequest<'_>) -> Result<bool> {
    authenticated_users(|req| Ok(req.identity()?.is_staff))(req)
}

/// Allows authenticated users with the superuser flag.
pub fn allow_superuser(req: &PermissionRequest<'_>) -> Result<bool> {
    authenticated_users(|req| Ok(req.identity()?.is_superuser))(req)
}

/// Allows requests whose `Authorization` header equals one of the view's
/// `authorized_keys`.
///
/// Meant for service-to-service calls that share a secret instead of
/// authenticating a user. The header is compared with plain string equality,
/// which is not constant time.
///
/// A view without `authorized_keys`, or with a single string instead of a
/// list, is an [`ImproperlyConfigured`](PermissionError::ImproperlyConfigured)
/// error whatever the request carries.
pub fn allow_authorized_key(req: &PermissionRequest<'_>) -> Result<bool> {
    let keys = match req.view.authorized_keys.as_ref() {
        Some(AuthorizedKeys::List(keys)) => keys,
        Some(AuthorizedKeys::Scalar(_)) => {
            return Err(PermissionError::ImproperlyConfigured(format!(
                "authorized_keys of view '{}' must be a list",
                req.view.name
            )))
        }
        None => {
            return Err(PermissionError::ImproperlyConfigured(format!(
                "view '{}' has no authorized_keys",
                req.view.name
            )))
        }
    };

    let key = match req.request.authorization() {
        Some(key) => key,
        None => return Ok(false),
    };

    Ok(keys.iter().any(|authorized| authorized == key))
}
