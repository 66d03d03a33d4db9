use super::{PermissionRequest, Result};

/// Runs `f` only for authenticated callers.
///
/// An anonymous caller is denied without calling `f`, so `f` may assume the
/// identity is authenticated. A request without any identity is an
/// [`InvalidInvocation`](super::PermissionError::InvalidInvocation) error
/// rather than a denial.
pub fn authenticated_users<F>(
    f: F,
) -> impl Fn(&PermissionRequest<'_>) -> Result<bool> + Send + Sync + 'static
where
    F: Fn(&PermissionRequest<'_>) -> Result<bool> + Send + Sync + 'static,
{
    move |req| {
        if !req.identity()?.is_authenticated {
            return Ok(false);
        }
        f(req)
    }
}
