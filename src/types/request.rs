use crate::header::HeaderMap;

use super::identity::Identity;
use super::method::Method;

pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// The parts of an incoming request that permission checks look at.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,

    /// Identity attached by the authentication layer. `None` means no
    /// authentication ran at all, which is different from an anonymous
    /// caller.
    pub user: Option<Identity>,

    pub headers: HeaderMap,
}

impl Request {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            user: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn with_user(mut self, user: Identity) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers.get(HEADER_AUTHORIZATION)
    }
}
