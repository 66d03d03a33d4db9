use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Error};

/// HTTP request method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Options,
    Post,
    Put,
    Patch,
    Delete,
    /// Any other method, stored upper-cased (e.g. `TRACE`)
    Other(String),
}

/// What a request does to a resource, used to select CRUD permission lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Add,
    Change,
    Delete,
}

impl Method {
    /// Safe methods (GET, HEAD, OPTIONS) never modify state.
    pub fn is_safe(&self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Options)
    }

    /// Returns `None` for methods that fit no CRUD operation.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Method::Get | Method::Head | Method::Options => Some(Operation::Read),
            Method::Post => Some(Operation::Add),
            Method::Put | Method::Patch => Some(Operation::Change),
            Method::Delete => Some(Operation::Delete),
            Method::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Other(s) => s,
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            bail!("request method cannot be empty");
        }

        let method = match s.to_uppercase().as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "OPTIONS" => Method::Options,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "PATCH" => Method::Patch,
            "DELETE" => Method::Delete,
            other => Method::Other(other.to_string()),
        };
        Ok(method)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
