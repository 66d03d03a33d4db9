//! Deny all, allow specific.
//!
//! Access to a view is granted when **any** permission in the selected list
//! grants it, and denied otherwise. Every list defaults to `deny_all`, so
//! access has to be opened explicitly.
//!
//! ```
//! use dapc::permission::predicates::{allow_staff, allow_superuser};
//! use dapc::permissions;
//! use dapc::policy::{CrudPolicy, Policy};
//! use dapc::types::identity::Identity;
//! use dapc::types::method::Method;
//! use dapc::types::request::Request;
//! use dapc::types::view::View;
//!
//! let mut policy = CrudPolicy::default();
//! policy.rw_permissions = permissions![allow_superuser];
//! policy.add_permissions = permissions![allow_staff];
//!
//! let staff = Identity::authenticated("alice").with_staff(true);
//! let view = View::new("orders");
//!
//! let post = Request::new(Method::Post).with_user(staff.clone());
//! assert!(policy.has_permission(&post, &view).unwrap());
//!
//! let delete = Request::new(Method::Delete).with_user(staff);
//! assert!(!policy.has_permission(&delete, &view).unwrap());
//! ```

pub mod config;
pub mod header;
pub mod logs;
pub mod permission;
pub mod policy;
pub mod types;
pub mod web;
