pub mod identity;
pub mod method;
pub mod request;
pub mod view;
