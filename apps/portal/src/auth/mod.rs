// Access Guard: role-gated protection of pages and API routes.
// The guard runs before any recruitment workflow code is reachable.

pub mod guard;
pub mod middleware;
pub mod navigation;
pub mod pages;
pub mod policy;
pub mod resolver;
pub mod session;

pub use middleware::{require_access, AccessControl};
pub use policy::{GuardPolicy, OnUnauthorized};
