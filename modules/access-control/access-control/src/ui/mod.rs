//! Presentation helpers driven by the permission store.
//!
//! Nothing here enforces security; the backend re-checks every request.

pub mod guard;
pub mod menu;
pub mod navigation;

#[cfg(test)]
mod guard_test;
#[cfg(test)]
mod menu_test;
