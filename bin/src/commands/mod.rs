//! CLI command implementations.

pub(crate) mod compute;
pub(crate) mod info;
pub(crate) mod list;
