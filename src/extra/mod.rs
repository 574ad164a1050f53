//! Things built on top of the core: the UGen catalog and passes over finished graphs.

#[cfg(feature = "extra")]
pub mod json;
#[cfg(feature = "extra")]
pub mod prune;

#[cfg(feature = "builtin")]
pub mod builtin;
