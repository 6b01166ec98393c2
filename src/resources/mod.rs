//! Host-facing collaborators: package manager backends and the filesystem
//! mirror.
pub mod fs;
pub mod mirror;
pub mod package;
