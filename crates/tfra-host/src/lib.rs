//! Host platform detection for the TFRA build configurator.
//!
//! Detection happens once: the operating system and machine name are read
//! into a [`HostEnvironment`], then folded into a single [`HostPlatform`]
//! variant that every later stage matches on exhaustively.

pub mod environment;
pub mod error;
pub mod platform;

pub use environment::{Arch, HostEnvironment, OsKind};
pub use error::{HostError, Result};
pub use platform::HostPlatform;
