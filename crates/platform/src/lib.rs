#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Host abstraction for termux-create-package
//!
//! This crate wraps the operations that leave the process:
//! - Process execution for external tools (`ar`)
//! - Joining the prepared package members into the `.deb` container

pub mod combine;
pub mod process;

pub use combine::{ArCommandCombiner, BuiltinArCombiner, MemberCombiner};
pub use process::{CommandOutput, HostProcessOperations, PlatformCommand, ProcessOperations};
