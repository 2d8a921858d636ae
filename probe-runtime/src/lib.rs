#[macro_use]
extern crate log;

mod abi;
mod check;
mod error;
pub mod exit_code;
mod loader;
mod probe;
mod suite;

pub use abi::*;
pub use check::{Call, Check, CheckKind, Expected, Observed};
pub use error::{ProbeError, Result};
pub use loader::{Diagnostic, Loader, SymbolAddress, SystemLibrary, SystemLoader};
pub use probe::{CheckResult, Probe, Report};
pub use suite::Suite;
