use clap::{Parser, ValueEnum};
use probe_runtime::Suite;
use std::path::{Path, PathBuf};

#[derive(Parser, Clone, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ProbeOptions {
    /// A path to the shared library under test
    #[clap(required_unless_present = "list")]
    library: Option<PathBuf>,
    /// The declared suite of checks to run
    #[clap(long, value_name = "SUITE", value_enum, default_value_t = SuiteName::Vectors)]
    suite: SuiteName,
    /// Only check that the library exports this symbol
    #[clap(long, value_name = "NAME")]
    symbol: Option<String>,
    /// Describe the checks, their exit codes and record layouts without loading anything
    #[clap(long)]
    pub list: bool,
}

/// What the options ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    List,
    Probe(&'a Path),
}

impl ProbeOptions {
    pub fn library(&self) -> Option<&Path> {
        self.library.as_deref()
    }

    /// clap only accepts a missing library together with `--list`.
    pub fn action(&self) -> Action<'_> {
        match self.library() {
            Some(library) if !self.list => Action::Probe(library),
            _ => Action::List,
        }
    }

    pub fn suite(&self) -> Suite {
        match self.symbol {
            Some(ref symbol) => Suite::exported(symbol.as_str()),
            None => self.suite.suite(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum SuiteName {
    /// `copyto_and_sum` and `countsame` (exit codes 4 to 7)
    Vectors,
    /// `jc_add_one` (exit codes 4 and 5)
    AddOne,
}

impl SuiteName {
    pub fn suite(&self) -> Suite {
        match self {
            SuiteName::Vectors => Suite::vectors(),
            SuiteName::AddOne => Suite::add_one(),
        }
    }
}
