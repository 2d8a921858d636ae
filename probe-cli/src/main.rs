#[macro_use]
extern crate log;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use user_error::{UserFacingError, UFE};

use crate::options::{Action, ProbeOptions};
use probe_runtime::{exit_code, Probe, ProbeError, Result, SystemLoader};

mod options;

fn run(options: ProbeOptions) -> Result<()> {
    let suite = options.suite();
    let stdout = std::io::stdout();
    let mut output = stdout.lock();

    let library = match options.action() {
        Action::List => {
            suite.write_listing(&mut output)?;
            output.flush()?;
            return Ok(());
        }
        Action::Probe(library) => library,
    };

    let loader = SystemLoader::new();
    let report = Probe::new(&loader).run(library, &suite, &mut output)?;
    output.flush()?;

    info!(
        "{} check(s) of suite `{}` passed against {}",
        report.results.len(),
        suite.name(),
        report.library.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let options = match ProbeOptions::try_parse() {
        Ok(options) => options,
        Err(error) => {
            // help and version are printed to stdout and are not failures
            let code = if error.use_stderr() {
                exit_code::USAGE
            } else {
                exit_code::SUCCESS
            };
            if let Err(print_error) = error.print() {
                debug!("Failed to print the usage message: {}", print_error);
            }
            return ExitCode::from(code);
        }
    };
    debug!("{:?}", &options);

    match run(options) {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(error) => handle_probe_error(error),
    }
}

fn handle_probe_error(error: ProbeError) -> ExitCode {
    let code = error.exit_code();

    let error: Box<dyn std::error::Error> = Box::new(error);
    let user_facing_error: UserFacingError = error.into();
    user_facing_error.print();

    ExitCode::from(code)
}
