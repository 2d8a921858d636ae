use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{CheckKind, Loader, Observed, ProbeError, Result, Suite};

/// Drives a suite against one library: load, then resolve, invoke and compare
/// each check in order, stopping at the first failure.
#[derive(Debug)]
pub struct Probe<'loader, L: Loader> {
    loader: &'loader L,
}

/// What a successful run did, in the order it was done.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub library: PathBuf,
    pub results: Vec<CheckResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub symbol: String,
    /// `None` for checks that only require the symbol to be exported.
    pub observed: Option<Observed>,
}

impl<'loader, L: Loader> Probe<'loader, L> {
    pub fn new(loader: &'loader L) -> Self {
        Self { loader }
    }

    /// Runs every check of `suite` against the library at `path`. Progress
    /// lines are written to `output`.
    pub fn run(&self, path: &Path, suite: &Suite, output: &mut impl Write) -> Result<Report> {
        debug!("Loading {}", path.display());
        let library = match self.loader.open(path) {
            Ok(library) => library,
            Err(diagnostic) => {
                return ProbeError::LibraryNotLoadable {
                    path: path.to_path_buf(),
                    diagnostic,
                }
                .into()
            }
        };

        debug!(
            "Running {} check(s) of suite `{}`",
            suite.checks().len(),
            suite.name()
        );

        let mut results = Vec::with_capacity(suite.checks().len());
        for (index, check) in suite.checks().iter().enumerate() {
            let symbol = self
                .loader
                .resolve(&library, check.symbol())
                .map_err(|diagnostic| ProbeError::SymbolNotFound {
                    index,
                    symbol: check.symbol().to_string(),
                    diagnostic,
                })?;
            trace!("Resolved {} at {:?}", check.symbol(), symbol.as_ptr());

            let observed = match check.kind() {
                CheckKind::Exported => {
                    writeln!(output, "Found symbol: {}", check.symbol())?;
                    None
                }
                CheckKind::Call(call) => {
                    trace!("Calling {} with {}", call.signature, call.input);
                    let observed = unsafe { (call.invoke)(symbol) };
                    writeln!(output, "{}: {}", call.label, observed)?;

                    if !call.expected.accepts(&observed) {
                        return ProbeError::UnexpectedResult {
                            index,
                            symbol: check.symbol().to_string(),
                            observed,
                            expected: call.expected,
                        }
                        .into();
                    }
                    Some(observed)
                }
            };

            results.push(CheckResult {
                symbol: check.symbol().to_string(),
                observed,
            });
        }

        debug!("All checks of suite `{}` passed", suite.name());
        Ok(Report {
            library: path.to_path_buf(),
            results,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::ffi::c_void;

    use super::*;
    use crate::{Check, Diagnostic, Expected, SymbolAddress};

    /// Hands out addresses of functions linked into the test binary.
    struct InProcessLoader {
        library: PathBuf,
        symbols: HashMap<&'static str, *mut c_void>,
        resolved: RefCell<Vec<String>>,
    }

    impl InProcessLoader {
        fn new(library: &str) -> Self {
            Self {
                library: PathBuf::from(library),
                symbols: HashMap::new(),
                resolved: RefCell::new(vec![]),
            }
        }

        fn conforming() -> Self {
            Self::new("libprobe_test_library")
                .with("copyto_and_sum", probe_test_library::copyto_and_sum as *mut c_void)
                .with("countsame", probe_test_library::countsame as *mut c_void)
                .with("jc_add_one", probe_test_library::jc_add_one as *mut c_void)
        }

        fn with(mut self, name: &'static str, address: *mut c_void) -> Self {
            self.symbols.insert(name, address);
            self
        }

        fn without(mut self, name: &str) -> Self {
            self.symbols.remove(name);
            self
        }

        fn resolved(&self) -> Vec<String> {
            self.resolved.borrow().clone()
        }
    }

    impl Loader for InProcessLoader {
        type Library = ();

        fn open(&self, path: &Path) -> std::result::Result<(), Diagnostic> {
            if path == self.library {
                Ok(())
            } else {
                Err(Diagnostic::Message(format!(
                    "{}: cannot open shared object file: No such file or directory",
                    path.display()
                )))
            }
        }

        fn resolve(&self, _library: &(), symbol: &str) -> std::result::Result<SymbolAddress, Diagnostic> {
            self.resolved.borrow_mut().push(symbol.to_string());
            self.symbols
                .get(symbol)
                .and_then(|address| SymbolAddress::new(*address))
                .ok_or_else(|| Diagnostic::Message(format!("undefined symbol: {}", symbol)))
        }
    }

    extern "C" fn sum_without_copy(pair: crate::CVectorPairF32) -> f32 {
        let to = unsafe { std::slice::from_raw_parts(pair.to.data, pair.to.length as usize) };
        to.iter().sum()
    }

    extern "C" fn count_all(_list: *const crate::TwoVec, length: i32) -> i32 {
        length
    }

    fn run(loader: &InProcessLoader, library: &str, suite: &Suite) -> (Result<Report>, String) {
        let mut output = Vec::new();
        let result = Probe::new(loader).run(Path::new(library), suite, &mut output);
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn conforming_library_passes() {
        let loader = InProcessLoader::conforming();
        let (result, output) = run(&loader, "libprobe_test_library", &Suite::vectors());

        let report = result.unwrap();
        assert_eq!(report.library, PathBuf::from("libprobe_test_library"));
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].symbol, "copyto_and_sum");
        assert!(matches!(report.results[0].observed, Some(Observed::Float(sum)) if (sum - 6.0).abs() <= 0.1));
        assert_eq!(report.results[1].observed, Some(Observed::Integer(1)));
        assert_eq!(loader.resolved(), vec!["copyto_and_sum", "countsame"]);
        assert_eq!(
            output,
            "Sum of copied values: 6.000000\nCount of same vectors: 1\n"
        );
    }

    #[test]
    fn add_one_suite_passes() {
        let loader = InProcessLoader::conforming();
        let (result, output) = run(&loader, "libprobe_test_library", &Suite::add_one());

        assert_eq!(
            result.unwrap().results[0].observed,
            Some(Observed::Integer(42))
        );
        assert_eq!(output, "Result of adding one: 42\n");
    }

    #[test]
    fn unloadable_library_resolves_nothing() {
        let loader = InProcessLoader::conforming();
        let (result, output) = run(&loader, "missing.so", &Suite::vectors());

        let error = result.unwrap_err();
        assert_eq!(error.exit_code(), 3);
        assert!(error.to_string().contains("missing.so"));
        assert!(loader.resolved().is_empty());
        assert!(output.is_empty());
    }

    #[test]
    fn missing_first_symbol_stops_the_run() {
        let loader = InProcessLoader::conforming().without("copyto_and_sum");
        let (result, output) = run(&loader, "libprobe_test_library", &Suite::vectors());

        let error = result.unwrap_err();
        assert_eq!(error.exit_code(), 4);
        assert_eq!(loader.resolved(), vec!["copyto_and_sum"]);
        assert!(output.is_empty());
    }

    #[test]
    fn missing_second_symbol_after_first_passed() {
        let loader = InProcessLoader::conforming().without("countsame");
        let (result, output) = run(&loader, "libprobe_test_library", &Suite::vectors());

        let error = result.unwrap_err();
        assert_eq!(error.exit_code(), 6);
        assert_eq!(
            error.to_string(),
            "Failed to resolve symbol `countsame`: undefined symbol: countsame"
        );
        assert_eq!(output, "Sum of copied values: 6.000000\n");
    }

    #[test]
    fn wrong_sum_is_reported_and_stops_the_run() {
        let loader = InProcessLoader::conforming().with("copyto_and_sum", sum_without_copy as *mut c_void);
        let (result, output) = run(&loader, "libprobe_test_library", &Suite::vectors());

        let error = result.unwrap_err();
        assert_eq!(error.exit_code(), 5);
        assert_eq!(
            error.to_string(),
            "Bad result from `copyto_and_sum`: 15.000000 (expected 6.000000 +/- 0.100000)"
        );
        assert_eq!(loader.resolved(), vec!["copyto_and_sum"]);
        assert_eq!(output, "Sum of copied values: 15.000000\n");
    }

    #[test]
    fn wrong_count_has_its_own_code() {
        let loader = InProcessLoader::conforming().with("countsame", count_all as *mut c_void);
        let (result, _) = run(&loader, "libprobe_test_library", &Suite::vectors());

        assert_eq!(result.unwrap_err().exit_code(), 7);
    }

    #[test]
    fn exported_symbol_is_not_invoked() {
        let loader = InProcessLoader::conforming();
        let (result, output) = run(&loader, "libprobe_test_library", &Suite::exported("jc_add_one"));

        assert_eq!(result.unwrap().results[0].observed, None);
        assert_eq!(output, "Found symbol: jc_add_one\n");

        let (result, _) = run(&loader, "libprobe_test_library", &Suite::exported("jc_add_two"));
        assert_eq!(result.unwrap_err().exit_code(), 4);
    }

    #[test]
    fn custom_suites_number_checks_by_position() {
        let loader = InProcessLoader::conforming();
        let add_one = Suite::add_one().checks()[0].clone();
        let CheckKind::Call(mut add_one_again) = add_one.kind().clone() else {
            unreachable!()
        };
        add_one_again.expected = Expected::Exactly(43);

        let suite = Suite::new(
            "custom",
            vec![
                Check::exported("countsame"),
                add_one,
                Check::call("jc_add_one", add_one_again),
            ],
        );
        let (result, _) = run(&loader, "libprobe_test_library", &suite);

        assert_eq!(result.unwrap_err().exit_code(), 9);
        assert_eq!(loader.resolved(), vec!["countsame", "jc_add_one", "jc_add_one"]);
    }
}
