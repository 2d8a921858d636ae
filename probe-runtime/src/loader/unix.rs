use std::ffi::c_void;
use std::path::Path;

use libloading::os::unix::{RTLD_GLOBAL, RTLD_NOW};

use super::Diagnostic;

pub(super) type Library = libloading::os::unix::Library;

/// Symbols are bound immediately and made globally visible so that the
/// library's own cross-references resolve.
pub(super) fn open(path: &Path) -> Result<Library, libloading::Error> {
    trace!("dlopen({})", path.display());
    unsafe { Library::open(Some(path), RTLD_NOW | RTLD_GLOBAL) }
}

pub(super) fn resolve(library: &Library, symbol: &str) -> Result<*mut c_void, libloading::Error> {
    trace!("dlsym({})", symbol);
    unsafe {
        library
            .get::<*mut c_void>(symbol.as_bytes())
            .map(|symbol| *symbol)
    }
}

/// `dlerror()` text, captured by libloading when the call failed.
pub(super) fn last_error(error: &libloading::Error) -> Diagnostic {
    Diagnostic::Message(error.to_string())
}
