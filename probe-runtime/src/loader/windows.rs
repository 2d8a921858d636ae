use std::ffi::c_void;
use std::path::Path;

use super::Diagnostic;

pub(super) type Library = libloading::os::windows::Library;

pub(super) fn open(path: &Path) -> Result<Library, libloading::Error> {
    trace!("LoadLibraryExW({})", path.display());
    unsafe { Library::new(path) }
}

pub(super) fn resolve(library: &Library, symbol: &str) -> Result<*mut c_void, libloading::Error> {
    trace!("GetProcAddress({})", symbol);
    unsafe {
        library
            .get::<*mut c_void>(symbol.as_bytes())
            .map(|symbol| *symbol)
    }
}

/// The `GetLastError()` code libloading captured when the call failed.
pub(super) fn last_error(error: &libloading::Error) -> Diagnostic {
    let code = std::error::Error::source(error)
        .and_then(|source| source.downcast_ref::<std::io::Error>())
        .and_then(std::io::Error::raw_os_error);

    match code {
        Some(code) => Diagnostic::Code {
            code,
            message: error.to_string(),
        },
        None => Diagnostic::Message(error.to_string()),
    }
}
