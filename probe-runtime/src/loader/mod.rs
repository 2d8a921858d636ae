//! Dynamic loading behind a platform-neutral interface.
//!
//! Only three operations differ between the POSIX loader and the Windows
//! module loader: opening a library by path, resolving a symbol by name and
//! describing the last loader error. They live in the platform module picked
//! at build time, everything above it is shared.

use std::ffi::c_void;
use std::fmt::{Display, Formatter};
use std::mem::ManuallyDrop;
use std::path::Path;
use std::ptr::NonNull;

#[cfg(unix)]
#[path = "unix.rs"]
mod platform;
#[cfg(windows)]
#[path = "windows.rs"]
mod platform;

/// A source of loaded libraries and their exported symbols.
pub trait Loader {
    type Library;

    fn open(&self, path: &Path) -> Result<Self::Library, Diagnostic>;
    fn resolve(&self, library: &Self::Library, symbol: &str) -> Result<SymbolAddress, Diagnostic>;
}

/// The loader's own description of a failure: a message string on POSIX,
/// an error code on Windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Message(String),
    Code { code: i32, message: String },
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Message(message) => write!(f, "{}", message),
            Diagnostic::Code { code, message } => write!(f, "error code {} ({})", code, message),
        }
    }
}

/// A non-null address of an exported symbol. The loader attaches no type
/// information to it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SymbolAddress(NonNull<c_void>);

impl SymbolAddress {
    pub fn new(address: *mut c_void) -> Option<Self> {
        NonNull::new(address).map(Self)
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.0.as_ptr()
    }

    /// Reinterprets the address as a function pointer of type `F`.
    ///
    /// # Safety
    /// `F` must be an `extern "C"` function pointer type whose signature and
    /// argument layouts match the exported symbol exactly. A mismatch is
    /// undefined behaviour, not a reported error.
    pub unsafe fn cast<F: Copy>(self) -> F {
        const {
            assert!(
                std::mem::size_of::<F>() == std::mem::size_of::<*mut c_void>(),
                "symbols can only be cast to function pointers"
            )
        };
        std::mem::transmute_copy(&self.0.as_ptr())
    }
}

/// A library opened by the platform loader. It is never unloaded: the
/// handle lives until the process exits.
pub struct SystemLibrary(ManuallyDrop<platform::Library>);

impl std::fmt::Debug for SystemLibrary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SystemLibrary").finish()
    }
}

/// The host's dynamic loader: `dlopen`/`dlsym` with `RTLD_NOW | RTLD_GLOBAL`
/// on unix, `LoadLibraryExW`/`GetProcAddress` on windows.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemLoader;

impl SystemLoader {
    pub fn new() -> Self {
        Self
    }
}

impl Loader for SystemLoader {
    type Library = SystemLibrary;

    fn open(&self, path: &Path) -> Result<SystemLibrary, Diagnostic> {
        platform::open(path)
            .map(|library| SystemLibrary(ManuallyDrop::new(library)))
            .map_err(|error| platform::last_error(&error))
    }

    fn resolve(&self, library: &SystemLibrary, symbol: &str) -> Result<SymbolAddress, Diagnostic> {
        let address = platform::resolve(&library.0, symbol).map_err(|error| platform::last_error(&error))?;
        SymbolAddress::new(address)
            .ok_or_else(|| Diagnostic::Message(format!("{}: symbol resolved to a null address", symbol)))
    }
}
