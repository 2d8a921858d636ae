//! Process exit codes. Checks are numbered in declaration order and every
//! check owns two codes, so a caller can tell the failing stage from the code
//! alone.

pub const SUCCESS: u8 = 0;
/// Progress output could not be written.
pub const OUTPUT: u8 = 1;
pub const USAGE: u8 = 2;
pub const LIBRARY_NOT_LOADABLE: u8 = 3;
const FIRST_CHECK: usize = 4;

/// Exit code when the symbol of the check at `index` is not exported.
pub fn symbol_not_found(index: usize) -> u8 {
    check_code(index, 0)
}

/// Exit code when the check at `index` produced an unexpected result.
pub fn unexpected_result(index: usize) -> u8 {
    check_code(index, 1)
}

fn check_code(index: usize, stage: usize) -> u8 {
    index
        .checked_mul(2)
        .and_then(|offset| offset.checked_add(FIRST_CHECK + stage))
        .and_then(|code| u8::try_from(code).ok())
        .unwrap_or(u8::MAX)
}
