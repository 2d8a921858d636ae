use std::fmt::{Display, Formatter};

use crate::{RecordLayout, SymbolAddress};

/// A value returned by a probed function.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Observed {
    Float(f32),
    Integer(i64),
}

/// What a probed function must return.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Expected {
    /// Floating point results are compared within an inclusive window,
    /// summation order across compilers is not bit-identical.
    Within { value: f32, tolerance: f32 },
    Exactly(i64),
}

impl Expected {
    pub fn accepts(&self, observed: &Observed) -> bool {
        match (self, observed) {
            (Expected::Within { value, tolerance }, Observed::Float(observed)) => {
                (observed - value).abs() <= *tolerance
            }
            (Expected::Exactly(value), Observed::Integer(observed)) => value == observed,
            _ => false,
        }
    }
}

impl Display for Observed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Observed::Float(value) => write!(f, "{:.6}", value),
            Observed::Integer(value) => write!(f, "{}", value),
        }
    }
}

impl Display for Expected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expected::Within { value, tolerance } => write!(f, "{:.6} +/- {:.6}", value, tolerance),
            Expected::Exactly(value) => write!(f, "{}", value),
        }
    }
}

/// A call with literal arguments and its expected result.
///
/// `invoke` is the trust boundary: it casts the resolved address to the
/// signature declared here and passes records laid out as `records` describes.
#[derive(Clone)]
pub struct Call {
    pub signature: &'static str,
    pub input: &'static str,
    /// Prefix of the progress line that reports the result.
    pub label: &'static str,
    pub records: fn() -> Vec<RecordLayout>,
    pub invoke: unsafe fn(SymbolAddress) -> Observed,
    pub expected: Expected,
}

impl std::fmt::Debug for Call {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Call")
            .field("signature", &self.signature)
            .field("input", &self.input)
            .field("expected", &self.expected)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum CheckKind {
    /// The symbol only has to be exported.
    Exported,
    Call(Call),
}

#[derive(Debug, Clone)]
pub struct Check {
    symbol: String,
    kind: CheckKind,
}

impl Check {
    pub fn exported(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            kind: CheckKind::Exported,
        }
    }

    pub fn call(symbol: impl Into<String>, call: Call) -> Self {
        Self {
            symbol: symbol.into(),
            kind: CheckKind::Call(call),
        }
    }

    pub fn symbol(&self) -> &str {
        self.symbol.as_str()
    }

    pub fn kind(&self) -> &CheckKind {
        &self.kind
    }
}
