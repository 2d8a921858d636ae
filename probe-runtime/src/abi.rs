//! C records passed across the library boundary.
//!
//! Each record mirrors the producer's declaration field for field. Layouts are
//! computed from the declarations themselves so the printed documentation
//! always matches what is actually passed.

use std::fmt::{Display, Formatter};
use std::mem::{align_of, offset_of, size_of};
use std::os::raw::c_int;

/// `struct CVector_Float32 { int32_t length; float* data; }`
#[derive(Debug, Copy, Clone)]
#[repr(C)]
pub struct CVectorF32 {
    pub length: i32,
    pub data: *mut f32,
}

/// `struct CVectorPair_Float32 { CVector_Float32 from; CVector_Float32 to; }`,
/// both vectors embedded by value.
#[derive(Debug, Copy, Clone)]
#[repr(C)]
pub struct CVectorPairF32 {
    pub from: CVectorF32,
    pub to: CVectorF32,
}

/// `struct MyTwoVec { int32_t x; int32_t y; }`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct TwoVec {
    pub x: i32,
    pub y: i32,
}

/// `float copyto_and_sum(CVectorPair_Float32 pair)`
pub type CopytoAndSum = unsafe extern "C" fn(CVectorPairF32) -> f32;
/// `int32_t countsame(MyTwoVec* list, int32_t length)`
pub type CountSame = unsafe extern "C" fn(*const TwoVec, i32) -> i32;
/// `int jc_add_one(int value)`
pub type AddOne = unsafe extern "C" fn(c_int) -> c_int;

impl CVectorF32 {
    /// Borrows `data` for the duration of a single call. The length is
    /// capped at `i32::MAX`, the callee never sees more than the buffer holds.
    pub fn new(data: &mut [f32]) -> Self {
        Self {
            length: c_length(data.len()),
            data: data.as_mut_ptr(),
        }
    }
}

fn c_length(length: usize) -> i32 {
    i32::try_from(length).unwrap_or(i32::MAX)
}

impl TwoVec {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A record with a layout that is documented in the probe listing.
pub trait CRecord {
    fn layout() -> RecordLayout;
}

impl CRecord for CVectorF32 {
    fn layout() -> RecordLayout {
        RecordLayout::of::<Self>("CVector_Float32")
            .field::<i32>("length", "int32_t", offset_of!(Self, length))
            .field::<*mut f32>("data", "float*", offset_of!(Self, data))
    }
}

impl CRecord for CVectorPairF32 {
    fn layout() -> RecordLayout {
        RecordLayout::of::<Self>("CVectorPair_Float32")
            .field::<CVectorF32>("from", "CVector_Float32", offset_of!(Self, from))
            .field::<CVectorF32>("to", "CVector_Float32", offset_of!(Self, to))
    }
}

impl CRecord for TwoVec {
    fn layout() -> RecordLayout {
        RecordLayout::of::<Self>("MyTwoVec")
            .field::<i32>("x", "int32_t", offset_of!(Self, x))
            .field::<i32>("y", "int32_t", offset_of!(Self, y))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    pub name: &'static str,
    pub size: usize,
    pub align: usize,
    pub fields: Vec<FieldLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLayout {
    pub name: &'static str,
    pub c_type: &'static str,
    pub offset: usize,
    pub size: usize,
}

impl RecordLayout {
    pub fn of<T>(name: &'static str) -> Self {
        Self {
            name,
            size: size_of::<T>(),
            align: align_of::<T>(),
            fields: vec![],
        }
    }

    pub fn field<T>(mut self, name: &'static str, c_type: &'static str, offset: usize) -> Self {
        self.fields.push(FieldLayout {
            name,
            c_type,
            offset,
            size: size_of::<T>(),
        });
        self
    }

    /// Bytes not covered by any field, between fields or at the end.
    pub fn padding(&self) -> usize {
        self.size - self.fields.iter().map(|field| field.size).sum::<usize>()
    }
}

impl Display for RecordLayout {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} (size {}, align {}, padding {})",
            self.name,
            self.size,
            self.align,
            self.padding()
        )?;
        for field in &self.fields {
            writeln!(
                f,
                "  +{:<3} {} {} ({} bytes)",
                field.offset, field.c_type, field.name, field.size
            )?;
        }
        Ok(())
    }
}
