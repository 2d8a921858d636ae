//! A shared library that exports a conforming implementation of every symbol
//! the probe suites check. The record declarations here are the producer side
//! of the ABI, declared independently of the probe's own.
#![allow(non_camel_case_types)]

use std::os::raw::c_int;

#[derive(Debug, Copy, Clone)]
#[repr(C)]
pub struct CVector_Float32 {
    pub length: i32,
    pub data: *mut f32,
}

#[derive(Debug, Copy, Clone)]
#[repr(C)]
pub struct CVectorPair_Float32 {
    pub from: CVector_Float32,
    pub to: CVector_Float32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(C)]
pub struct MyTwoVec {
    pub x: i32,
    pub y: i32,
}

impl CVector_Float32 {
    fn as_slice<'a>(&self) -> &'a [f32] {
        if self.data.is_null() || self.length <= 0 {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.data, self.length as usize) }
    }

    fn as_mut_slice<'a>(&mut self) -> &'a mut [f32] {
        if self.data.is_null() || self.length <= 0 {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.data, self.length as usize) }
    }
}

/// Copies `from` into `to` (up to the shorter length) and returns the sum of `to`.
#[no_mangle]
pub extern "C" fn copyto_and_sum(pair: CVectorPair_Float32) -> f32 {
    let mut to = pair.to;
    let from = pair.from.as_slice();
    let destination = to.as_mut_slice();

    let count = from.len().min(destination.len());
    destination[..count].copy_from_slice(&from[..count]);
    destination.iter().sum()
}

/// Counts the records whose two fields are equal.
#[no_mangle]
pub extern "C" fn countsame(list: *const MyTwoVec, length: i32) -> i32 {
    if list.is_null() || length <= 0 {
        return 0;
    }
    let list = unsafe { std::slice::from_raw_parts(list, length as usize) };
    list.iter().filter(|each| each.x == each.y).count() as i32
}

#[no_mangle]
pub extern "C" fn jc_add_one(value: c_int) -> c_int {
    value.wrapping_add(1)
}
