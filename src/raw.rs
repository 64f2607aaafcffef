//! Mirrors of the kernel's C definitions.
//!
//! Only the parts needed to create and drive a virtual keyboard are declared here.

#![allow(non_camel_case_types, non_snake_case)]

pub mod input;
pub mod uinput;
