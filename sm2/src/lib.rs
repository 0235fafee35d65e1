#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(
    clippy::mod_module_files,
    clippy::cast_lossless,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::checked_conversions,
    clippy::implicit_saturating_sub,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    missing_docs,
    rust_2018_idioms,
    unused_lifetimes,
    unused_qualifications
)]

extern crate alloc;

pub mod dsa;

mod arithmetic;
mod distid;
mod error;

pub use crate::{
    arithmetic::{
        AffinePoint, CurveParams, ProjectivePoint,
        field::{FIELD_SIZE, mod_inverse},
    },
    distid::{hash_msg, hash_z},
    error::{Error, Result},
};
pub use num_bigint::BigUint;
pub use shangmi_sm3 as sm3;

/// SM3 hash output.
pub type Hash = shangmi_sm3::Hash;

/// SM2 field element or scalar serialized as big endian bytes.
pub type FieldBytes = [u8; FIELD_SIZE];

/// Cap on every rejection sampling loop in this crate.
///
/// Each loop accepts on its first iteration except with probability around
/// `2^-32` or smaller, so reaching the cap means the inputs are degenerate.
pub(crate) const MAX_ATTEMPTS: usize = 64;
