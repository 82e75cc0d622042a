//! Codec primitives.
//!
//! These are the black-box collaborators external to the UCI multiplexing
//! logic: bit packing, the Reed-Muller block code, and the polar code
//! kernel (parameter derivation, channel allocation, encode/decode, rate
//! matching). CRC-6/CRC-11 live in `common::utils`.

pub mod bitops;
pub mod block;
pub mod polar;
