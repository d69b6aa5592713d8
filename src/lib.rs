#![deny(unsafe_code, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Ordered chains of [tower](https://docs.rs/tower/latest/tower/) layers and call interceptors.
//!
//! A chain is built once and used to wrap any number of handlers. The first
//! element of a chain is always the outermost one.

pub mod chain;
pub mod error;
pub mod intercept;

#[cfg(test)]
mod test;
