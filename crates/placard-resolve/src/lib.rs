//! # placard-resolve
//!
//! Resolves the effective composer placeholder for a context.
//!
//! - **Chain**: the candidate categories, nearest first, with a cycle and
//!   depth guard ([`build_chain`], [`build_chain_async`])
//! - **Engine**: most-specific category wins, last authored rule wins within
//!   it ([`resolve`], [`resolve_detailed`], [`resolve_async`])
//!
//! Resolution is total: every input produces a [`placard_core::Placeholder`],
//! possibly the empty "no override" value.

#![deny(unsafe_code)]

pub mod chain;
pub mod engine;

pub use chain::{AncestryChain, ChainEnd, MAX_CHAIN_DEPTH, build_chain, build_chain_async};
pub use engine::{Resolution, RuleMatch, resolve, resolve_async, resolve_detailed, select};
