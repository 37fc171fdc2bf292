//! Core of the VSC video speed controls.
//!
//! Everything here is host-agnostic: the browser binding (`vsc-web`) and the
//! in-memory page used by tests both implement [`host::Host`], and the
//! content-script session in [`scanner`] drives controls through it.

pub mod blacklist;
pub mod config;
pub mod control;
pub mod host;
pub mod keys;
pub mod logging;
pub mod registry;
pub mod scanner;
pub mod speed;
