//! CLI subcommand modules.
//!
//! This module contains the implementations for all tally CLI subcommands.

pub(crate) mod combine;
pub(crate) mod methods;
