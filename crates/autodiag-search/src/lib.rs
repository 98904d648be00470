//! Autodiag Search - reference link enrichment
//!
//! Scrapes public search result pages of a parts retailer and a video platform
//! and returns a handful of candidate links. Failures never propagate: a source
//! that cannot be fetched contributes no links.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod links;

pub use error::{Error, Result};
pub use links::{extract_links, LinkFinder, LinkSet, LinkSource, SearchConfig, MAX_LINKS};
