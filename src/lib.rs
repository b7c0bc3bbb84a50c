//! German lyrics corpus builder - shared modules for the binary.
//!
//! Scrapes artists' lyrics, strips section markers, then lemmatizes,
//! tokenizes and removes stopwords to produce per-artist JSON corpora.

pub mod config;
pub mod corpus;
pub mod driver;
pub mod error;
pub mod filter;
pub mod frequency;
pub mod lemma;
pub mod models;
pub mod pipeline;
pub mod progress;
pub mod safety;
pub mod scrape;
pub mod stopwords;
pub mod tokenize;

pub use error::{Error, Result};
