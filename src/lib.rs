//! txtsift - Health-domain sentence filtering
//!
//! Runs sentences extracted from documents through four stages (noise
//! removal, domain relevance, completeness analysis and complete-thought
//! validation) and keeps only self-contained, domain-relevant sentences.

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod filtering;
pub mod llm;
pub mod patterns;

pub use error::{Result, TxtsiftError};
