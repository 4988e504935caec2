//! stark: semi-structured knowledge bases for retrieval experiments.
//!
//! stark builds the Amazon product knowledge base from the public review, metadata and Q&A
//! dumps, renders its nodes as retrieval documents, indexes them with BM25 and evaluates
//! rankings against labeled queries. The knowledge base, index and configuration live in
//! their own crates; this crate holds the `stark` command-line tool.

#![warn(missing_docs)]

pub mod cli;
