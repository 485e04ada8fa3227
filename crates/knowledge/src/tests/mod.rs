//! Crate-level scenario tests for the RAG pipeline.

mod fakes;
mod pipeline_scenarios;
