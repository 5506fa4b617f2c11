//! Use cases

pub mod run_discussion;
