//! The `boreal` CLI driver (spec 6): a thin, humanly-inspectable harness
//! over `boreal_sem::analyze`/`find_definition`. Not an LSP server — it
//! does not implement the editor protocol, only exercises the same
//! entry points one would sit behind.

pub mod commands;
pub mod error;
