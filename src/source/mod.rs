// src/source/mod.rs
// =============================================================================
// Where the URLs come from, and which of them we keep.
//
// Submodules:
// - loader: inline --url list or --input-file, in input order
// - validate: keeps absolute http/https URLs, silently drops the rest
// =============================================================================

mod loader;
mod validate;

pub use loader::UrlSource;
pub use validate::validate;
