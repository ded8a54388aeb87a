//! Generic alignment algorithms shared by the diff engine.
//!
//! Two strategies live here:
//!
//! - [`merge_join`] pairs two *key-sorted, duplicate-free* sequences by
//!   identity in one forward pass (hosts by id, script results by script
//!   id).
//! - [`diff_slices`] aligns two *ordered* sequences positionally into an
//!   edit script of equal/delete/insert/replace runs (OS match lists,
//!   script output lines).

mod merge;
mod sequence;

pub use merge::{merge_join, Aligned, MergeJoin};
pub use sequence::{diff_slices, OpTag, Opcode};
