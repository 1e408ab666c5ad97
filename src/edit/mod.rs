//! Edit intents and their application.
//!
//! An [`EditIntent`] names what to change; the [`EditApplier`] resolves its
//! target inside a located section and performs the mutation, returning a
//! [`ChangeRecord`](crate::report::ChangeRecord) for every completed change.

mod apply;
pub mod cleanup;
mod intent;
pub mod text_ops;

pub use apply::{ApplyOptions, EditApplier};
pub use intent::{normalize_text, EditIntent, RowMarks, SectionEdit, SectionEdits};
