//! Domain Value Objects
//!
//! Immutable value types shared by the tree, its nodes and the adapters.

mod cancellation;
mod change;
mod selection;
mod view_kind;

pub use cancellation::CancellationToken;
pub use change::{
    ActiveEditorEvent, ChangeEvent, ComparisonMode, EditorSubject, FileSystemChangeEvent,
    RepositoryChange, RepositoryChangeEvent,
};
pub use selection::LineRange;
pub use view_kind::ViewKind;
