pub mod datetime;
pub mod merge;
pub mod note;
pub mod search;
pub mod time_serde;

pub use merge::{merge, requires_embedding};
pub use note::{Note, NoteUpdate};
pub use search::{SearchMetadata, SearchResult, normalize};
