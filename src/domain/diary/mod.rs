//! Diary records and collection shapes

mod entry;
mod mood;

pub use entry::{DiaryEntry, DiaryListItem, DiaryPage, SearchResults};
pub use mood::Mood;
