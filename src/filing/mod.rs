pub mod html;
pub mod pages;

pub use pages::{split_file, PagedDocument, SplitError, SplitPage};
