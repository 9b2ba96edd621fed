//! Data retrieval: the poll source client and HTML table extraction.

pub mod html;
pub mod source;

pub use html::{extract_first_table, RawTable};
pub use source::PollsClient;
