// Resume ingestion: PDF upload to plain text for the drafting prompt.

pub mod extract;
pub mod handlers;
