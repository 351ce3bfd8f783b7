mod reader;
mod timestamp;
mod types;
mod url_parts;

pub use reader::HarReader;
pub use timestamp::parse_timestamp;
pub use types::*;
pub use url_parts::UrlParts;
