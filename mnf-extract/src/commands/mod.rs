//! One module per CLI subcommand, each a thin, independently testable
//! function over `mnf-archive`/`mnf-lang` plus the shared [`crate::pipeline`].

mod debug_mnf;
mod dump_index;
mod dump_mnf;
mod extract_all;
mod extract_file;
mod parse_lng;
mod test_zosft;
mod write_lng;

pub use debug_mnf::debug_mnf;
pub use dump_index::dump_index;
pub use dump_mnf::dump_mnf;
pub use extract_all::{extract_all, ExtractAllOptions};
pub use extract_file::extract_file;
pub use parse_lng::parse_lng;
pub use test_zosft::test_zosft;
pub use write_lng::write_lng;
