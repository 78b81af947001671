//! SSML composition for markup-capable engines.

mod compose;
mod script;

pub use compose::{Composer, MarkupError, compose, escape_xml};
pub use script::{Segment, parse_script};
