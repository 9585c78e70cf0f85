//! Byte sources, UTF-8 decoding and position tracking

mod mark;
mod reader;
mod source;

pub use mark::{is_blank, is_break, Mark};
pub use reader::Reader;
pub use source::{InputSource, ReadCallback};
