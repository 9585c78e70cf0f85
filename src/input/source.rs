use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};

/// Pull callback: fill the buffer, return the byte count, `Ok(0)` at EOF
pub type ReadCallback = Box<dyn FnMut(&mut [u8]) -> io::Result<usize>>;

/// Where the parser pulls its bytes from
///
/// Exactly one source is chosen per parser instance.
pub enum InputSource {
    /// An in-memory byte span
    Bytes(Cursor<Vec<u8>>),
    /// An already opened file
    File(File),
    /// Any blocking reader
    Reader(Box<dyn Read>),
    /// A read callback
    Callback(ReadCallback),
}

impl InputSource {
    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        InputSource::Bytes(Cursor::new(data.into()))
    }

    pub fn callback<F>(read: F) -> Self
    where
        F: FnMut(&mut [u8]) -> io::Result<usize> + 'static,
    {
        InputSource::Callback(Box::new(read))
    }

    /// Read at most `buf.len()` bytes, retrying interrupted reads
    pub(crate) fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let result = match self {
                InputSource::Bytes(cursor) => cursor.read(buf),
                InputSource::File(file) => file.read(buf),
                InputSource::Reader(reader) => reader.read(buf),
                InputSource::Callback(read) => read(buf),
            };
            match result {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

impl fmt::Debug for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Bytes(cursor) => f
                .debug_tuple("Bytes")
                .field(&cursor.get_ref().len())
                .finish(),
            InputSource::File(file) => f.debug_tuple("File").field(file).finish(),
            InputSource::Reader(_) => f.write_str("Reader(..)"),
            InputSource::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}
