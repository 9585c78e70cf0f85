use log::trace;

use super::mark::{is_break, Mark};
use super::source::InputSource;
use crate::config::ParserConfig;
use crate::error::ParseError;

const BOM: char = '\u{FEFF}';

/// Buffered, decoding view over an [`InputSource`]
///
/// Raw bytes are pulled from the source in chunks and decoded into a
/// character buffer. The buffer keeps every character from the last
/// [`Reader::release_before`] point onwards, so lexemes can be recovered by
/// slicing between two marks.
pub struct Reader {
    source: InputSource,
    chunk_size: usize,
    /// Undecoded bytes; `raw[raw_pos..]` is still pending
    raw: Vec<u8>,
    raw_pos: usize,
    /// Absolute byte offset of `raw[raw_pos]`
    byte_offset: usize,
    /// Decoded characters; `chars[0]` has absolute index `base`
    chars: Vec<char>,
    base: usize,
    mark: Mark,
    eof: bool,
    bom_checked: bool,
}

impl Reader {
    pub fn new(source: InputSource, config: &ParserConfig) -> Result<Self, ParseError> {
        let mut chars = Vec::new();
        chars
            .try_reserve(config.initial_capacity)
            .map_err(|_| ParseError::Memory("character"))?;

        Ok(Reader {
            source,
            chunk_size: config.read_chunk_size.max(4),
            raw: Vec::new(),
            raw_pos: 0,
            byte_offset: 0,
            chars,
            base: 0,
            mark: Mark::default(),
            eof: false,
            bom_checked: false,
        })
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    fn pos(&self) -> usize {
        self.mark.index - self.base
    }

    /// Number of decoded characters not consumed yet
    pub fn unread(&self) -> usize {
        self.chars.len() - self.pos()
    }

    /// Make at least `n` undecoded characters resident, unless the input
    /// ends first
    pub fn ensure_available(&mut self, n: usize) -> Result<(), ParseError> {
        while self.unread() < n && !self.eof {
            self.fill_raw()?;
            self.decode()?;
        }
        Ok(())
    }

    pub fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos() + offset).copied()
    }

    /// True once the source is exhausted and every character consumed
    pub fn at_end(&self) -> bool {
        self.eof && self.unread() == 0
    }

    /// Consume one character that is not a line break
    pub fn skip(&mut self) {
        if let Some(c) = self.peek() {
            self.mark.advance(c);
        }
    }

    /// Consume one line break; CR LF counts as one
    ///
    /// The caller must have made two characters available.
    pub fn skip_line(&mut self) {
        match (self.peek(), self.peek_at(1)) {
            (Some('\r'), Some('\n')) => self.mark.new_line(2, 2),
            (Some(c), _) if is_break(c) => self.mark.new_line(1, c.len_utf8()),
            _ => {}
        }
    }

    /// Text between two marks still held by the buffer
    pub fn slice(&self, start: Mark, end: Mark) -> String {
        if start.index < self.base || end.index < start.index {
            return String::new();
        }
        self.chars
            .get(start.index - self.base..end.index - self.base)
            .map(|chars| chars.iter().collect())
            .unwrap_or_default()
    }

    /// Drop decoded characters before `mark`; they can no longer be sliced
    pub fn release_before(&mut self, mark: Mark) {
        if mark.index <= self.base || mark.index > self.mark.index {
            return;
        }
        let count = mark.index - self.base;
        self.chars.drain(..count);
        self.base = mark.index;
    }

    fn fill_raw(&mut self) -> Result<(), ParseError> {
        if self.raw_pos > 0 {
            self.raw.drain(..self.raw_pos);
            self.raw_pos = 0;
        }

        let filled = self.raw.len();
        self.raw
            .try_reserve(self.chunk_size)
            .map_err(|_| ParseError::Memory("raw input"))?;
        self.raw.resize(filled + self.chunk_size, 0);

        let read = match self.source.read_chunk(&mut self.raw[filled..]) {
            Ok(read) => read,
            Err(source) => {
                self.raw.truncate(filled);
                return Err(ParseError::Io {
                    offset: self.byte_offset + filled,
                    source,
                });
            }
        };
        self.raw.truncate(filled + read);

        if read == 0 {
            self.eof = true;
        }
        trace!("read {} bytes from source (eof: {})", read, self.eof);
        Ok(())
    }

    fn decode(&mut self) -> Result<(), ParseError> {
        let pending = &self.raw[self.raw_pos..];
        let (valid, invalid) = match std::str::from_utf8(pending) {
            Ok(text) => (text, None),
            Err(e) => {
                let valid = std::str::from_utf8(&pending[..e.valid_up_to()]).unwrap_or_default();
                (valid, Some(e.error_len()))
            }
        };

        self.chars
            .try_reserve(valid.len())
            .map_err(|_| ParseError::Memory("character"))?;
        self.chars.extend(valid.chars());
        let consumed = valid.len();

        match invalid {
            Some(Some(_)) => {
                let bad = &pending[consumed..];
                return Err(ParseError::Reader {
                    problem: describe_invalid(bad).to_string(),
                    offset: self.byte_offset + consumed,
                });
            }
            Some(None) if self.eof => {
                return Err(ParseError::Reader {
                    problem: "incomplete UTF-8 octet sequence".to_string(),
                    offset: self.byte_offset + consumed,
                });
            }
            _ => {}
        }

        self.raw_pos += consumed;
        self.byte_offset += consumed;

        if !self.bom_checked && !self.chars.is_empty() {
            self.bom_checked = true;
            if self.chars[0] == BOM && self.mark.index == 0 {
                self.chars.remove(0);
                self.mark.byte += BOM.len_utf8();
            }
        }
        Ok(())
    }
}

/// Name the way an invalid UTF-8 sequence is broken
fn describe_invalid(bytes: &[u8]) -> &'static str {
    let Some(&lead) = bytes.first() else {
        return "incomplete UTF-8 octet sequence";
    };
    let width = match lead {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => return "invalid leading UTF-8 octet",
    };

    let mut value = u32::from(lead) & (0x7F >> width);
    for k in 1..width {
        match bytes.get(k) {
            Some(&b) if b & 0xC0 == 0x80 => value = (value << 6) | u32::from(b & 0x3F),
            Some(_) => return "invalid trailing UTF-8 octet",
            None => return "incomplete UTF-8 octet sequence",
        }
    }

    let overlong = match width {
        2 => value < 0x80,
        3 => value < 0x800,
        _ => value < 0x10000,
    };
    if overlong {
        "invalid length of a UTF-8 sequence"
    } else {
        "invalid Unicode character"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(data: &[u8], chunk_size: usize) -> Reader {
        let config = ParserConfig {
            read_chunk_size: chunk_size,
            ..ParserConfig::default()
        };
        Reader::new(InputSource::bytes(data.to_vec()), &config).unwrap()
    }

    fn drain(reader: &mut Reader) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            reader.ensure_available(2)?;
            match reader.peek() {
                None => return Ok(out),
                Some(c) if is_break(c) => {
                    out.push('\n');
                    reader.skip_line();
                }
                Some(c) => {
                    out.push(c);
                    reader.skip();
                }
            }
        }
    }

    #[test]
    fn test_multibyte_sequence_split_across_reads() {
        // 'é' is two bytes, '😃' four; a 4-byte chunk splits both
        let mut r = reader("café 😃".as_bytes(), 4);
        assert_eq!(drain(&mut r).unwrap(), "café 😃");
        assert_eq!(r.mark().index, 6);
        assert_eq!(r.mark().byte, "café 😃".len());
        assert!(r.at_end());
    }

    #[test]
    fn test_crlf_counts_as_one_line_break() {
        let mut r = reader(b"a\r\nb\rc\nd", 16);
        assert_eq!(drain(&mut r).unwrap(), "a\nb\nc\nd");
        let mark = r.mark();
        assert_eq!(mark.line, 3);
        assert_eq!(mark.column, 1);
        assert_eq!(mark.index, 8);
        assert_eq!(mark.byte, 8);
    }

    #[test]
    fn test_leading_bom_is_skipped() {
        let mut r = reader("\u{FEFF}salt".as_bytes(), 16);
        assert_eq!(drain(&mut r).unwrap(), "salt");
        assert_eq!(r.mark().index, 4);
        assert_eq!(r.mark().byte, 7);
    }

    #[test]
    fn test_invalid_leading_octet() {
        let mut r = reader(b"ab\xFFcd", 16);
        match drain(&mut r) {
            Err(ParseError::Reader { problem, offset }) => {
                assert_eq!(problem, "invalid leading UTF-8 octet");
                assert_eq!(offset, 2);
            }
            other => panic!("expected reader error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_trailing_octet() {
        let mut r = reader(b"\xC3(", 16);
        match drain(&mut r) {
            Err(ParseError::Reader { problem, .. }) => {
                assert_eq!(problem, "invalid trailing UTF-8 octet")
            }
            other => panic!("expected reader error, got {:?}", other),
        }
    }

    #[test]
    fn test_overlong_and_surrogate_sequences() {
        assert_eq!(
            describe_invalid(&[0xC0, 0xAF]),
            "invalid length of a UTF-8 sequence"
        );
        assert_eq!(
            describe_invalid(&[0xE0, 0x80, 0xAF]),
            "invalid length of a UTF-8 sequence"
        );
        assert_eq!(
            describe_invalid(&[0xED, 0xA0, 0x80]),
            "invalid Unicode character"
        );
    }

    #[test]
    fn test_truncated_sequence_at_eof() {
        let mut r = reader(b"ok\xE2\x82", 16);
        match drain(&mut r) {
            Err(ParseError::Reader { problem, offset }) => {
                assert_eq!(problem, "incomplete UTF-8 octet sequence");
                assert_eq!(offset, 2);
            }
            other => panic!("expected reader error, got {:?}", other),
        }
    }

    #[test]
    fn test_slice_and_release() {
        let mut r = reader(b"one two", 16);
        r.ensure_available(7).unwrap();
        let start = r.mark();
        for _ in 0..3 {
            r.skip();
        }
        let end = r.mark();
        assert_eq!(r.slice(start, end), "one");

        r.skip();
        r.release_before(r.mark());
        assert_eq!(r.slice(start, end), "");
        assert_eq!(r.peek(), Some('t'));
        assert_eq!(r.unread(), 3);
    }

    #[test]
    fn test_io_error_is_reported_with_offset() {
        let config = ParserConfig::default();
        let source = InputSource::callback(|_buf: &mut [u8]| {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        });
        let mut r = Reader::new(source, &config).unwrap();
        match r.ensure_available(1) {
            Err(ParseError::Io { offset, .. }) => assert_eq!(offset, 0),
            other => panic!("expected io error, got {:?}", other),
        }
    }
}
