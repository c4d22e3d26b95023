use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::{Error, Result};

/// A window of consecutive lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-indexed number of the first line in `lines`.
    pub first_line: u64,
    /// 1-indexed number of the last line in `lines`.
    pub last_line: u64,
    pub lines: Vec<String>,
    /// No lines follow this chunk.
    pub is_last: bool,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Sequential reader yielding `chunk_size`-line windows from one open file.
///
/// Memory use is bounded by one chunk regardless of file size.
pub struct ChunkReader<R = BufReader<File>> {
    reader: R,
    chunk_size: usize,
    next_line: u64,
    exhausted: bool,
    buf: Vec<u8>,
}

impl ChunkReader<BufReader<File>> {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::file_access(path, e))?;
        Ok(Self::new(BufReader::new(file), chunk_size))
    }
}

impl<R: BufRead> ChunkReader<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size: chunk_size.max(1),
            next_line: 1,
            exhausted: false,
            buf: Vec::new(),
        }
    }

    /// Read the next window; `None` once the input is exhausted.
    pub fn next_chunk(&mut self) -> io::Result<Option<Chunk>> {
        if self.exhausted {
            return Ok(None);
        }

        let first_line = self.next_line;
        let mut lines = Vec::with_capacity(self.chunk_size.min(1024));

        while lines.len() < self.chunk_size {
            match read_line(&mut self.reader, &mut self.buf)? {
                Some(line) => lines.push(line),
                None => {
                    self.exhausted = true;
                    break;
                }
            }
        }

        if !self.exhausted && self.reader.fill_buf()?.is_empty() {
            self.exhausted = true;
        }

        if lines.is_empty() {
            return Ok(None);
        }

        self.next_line += lines.len() as u64;
        Ok(Some(Chunk {
            first_line,
            last_line: self.next_line - 1,
            lines,
            is_last: self.exhausted,
        }))
    }
}

impl<R: BufRead> Iterator for ChunkReader<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

/// Read one line without its terminator. Invalid UTF-8 is replaced, and a
/// trailing `\r` is dropped.
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    Ok(Some(String::from_utf8_lossy(buf).into_owned()))
}

/// Lines `start_line..=end_line` (1-indexed) joined with `\n`.
///
/// Streams the file and stops at `end_line`. Returns an empty string when
/// `start_line` is past the end of the file or the range is empty.
pub fn read_lines(path: &Path, start_line: u64, end_line: u64) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::file_access(path, e))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let start_line = start_line.max(1);
    let mut selected = Vec::new();
    let mut line_no = 0u64;

    while line_no < end_line {
        let Some(line) = read_line(&mut reader, &mut buf).map_err(|e| Error::file_access(path, e))?
        else {
            break;
        };
        line_no += 1;
        if line_no >= start_line {
            selected.push(line);
        }
    }

    Ok(selected.join("\n"))
}

/// Total number of lines, counting a final unterminated line.
pub fn count_lines(path: &Path) -> Result<u64> {
    let file = File::open(path).map_err(|e| Error::file_access(path, e))?;
    let mut reader = BufReader::new(file);
    let mut count = 0u64;

    loop {
        let available = reader.fill_buf().map_err(|e| Error::file_access(path, e))?;
        if available.is_empty() {
            break;
        }

        let len = available.len();
        let newlines = available.iter().filter(|&&b| b == b'\n').count() as u64;
        let ends_with_newline = available[len - 1] == b'\n';
        count += newlines;
        reader.consume(len);

        // An unterminated tail is still a line
        if !ends_with_newline
            && reader
                .fill_buf()
                .map_err(|e| Error::file_access(path, e))?
                .is_empty()
        {
            count += 1;
        }
    }

    Ok(count)
}
