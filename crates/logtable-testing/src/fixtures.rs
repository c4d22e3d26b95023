//! Generated log content.
//!
//! Every record starts with an ISO-8601 token of the default boundary shape
//! (`YYYY-MM-DDTHH:mm:ss.sss±HH:MM`); some carry continuation lines so that
//! chunk boundaries fall inside records.

use anyhow::Result;
use chrono::{Duration, FixedOffset, NaiveDate, TimeZone};
use std::fs;
use std::path::{Path, PathBuf};

/// The smallest interesting log: two records, the first spanning two lines.
pub const TWO_RECORD_LOG: &str = "\
2024-01-01T10:00:00.000+08:00 INFO service started
  listening on 0.0.0.0:8080
2024-01-01T10:00:01.500+08:00 WARN slow request
";

/// Builder for synthetic log files.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    records: usize,
    stack_every: usize,
    stack_depth: usize,
    preamble: Vec<String>,
    offset_hours: i32,
    crlf: bool,
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self::new(10)
    }
}

impl LogBuilder {
    pub fn new(records: usize) -> Self {
        Self {
            records,
            stack_every: 0,
            stack_depth: 0,
            preamble: Vec::new(),
            offset_hours: 8,
            crlf: false,
        }
    }

    /// Attach `depth` indented continuation lines to every `every`-th record.
    pub fn with_stack_traces(mut self, every: usize, depth: usize) -> Self {
        self.stack_every = every;
        self.stack_depth = depth;
        self
    }

    /// Lines written before the first record (banner, shell noise).
    pub fn with_preamble(mut self, line: impl Into<String>) -> Self {
        self.preamble.push(line.into());
        self
    }

    pub fn with_offset_hours(mut self, hours: i32) -> Self {
        self.offset_hours = hours;
        self
    }

    pub fn with_crlf(mut self) -> Self {
        self.crlf = true;
        self
    }

    /// Timestamp token of record `index` as written in the file.
    pub fn token(&self, index: usize) -> String {
        let offset = FixedOffset::east_opt(self.offset_hours * 3600).expect("offset in range");
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_milli_opt(10, 0, 0, 0))
            .expect("valid base date");
        let at = base + Duration::milliseconds(index as i64 * 1250);
        offset
            .from_local_datetime(&at)
            .single()
            .expect("fixed offsets are unambiguous")
            .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
            .to_string()
    }

    /// Normalized (`YYYY-MM-DD HH:mm:ss.mmm`) form of [`token`](Self::token).
    pub fn normalized(&self, index: usize) -> String {
        let token = self.token(index);
        format!("{} {}", &token[..10], &token[11..23])
    }

    pub fn line_count(&self) -> usize {
        self.preamble.len() + self.records + self.stack_lines()
    }

    fn stack_lines(&self) -> usize {
        if self.stack_every == 0 {
            return 0;
        }
        (0..self.records)
            .filter(|i| i % self.stack_every == 0)
            .count()
            * self.stack_depth
    }

    pub fn build(&self) -> String {
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let mut out = String::new();

        for line in &self.preamble {
            out.push_str(line);
            out.push_str(eol);
        }

        for i in 0..self.records {
            let level = if i % 7 == 3 { "ERROR" } else { "INFO" };
            out.push_str(&format!("{} {} request {} handled", self.token(i), level, i));
            out.push_str(eol);

            if self.stack_every > 0 && i % self.stack_every == 0 {
                for depth in 0..self.stack_depth {
                    out.push_str(&format!(
                        "    at handler::frame_{} (src/lib.rs:{})",
                        depth,
                        10 + depth
                    ));
                    out.push_str(eol);
                }
            }
        }

        out
    }

    pub fn write_to(&self, path: &Path) -> Result<PathBuf> {
        write_log(path, &self.build())
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write_log(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(path.to_path_buf())
}
