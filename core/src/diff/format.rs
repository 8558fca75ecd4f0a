use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::{DiffLine, FileDiff, Hunk, LineTag};

/// Reasons why text can not be parsed as a [`FileDiff`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseDiffError {
    #[error("missing `--- ` header line")]
    MissingOldLabel,

    #[error("missing `+++ ` header line")]
    MissingNewLabel,

    #[error("invalid hunk header {0:?}")]
    BadHunkHeader(String),

    #[error("invalid hunk line {0:?}")]
    BadLine(String),

    #[error("hunk {} ends before its line counts are satisfied", .0 + 1)]
    Truncated(usize),
}

impl fmt::Display for FileDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- {}", self.old_label)?;
        writeln!(f, "+++ {}", self.new_label)?;

        for hunk in &self.hunks {
            writeln!(
                f,
                "@@ -{},{} +{},{} @@",
                hunk.old_start, hunk.old_count, hunk.new_start, hunk.new_count
            )?;

            for line in &hunk.lines {
                let prefix = match line.tag {
                    LineTag::Context => ' ',
                    LineTag::Added => '+',
                    LineTag::Removed => '-',
                };
                writeln!(f, "{}{}", prefix, line.text)?;
            }
        }

        Ok(())
    }
}

impl FromStr for FileDiff {
    type Err = ParseDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_suffix('\n').unwrap_or(s);
        let mut lines = body.split('\n');

        let old_label = lines
            .next()
            .and_then(|l| l.strip_prefix("--- "))
            .ok_or(ParseDiffError::MissingOldLabel)?;
        let new_label = lines
            .next()
            .and_then(|l| l.strip_prefix("+++ "))
            .ok_or(ParseDiffError::MissingNewLabel)?;

        let mut hunks = Vec::new();
        while let Some(header) = lines.next() {
            let (old_start, old_count, new_start, new_count) = parse_hunk_header(header)
                .ok_or_else(|| ParseDiffError::BadHunkHeader(header.to_string()))?;

            let (mut old_left, mut new_left) = (old_count, new_count);
            let mut hunk_lines = Vec::new();

            while old_left > 0 || new_left > 0 {
                let line = lines
                    .next()
                    .ok_or(ParseDiffError::Truncated(hunks.len()))?;
                let bad_line = || ParseDiffError::BadLine(line.to_string());

                let (tag, text) = match line.chars().next() {
                    Some(' ') if old_left > 0 && new_left > 0 => {
                        old_left -= 1;
                        new_left -= 1;
                        (LineTag::Context, &line[1..])
                    }
                    Some('-') if old_left > 0 => {
                        old_left -= 1;
                        (LineTag::Removed, &line[1..])
                    }
                    Some('+') if new_left > 0 => {
                        new_left -= 1;
                        (LineTag::Added, &line[1..])
                    }
                    _ => return Err(bad_line()),
                };
                hunk_lines.push(DiffLine::new(tag, text));
            }

            hunks.push(Hunk {
                old_start,
                old_count,
                new_start,
                new_count,
                lines: hunk_lines,
            });
        }

        Ok(FileDiff {
            old_label: old_label.to_string(),
            new_label: new_label.to_string(),
            hunks,
        })
    }
}

/// Parse `@@ -a,b +c,d @@`. A missing count means 1.
fn parse_hunk_header(line: &str) -> Option<(usize, usize, usize, usize)> {
    let ranges = line.strip_prefix("@@ -")?;
    let end = ranges.find(" @@")?;
    let (old, new) = split_pair(&ranges[..end], " +")?;

    let (old_start, old_count) = parse_range(old)?;
    let (new_start, new_count) = parse_range(new)?;
    Some((old_start, old_count, new_start, new_count))
}

fn parse_range(range: &str) -> Option<(usize, usize)> {
    match split_pair(range, ",") {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((range.parse().ok()?, 1)),
    }
}

fn split_pair<'a>(s: &'a str, sep: &str) -> Option<(&'a str, &'a str)> {
    let n = s.find(sep)?;
    Some((&s[..n], &s[n + sep.len()..]))
}
