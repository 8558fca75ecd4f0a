use std::fmt;
use std::str::{self, FromStr};
use std::time::{SystemTime, UNIX_EPOCH};

use super::parse_utils::split_once;

/// An `Attribution` combines a person's identity (name and e-mail address)
/// with the timestamp for a particular action.
///
/// Attributions appear on the `author` and `committer` lines of a commit.
///
/// The `timestamp` value is in seconds relative to the Unix epoch. Name and
/// e-mail are sanitized on construction so that the stored values are exactly
/// what gets serialized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Attribution {
    name: String,
    email: String,
    timestamp: i64,
    tz_offset: i16,
}

const MIN_TZ_OFFSET: i16 = -720;
const MAX_TZ_OFFSET: i16 = 840;

impl Attribution {
    /// Creates a new attribution in UTC.
    pub fn new(name: &str, email: &str, timestamp: i64) -> Attribution {
        Attribution {
            name: sanitize(name),
            email: sanitize(email),
            timestamp,
            tz_offset: 0,
        }
    }

    /// Creates a new attribution stamped with the current system time.
    pub fn now(name: &str, email: &str) -> Attribution {
        let timestamp = match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        };
        Attribution::new(name, email, timestamp)
    }

    /// Parse the value of a name line (e.g. author, committer) into an
    /// `Attribution` struct. Expects `Name <email> timestamp +hhmm`.
    /// Returns `None` if unable to parse the line properly.
    pub fn parse(line: &[u8]) -> Option<Attribution> {
        let line = drop_last_newline(line);
        if !line.contains(&b'<') {
            return None;
        }

        let (name, line) = split_once(line, &b'<');
        let name = str::from_utf8(drop_last_space(name)).ok()?;

        if !line.contains(&b'>') {
            return None;
        }

        let (email, line) = split_once(line, &b'>');
        let email = str::from_utf8(email).ok()?;

        let mut words = str::from_utf8(line).ok()?.split_whitespace();
        let timestamp = i64::from_str(words.next()?).ok()?;
        let tz_offset = tz_from_str(words.next()?)?;
        if words.next().is_some() {
            return None;
        }

        Some(Attribution {
            name: sanitize(name),
            email: sanitize(email),
            timestamp,
            tz_offset,
        })
    }

    /// Returns the person's human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the person's email address.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the timestamp (seconds since the Unix epoch).
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the timezone offset (minutes relative to GMT).
    pub fn tz_offset(&self) -> i16 {
        self.tz_offset
    }

    /// Returns the timezone formatted in human readable offset from GMT.
    pub fn format_tz(&self) -> String {
        let sign = if self.tz_offset < 0 { "-" } else { "+" };

        let offset = self.tz_offset.abs();
        let hours = offset / 60;
        let min = offset % 60;

        format!("{}{:02}{:02}", sign, hours, min)
    }
}

fn drop_last_newline(s: &[u8]) -> &[u8] {
    if s.last() == Some(&b'\n') {
        &s[0..s.len() - 1]
    } else {
        s
    }
}

fn drop_last_space(s: &[u8]) -> &[u8] {
    if s.last() == Some(&b' ') {
        &s[0..s.len() - 1]
    } else {
        s
    }
}

fn tz_from_str(s: &str) -> Option<i16> {
    let s = s.as_bytes();

    if s.len() != 5 {
        return None;
    }

    let sign: i16 = match s[0] {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };

    let hh = from_digit(s[1])? * 10 + from_digit(s[2])?;
    let mm = from_digit(s[3])? * 10 + from_digit(s[4])?;
    if mm >= 60 {
        return None;
    }

    let offset = sign * (hh * 60 + mm);
    if offset < MIN_TZ_OFFSET || offset > MAX_TZ_OFFSET {
        None
    } else {
        Some(offset)
    }
}

fn from_digit(digit: u8) -> Option<i16> {
    if digit.is_ascii_digit() {
        Some((digit - b'0') as i16)
    } else {
        None
    }
}

fn sanitize(s: &str) -> String {
    // Remove control characters and angle brackets.
    s.trim()
        .chars()
        .filter(|c| !c.is_control() && *c != '<' && *c != '>')
        .collect()
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} <{}> {} {}",
            self.name,
            self.email,
            self.timestamp,
            self.format_tz()
        )
    }
}
