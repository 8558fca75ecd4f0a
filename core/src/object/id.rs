use std::fmt::{self, Write};
use std::str::FromStr;

use thiserror::Error;

/// Number of bytes in an object ID (SHA-256).
pub const ID_LEN: usize = 32;

/// Number of hex digits in the printed form of an object ID.
pub const HEX_LEN: usize = ID_LEN * 2;

/// An error which can be returned when parsing an object ID.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ParseIdError {
    /// Value being parsed is empty.
    #[error("cannot parse object ID from empty string")]
    Empty,

    /// Contains an invalid digit.
    ///
    /// Uppercase hex digits are rejected so that every ID has exactly
    /// one printed form.
    #[error("value contains invalid digit `{0}`")]
    InvalidDigit(char),

    /// ID string is longer than 64 digits (or byte slice longer than 32 bytes).
    #[error("value is more than 64 digits long")]
    Overflow,

    /// ID string is shorter than 64 digits (or byte slice shorter than 32 bytes).
    #[error("value is less than 64 digits long")]
    Underflow,

    /// Value was zero.
    #[error("ID would be zero")]
    Zero,
}

/// An object ID identifies an object within a repository by the SHA-256
/// digest of its content. It is stored as 32 bytes and printed as 64
/// lowercase hex digits.
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Id {
    id: [u8; ID_LEN],
}

impl Id {
    /// Create a new ID from a 32-byte digest.
    ///
    /// It is an error if the slice contains anything other than 32 bytes.
    pub fn new(id: &[u8]) -> Result<Id, ParseIdError> {
        match id.len() {
            ID_LEN => {
                let mut bytes = [0u8; ID_LEN];
                bytes.copy_from_slice(id);
                Ok(Id { id: bytes })
            }
            0 => Err(ParseIdError::Empty),
            n if n < ID_LEN => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    /// Convert a 64-character hex ID to an object ID.
    ///
    /// It is an error if the ID contains anything other than 64 lowercase
    /// hex digits, or if every digit is zero.
    pub fn from_hex<T: AsRef<[u8]>>(id: T) -> Result<Id, ParseIdError> {
        let hex = id.as_ref();

        match hex.len() {
            HEX_LEN => {
                let mut bytes = [0u8; ID_LEN];
                for (byte, pair) in bytes.iter_mut().zip(hex.chunks(2)) {
                    *byte = digit_value(pair[0])? << 4 | digit_value(pair[1])?;
                }

                if bytes.iter().all(|x| *x == 0) {
                    Err(ParseIdError::Zero)
                } else {
                    Ok(Id { id: bytes })
                }
            }
            0 => Err(ParseIdError::Empty),
            n if n < HEX_LEN => Err(ParseIdError::Underflow),
            _ => Err(ParseIdError::Overflow),
        }
    }

    /// Return the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.id
    }

    /// Return the first 8 hex digits, for human-facing output.
    pub fn short(&self) -> String {
        let mut s = self.to_string();
        s.truncate(8);
        s
    }

    /// Split the printed ID into the shard directory name (first two digits)
    /// and the file name (the remaining 62).
    pub fn shard(&self) -> (String, String) {
        let mut dir = self.to_string();
        let file = dir.split_off(2);
        (dir, file)
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::from_hex(s.as_bytes())
    }
}

static CHARS: &[u8] = b"0123456789abcdef";

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &byte in self.id.iter() {
            f.write_char(CHARS[(byte >> 4) as usize].into())?;
            f.write_char(CHARS[(byte & 0xf) as usize].into())?;
        }

        Ok(())
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

fn digit_value(c: u8) -> Result<u8, ParseIdError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        _ => Err(ParseIdError::InvalidDigit(c as char)),
    }
}
