use std::fmt::{self, Display, Formatter};

/// Describes the fundamental object type (blob or commit).
///
/// We use the word `kind` here to avoid conflict with the Rust reserved word `type`.
///
/// The kind is written as the first line of every stored object so that
/// retrieval can tell a commit record apart from file content.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Kind {
    Blob,
    Commit,
}

impl Kind {
    /// Parse the discriminator line of a stored object (without its newline).
    pub fn from_discriminator(line: &[u8]) -> Option<Kind> {
        match line {
            b"blob" => Some(Kind::Blob),
            b"commit" => Some(Kind::Commit),
            _ => None,
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Kind::Blob => write!(f, "blob"),
            Kind::Commit => write!(f, "commit"),
        }
    }
}
