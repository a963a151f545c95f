//! Helpers shared by credential types.

use std::fmt;

/// Debug view of a secret that keeps only enough of it to tell tokens apart.
///
/// Secrets shorter than 12 chars are hidden entirely, longer ones keep
/// three chars on each side. An empty secret prints as `EMPTY`.
#[derive(Clone, Copy)]
pub struct Redact<'a>(&'a str);

impl<'a, T: AsRef<str> + ?Sized> From<&'a T> for Redact<'a> {
    fn from(value: &'a T) -> Self {
        Redact(value.as_ref())
    }
}

impl fmt::Debug for Redact<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chars: Vec<char> = self.0.chars().collect();
        match chars.len() {
            0 => f.write_str("EMPTY"),
            n if n < 12 => f.write_str("***"),
            n => {
                let head: String = chars[..3].iter().collect();
                let tail: String = chars[n - 3..].iter().collect();
                write!(f, "{head}***{tail}")
            }
        }
    }
}
