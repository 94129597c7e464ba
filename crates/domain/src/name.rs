use crate::DomainError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_WIRE_LEN: usize = 255;

/// Fully-qualified domain name held as its labels, leftmost first.
///
/// Equality and hashing ignore ASCII case, so `WWW.Example.COM.` and
/// `www.example.com.` compare equal. The original spelling is kept for
/// display and for the non-canonical wire form.
#[derive(Debug, Clone, Default)]
pub struct DomainName {
    labels: Vec<String>,
}

impl DomainName {
    pub fn root() -> Self {
        Self { labels: Vec::new() }
    }

    /// Parse a presentation-format name. The trailing dot is optional.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "." {
            return Ok(Self::root());
        }

        let body = trimmed.strip_suffix('.').unwrap_or(trimmed);
        Self::from_labels(body.split('.'))
    }

    pub fn from_labels<I, S>(labels: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();

        for label in &labels {
            if label.is_empty() {
                return Err(DomainError::InvalidDomainName(format!(
                    "empty label in '{}'",
                    labels.join(".")
                )));
            }
            if label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(format!(
                    "label '{}' exceeds {} bytes",
                    label, MAX_LABEL_LEN
                )));
            }
        }

        let wire_len: usize = labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1;
        if wire_len > MAX_NAME_WIRE_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "name '{}' exceeds {} bytes in wire form",
                labels.join("."),
                MAX_NAME_WIRE_LEN
            )));
        }

        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub fn is_root(&self) -> bool {
        self.labels.is_empty()
    }

    /// The rightmost `count` labels. `suffix(0)` is the root and counts past
    /// the label count return the whole name.
    pub fn suffix(&self, count: usize) -> DomainName {
        let count = count.min(self.labels.len());
        Self {
            labels: self.labels[self.labels.len() - count..].to_vec(),
        }
    }

    pub fn parent(&self) -> Option<DomainName> {
        if self.is_root() {
            None
        } else {
            Some(Self {
                labels: self.labels[1..].to_vec(),
            })
        }
    }

    /// True when `self` equals `zone` or sits below it.
    pub fn is_subdomain_of(&self, zone: &DomainName) -> bool {
        zone.labels.len() <= self.labels.len()
            && self
                .labels
                .iter()
                .rev()
                .zip(zone.labels.iter().rev())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }

    pub fn to_lowercase(&self) -> DomainName {
        Self {
            labels: self.labels.iter().map(|l| l.to_ascii_lowercase()).collect(),
        }
    }

    /// Uncompressed wire form, original case.
    pub fn to_wire(&self) -> Vec<u8> {
        self.encode(false)
    }

    /// Uncompressed wire form with every label lowercased (RFC 4034 §6.2).
    pub fn to_canonical_wire(&self) -> Vec<u8> {
        self.encode(true)
    }

    fn encode(&self, lowercase: bool) -> Vec<u8> {
        let mut wire = Vec::with_capacity(self.labels.iter().map(|l| l.len() + 1).sum::<usize>() + 1);
        for label in &self.labels {
            wire.push(label.len() as u8);
            if lowercase {
                wire.extend(label.bytes().map(|b| b.to_ascii_lowercase()));
            } else {
                wire.extend_from_slice(label.as_bytes());
            }
        }
        wire.push(0);
        wire
    }
}

impl PartialEq for DomainName {
    fn eq(&self, other: &Self) -> bool {
        self.labels.len() == other.labels.len()
            && self
                .labels
                .iter()
                .zip(other.labels.iter())
                .all(|(a, b)| a.eq_ignore_ascii_case(b))
    }
}

impl Eq for DomainName {}

impl Hash for DomainName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.labels.len().hash(state);
        for label in &self.labels {
            for byte in label.bytes() {
                state.write_u8(byte.to_ascii_lowercase());
            }
            state.write_u8(b'.');
        }
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for label in &self.labels {
            write!(f, "{}.", label)?;
        }
        Ok(())
    }
}

impl FromStr for DomainName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
