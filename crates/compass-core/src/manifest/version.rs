//! Release version identifiers.
//!
//! Covers the public-version subset used by requirements files:
//! `[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`, with the usual
//! alternate spellings (`alpha`, `-1` for post releases, `_`/`-` separators).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::VersionError;

/// Pre-release phase. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreKind {
    Alpha,
    Beta,
    Candidate,
}

impl PreKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::Candidate => "rc",
        }
    }
}

/// A parsed version.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    pub epoch: u64,
    pub release: Vec<u64>,
    pub pre: Option<(PreKind, u64)>,
    pub post: Option<u64>,
    pub dev: Option<u64>,
    pub local: Option<String>,
}

impl Version {
    /// A final release from its segments.
    pub fn new(release: impl Into<Vec<u64>>) -> Self {
        Self {
            epoch: 0,
            release: release.into(),
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::Invalid(input.to_string());

        let lowered = input.trim().to_ascii_lowercase();
        let text = lowered.strip_prefix('v').unwrap_or(&lowered);
        if text.is_empty() {
            return Err(invalid());
        }

        let (public, local) = match text.split_once('+') {
            Some((public, local)) => {
                let valid_local = !local.is_empty()
                    && local
                        .split(['.', '-', '_'])
                        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()));
                if !valid_local {
                    return Err(invalid());
                }
                (public, Some(local.replace(['-', '_'], ".")))
            }
            None => (text, None),
        };

        let (epoch, rest) = match public.split_once('!') {
            Some((epoch, rest)) => (epoch.parse().map_err(|_| invalid())?, rest),
            None => (0, public),
        };

        let mut cursor = Cursor::new(rest);

        let mut release = vec![cursor.number().ok_or_else(invalid)?];
        while cursor.peek() == Some('.') && cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            cursor.bump();
            release.push(cursor.number().ok_or_else(invalid)?);
        }

        let mut version = Version {
            epoch,
            release,
            pre: None,
            post: None,
            dev: None,
            local,
        };

        // Pre-release
        let checkpoint = cursor.pos;
        cursor.separator();
        if let Some(kind) = cursor.keyword(&[
            ("alpha", PreKind::Alpha),
            ("a", PreKind::Alpha),
            ("beta", PreKind::Beta),
            ("b", PreKind::Beta),
            ("rc", PreKind::Candidate),
            ("c", PreKind::Candidate),
            ("preview", PreKind::Candidate),
            ("pre", PreKind::Candidate),
        ]) {
            cursor.separator();
            version.pre = Some((kind, cursor.number().unwrap_or(0)));
        } else {
            cursor.pos = checkpoint;
        }

        // Post-release, including the implicit `-N` spelling
        let checkpoint = cursor.pos;
        if cursor.peek() == Some('-') && cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            cursor.bump();
            version.post = cursor.number();
        } else {
            cursor.separator();
            if cursor.keyword(&[("post", ()), ("rev", ()), ("r", ())]).is_some() {
                cursor.separator();
                version.post = Some(cursor.number().unwrap_or(0));
            } else {
                cursor.pos = checkpoint;
            }
        }

        // Dev-release
        let checkpoint = cursor.pos;
        cursor.separator();
        if cursor.keyword(&[("dev", ())]).is_some() {
            cursor.separator();
            version.dev = Some(cursor.number().unwrap_or(0));
        } else {
            cursor.pos = checkpoint;
        }

        if !cursor.at_end() {
            return Err(invalid());
        }

        Ok(version)
    }

    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// The same version without its local label.
    pub fn public(&self) -> Version {
        Version {
            local: None,
            ..self.clone()
        }
    }

    /// Whether `self.release` starts with `prefix` (missing segments count as 0).
    pub fn release_starts_with(&self, prefix: &[u64]) -> bool {
        prefix
            .iter()
            .enumerate()
            .all(|(i, segment)| self.release.get(i).copied().unwrap_or(0) == *segment)
    }

    fn sort_key(&self) -> SortKey {
        let mut release = self.release.clone();
        while release.len() > 1 && release.last() == Some(&0) {
            release.pop();
        }

        let pre = match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => Bound::Low,
            (None, _, _) => Bound::High,
            (Some(pre), _, _) => Bound::At(pre),
        };
        let post = self.post.map_or(Bound::Low, Bound::At);
        let dev = self.dev.map_or(Bound::High, Bound::At);

        (self.epoch, release, pre, post, dev)
    }
}

type SortKey = (u64, Vec<u64>, Bound<(PreKind, u64)>, Bound<u64>, Bound<u64>);

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Bound<T> {
    Low,
    At(T),
    High,
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", release.join("."))?;
        if let Some((kind, n)) = self.pre {
            write!(f, "{}{}", kind.as_str(), n)?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{}", n)?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{}", n)?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{}", local)?;
        }
        Ok(())
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn separator(&mut self) {
        if matches!(self.peek(), Some('.' | '-' | '_')) {
            self.bump();
        }
    }

    fn number(&mut self) -> Option<u64> {
        let digits: String = self.rest().chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return None;
        }
        self.pos += digits.len();
        digits.parse().ok()
    }

    fn keyword<T: Copy>(&mut self, table: &[(&str, T)]) -> Option<T> {
        let rest = self.rest();
        let (word, value) = table.iter().find(|(word, _)| rest.starts_with(word))?;
        self.pos += word.len();
        Some(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_components() {
        let version = v("1!2.3.4rc2.post1.dev3+ubuntu.1");
        assert_eq!(version.epoch, 1);
        assert_eq!(version.release, vec![2, 3, 4]);
        assert_eq!(version.pre, Some((PreKind::Candidate, 2)));
        assert_eq!(version.post, Some(1));
        assert_eq!(version.dev, Some(3));
        assert_eq!(version.local.as_deref(), Some("ubuntu.1"));
    }

    #[test]
    fn test_alternate_spellings_normalize() {
        assert_eq!(v("1.0-alpha1").to_string(), "1.0a1");
        assert_eq!(v("1.0-1").to_string(), "1.0.post1");
        assert_eq!(v("v2.0.DEV").to_string(), "2.0.dev0");
    }

    #[test]
    fn test_ordering() {
        let ordered = ["1.0.dev0", "1.0a1", "1.0b2", "1.0rc1", "1.0", "1.0.post1", "1.1"];
        for pair in ordered.windows(2) {
            assert!(v(pair[0]) < v(pair[1]), "{} < {}", pair[0], pair[1]);
        }
        assert_eq!(v("1.0"), v("1.0.0"));
        assert!(v("1!0.1") > v("99.0"));
    }

    #[test]
    fn test_rejects_garbage() {
        for bad in ["", "abc", "1..2", "1.0+", "1.0 beta", "1.x"] {
            assert!(Version::parse(bad).is_err(), "{bad:?} should not parse");
        }
    }
}
