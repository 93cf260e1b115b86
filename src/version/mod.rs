//! Tolerant version parsing and ordering.
//!
//! Versions found in the guideline dataset are not always semantic versions
//! (`1.1.1k`, `2.4`, `latest`). Parsing never fails: missing numeric parts
//! default to zero and whatever can't be read as prerelease or build metadata
//! is folded into the prerelease identifiers so that every input still has a
//! place in the ordering.

use std::{cmp::Ordering, convert::Infallible, fmt::Display, str::FromStr};

pub mod compare;

pub use compare::{is_minimum, is_minimum_patch, is_same_minor};

/// Where a version without prerelease sorts relative to its own prereleases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrereleasePolicy {
    /// `2.2` sorts before `2.2.0-rc1`. Used for minimum requirements.
    Lowest,

    /// `2.2` sorts after `2.2.0-rc1`, as semantic versioning mandates.
    #[default]
    Highest,
}

/// A single dot-separated prerelease identifier.
///
/// Numeric identifiers compare numerically and always sort before
/// alphanumeric ones.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Identifier {
    Numeric(u64),
    AlphaNumeric(String),
}

impl Identifier {
    fn new(text: &str) -> Self {
        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = text.parse() {
                return Identifier::Numeric(value);
            }
        }

        Identifier::AlphaNumeric(text.to_string())
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Identifier::Numeric(value) => write!(f, "{}", value),
            Identifier::AlphaNumeric(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Version {
    major: u64,
    minor: u64,
    patch: u64,
    prerelease: Vec<Identifier>,
    build: Vec<String>,
    policy: PrereleasePolicy,
}

// variant order is the sort order
#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum PrereleaseKey<'a> {
    Lowest,
    Identifiers(&'a [Identifier]),
    Highest,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: Vec::new(),
            build: Vec::new(),
            policy: PrereleasePolicy::default(),
        }
    }

    /// Parses `text`, degrading gracefully on anything that isn't a strict
    /// semantic version.
    ///
    /// 1. `major`, `.minor` and `.patch` are each optional numbers without
    ///    leading zeros.
    /// 2. A `-` prerelease and a `+` build group follow the semantic
    ///    versioning grammar.
    /// 3. Whatever is left is the trail. When no build was matched, the trail
    ///    is split on its first `+` and the right side becomes the build.
    ///    The rest is appended to the prerelease text and sanitized.
    pub fn parse(text: &str, policy: PrereleasePolicy) -> Self {
        let mut scanner = Scanner::new(text);

        let major = scanner.number();
        let minor = scanner.dotted_number();
        let patch = scanner.dotted_number();
        let prerelease = scanner.group(b'-', Scanner::identifier);
        let build = scanner.group(b'+', Scanner::build_token);
        let trail = scanner.rest();

        let mut version = Self {
            major: major.map(numeric).unwrap_or_default(),
            minor: minor.map(numeric).unwrap_or_default(),
            patch: patch.map(numeric).unwrap_or_default(),
            prerelease: prerelease
                .map(|x| x.split('.').map(Identifier::new).collect())
                .unwrap_or_default(),
            build: build
                .map(|x| x.split('.').map(str::to_string).collect())
                .unwrap_or_default(),
            policy,
        };

        if !trail.is_empty() {
            let mut extra = trail;

            if build.is_none() {
                if let Some((left, right)) = trail.split_once('+') {
                    extra = left;
                    version.set_build(right);
                }
            }

            let combined = format!("{}{}", prerelease.unwrap_or_default(), extra);
            version.set_prerelease(&combined);
        }

        version
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    pub fn prerelease(&self) -> &[Identifier] {
        &self.prerelease
    }

    pub fn build(&self) -> &[String] {
        &self.build
    }

    pub fn policy(&self) -> PrereleasePolicy {
        self.policy
    }

    pub fn set_major(&mut self, value: u64) {
        self.major = value;
    }

    pub fn set_minor(&mut self, value: u64) {
        self.minor = value;
    }

    pub fn set_patch(&mut self, value: u64) {
        self.patch = value;
    }

    /// Replaces the prerelease identifiers with the ones found in `value`.
    ///
    /// Characters outside `[A-Za-z0-9.-]` are dropped, surrounding `-` and `.`
    /// are trimmed and each identifier loses its leading zeros.
    pub fn set_prerelease(&mut self, value: &str) {
        self.prerelease = sanitize(value)
            .split('.')
            .filter(|x| !x.is_empty())
            .map(|x| match x.trim_start_matches('0') {
                "" => Identifier::Numeric(0),
                stripped => Identifier::new(stripped),
            })
            .collect();
    }

    pub fn set_build(&mut self, value: &str) {
        self.build = sanitize(value)
            .split('.')
            .filter(|x| !x.is_empty())
            .map(str::to_string)
            .collect();
    }

    fn prerelease_key(&self) -> PrereleaseKey<'_> {
        match (self.prerelease.is_empty(), self.policy) {
            (false, _) => PrereleaseKey::Identifiers(&self.prerelease),
            (true, PrereleasePolicy::Lowest) => PrereleaseKey::Lowest,
            (true, PrereleasePolicy::Highest) => PrereleaseKey::Highest,
        }
    }
}

fn numeric(digits: &str) -> u64 {
    // digits only, overflow saturates
    digits.parse().unwrap_or(u64::MAX)
}

fn sanitize(value: &str) -> String {
    let filtered: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '.')
        .collect();

    filtered.trim_matches(|c| c == '-' || c == '.').to_string()
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch, self.prerelease_key()).cmp(&(
            other.major,
            other.minor,
            other.patch,
            other.prerelease_key(),
        ))
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Version::parse(s, PrereleasePolicy::default()))
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;

        if !self.prerelease.is_empty() {
            let ids: Vec<_> = self.prerelease.iter().map(|x| x.to_string()).collect();
            write!(f, "-{}", ids.join("."))?;
        }

        if !self.build.is_empty() {
            write!(f, "+{}", self.build.join("."))?;
        }

        Ok(())
    }
}

/// Byte cursor over the version text. Every token it accepts is ASCII, so the
/// slices it hands out always fall on char boundaries.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, accept: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&accept) {
            self.pos += 1;
        }
    }

    /// `0|[1-9][0-9]*`
    fn number(&mut self) -> Option<&'a str> {
        let start = self.pos;

        match self.peek()? {
            b'0' => self.pos += 1,
            b'1'..=b'9' => self.eat_while(|b| b.is_ascii_digit()),
            _ => return None,
        }

        Some(&self.text[start..self.pos])
    }

    fn dotted_number(&mut self) -> Option<&'a str> {
        let mark = self.pos;

        if self.eat(b'.') {
            if let Some(number) = self.number() {
                return Some(number);
            }
        }

        self.pos = mark;
        None
    }

    /// `[0-9]*[A-Za-z-][0-9A-Za-z-]*`, or else a number
    fn identifier(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.eat_while(|b| b.is_ascii_digit());

        if self.peek().is_some_and(|b| b.is_ascii_alphabetic() || b == b'-') {
            self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'-');
            return Some(&self.text[start..self.pos]);
        }

        self.pos = start;
        self.number()
    }

    /// `[0-9A-Za-z-]+`
    fn build_token(&mut self) -> Option<&'a str> {
        let start = self.pos;
        self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'-');

        (self.pos > start).then(|| &self.text[start..self.pos])
    }

    /// `<prefix>token(.token)*`, returning the text without the prefix.
    fn group(&mut self, prefix: u8, token: fn(&mut Self) -> Option<&'a str>) -> Option<&'a str> {
        let mark = self.pos;

        if !self.eat(prefix) || token(self).is_none() {
            self.pos = mark;
            return None;
        }

        loop {
            let before_dot = self.pos;

            if !self.eat(b'.') || token(self).is_none() {
                self.pos = before_dot;
                break;
            }
        }

        Some(&self.text[mark + 1..self.pos])
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }
}
