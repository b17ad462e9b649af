// src/version/mod.rs

//! Dependency expressions and alpm-style version comparison
//!
//! This module provides the `name[op version]` dependency syntax used by
//! pacman and the AUR, and the segmented epoch:pkgver-pkgrel comparison
//! that `vercmp(8)` applies.

use std::cmp::Ordering;
use std::fmt;

/// A parsed `[epoch:]pkgver[-pkgrel]` version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlpmVersion {
    pub epoch: u64,
    pub pkgver: String,
    pub pkgrel: Option<String>,
}

impl AlpmVersion {
    /// Parse a pacman version string
    ///
    /// Format: [epoch:]pkgver[-pkgrel]
    /// Examples:
    /// - "1.2.3" → epoch=0, pkgver="1.2.3", pkgrel=None
    /// - "2:1.2.3" → epoch=2, pkgver="1.2.3", pkgrel=None
    /// - "1.2.3-4" → epoch=0, pkgver="1.2.3", pkgrel=Some("4")
    ///
    /// Parsing is total: a malformed epoch is treated as part of the pkgver,
    /// matching how pacman tolerates arbitrary version strings.
    pub fn parse(s: &str) -> Self {
        let (epoch, rest) = match s.split_once(':') {
            Some((e, r)) => match e.parse::<u64>() {
                Ok(epoch) => (epoch, r),
                Err(_) => (0, s),
            },
            None => (0, s),
        };

        let (pkgver, pkgrel) = match rest.split_once('-') {
            Some((v, r)) => (v.to_string(), Some(r.to_string())),
            None => (rest.to_string(), None),
        };

        Self {
            epoch,
            pkgver,
            pkgrel,
        }
    }

    /// Compare two versions with pacman's `vercmp` rules
    ///
    /// Epochs compare numerically first, then pkgver segment by segment,
    /// then pkgrel the same way when both sides carry one.
    pub fn vercmp(&self, other: &AlpmVersion) -> Ordering {
        match self.epoch.cmp(&other.epoch) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match segment_cmp(&self.pkgver, &other.pkgver) {
            Ordering::Equal => {}
            ord => return ord,
        }

        match (&self.pkgrel, &other.pkgrel) {
            (Some(a), Some(b)) => segment_cmp(a, b),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for AlpmVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        write!(f, "{}", self.pkgver)?;
        if let Some(ref pkgrel) = self.pkgrel {
            write!(f, "-{}", pkgrel)?;
        }
        Ok(())
    }
}

impl Ord for AlpmVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.vercmp(other)
    }
}

impl PartialOrd for AlpmVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Segment-wise comparison of a version component (rpmvercmp semantics)
///
/// Runs of digits compare numerically, runs of letters compare lexically,
/// and a numeric segment always beats an alphabetic one. A version that
/// runs out of segments loses, unless the remainder of the other side is
/// alphabetic ("1.0" is newer than "1.0a").
fn segment_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut i = 0;
    let mut j = 0;

    loop {
        while i < a.len() && !a[i].is_ascii_alphanumeric() {
            i += 1;
        }
        while j < b.len() && !b[j].is_ascii_alphanumeric() {
            j += 1;
        }
        if i >= a.len() || j >= b.len() {
            break;
        }

        let ai = i;
        let bj = j;

        if a[i].is_ascii_digit() {
            while i < a.len() && a[i].is_ascii_digit() {
                i += 1;
            }
            while j < b.len() && b[j].is_ascii_digit() {
                j += 1;
            }
            if bj == j {
                // numeric segment beats alphabetic
                return Ordering::Greater;
            }

            let sa = trim_leading_zeros(&a[ai..i]);
            let sb = trim_leading_zeros(&b[bj..j]);
            match sa.len().cmp(&sb.len()).then_with(|| sa.cmp(sb)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        } else {
            while i < a.len() && a[i].is_ascii_alphabetic() {
                i += 1;
            }
            while j < b.len() && b[j].is_ascii_alphabetic() {
                j += 1;
            }
            if bj == j {
                return Ordering::Less;
            }

            match a[ai..i].cmp(&b[bj..j]) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
    }

    // One side ran out of segments. A remaining alphabetic segment never
    // beats an empty string: "1.0" is newer than "1.0a".
    let a_done = i >= a.len();
    let b_done = j >= b.len();
    if a_done && b_done {
        Ordering::Equal
    } else if a_done {
        if b[j].is_ascii_alphabetic() {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    } else if a[i].is_ascii_alphabetic() {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

fn trim_leading_zeros(s: &[u8]) -> &[u8] {
    let start = s.iter().position(|&c| c != b'0').unwrap_or(s.len());
    &s[start..]
}

/// Comparison operator in a dependency expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    Greater,
}

impl CompareOp {
    fn accepts(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Less => ord == Ordering::Less,
            CompareOp::LessOrEqual => ord != Ordering::Greater,
            CompareOp::Equal => ord == Ordering::Equal,
            CompareOp::GreaterOrEqual => ord != Ordering::Less,
            CompareOp::Greater => ord == Ordering::Greater,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Less => "<",
            CompareOp::LessOrEqual => "<=",
            CompareOp::Equal => "=",
            CompareOp::GreaterOrEqual => ">=",
            CompareOp::Greater => ">",
        };
        write!(f, "{}", s)
    }
}

/// A dependency expression of the form `name[op version]`
///
/// Without an operator any version of the named package matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepExpr {
    pub name: String,
    pub constraint: Option<(CompareOp, AlpmVersion)>,
}

impl DepExpr {
    /// Parse a dependency expression string
    ///
    /// `<=` and `>=` are matched before their single-character forms.
    pub fn parse(s: &str) -> Self {
        let Some(pos) = s.find(['<', '>', '=']) else {
            return Self {
                name: s.to_string(),
                constraint: None,
            };
        };

        let name = s[..pos].to_string();
        let rest = &s[pos..];
        let (op, version) = if let Some(v) = rest.strip_prefix("<=") {
            (CompareOp::LessOrEqual, v)
        } else if let Some(v) = rest.strip_prefix(">=") {
            (CompareOp::GreaterOrEqual, v)
        } else if let Some(v) = rest.strip_prefix('<') {
            (CompareOp::Less, v)
        } else if let Some(v) = rest.strip_prefix('>') {
            (CompareOp::Greater, v)
        } else {
            (CompareOp::Equal, &rest[1..])
        };

        Self {
            name,
            constraint: Some((op, AlpmVersion::parse(version))),
        }
    }

    /// Check whether a provider name and version satisfies this expression
    ///
    /// A provider with no version (an unversioned provides entry) only
    /// satisfies a constraintless expression.
    pub fn satisfied_by(&self, name: &str, version: Option<&AlpmVersion>) -> bool {
        if name != self.name {
            return false;
        }

        match &self.constraint {
            None => true,
            Some((op, wanted)) => match version {
                Some(version) => op.accepts(version.vercmp(wanted)),
                None => false,
            },
        }
    }
}

impl fmt::Display for DepExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some((op, version)) = &self.constraint {
            write!(f, "{}{}", op, version)?;
        }
        Ok(())
    }
}

/// Split a provides entry into its name and optional version
///
/// Provides entries are written `name` or `name=version`.
pub fn parse_provide(s: &str) -> (&str, Option<AlpmVersion>) {
    match s.split_once('=') {
        Some((name, version)) => (name, Some(AlpmVersion::parse(version))),
        None => (s, None),
    }
}

/// Check whether a candidate with the given name, version, and provides
/// list satisfies a dependency expression
pub fn provider_satisfies(expr: &DepExpr, name: &str, version: &str, provides: &[String]) -> bool {
    if expr.satisfied_by(name, Some(&AlpmVersion::parse(version))) {
        return true;
    }

    provides.iter().any(|provide| {
        let (pname, pversion) = parse_provide(provide);
        expr.satisfied_by(pname, pversion.as_ref())
    })
}
