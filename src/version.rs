use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat, separated};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::one_of;

use crate::error::{Error, Result};

/// One dot-separated numeric segment of a version
///
/// Keeps the literal digit string alongside the parsed value: leading zeros
/// change how a segment compares (`1.01` sorts before `1.1`, while `1.1`
/// sorts before `1.10`) and must survive re-serialization.
#[derive(Debug, Clone)]
pub struct Number {
    raw: String,
    value: u64,
}

impl Number {
    /// The parsed numeric value.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// The literal digit string, leading zeros included.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn leading_zero(&self) -> bool {
        self.raw.len() > 1 && self.raw.starts_with('0')
    }

    /// Digits with trailing zeros stripped, for the decimal-fraction rule.
    fn fraction(&self) -> &str {
        self.raw.trim_end_matches('0')
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl Hash for Number {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // canonical spelling: zero-valued segments collapse to "0",
        // leading-zero segments drop their trailing zeros
        if self.value == 0 {
            "0".hash(state);
        } else if self.leading_zero() {
            self.fraction().hash(state);
        } else {
            self.raw.hash(state);
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> Ordering {
        // PMS: a leading zero on either side turns the pair into decimal
        // fractions, compared lexically with trailing zeros stripped
        if self.leading_zero() || other.leading_zero() {
            self.fraction().cmp(other.fraction())
        } else {
            self.value.cmp(&other.value)
        }
    }
}

/// Package revision (`-r1`, `-r2`, etc.)
///
/// Tracks packaging changes independently of the upstream version. Displays
/// as the bare number; the surrounding `-r` belongs to [`Version`].
///
/// See [PMS 3.2](https://projects.gentoo.org/pms/9/pms.html#version-specifications).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(pub u64);

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Version suffix kind
///
/// PMS defines five ordered suffix types that modify version comparison.
/// `Alpha`, `Beta`, `Pre`, and `Rc` sort *below* the unsuffixed version,
/// while `P` (patchlevel) sorts *above* it.
///
/// See [PMS 3.2](https://projects.gentoo.org/pms/9/pms.html#version-specifications)
/// and [Algorithm 3.1](https://projects.gentoo.org/pms/9/pms.html#version-comparison).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuffixKind {
    /// `_alpha` — earliest pre-release stage.
    Alpha,
    /// `_beta` — feature-complete but not yet stable.
    Beta,
    /// `_pre` — pre-release snapshot.
    Pre,
    /// `_rc` — release candidate.
    Rc,
    /// `_p` — post-release patchlevel (sorts *above* the base version).
    P,
}

impl SuffixKind {
    /// Ordering value for version comparison; 0 is the unsuffixed version
    fn order(&self) -> i32 {
        match self {
            SuffixKind::Alpha => -4,
            SuffixKind::Beta => -3,
            SuffixKind::Pre => -2,
            SuffixKind::Rc => -1,
            SuffixKind::P => 1,
        }
    }
}

impl fmt::Display for SuffixKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SuffixKind::Alpha => write!(f, "_alpha"),
            SuffixKind::Beta => write!(f, "_beta"),
            SuffixKind::Pre => write!(f, "_pre"),
            SuffixKind::Rc => write!(f, "_rc"),
            SuffixKind::P => write!(f, "_p"),
        }
    }
}

impl FromStr for SuffixKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "alpha" => Ok(SuffixKind::Alpha),
            "beta" => Ok(SuffixKind::Beta),
            "pre" => Ok(SuffixKind::Pre),
            "rc" => Ok(SuffixKind::Rc),
            "p" => Ok(SuffixKind::P),
            _ => Err(Error::version(s, "unknown suffix kind")),
        }
    }
}

/// A version suffix with optional numeric qualifier
///
/// Represents one `_alpha`, `_beta`, `_pre`, `_rc`, or `_p` segment,
/// optionally followed by a number (e.g. `_rc2`, `_p1`). A missing
/// qualifier compares as `0`, so `_rc` and `_rc0` are the same suffix.
#[derive(Debug, Clone)]
pub struct Suffix {
    /// The suffix type (`_alpha`, `_beta`, `_pre`, `_rc`, or `_p`).
    pub kind: SuffixKind,
    /// Optional numeric qualifier (e.g. `2` in `_rc2`).
    pub number: Option<u64>,
}

impl fmt::Display for Suffix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(n) = self.number {
            write!(f, "{}", n)?;
        }
        Ok(())
    }
}

impl PartialEq for Suffix {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Suffix {}

impl Hash for Suffix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.number.unwrap_or(0).hash(state);
    }
}

impl PartialOrd for Suffix {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suffix {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.kind.order().cmp(&other.kind.order()) {
            Ordering::Equal => self.number.unwrap_or(0).cmp(&other.number.unwrap_or(0)),
            ord => ord,
        }
    }
}

/// Version comparison operator for dependency atoms
///
/// Used as a prefix on versioned atoms to constrain which versions satisfy
/// the dependency. Lives on [`Atom`](crate::Atom), not on the version
/// itself.
///
/// See [PMS 8.3.1](https://projects.gentoo.org/pms/9/pms.html#operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `<` — strictly less than the specified version.
    Less,
    /// `<=` — less than or equal to the specified version.
    LessOrEqual,
    /// `=` — exactly the specified version (including revision).
    Equal,
    /// `=` with a trailing `*` on the version (e.g. `=cat/pkg-1.2*`) —
    /// prefix matching on the given version components.
    EqualGlob,
    /// `~` — matches the same base version, ignoring the revision
    /// (e.g. `~dev-lang/rust-1.75.0` matches `-r0`, `-r1`, etc.).
    Approximate,
    /// `>=` — greater than or equal to the specified version.
    GreaterOrEqual,
    /// `>` — strictly greater than the specified version.
    Greater,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Operator::Less => write!(f, "<"),
            Operator::LessOrEqual => write!(f, "<="),
            Operator::Equal => write!(f, "="),
            Operator::EqualGlob => write!(f, "=*"),
            Operator::Approximate => write!(f, "~"),
            Operator::GreaterOrEqual => write!(f, ">="),
            Operator::Greater => write!(f, ">"),
        }
    }
}

/// Package version according to PMS
///
/// Represents a version string such as `1.2.3a_alpha4_beta5_pre6_rc7_p8-r9`.
///
/// Ordering implements
/// [Algorithm 3.1](https://projects.gentoo.org/pms/9/pms.html#version-comparison):
/// numeric components are compared left-to-right (with the leading-zero
/// decimal-fraction rule), then the optional letter, then suffixes (where
/// `_p` sorts above the base while `_alpha`/`_beta`/`_pre`/`_rc` sort
/// below), and finally the revision.
///
/// Equality follows the ordering, not the spelling: `1.0`, `1.0-r0` and
/// `1.00` are all equal, and hash identically. Display preserves the
/// original spelling, so a parsed version re-serializes verbatim.
#[derive(Debug, Clone)]
pub struct Version {
    numbers: Vec<Number>,
    letter: Option<char>,
    suffixes: Vec<Suffix>,
    revision: Option<Revision>,
}

impl Version {
    /// Parse a version from a string.
    pub fn parse(input: &str) -> Result<Self> {
        parse_version()
            .parse(input)
            .map_err(|e| Error::version(input, e.to_string()))
    }

    /// Dot-separated numeric components.
    pub fn numbers(&self) -> &[Number] {
        &self.numbers
    }

    /// Optional single lowercase letter after the numeric components.
    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    /// Version suffixes (`_alpha`, `_beta`, `_pre`, `_rc`, `_p`).
    pub fn suffixes(&self) -> &[Suffix] {
        &self.suffixes
    }

    /// Explicit revision, if one was given.
    ///
    /// An absent revision compares equal to `-r0` but displays differently.
    pub fn revision(&self) -> Option<&Revision> {
        self.revision.as_ref()
    }

    /// Base version without revision, for `~` operator matching.
    pub fn base(&self) -> Self {
        Version {
            numbers: self.numbers.clone(),
            letter: self.letter,
            suffixes: self.suffixes.clone(),
            revision: None,
        }
    }

    /// Prefix match for `=*` atoms: only the pattern's numeric components,
    /// and its letter when it has one, participate.
    pub(crate) fn glob_match(&self, pattern: &Version) -> bool {
        if self.numbers.len() < pattern.numbers.len() {
            return false;
        }
        for (candidate, given) in self.numbers.iter().zip(&pattern.numbers) {
            if candidate.cmp(given) != Ordering::Equal {
                return false;
            }
        }
        match (pattern.letter, self.letter) {
            (Some(p), l) => l == Some(p),
            (None, Some(_)) => false,
            (None, None) => true,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, num) in self.numbers.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", num)?;
        }

        if let Some(letter) = self.letter {
            write!(f, "{}", letter)?;
        }

        for suffix in &self.suffixes {
            write!(f, "{}", suffix)?;
        }

        if let Some(rev) = &self.revision {
            write!(f, "-r{}", rev)?;
        }

        Ok(())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // trailing zero-valued segments do not affect the order
        let len = self
            .numbers
            .iter()
            .rposition(|n| n.value() != 0)
            .map_or(1, |i| i + 1);
        self.numbers[..len].hash(state);
        self.letter.hash(state);
        self.suffixes.hash(state);
        self.revision.as_ref().map_or(0, |r| r.0).hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare numeric components; a missing trailing segment counts as 0
        let max_len = self.numbers.len().max(other.numbers.len());
        for i in 0..max_len {
            let ord = match (self.numbers.get(i), other.numbers.get(i)) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(a), None) => a.value().cmp(&0),
                (None, Some(b)) => 0u64.cmp(&b.value()),
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }

        // Compare letter suffixes
        let a_letter = self.letter.unwrap_or('\0');
        let b_letter = other.letter.unwrap_or('\0');
        match a_letter.cmp(&b_letter) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // Compare version suffixes; at a position where one side has none,
        // _p ranks above the shorter version and everything else below it
        let max_suffixes = self.suffixes.len().max(other.suffixes.len());
        for i in 0..max_suffixes {
            match (self.suffixes.get(i), other.suffixes.get(i)) {
                (Some(a), Some(b)) => match a.cmp(b) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
                (Some(s), None) => {
                    return if s.kind == SuffixKind::P {
                        Ordering::Greater
                    } else {
                        Ordering::Less
                    };
                }
                (None, Some(s)) => {
                    return if s.kind == SuffixKind::P {
                        Ordering::Less
                    } else {
                        Ordering::Greater
                    };
                }
                (None, None) => break,
            }
        }

        // Compare revisions; absent means 0
        let a_rev = self.revision.as_ref().map_or(0, |r| r.0);
        let b_rev = other.revision.as_ref().map_or(0, |r| r.0);
        a_rev.cmp(&b_rev)
    }
}

impl FromStr for Version {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Winnow parsers

fn parse_number<'s>() -> impl Parser<&'s str, Number, ErrMode<ContextError>> {
    digit1.try_map(|s: &str| {
        s.parse::<u64>().map(|value| Number {
            raw: s.to_string(),
            value,
        })
    })
}

fn parse_plain_number<'s>() -> impl Parser<&'s str, u64, ErrMode<ContextError>> {
    digit1.try_map(|s: &str| s.parse::<u64>())
}

fn parse_letter<'s>() -> impl Parser<&'s str, char, ErrMode<ContextError>> {
    one_of('a'..='z')
}

fn parse_suffix_kind<'s>() -> impl Parser<&'s str, SuffixKind, ErrMode<ContextError>> {
    alt((
        "alpha".value(SuffixKind::Alpha),
        "beta".value(SuffixKind::Beta),
        "pre".value(SuffixKind::Pre),
        "rc".value(SuffixKind::Rc),
        "p".value(SuffixKind::P),
    ))
}

fn parse_suffix<'s>() -> impl Parser<&'s str, Suffix, ErrMode<ContextError>> {
    preceded('_', cut_err((parse_suffix_kind(), opt(parse_plain_number()))))
        .map(|(kind, number)| Suffix { kind, number })
}

fn parse_revision<'s>() -> impl Parser<&'s str, Revision, ErrMode<ContextError>> {
    preceded("-r", cut_err(parse_plain_number())).map(Revision)
}

pub(crate) fn parse_version<'s>() -> impl Parser<&'s str, Version, ErrMode<ContextError>> {
    (
        separated(1.., parse_number(), '.'),
        opt(parse_letter()),
        repeat(0.., parse_suffix()),
        opt(parse_revision()),
    )
        .map(|(numbers, letter, suffixes, revision)| Version {
            numbers,
            letter,
            suffixes,
            revision,
        })
        .context(StrContext::Label("version"))
}

pub(crate) fn parse_operator<'s>() -> impl Parser<&'s str, Operator, ErrMode<ContextError>> {
    alt((
        "<=".value(Operator::LessOrEqual),
        "<".value(Operator::Less),
        ">=".value(Operator::GreaterOrEqual),
        ">".value(Operator::Greater),
        "~".value(Operator::Approximate),
        "=".value(Operator::Equal),
    ))
    .context(StrContext::Label("operator"))
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;

    use super::*;

    fn ver(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn hash_of(v: &Version) -> u64 {
        let mut hasher = DefaultHasher::new();
        v.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_version_parsing() {
        let v = ver("1.2.3");
        assert_eq!(v.numbers().len(), 3);
        assert_eq!(v.numbers()[0].value(), 1);
        assert_eq!(v.numbers()[1].value(), 2);
        assert_eq!(v.numbers()[2].value(), 3);
        assert_eq!(v.letter(), None);
        assert!(v.suffixes().is_empty());
        assert!(v.revision().is_none());
    }

    #[test]
    fn test_version_with_letter() {
        let v = ver("1.2.3a");
        assert_eq!(v.letter(), Some('a'));
        assert_eq!(v.to_string(), "1.2.3a");
    }

    #[test]
    fn test_version_with_suffixes() {
        let v = ver("1.2.3_alpha4_beta5");
        assert_eq!(v.suffixes().len(), 2);
        assert_eq!(v.suffixes()[0].kind, SuffixKind::Alpha);
        assert_eq!(v.suffixes()[0].number, Some(4));
        assert_eq!(v.suffixes()[1].kind, SuffixKind::Beta);
        assert_eq!(v.suffixes()[1].number, Some(5));
    }

    #[test]
    fn test_version_with_revision() {
        let v = ver("1.2.3-r1");
        assert_eq!(v.revision(), Some(&Revision(1)));
        assert_eq!(v.to_string(), "1.2.3-r1");
    }

    #[test]
    fn test_invalid_versions() {
        for s in ["", "1.", ".1", "1..2", "1.2_foo", "1.2-r", "1.2-rx", "1.2.3ab", "a.1"] {
            assert!(Version::parse(s).is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_numeric_comparison() {
        assert!(ver("1.2.3") < ver("1.2.4"));
        assert!(ver("1.2") < ver("1.2.1"));
        assert!(ver("2") > ver("1.9.9"));
        // missing trailing segments count as zero
        assert_eq!(ver("1.0"), ver("1"));
        assert_eq!(ver("1.0.0"), ver("1"));
        assert!(ver("1.0.1") > ver("1"));
    }

    #[test]
    fn test_leading_zero_rule() {
        // a leading zero turns the pair into decimal fractions
        assert!(ver("1.01") < ver("1.1"));
        assert!(ver("1.2") > ver("1.02"));
        // no leading zero: plain numeric comparison
        assert!(ver("1.1") < ver("1.10"));
        assert!(ver("1.10") < ver("1.11"));
        // the rule applies to every segment
        assert!(ver("01") < ver("1"));
        assert_eq!(ver("1.01"), ver("1.010"));
        assert_eq!(ver("1.0"), ver("1.00"));
    }

    #[test]
    fn test_letter_comparison() {
        assert!(ver("1.0") < ver("1.0a"));
        assert!(ver("1.0a") < ver("1.0b"));
    }

    #[test]
    fn test_suffix_precedence() {
        assert!(ver("1.0_alpha") < ver("1.0_beta"));
        assert!(ver("1.0_beta") < ver("1.0_pre"));
        assert!(ver("1.0_pre") < ver("1.0_rc"));
        assert!(ver("1.0_rc1") < ver("1.0"));
        assert!(ver("1.0") < ver("1.0_p1"));
        // chained suffixes compare element-wise
        assert!(ver("1.0_alpha1_beta") < ver("1.0_alpha1_rc"));
        assert!(ver("1.0_alpha") < ver("1.0_alpha_p1"));
    }

    #[test]
    fn test_suffix_qualifier_defaults_to_zero() {
        assert_eq!(ver("1.0_rc"), ver("1.0_rc0"));
        assert!(ver("1.0_alpha") < ver("1.0_alpha1"));
        assert!(ver("1.0_rc1") < ver("1.0_rc2"));
    }

    #[test]
    fn test_revision_comparison() {
        assert_eq!(ver("1.0"), ver("1.0-r0"));
        assert!(ver("1.0-r1") < ver("1.0-r2"));
        assert!(ver("1.0") < ver("1.0-r1"));
        // revision is the last tie-breaker
        assert!(ver("1.0-r9") < ver("1.0.1"));
    }

    #[test]
    fn test_total_order() {
        let versions = ["1.0_alpha", "1.0_rc2", "1.0", "1.0_p1", "1.0a", "1.1", "2"];
        for (i, a) in versions.iter().enumerate() {
            assert_eq!(ver(a).cmp(&ver(a)), Ordering::Equal);
            for b in &versions[i + 1..] {
                assert!(ver(a) < ver(b), "{a} < {b}");
                assert!(ver(b) > ver(a), "{b} > {a}");
            }
        }
    }

    #[test]
    fn test_hash_agrees_with_equality() {
        let pairs = [
            ("1.0", "1.0-r0"),
            ("1.0", "1"),
            ("1.01", "1.010"),
            ("1.0_rc", "1.0_rc0"),
        ];
        for (a, b) in pairs {
            let (a, b) = (ver(a), ver(b));
            assert_eq!(a, b);
            assert_eq!(hash_of(&a), hash_of(&b));
        }
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["1.2.3", "1.01", "1.0-r0", "1.2.3a_alpha4_beta5_pre6_rc7_p8-r9"] {
            let v = ver(s);
            assert_eq!(v.to_string(), s);
            assert_eq!(ver(&v.to_string()), v);
        }
    }

    #[test]
    fn test_glob_match() {
        let pattern = ver("1.2");
        assert!(ver("1.2").glob_match(&pattern));
        assert!(ver("1.2.3").glob_match(&pattern));
        assert!(ver("1.2_rc1").glob_match(&pattern));
        assert!(!ver("1.20").glob_match(&pattern));
        assert!(!ver("1").glob_match(&pattern));
        assert!(!ver("1.2a").glob_match(&pattern));

        let lettered = ver("1.2a");
        assert!(ver("1.2a").glob_match(&lettered));
        assert!(!ver("1.2").glob_match(&lettered));
    }
}
