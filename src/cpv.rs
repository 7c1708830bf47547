use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::cpn::{name_char, parse_category, parse_package, Cpn};
use crate::error::{Error, Result};
use crate::version::{parse_version, Version};

/// Category/Package/Version (Cpv)
///
/// Represents versioned package atoms like `dev-lang/rust-1.75.0`: a
/// concrete package with no operator and no wildcard.
#[derive(Debug, Clone)]
pub struct Cpv {
    pub cpn: Cpn,
    pub version: Version,
}

impl Cpv {
    /// Create a new Cpv
    pub fn new(cpn: Cpn, version: Version) -> Self {
        Cpv { cpn, version }
    }

    /// Parse from string
    pub fn parse(input: &str) -> Result<Self> {
        parse_cpv()
            .parse(input)
            .map_err(|e| Error::syntax(input, e.offset(), e.inner().to_string()))
    }

    /// Get the category
    pub fn category(&self) -> &str {
        &self.cpn.category
    }

    /// Get the package name
    pub fn package(&self) -> &str {
        &self.cpn.package
    }
}

impl fmt::Display for Cpv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.cpn, self.version)
    }
}

impl PartialEq for Cpv {
    fn eq(&self, other: &Self) -> bool {
        self.cpn == other.cpn && self.version == other.version
    }
}

impl Eq for Cpv {}

impl Hash for Cpv {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cpn.hash(state);
        self.version.hash(state);
    }
}

impl PartialOrd for Cpv {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cpv {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.cpn.cmp(&other.cpn) {
            std::cmp::Ordering::Equal => self.version.cmp(&other.version),
            other => other,
        }
    }
}

impl FromStr for Cpv {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Split a combined `package-version` token into its package name and
/// version.
///
/// Package names may themselves contain hyphens and digits, so the boundary
/// is ambiguous. Candidates are hyphens followed by a digit, tried left to
/// right: the longest trailing region that parses as a complete version
/// wins. Returns `None` when no candidate parses, in which case the whole
/// token is a package name.
pub(crate) fn split_package_version(s: &str) -> Option<(&str, Version)> {
    let bytes = s.as_bytes();
    for i in 1..bytes.len() {
        if bytes[i] == b'-' && bytes.get(i + 1).is_some_and(|c| c.is_ascii_digit()) {
            if let Ok(version) = parse_version().parse(&s[i + 1..]) {
                return Some((&s[..i], version));
            }
        }
    }
    None
}

/// The last split candidate in a `package-version` token, parseable or not.
/// Used to distinguish "no version given" from "a version was attempted but
/// is malformed".
pub(crate) fn last_version_candidate(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| bytes[i] == b'-' && bytes.get(i + 1).is_some_and(|c| c.is_ascii_digit()))
        .map(|i| &s[i + 1..])
}

// Winnow parsers

/// Parse Cpv (category/package-version)
pub(crate) fn parse_cpv<'s>() -> impl Parser<&'s str, Cpv, ErrMode<ContextError>> {
    (parse_category(), '/', take_while(1.., name_char))
        .verify_map(|(category, _, pkg_ver): (String, char, &str)| {
            let (pkg, version) = split_package_version(pkg_ver)?;
            let package = parse_package().parse(pkg).ok()?;
            Some(Cpv {
                cpn: Cpn { category, package },
                version,
            })
        })
        .context(StrContext::Label("cpv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpv_parsing() {
        let cpv = Cpv::parse("dev-lang/rust-1.75.0").unwrap();
        assert_eq!(cpv.category(), "dev-lang");
        assert_eq!(cpv.package(), "rust");
        assert_eq!(cpv.version.numbers()[0].value(), 1);
        assert_eq!(cpv.version.numbers()[1].value(), 75);
        assert_eq!(cpv.version.numbers()[2].value(), 0);
        assert_eq!(cpv.to_string(), "dev-lang/rust-1.75.0");
    }

    #[test]
    fn test_cpv_with_revision() {
        let cpv = Cpv::parse("dev-lang/rust-1.75.0-r1").unwrap();
        assert_eq!(cpv.version.revision().unwrap().0, 1);
        assert_eq!(cpv.to_string(), "dev-lang/rust-1.75.0-r1");
    }

    #[test]
    fn test_cpv_comparison() {
        let cpv1 = Cpv::parse("dev-lang/rust-1.75.0").unwrap();
        let cpv2 = Cpv::parse("dev-lang/rust-1.76.0").unwrap();
        assert!(cpv1 < cpv2);

        let cpv3 = Cpv::parse("dev-lang/rust-1.75.0-r1").unwrap();
        assert!(cpv1 < cpv3);
    }

    #[test]
    fn test_split_hyphenated_package() {
        // hyphens and digits inside the package name are not a version
        let cpv = Cpv::parse("app-emulation/virtualbox-guest-additions-7.0.12").unwrap();
        assert_eq!(cpv.package(), "virtualbox-guest-additions");
        assert_eq!(cpv.version.to_string(), "7.0.12");

        let cpv = Cpv::parse("media-libs/libsdl2-2.28.5").unwrap();
        assert_eq!(cpv.package(), "libsdl2");

        // the longest trailing region that parses wins
        let cpv = Cpv::parse("cat/pkg-3-1-r2").unwrap();
        assert_eq!(cpv.package(), "pkg-3");
        assert_eq!(cpv.version.to_string(), "1-r2");
    }

    #[test]
    fn test_unversioned_is_an_error() {
        assert!(Cpv::parse("dev-lang/rust").is_err());
        // trailing token that is not a valid version
        assert!(Cpv::parse("dev-lang/rust-1x2").is_err());
    }
}
