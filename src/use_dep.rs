use std::fmt;
use std::str::FromStr;

use winnow::combinator::{alt, cut_err, delimited, opt, separated, terminated};
use winnow::error::{ContextError, ErrMode, StrContext};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::error::{Error, Result};

/// Default value for a USE flag that is not defined by the target package
///
/// When a package does not define a particular USE flag, the default
/// annotation specifies what value the package manager should assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseDefault {
    /// `(+)` — assume the flag is enabled if not defined by the package.
    Enabled,
    /// `(-)` — assume the flag is disabled if not defined by the package.
    Disabled,
}

impl fmt::Display for UseDefault {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UseDefault::Enabled => write!(f, "(+)"),
            UseDefault::Disabled => write!(f, "(-)"),
        }
    }
}

/// Prefix marker on a USE dependency token
///
/// The recognized prefixes are `-`, `+`, `!`, `!-` and `!+`. They are
/// stored as written; interpreting what a flag requirement means is the
/// resolver's concern, not this crate's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UseDepPrefix {
    /// `-flag`
    Minus,
    /// `+flag`
    Plus,
    /// `!flag`
    Not,
    /// `!-flag`
    NotMinus,
    /// `!+flag`
    NotPlus,
}

impl fmt::Display for UseDepPrefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UseDepPrefix::Minus => write!(f, "-"),
            UseDepPrefix::Plus => write!(f, "+"),
            UseDepPrefix::Not => write!(f, "!"),
            UseDepPrefix::NotMinus => write!(f, "!-"),
            UseDepPrefix::NotPlus => write!(f, "!+"),
        }
    }
}

/// A single USE flag constraint within an atom
///
/// Appears inside brackets in atom strings, e.g. `[ssl,-debug,!static(+)]`.
/// Duplicate flag names are permitted and order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UseDep {
    /// Optional prefix marker (`-`, `+`, `!`, `!-`, `!+`).
    pub prefix: Option<UseDepPrefix>,
    /// The USE flag name (e.g. `ssl`, `debug`, `python_targets_python3_12`).
    pub flag: String,
    /// Optional default value (`(+)` or `(-)`) for when the flag is not
    /// defined by the target package.
    pub default: Option<UseDefault>,
}

impl UseDep {
    pub fn new(flag: impl Into<String>) -> Self {
        UseDep {
            prefix: None,
            flag: flag.into(),
            default: None,
        }
    }

    /// Parse single USE dependency token (without brackets)
    pub fn parse(input: &str) -> Result<Self> {
        parse_use_dep_item()
            .parse(input)
            .map_err(|e| Error::syntax(input, e.offset(), e.inner().to_string()))
    }
}

impl fmt::Display for UseDep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(prefix) = self.prefix {
            write!(f, "{}", prefix)?;
        }
        write!(f, "{}", self.flag)?;
        if let Some(default) = self.default {
            write!(f, "{}", default)?;
        }
        Ok(())
    }
}

impl FromStr for UseDep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// Winnow parsers

/// Parse USE flag name; must start with a letter or digit
fn parse_use_flag<'s>() -> impl Parser<&'s str, String, ErrMode<ContextError>> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '+' || c == '@'
    })
    .verify(|s: &str| s.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()))
    .map(|s: &str| s.to_string())
}

/// Parse USE prefix marker
fn parse_use_prefix<'s>() -> impl Parser<&'s str, UseDepPrefix, ErrMode<ContextError>> {
    alt((
        "!-".value(UseDepPrefix::NotMinus),
        "!+".value(UseDepPrefix::NotPlus),
        "!".value(UseDepPrefix::Not),
        "-".value(UseDepPrefix::Minus),
        "+".value(UseDepPrefix::Plus),
    ))
}

/// Parse USE default
fn parse_use_default<'s>() -> impl Parser<&'s str, UseDefault, ErrMode<ContextError>> {
    alt((
        "(+)".value(UseDefault::Enabled),
        "(-)".value(UseDefault::Disabled),
    ))
}

/// Parse single USE dependency item
pub(crate) fn parse_use_dep_item<'s>() -> impl Parser<&'s str, UseDep, ErrMode<ContextError>> {
    (
        opt(parse_use_prefix()),
        parse_use_flag(),
        opt(parse_use_default()),
    )
        .map(|(prefix, flag, default)| UseDep {
            prefix,
            flag,
            default,
        })
}

/// Parse USE dependencies (with brackets)
///
/// Empty brackets are legal and yield an empty list, which is distinct from
/// the atom having no bracket clause at all.
pub(crate) fn parse_use_deps<'s>() -> impl Parser<&'s str, Vec<UseDep>, ErrMode<ContextError>> {
    delimited(
        '[',
        cut_err(terminated(
            separated(0.., parse_use_dep_item(), ','),
            opt(','),
        )),
        cut_err(']'),
    )
    .context(StrContext::Label("use deps"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_use_dep_plain() {
        let dep = UseDep::parse("ssl").unwrap();
        assert_eq!(dep.flag, "ssl");
        assert_eq!(dep.prefix, None);
        assert_eq!(dep.default, None);
        assert_eq!(dep.to_string(), "ssl");
    }

    #[test]
    fn test_use_dep_prefixes() {
        let cases = [
            ("-debug", UseDepPrefix::Minus),
            ("+ssl", UseDepPrefix::Plus),
            ("!static", UseDepPrefix::Not),
            ("!-systemd", UseDepPrefix::NotMinus),
            ("!+introspection", UseDepPrefix::NotPlus),
        ];
        for (s, prefix) in cases {
            let dep = UseDep::parse(s).unwrap();
            assert_eq!(dep.prefix, Some(prefix), "{s}");
            assert_eq!(dep.to_string(), s);
        }
    }

    #[test]
    fn test_use_dep_with_default() {
        let dep = UseDep::parse("unicode(+)").unwrap();
        assert_eq!(dep.flag, "unicode");
        assert_eq!(dep.default, Some(UseDefault::Enabled));
        assert_eq!(dep.to_string(), "unicode(+)");

        let dep = UseDep::parse("-unicode(-)").unwrap();
        assert_eq!(dep.prefix, Some(UseDepPrefix::Minus));
        assert_eq!(dep.default, Some(UseDefault::Disabled));
        assert_eq!(dep.to_string(), "-unicode(-)");
    }

    #[test]
    fn test_use_dep_invalid() {
        assert!(UseDep::parse("").is_err());
        assert!(UseDep::parse("-").is_err());
        assert!(UseDep::parse("!?flag").is_err());
        assert!(UseDep::parse("flag?").is_err());
        assert!(UseDep::parse("(+)").is_err());
    }

    #[test]
    fn test_use_deps_list() {
        let deps = parse_use_deps().parse("[ssl,-debug,!static(+)]").unwrap();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].flag, "ssl");
        assert_eq!(deps[1].flag, "debug");
        assert_eq!(deps[1].prefix, Some(UseDepPrefix::Minus));
        assert_eq!(deps[2].flag, "static");
        assert_eq!(deps[2].prefix, Some(UseDepPrefix::Not));
        assert_eq!(deps[2].default, Some(UseDefault::Enabled));
    }

    #[test]
    fn test_empty_use_deps() {
        let deps = parse_use_deps().parse("[]").unwrap();
        assert!(deps.is_empty());
    }

    #[test]
    fn test_use_deps_with_trailing_comma() {
        let deps = parse_use_deps().parse("[introspection,]").unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].flag, "introspection");
    }

    #[test]
    fn test_duplicate_flags_preserved() {
        let deps = parse_use_deps().parse("[a,-a,a]").unwrap();
        assert_eq!(deps.len(), 3);
        assert_eq!(deps[0].flag, "a");
        assert_eq!(deps[1].prefix, Some(UseDepPrefix::Minus));
        assert_eq!(deps[2].flag, "a");
    }
}
