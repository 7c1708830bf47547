use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::cpn::{name_char, parse_category, parse_package, Cpn};
use crate::cpv::{last_version_candidate, split_package_version, Cpv};
use crate::error::{Error, Result};
use crate::slot::{parse_slot_dep, SlotDep, SlotOperator};
use crate::use_dep::{parse_use_deps, UseDep};
use crate::version::{parse_operator, Operator, Revision, Version};

/// Package atom blocker type
///
/// Blockers express "must not be installed" rather than "must be installed".
///
/// See [PMS 8.3.2](https://projects.gentoo.org/pms/9/pms.html#block-operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blocker {
    /// `!` — weak blocker: the blocked package may be temporarily installed
    /// during a transition, but must be uninstalled before the operation
    /// completes.
    Weak,
    /// `!!` — strong blocker: the blocked package must never be installed
    /// at the same time as this package.
    Strong,
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Blocker::Weak => write!(f, "!"),
            Blocker::Strong => write!(f, "!!"),
        }
    }
}

/// Full package atom
///
/// Represents atoms like `>=dev-lang/rust-1.75.0:0=[ssl]::gentoo`. Immutable
/// once constructed; every optional component is reported as absent (`None`)
/// rather than empty when the input omits it.
///
/// Equality is structural over every field. Ordering for sorting collections
/// goes through [`Atom::compare`], which considers identity only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    cpn: Cpn,
    blocker: Option<Blocker>,
    op: Option<Operator>,
    version: Option<Version>,
    slot_dep: Option<SlotDep>,
    use_deps: Option<Vec<UseDep>>,
    repo: Option<String>,
}

impl Atom {
    /// Create a new unversioned atom from a cpn
    pub fn new(cpn: Cpn) -> Self {
        Atom {
            cpn,
            blocker: None,
            op: None,
            version: None,
            slot_dep: None,
            use_deps: None,
            repo: None,
        }
    }

    /// Parse an atom from a string.
    pub fn parse(input: &str) -> Result<Self> {
        Self::parse_in_repo(input, None)
    }

    /// Parse an atom, filling in `default_repo` when the input has no
    /// explicit `::repo` clause.
    pub fn parse_in_repo(input: &str, default_repo: Option<&str>) -> Result<Self> {
        let mut rest = input;

        let blocker = scan(opt(parse_blocker()), input, &mut rest, "blocker")?;
        let mut op = scan(opt(parse_operator()), input, &mut rest, "operator")?;

        let category = scan(parse_category(), input, &mut rest, "category")?;
        scan('/', input, &mut rest, "'/'")?;

        let region_offset = input.len() - rest.len();
        let region = scan(
            take_while(1.., |c: char| name_char(c) || c == '*'),
            input,
            &mut rest,
            "package name",
        )?;

        // A trailing `*` is the version wildcard, not part of the name
        let (region, glob) = match region.strip_suffix('*') {
            Some(stripped) => (stripped, true),
            None => (region, false),
        };

        let (package, version) = match split_package_version(region) {
            Some((pkg, version)) => (pkg, Some(version)),
            None => (region, None),
        };
        let package = parse_package()
            .parse(package)
            .map_err(|_| Error::syntax(input, region_offset, "invalid package name"))?;

        if op.is_some() && version.is_none() {
            // distinguish a malformed trailing version from a missing one
            return match last_version_candidate(region) {
                Some(cand) => match Version::parse(cand) {
                    Err(e) => Err(e),
                    Ok(_) => Err(Error::semantic(input, "operator requires a version")),
                },
                None => Err(Error::semantic(input, "operator requires a version")),
            };
        }

        if glob {
            if !matches!(op, Some(Operator::Equal)) {
                return Err(Error::semantic(input, "wildcard version requires the = operator"));
            }
            if version.is_none() {
                return Err(Error::semantic(input, "wildcard requires a version"));
            }
            op = Some(Operator::EqualGlob);
        }

        if matches!(op, Some(Operator::Approximate))
            && version.as_ref().is_some_and(|v| v.revision().is_some())
        {
            return Err(Error::semantic(input, "~ operator with explicit revision"));
        }

        let slot_dep = scan(opt(preceded(':', parse_slot_dep())), input, &mut rest, "slot")?;
        if let Some(SlotDep::Slot {
            op: Some(SlotOperator::Star),
            ..
        }) = &slot_dep
        {
            // `:*` is the only sanctioned any-slot spelling
            return Err(Error::semantic(input, "any-slot operator with named slot"));
        }

        let use_deps = scan(opt(parse_use_deps()), input, &mut rest, "use dependencies")?;

        let repo = scan(opt(preceded("::", parse_repo())), input, &mut rest, "repository")?
            .or_else(|| default_repo.map(String::from));

        if !rest.is_empty() {
            let offset = input.len() - rest.len();
            return Err(Error::syntax(input, offset, "trailing characters"));
        }

        Ok(Atom {
            cpn: Cpn { category, package },
            blocker,
            op,
            version,
            slot_dep,
            use_deps,
            repo,
        })
    }

    /// The `category/package` key, the atom's grouping identity.
    pub fn key(&self) -> String {
        self.cpn.to_string()
    }

    /// Unversioned category/package name.
    pub fn cpn(&self) -> &Cpn {
        &self.cpn
    }

    /// Get the category
    pub fn category(&self) -> &str {
        &self.cpn.category
    }

    /// Get the package name
    pub fn package(&self) -> &str {
        &self.cpn.package
    }

    /// Blocker prefix, if any.
    pub fn blocker(&self) -> Option<Blocker> {
        self.blocker
    }

    /// Version operator, if a version constraint was given.
    pub fn op(&self) -> Option<Operator> {
        self.op
    }

    /// Version constraint, if any.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    /// Explicit revision of the version constraint, if any.
    pub fn revision(&self) -> Option<&Revision> {
        self.version.as_ref().and_then(|v| v.revision())
    }

    /// Named slot, if any.
    pub fn slot(&self) -> Option<&str> {
        match &self.slot_dep {
            Some(SlotDep::Slot { slot, .. }) => Some(&slot.slot),
            _ => None,
        }
    }

    /// Named sub-slot, if any.
    pub fn subslot(&self) -> Option<&str> {
        match &self.slot_dep {
            Some(SlotDep::Slot { slot, .. }) => slot.subslot.as_deref(),
            _ => None,
        }
    }

    /// Slot operator, if any.
    pub fn slot_op(&self) -> Option<SlotOperator> {
        self.slot_dep.as_ref().and_then(|s| s.op())
    }

    /// Full slot dependency, if any.
    pub fn slot_dep(&self) -> Option<&SlotDep> {
        self.slot_dep.as_ref()
    }

    /// USE dependency tokens; `Some(&[])` for an explicit empty `[]` clause,
    /// `None` when the atom has no bracket clause.
    pub fn use_deps(&self) -> Option<&[UseDep]> {
        self.use_deps.as_deref()
    }

    /// Repository name, if any.
    pub fn repo(&self) -> Option<&str> {
        self.repo.as_deref()
    }

    /// Convert to a concrete Cpv if versioned
    pub fn cpv(&self) -> Option<Cpv> {
        self.version
            .as_ref()
            .map(|v| Cpv::new(self.cpn.clone(), v.clone()))
    }

    /// Order two atoms by identity: category, then package, then version,
    /// with an unversioned atom sorting before any versioned one.
    ///
    /// Slot, USE, repo and blocker never participate, so atoms this ties may
    /// still differ under `==` — which is why this is a method rather than
    /// an `Ord` impl.
    pub fn compare(&self, other: &Atom) -> Ordering {
        self.cpn
            .cmp(&other.cpn)
            .then_with(|| match (&self.version, &other.version) {
                (Some(a), Some(b)) => a.cmp(b),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            })
    }

    /// Whether a concrete version satisfies this atom's version constraint.
    /// An atom without a version constraint matches every version.
    pub fn version_matches(&self, v: &Version) -> bool {
        let Some(w) = &self.version else {
            return true;
        };
        match self.op {
            None | Some(Operator::Equal) => v == w,
            Some(Operator::EqualGlob) => v.glob_match(w),
            Some(Operator::Approximate) => v.base() == *w,
            Some(Operator::Less) => v < w,
            Some(Operator::LessOrEqual) => v <= w,
            Some(Operator::GreaterOrEqual) => v >= w,
            Some(Operator::Greater) => v > w,
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(blocker) = &self.blocker {
            write!(f, "{}", blocker)?;
        }

        match self.op {
            // the `*` of a glob trails the version
            Some(Operator::EqualGlob) => write!(f, "=")?,
            Some(op) => write!(f, "{}", op)?,
            None => {}
        }

        write!(f, "{}", self.cpn)?;

        if let Some(version) = &self.version {
            write!(f, "-{}", version)?;
            if self.op == Some(Operator::EqualGlob) {
                write!(f, "*")?;
            }
        }

        if let Some(slot) = &self.slot_dep {
            write!(f, ":{}", slot)?;
        }

        if let Some(use_deps) = &self.use_deps {
            write!(f, "[")?;
            for (i, dep) in use_deps.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", dep)?;
            }
            write!(f, "]")?;
        }

        if let Some(repo) = &self.repo {
            write!(f, "::{}", repo)?;
        }

        Ok(())
    }
}

impl FromStr for Atom {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Run a sub-parser on the remaining input, converting failure into a
/// syntax error positioned at the start of the region.
fn scan<'s, O>(
    mut parser: impl Parser<&'s str, O, ErrMode<ContextError>>,
    input: &'s str,
    rest: &mut &'s str,
    what: &str,
) -> Result<O> {
    let offset = input.len() - rest.len();
    parser
        .parse_next(rest)
        .map_err(|_| Error::syntax(input, offset, format!("expected {what}")))
}

// Winnow parsers

/// Parse blocker prefix
fn parse_blocker<'s>() -> impl Parser<&'s str, Blocker, ErrMode<ContextError>> {
    alt(("!!".value(Blocker::Strong), "!".value(Blocker::Weak)))
}

/// Parse repository name (alphanumeric, _, -, +)
fn parse_repo<'s>() -> impl Parser<&'s str, String, ErrMode<ContextError>> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '+'
    })
    .map(|s: &str| s.to_string())
}
