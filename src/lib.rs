//! Gentoo ebuild package atom parser and version comparison based on [PMS]
//!
//! This crate provides types for parsing, inspecting and ordering package
//! atoms such as `>=cat/pkg-1.2.3-r1:0/2=[flag]::repo`: structured
//! identifiers combining a category, package name and optional version,
//! slot, USE-flag and repository constraints.
//!
//! [PMS]: https://projects.gentoo.org/pms/latest/pms.html
//!
//! # Examples
//!
//! Parse a simple unversioned atom:
//! ```
//! use ebuild_atom::Cpn;
//!
//! let cpn = Cpn::parse("dev-lang/rust").unwrap();
//! assert_eq!(cpn.category, "dev-lang");
//! assert_eq!(cpn.package, "rust");
//! ```
//!
//! Compare versions:
//! ```
//! use ebuild_atom::Version;
//!
//! let old = Version::parse("1.74.1").unwrap();
//! let new = Version::parse("1.75.0_rc1").unwrap();
//! assert!(old < new);
//! ```
//!
//! Parse a full atom:
//! ```
//! use ebuild_atom::Atom;
//!
//! let atom = Atom::parse(">=dev-lang/rust-1.75.0:0[llvm_targets_AMDGPU]").unwrap();
//! assert_eq!(atom.key(), "dev-lang/rust");
//! assert!(atom.version().is_some());
//! assert!(atom.slot().is_some());
//! assert!(atom.use_deps().is_some());
//! ```

mod atom;
mod cpn;
mod cpv;
mod error;
mod slot;
mod use_dep;
mod version;

// Re-export main types
pub use atom::{Atom, Blocker};
pub use cpn::Cpn;
pub use cpv::Cpv;
pub use error::{Error, Result};
pub use slot::{Slot, SlotDep, SlotOperator};
pub use use_dep::{UseDefault, UseDep, UseDepPrefix};
pub use version::{Number, Operator, Revision, Suffix, SuffixKind, Version};
