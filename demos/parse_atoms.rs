//! Example demonstrating parsing and comparing package atoms

use std::cmp::Ordering;

use ebuild_atom::{Atom, Cpn, Cpv, Version};

fn main() {
    println!("Package Atom Parser Examples\n");

    // Simple unversioned atom
    println!("1. Simple Cpn:");
    let cpn = Cpn::parse("dev-lang/rust").expect("Failed to parse cpn");
    println!("   Input: dev-lang/rust");
    println!("   Category: {}", cpn.category);
    println!("   Package: {}", cpn.package);
    println!("   Output: {}\n", cpn);

    // Versioned atom
    println!("2. Versioned Cpv:");
    let cpv = Cpv::parse("dev-lang/rust-1.75.0").expect("Failed to parse cpv");
    println!("   Input: dev-lang/rust-1.75.0");
    println!("   Category: {}", cpv.category());
    println!("   Package: {}", cpv.package());
    println!("   Version: {}", cpv.version);
    println!("   Output: {}\n", cpv);

    // Full atom with version operator
    println!("3. Atom with version operator:");
    let atom = Atom::parse(">=dev-lang/rust-1.75.0").expect("Failed to parse atom");
    println!("   Input: >=dev-lang/rust-1.75.0");
    println!("   Operator: {:?}", atom.op());
    println!("   Output: {}\n", atom);

    // Atom with slot and subslot
    println!("4. Atom with slot:");
    let atom = Atom::parse("dev-lang/rust:0/1.75=").expect("Failed to parse atom with slot");
    println!("   Input: dev-lang/rust:0/1.75=");
    println!("   Slot: {:?}", atom.slot());
    println!("   Subslot: {:?}", atom.subslot());
    println!("   Slot operator: {:?}", atom.slot_op());
    println!("   Output: {}\n", atom);

    // Atom with USE flags
    println!("5. Atom with USE flags:");
    let atom = Atom::parse("dev-lang/rust[llvm_targets_AMDGPU,-debug]")
        .expect("Failed to parse atom with use flags");
    println!("   Input: dev-lang/rust[llvm_targets_AMDGPU,-debug]");
    if let Some(use_deps) = atom.use_deps() {
        println!("   USE flags: {} flags", use_deps.len());
        for flag in use_deps {
            println!("     - {}", flag);
        }
    }
    println!("   Output: {}\n", atom);

    // Blocker
    println!("6. Blocker:");
    let atom = Atom::parse("!!dev-lang/rust").expect("Failed to parse blocker");
    println!("   Input: !!dev-lang/rust");
    println!("   Blocker: {:?}", atom.blocker());
    println!("   Output: {}\n", atom);

    // Complex atom with a default repository
    println!("7. Complex atom:");
    let atom = Atom::parse_in_repo(">=dev-lang/rust-1.75.0:0/1.75[llvm_targets_AMDGPU]", Some("gentoo"))
        .expect("Failed to parse complex atom");
    println!("   Input: >=dev-lang/rust-1.75.0:0/1.75[llvm_targets_AMDGPU] (default repo: gentoo)");
    println!("   Key: {}", atom.key());
    println!("   Repository: {:?}", atom.repo());
    println!("   Output: {}\n", atom);

    // Version comparison
    println!("8. Version comparison:");
    let pairs = [("1.01", "1.1"), ("1.1", "1.10"), ("1.0_rc1", "1.0"), ("1.0", "1.0-r0")];
    for (a, b) in pairs {
        let va = Version::parse(a).expect("Failed to parse version");
        let vb = Version::parse(b).expect("Failed to parse version");
        let sign = match va.cmp(&vb) {
            Ordering::Less => "<",
            Ordering::Equal => "==",
            Ordering::Greater => ">",
        };
        println!("   {} {} {}", a, sign, b);
    }
    println!();

    // Atom ordering
    println!("9. Atom ordering:");
    let mut atoms = ["cat/pkg-2", "cat/pkg", "cat/pkg-1.0_alpha", "cat/pkg-1"]
        .map(|s| Atom::parse(s).expect("Failed to parse atom"));
    atoms.sort_by(|a, b| a.compare(b));
    for atom in &atoms {
        println!("   {}", atom);
    }
}
