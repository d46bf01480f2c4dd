#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]

/*!
Inspect, dump and patch compiled Qt resource archives (rcc).

An archive is three byte regions: a `tree` of fixed-size records, a `name`
table and a `data` region of length-prefixed payloads. `rccmod` decodes that
layout, walks it, dumps payloads out, and — the part everything else exists
for — substitutes the payload behind arbitrary leaf nodes without disturbing
a single original byte: replacements are appended after the original data
region and only the affected records' offset fields are rewritten.

### 🔩 Cargo Features
- `dump`: Enables the filesystem [`dump`] subsystem.
- `patch`: Enables the [`ReplacementLedger`](patch::ReplacementLedger) and [`commit`](patch::commit).
- `compression`: Pulls `flate2` and `zstd` as dependencies and expands compressed payloads on fetch and dump.
- `default`: Enables the `dump` and `patch` features.
- `all`: Enables all the above features.

### 🀄 Show me some code _dang it!_

```no_run
use rccmod::prelude::*;

let source = std::fs::read("assets.rcc").unwrap();
let mut root = ResourceRoot::from_rcc_owned(source).unwrap();

// read the bytes currently behind a node
let original = root.fetch("qml/Main.qml").unwrap();
assert!(!original.is_empty());

// stage a substitution, then fold it in
let node = root.node_for_path("qml/Main.qml").unwrap();
let mut ledger = ReplacementLedger::new();
ledger.add(node, b"import QtQuick 2.0\n".as_slice());

let summary = commit(&mut root, &mut ledger, None).unwrap();
assert_eq!(summary.applied, 1);
assert_eq!(root.entries_affected(), 1);
```
*/

/// All tests are included in this module.
mod tests;

pub(crate) mod global;
pub(crate) mod loader;

pub mod container;

#[cfg(feature = "dump")]
#[cfg_attr(docsrs, doc(cfg(feature = "dump")))]
pub mod dump;

#[cfg(feature = "patch")]
#[cfg_attr(docsrs, doc(cfg(feature = "patch")))]
pub(crate) mod patcher;

/// Size in bytes of one tree record
pub const TREE_ENTRY_SIZE: usize = 22;

/// Oldest container format version this implementation decodes. Version 1 trees use
/// 14-byte records and are rejected.
pub const FORMAT_VERSION_MIN: u32 = 2;

/// Newest container format version this implementation decodes
pub const FORMAT_VERSION_MAX: u32 = 3;

/// Magic Sequence opening every `.rcc` container: "qres"
pub const MAGIC: [u8; crate::MAGIC_LENGTH] = *b"qres";
pub(crate) const MAGIC_LENGTH: usize = 4;

/// Consolidated crate imports.
pub mod prelude {
	pub use crate::archive::*;

	#[cfg(feature = "dump")]
	pub use crate::dump::{dump_node, DumpOptions, DumpSummary};

	#[cfg(feature = "patch")]
	pub use crate::patch::*;
}

/// Archive reading logic and data structures: [`ResourceRoot`](archive::ResourceRoot),
/// [`Entry`](archive::Entry), [`Resource`](archive::Resource) and the walker
pub mod archive {
	pub use crate::container;
	pub use crate::global::{error::*, flags::Flags};
	pub use crate::loader::node::{Entry, EntryKind};
	pub use crate::loader::resource::Resource;
	pub use crate::loader::root::ResourceRoot;
	pub use crate::loader::walk::ArchiveStat;
}

/// Archive mutation logic: the [`ReplacementLedger`](patch::ReplacementLedger) and [`commit`](patch::commit)
#[cfg(feature = "patch")]
#[cfg_attr(docsrs, doc(cfg(feature = "patch")))]
pub mod patch {
	pub use crate::global::{error::*, flags::Flags};
	pub use crate::patcher::*;
}
