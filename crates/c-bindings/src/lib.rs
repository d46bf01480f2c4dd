#![allow(non_camel_case_types)]

use std::{ffi, fs, os::raw, path::Path, slice};
use rccmod::dump::{dump_node, DumpOptions};
use rccmod::prelude::*;

mod errors;

/// The newest container format version the library decodes
#[no_mangle]
pub extern "C" fn version() -> raw::c_uint {
	rccmod::FORMAT_VERSION_MAX
}

/// A live view over one archive: the tree, name and data regions plus patch bookkeeping
pub type r_root = raw::c_uchar;

/// A staged list of pending node substitutions
pub type r_ledger = raw::c_uchar;

/// Builds a root over the three raw regions of a registered archive.
///
/// The regions are borrowed, not copied: the caller keeps them mapped for the root's whole
/// lifetime. `version` is the archive's format version (2 or 3).
#[no_mangle]
pub extern "C" fn new_root_from_regions(
	tree: *const raw::c_uchar, tree_len: raw::c_ulonglong, name: *const raw::c_uchar, name_len: raw::c_ulonglong,
	data: *const raw::c_uchar, data_len: raw::c_ulonglong, version: raw::c_uint, error_p: *mut ffi::c_int,
) -> *mut r_root {
	if tree.is_null() || name.is_null() || data.is_null() {
		return errors::report(error_p, errors::E_PARAMETER_IS_NULL);
	}

	let tree = unsafe { slice::from_raw_parts(tree, tree_len as _) };
	let name = unsafe { slice::from_raw_parts(name, name_len as _) };
	let data = unsafe { slice::from_raw_parts(data, data_len as _) };

	let root = match ResourceRoot::from_regions(tree, name, data, version) {
		Ok(root) => root,
		Err(err) => return errors::r_error_to_id(error_p, err),
	};

	Box::into_raw(Box::new(root)) as _
}

/// Reads a whole `.rcc` container from a file into a root that owns its regions
#[no_mangle]
pub extern "C" fn new_root_from_file(path: *const raw::c_char, error_p: *mut ffi::c_int) -> *mut r_root {
	let path = match unsafe { ffi::CStr::from_ptr(path).to_str() } {
		Ok(p) => p,
		Err(_) => return errors::report(error_p, errors::E_INVALID_UTF8),
	};

	let Ok(source) = fs::read(path) else {
		return errors::report(error_p, errors::E_GENERIC_IO_ERROR);
	};

	let root = match ResourceRoot::from_rcc_owned(source) {
		Ok(root) => root,
		Err(err) => return errors::r_error_to_id(error_p, err),
	};

	Box::into_raw(Box::new(root)) as _
}

#[no_mangle]
pub extern "C" fn free_root(root: *mut r_root) {
	if !(root as *mut ResourceRoot<'static>).is_null() {
		let _ = unsafe { Box::from_raw(root as *mut ResourceRoot<'static>) };
	}
}

/// Number of records in the root's tree region
#[no_mangle]
pub extern "C" fn root_node_count(root: *const r_root) -> raw::c_uint {
	match unsafe { (root as *const ResourceRoot<'static>).as_ref() } {
		Some(root) => root.node_count(),
		None => 0,
	}
}

/// How many replacements have been committed into this root
#[no_mangle]
pub extern "C" fn root_entries_affected(root: *const r_root) -> raw::c_uint {
	match unsafe { (root as *const ResourceRoot<'static>).as_ref() } {
		Some(root) => root.entries_affected() as _,
		None => 0,
	}
}

/// The root's tree region as it currently stands, committed field rewrites included.
/// The hooking layer copies this back over the host's live tree after a commit.
#[no_mangle]
pub extern "C" fn root_tree(root: *const r_root, len_p: *mut raw::c_ulonglong) -> *const raw::c_uchar {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		return std::ptr::null();
	};

	if let Some(len) = unsafe { len_p.as_mut() } {
		*len = root.tree_size() as _;
	}

	root.tree_bytes().as_ptr()
}

/// The root's data region as it currently stands, appended replacement payloads included.
/// After a commit the hooking layer repoints the host's data region here.
#[no_mangle]
pub extern "C" fn root_data(root: *const r_root, len_p: *mut raw::c_ulonglong) -> *const raw::c_uchar {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		return std::ptr::null();
	};

	if let Some(len) = unsafe { len_p.as_mut() } {
		*len = root.data_size() as _;
	}

	root.data_bytes().as_ptr()
}

/// Walks `node`'s subtree and writes aggregate counts through the out-pointers
#[no_mangle]
pub extern "C" fn root_stat(
	root: *const r_root, node: raw::c_uint, files_p: *mut raw::c_ulonglong, directories_p: *mut raw::c_ulonglong,
	bytes_p: *mut raw::c_ulonglong, error_p: *mut ffi::c_int,
) -> ffi::c_int {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	let stat = match root.stat(node) {
		Ok(stat) => stat,
		Err(err) => {
			errors::r_error_to_id::<ffi::c_void>(error_p, err);
			return -1;
		},
	};

	if let Some(files) = unsafe { files_p.as_mut() } {
		*files = stat.files;
	}
	if let Some(directories) = unsafe { directories_p.as_mut() } {
		*directories = stat.directories;
	}
	if let Some(bytes) = unsafe { bytes_p.as_mut() } {
		*bytes = stat.bytes;
	}

	0
}

/// Resolves a slash-separated path to a node id, -1 when nothing matched
#[no_mangle]
pub extern "C" fn root_find_node(
	root: *const r_root, path: *const raw::c_char, error_p: *mut ffi::c_int,
) -> raw::c_longlong {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	let path = match unsafe { ffi::CStr::from_ptr(path).to_str() } {
		Ok(p) => p,
		Err(_) => {
			errors::report::<ffi::c_void>(error_p, errors::E_INVALID_UTF8);
			return -1;
		},
	};

	match root.node_for_path(path) {
		Ok(node) => node as _,
		Err(err) => {
			errors::r_error_to_id::<ffi::c_void>(error_p, err);
			-1
		},
	}
}

/// Copies `node`'s name into `buffer` and reports the name's true byte length through
/// `size_p`. When the reported length exceeds `max` the name was truncated to fit.
#[no_mangle]
pub extern "C" fn node_name(
	root: *const r_root, node: raw::c_uint, buffer: *mut raw::c_char, max: raw::c_ulonglong,
	size_p: *mut raw::c_ulonglong, error_p: *mut ffi::c_int,
) -> ffi::c_int {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	if buffer.is_null() {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	}

	let buffer = unsafe { slice::from_raw_parts_mut(buffer as *mut u8, max as _) };

	match root.name_into(node, buffer) {
		Ok(length) => {
			if let Some(size) = unsafe { size_p.as_mut() } {
				*size = length as _;
			}

			0
		},
		Err(err) => {
			errors::r_error_to_id::<ffi::c_void>(error_p, err);
			-1
		},
	}
}

/// Whether `node` is a directory record
#[no_mangle]
pub extern "C" fn node_is_directory(root: *const r_root, node: raw::c_uint, error_p: *mut ffi::c_int) -> bool {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return false;
	};

	match root.entry(node) {
		Ok(entry) => entry.is_directory(),
		Err(err) => {
			errors::r_error_to_id::<ffi::c_void>(error_p, err);
			false
		},
	}
}

/// A resolved leaf payload
#[repr(C)]
pub struct r_resource {
	data: *mut raw::c_uchar,
	len: raw::c_ulonglong,
	flags: raw::c_ushort,
	node: raw::c_uint,
}

/// Fetches `node`'s payload, expanded if it was stored compressed
#[no_mangle]
pub extern "C" fn node_payload(root: *const r_root, node: raw::c_uint, error_p: *mut ffi::c_int) -> *mut r_resource {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		return errors::report(error_p, errors::E_PARAMETER_IS_NULL);
	};

	let resource = match root.fetch_node(node) {
		Ok(resource) => resource,
		Err(err) => return errors::r_error_to_id(error_p, err),
	};

	let resource = r_resource {
		len: resource.data.len() as _,
		data: Box::leak(resource.data).as_mut_ptr(),
		flags: resource.flags.bits(),
		node: resource.node,
	};

	Box::into_raw(Box::new(resource))
}

#[no_mangle]
pub extern "C" fn free_resource(resource: *mut r_resource) {
	if let Some(resource) = unsafe { resource.as_mut() } {
		let resource = unsafe { Box::from_raw(resource) };

		let data = unsafe { slice::from_raw_parts_mut(resource.data, resource.len as _) };
		let _ = unsafe { Box::from_raw(data) };
	}
}

/// Dumps `node` (a leaf, or a whole subtree for a directory) to `file_name`.
///
/// `flags` is the dump option bitmask; it is decoded once on entry. `root_name` may be
/// NULL and only prefixes composed paths in logs. Returns the number of files written,
/// -1 on a structural failure.
#[no_mangle]
pub extern "C" fn root_dump_node(
	root: *const r_root, node: raw::c_uint, root_name: *const raw::c_char, file_name: *const raw::c_char,
	flags: raw::c_ushort, error_p: *mut ffi::c_int,
) -> raw::c_longlong {
	let Some(root) = (unsafe { (root as *const ResourceRoot<'static>).as_ref() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	let root_name = if root_name.is_null() {
		""
	} else {
		match unsafe { ffi::CStr::from_ptr(root_name).to_str() } {
			Ok(name) => name,
			Err(_) => {
				errors::report::<ffi::c_void>(error_p, errors::E_INVALID_UTF8);
				return -1;
			},
		}
	};

	let file_name = match unsafe { ffi::CStr::from_ptr(file_name).to_str() } {
		Ok(p) => p,
		Err(_) => {
			errors::report::<ffi::c_void>(error_p, errors::E_INVALID_UTF8);
			return -1;
		},
	};

	let options = DumpOptions::from_bits(flags);

	match dump_node(root, node, root_name, Path::new(file_name), &options, None) {
		Ok(summary) => summary.files_written as _,
		Err(err) => {
			errors::r_error_to_id::<ffi::c_void>(error_p, err);
			-1
		},
	}
}

/// Creates an empty replacement ledger. Its lifetime is one patch cycle: stage entries,
/// commit them, free it.
#[no_mangle]
pub extern "C" fn new_ledger() -> *mut r_ledger {
	Box::into_raw(Box::new(ReplacementLedger::new())) as _
}

#[no_mangle]
pub extern "C" fn free_ledger(ledger: *mut r_ledger) {
	if !(ledger as *mut ReplacementLedger).is_null() {
		let _ = unsafe { Box::from_raw(ledger as *mut ReplacementLedger) };
	}
}

/// Stages a replacement for `node` from a byte buffer. The bytes are copied into the
/// ledger, the caller's buffer is free to go afterwards.
#[no_mangle]
pub extern "C" fn ledger_add_bytes(
	ledger: *mut r_ledger, node: raw::c_uint, data: *const raw::c_uchar, len: raw::c_ulonglong,
	error_p: *mut ffi::c_int,
) -> ffi::c_int {
	let Some(ledger) = (unsafe { (ledger as *mut ReplacementLedger).as_mut() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	if data.is_null() {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	}

	let bytes = unsafe { slice::from_raw_parts(data, len as _) };
	ledger.add(node, bytes);

	0
}

/// Stages a replacement for `node` from a file. The file is read at commit time, an
/// unreadable file fails only its own entry.
#[no_mangle]
pub extern "C" fn ledger_add_file(
	ledger: *mut r_ledger, node: raw::c_uint, path: *const raw::c_char, error_p: *mut ffi::c_int,
) -> ffi::c_int {
	let Some(ledger) = (unsafe { (ledger as *mut ReplacementLedger).as_mut() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	let path = match unsafe { ffi::CStr::from_ptr(path).to_str() } {
		Ok(p) => p,
		Err(_) => {
			errors::report::<ffi::c_void>(error_p, errors::E_INVALID_UTF8);
			return -1;
		},
	};

	ledger.add(node, Path::new(path));
	0
}

/// Drops every staged entry
#[no_mangle]
pub extern "C" fn ledger_clear(ledger: *mut r_ledger) {
	if let Some(ledger) = unsafe { (ledger as *mut ReplacementLedger).as_mut() } {
		ledger.clear();
	}
}

/// Number of staged entries
#[no_mangle]
pub extern "C" fn ledger_len(ledger: *const r_ledger) -> raw::c_ulonglong {
	match unsafe { (ledger as *const ReplacementLedger).as_ref() } {
		Some(ledger) => ledger.len() as _,
		None => 0,
	}
}

/// Applies every staged entry in insertion order and drains the ledger. Returns how many
/// entries were folded in; entries that failed were skipped without touching the archive.
/// Read the patched regions back through `root_tree` and `root_data`.
#[no_mangle]
pub extern "C" fn root_commit(root: *mut r_root, ledger: *mut r_ledger, error_p: *mut ffi::c_int) -> raw::c_longlong {
	let Some(root) = (unsafe { (root as *mut ResourceRoot<'static>).as_mut() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	let Some(ledger) = (unsafe { (ledger as *mut ReplacementLedger).as_mut() }) else {
		errors::report::<ffi::c_void>(error_p, errors::E_PARAMETER_IS_NULL);
		return -1;
	};

	match commit(root, ledger, None) {
		Ok(summary) => summary.applied as _,
		Err(err) => {
			errors::r_error_to_id::<ffi::c_void>(error_p, err);
			-1
		},
	}
}
