use std::os::raw;
use rccmod::prelude;

/// One parameter passed to a function was NULL
pub const E_PARAMETER_IS_NULL: raw::c_int = -1;
/// String parameter was not valid UTF8 sequence
pub const E_INVALID_UTF8: raw::c_int = -2;
/// Generic IO error
pub const E_GENERIC_IO_ERROR: raw::c_int = -3;
/// Malformed archive source, invalid MAGIC, bad version or inconsistent regions
pub const E_MALFORMED_ARCHIVE_SOURCE: raw::c_int = -4;
/// A node id outside the tree region
pub const E_INVALID_NODE: raw::c_int = -5;
/// No node matched the given path
pub const E_RESOURCE_NOT_FOUND: raw::c_int = -6;
/// The node is a directory where only a file node is valid, or the other way around
pub const E_WRONG_NODE_KIND: raw::c_int = -7;
/// One or more necessary library features wasn't enabled during compilation
pub const E_MISSING_FEATURE_ERROR: raw::c_int = -8;
/// A payload failed to expand
pub const E_DECOMPRESSION_ERROR: raw::c_int = -9;
/// A replacement or region outgrew 32-bit addressing
pub const E_OVERSIZE: raw::c_int = -10;
/// Unknown error
pub const E_UNKNOWN: raw::c_int = -11;

pub(crate) fn r_error_to_id<T>(error_p: *mut raw::c_int, error: prelude::InternalError) -> *mut T {
	if let Some(e) = unsafe { error_p.as_mut() } {
		*e = match error {
			prelude::InternalError::OtherError(_) => E_UNKNOWN,
			prelude::InternalError::MissingFeatureError(_) => E_MISSING_FEATURE_ERROR,
			prelude::InternalError::IOError(_) => E_GENERIC_IO_ERROR,
			prelude::InternalError::MalformedArchiveSource(_)
			| prelude::InternalError::TruncatedArchiveSource(_)
			| prelude::InternalError::IncompatibleArchiveVersionError(_)
			| prelude::InternalError::MalformedTreeRegion(_)
			| prelude::InternalError::MalformedChildRange(_)
			| prelude::InternalError::NameOutOfBounds(..)
			| prelude::InternalError::MalformedName(_)
			| prelude::InternalError::DataOutOfBounds(..) => E_MALFORMED_ARCHIVE_SOURCE,
			prelude::InternalError::InvalidNode(..) => E_INVALID_NODE,
			prelude::InternalError::MissingResourceError(_) => E_RESOURCE_NOT_FOUND,
			prelude::InternalError::NotAFile(_) | prelude::InternalError::NotADirectory(_) => E_WRONG_NODE_KIND,
			prelude::InternalError::ReplacementTooLarge(_) | prelude::InternalError::DataRegionOverflow => E_OVERSIZE,
			prelude::InternalError::DeCompressionError(_) => E_DECOMPRESSION_ERROR,
		};
	}

	std::ptr::null_mut()
}

pub(crate) fn report<T>(error_p: *mut raw::c_int, code: raw::c_int) -> *mut T {
	if let Some(error) = unsafe { error_p.as_mut() } {
		*error = code;
	}

	std::ptr::null_mut()
}
