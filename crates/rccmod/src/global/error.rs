use std::{error, io};
use thiserror::Error;

/// Internal `Result` type alias used by `rccmod`. Basically equal to: `Result<T, InternalError>`
pub type InternalResult<T = ()> = Result<T, InternalError>;

/// All errors manifestable within `rccmod` collected into a neat enum
#[derive(Debug, Error)]
pub enum InternalError {
	/// Generic Error
	#[error("[RccError::GenericError] {0}")]
	OtherError(Box<dyn error::Error + Send + Sync>),
	/// a necessary cargo feature wasn't enabled for a certain action: eg trying to decompress without the `compression` feature
	#[error("[RccError::MissingFeatureError] Unable to continue with operation, the cargo feature ({0}) is missing")]
	MissingFeatureError(&'static str),
	/// thin wrapper over [io::Error](std::io::Error), captures all IO errors
	#[error("[RccError::IOError] {0}")]
	IOError(#[from] io::Error),
	/// invalid MAGIC sequence in the given container, hinting at corruption or possible incompatibility with the given source
	#[error("[RccError::ValidationError] Invalid magic found in container header, possible incompatibility with given source. Magic found {0:?}")]
	MalformedArchiveSource([u8; crate::MAGIC_LENGTH]),
	/// the given source is too small to even hold a container header
	#[error("[RccError::ValidationError] Source of {0} bytes is too small to hold a container header")]
	TruncatedArchiveSource(usize),
	/// the source carries a format version this implementation does not decode, contains the incompatible version
	#[error("The provided archive has format version: {}. This implementation decodes versions {} through {}. The provided source is incompatible!", .0, crate::FORMAT_VERSION_MIN, crate::FORMAT_VERSION_MAX)]
	IncompatibleArchiveVersionError(u32),
	/// a node id whose record would lie outside the tree region, contains the id and the tree region's extent
	#[error("[RccError::InvalidNodeError] Node {0} lies outside the tree region of {1} bytes")]
	InvalidNode(u32, usize),
	/// the tree region's extent is not a whole number of records
	#[error("[RccError::MalformedTreeError] Tree region of {} bytes is not a whole number of {}-byte records", .0, crate::TREE_ENTRY_SIZE)]
	MalformedTreeRegion(usize),
	/// a directory record references children outside the tree region, or before itself
	#[error("[RccError::MalformedTreeError] Directory node {0} references children outside its tree region")]
	MalformedChildRange(u32),
	/// a node's name offset or name entry lies outside the name region
	#[error("[RccError::NameError] Name offset {1} of node {0} lies outside the name region")]
	NameOutOfBounds(u32, usize),
	/// a node's name entry does not decode to a valid string
	#[error("[RccError::NameError] Node {0} carries an undecodable name")]
	MalformedName(u32),
	/// a leaf's data offset or payload lies outside the data region
	#[error("[RccError::DataError] Data offset {1} of node {0} lies outside the data region")]
	DataOutOfBounds(u32, usize),
	/// no node matched the given path
	#[error("[RccError::MissingResourceError] Resource not found: {0}")]
	MissingResourceError(String),
	/// a directory node was used where only a leaf is valid, eg as a replacement target
	#[error("[RccError::NotAFileError] Node {0} is a directory, only file nodes carry a payload")]
	NotAFile(u32),
	/// a file node was used where only a directory is valid, eg as a traversal root
	#[error("[RccError::NotADirectoryError] Node {0} is a file node and has no children")]
	NotADirectory(u32),
	/// a replacement payload too large for the record's 32-bit length field
	#[error("[RccError::OversizeError] Replacement payload of {0} bytes overflows the 32-bit length field")]
	ReplacementTooLarge(u64),
	/// the data region grew beyond 32-bit addressing, no further offsets can be encoded
	#[error("[RccError::OversizeError] The data region grew beyond 32-bit addressing")]
	DataRegionOverflow,
	/// decompression of a leaf payload failed
	#[error("[RccError::DecompressionError] {0}")]
	DeCompressionError(String),
}
