//! Public value types: listed entries and listing options.

/// Default fetch buffer size.
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Smallest buffer accepted. Large enough for one record carrying a
/// maximum-length (`NAME_MAX` UTF-8) name plus every fixed attribute.
pub const MIN_BUFFER_SIZE: usize = 1024;

/// Name and logical size of one directory entry.
///
/// # String Handling
///
/// `name` uses lossy UTF-8 conversion. Invalid bytes (rare on macOS but
/// possible) become U+FFFD.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// File or directory name
    pub name: String,
    /// Logical size in bytes; `None` for objects without one, such as directories
    pub size: Option<u64>,
}

impl Entry {
    /// Logical size, counting a missing size as zero bytes.
    pub fn size_or_zero(&self) -> u64 {
        self.size.unwrap_or(0)
    }
}

/// Options for one directory listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Listing {
    /// Bytes in the fetch buffer, reused for every call
    pub buffer_size: usize,
    /// When false, `FSOPT_NOFOLLOW` is passed
    pub follow_symlinks: bool,
    /// Pass `FSOPT_PACK_INVAL_ATTRS`, reserving a slot for every requested attribute
    pub pack_invalid_attrs: bool,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            follow_symlinks: true,
            pack_invalid_attrs: false,
        }
    }
}

impl Listing {
    /// Buffer size actually allocated, never below [`MIN_BUFFER_SIZE`].
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.max(MIN_BUFFER_SIZE)
    }
}
