//! FFI declaration for the macOS getattrlistbulk system call.
//!
//! # Safety
//!
//! The function here is unsafe. [`crate::BulkListing`] is the safe wrapper.

use crate::attr::attrlist;

extern "C" {
    /// Bulk directory enumeration with attribute retrieval.
    ///
    /// Returns the number of records packed into `attribute_buffer`, 0 once
    /// the directory is exhausted, or -1 with `errno` set.
    ///
    /// # Safety
    ///
    /// - `dirfd` must be a valid open directory file descriptor
    /// - `alist` must point to a valid attrlist structure
    /// - `attribute_buffer` must point to a buffer of at least `buffer_size` bytes
    pub fn getattrlistbulk(
        dirfd: libc::c_int,
        alist: *mut attrlist,
        attribute_buffer: *mut libc::c_void,
        buffer_size: libc::size_t,
        options: u64,
    ) -> libc::ssize_t;
}
