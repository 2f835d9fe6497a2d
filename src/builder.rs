//! Builder pattern API for opening a listing.

use crate::error::Error;
use crate::listing::BulkListing;
use crate::types::Listing;
use std::path::{Path, PathBuf};

/// Builder for configuring a directory listing.
///
/// # Example
///
/// ```no_run
/// use bulkls::Lister;
///
/// let entries = Lister::new("/tmp")
///     .buffer_size(128 * 1024)
///     .follow_symlinks(false)
///     .open()?;
///
/// for entry in entries {
///     let entry = entry?;
///     println!("{}: {:?} bytes", entry.name, entry.size);
/// }
/// # Ok::<(), bulkls::Error>(())
/// ```
pub struct Lister {
    path: PathBuf,
    listing: Listing,
}

impl Lister {
    /// Create a new lister for the given directory.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_owned(),
            listing: Listing::default(),
        }
    }

    /// Set the fetch buffer size.
    ///
    /// Larger buffers mean fewer calls. Default is 64KB. Values below
    /// [`crate::MIN_BUFFER_SIZE`] are raised to it.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.listing.buffer_size = size;
        self
    }

    /// Control whether symbolic links are followed.
    ///
    /// When `false`, uses FSOPT_NOFOLLOW. Default is `true`.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.listing.follow_symlinks = follow;
        self
    }

    /// Ask the kernel to reserve space for attributes it could not supply.
    pub fn pack_invalid_attrs(mut self, pack: bool) -> Self {
        self.listing.pack_invalid_attrs = pack;
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, listing: Listing) -> Self {
        self.listing = listing;
        self
    }

    /// Open the directory and return an iterator over its entries.
    pub fn open(self) -> Result<BulkListing, Error> {
        BulkListing::open(&self.path, self.listing)
    }
}
