//! # bulkls
//!
//! List a directory's entry names and logical sizes with the macOS
//! `getattrlistbulk()` system call.
//!
//! One call fills a fixed buffer with a batch of records. The buffer is
//! parsed, every entry is handed out, and the same buffer is refilled until
//! the kernel reports the directory exhausted.
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(target_os = "macos")]
//! # fn main() -> Result<(), bulkls::Error> {
//! use bulkls::{BulkListing, Listing, format_entry};
//!
//! for entry in BulkListing::open("/Users/Shared", Listing::default())? {
//!     println!("{}", format_entry(&entry?));
//! }
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "macos"))]
//! # fn main() {}
//! ```
//!
//! ## Platform Support
//!
//! Record parsing and output formatting build everywhere. Opening and
//! listing a directory is only available on macOS; elsewhere
//! [`list_directory`] reports [`Error::NotSupported`].

pub mod attr;
mod error;
mod record;
mod report;
mod types;

#[cfg(target_os = "macos")]
mod builder;
#[cfg(target_os = "macos")]
mod ffi;
#[cfg(target_os = "macos")]
mod listing;

pub use error::{os_message, Error};
pub use record::{Packing, RecordParser};
pub use report::{format_entry, list_directory, write_listing, Summary};
pub use types::{Entry, Listing, DEFAULT_BUFFER_SIZE, MIN_BUFFER_SIZE};

#[cfg(target_os = "macos")]
pub use builder::Lister;
#[cfg(target_os = "macos")]
pub use listing::BulkListing;

/// Open `path` with the default 64KB buffer.
///
/// # Example
///
/// ```no_run
/// for entry in bulkls::read_dir("/tmp")? {
///     let entry = entry?;
///     println!("{}: {} bytes", entry.name, entry.size_or_zero());
/// }
/// # Ok::<(), bulkls::Error>(())
/// ```
#[cfg(target_os = "macos")]
pub fn read_dir<P: AsRef<std::path::Path>>(path: P) -> Result<BulkListing, Error> {
    BulkListing::open(path, Listing::default())
}

/// Open `path` with a custom buffer size.
///
/// Larger buffers result in fewer syscalls but use more memory.
/// Recommended buffer sizes:
/// - 64KB: Default, good for most directories
/// - 256KB: Large directories (10,000+ files)
/// - 1MB: Very large directories (100,000+ files)
#[cfg(target_os = "macos")]
pub fn read_dir_with_buffer<P: AsRef<std::path::Path>>(
    path: P,
    buffer_size: usize,
) -> Result<BulkListing, Error> {
    BulkListing::open(
        path,
        Listing {
            buffer_size,
            ..Listing::default()
        },
    )
}
