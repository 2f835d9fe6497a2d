//! Iterator over one directory's entries, backed by getattrlistbulk.

use crate::attr::{attrlist, FsOptions};
use crate::error::{Error, ParseError};
use crate::ffi;
use crate::record::{Packing, RecordParser};
use crate::types::{Entry, Listing};
use std::os::unix::io::RawFd;
use std::path::Path;

/// Open directory plus the fetch buffer reused by every call.
///
/// Yields `Result<Entry, Error>`. A failed call or a malformed record is
/// yielded once, after which the iterator is fused. Nothing is retried.
/// Entries the kernel flags with their own error are skipped.
///
/// Iterating needs `&mut self`, so the descriptor is only ever used by one
/// caller at a time. It is closed on drop, whether or not the listing
/// finished.
///
/// # Example
///
/// ```no_run
/// use bulkls::{BulkListing, Listing};
///
/// for entry in BulkListing::open("/tmp", Listing::default())? {
///     let entry = entry?;
///     println!("{} {:?}", entry.name, entry.size);
/// }
/// # Ok::<(), bulkls::Error>(())
/// ```
pub struct BulkListing {
    dirfd: RawFd,
    request: attrlist,
    options: FsOptions,
    packing: Packing,
    buffer: Vec<u8>,
    /// Records from the last call not yet handed out.
    pending: usize,
    /// Byte offset of the next pending record.
    cursor: usize,
    done: bool,
}

impl BulkListing {
    /// Open `path` for listing.
    pub fn open<P: AsRef<Path>>(path: P, listing: Listing) -> Result<Self, Error> {
        let dirfd = open_directory(path.as_ref())?;

        let request = attrlist::name_and_size();
        let mut options = FsOptions::empty();
        if listing.pack_invalid_attrs {
            options |= FsOptions::PACK_INVAL_ATTRS;
        }
        if !listing.follow_symlinks {
            options |= FsOptions::NOFOLLOW;
        }

        Ok(Self {
            dirfd,
            request,
            options,
            packing: Packing::for_request(&request, listing.pack_invalid_attrs),
            buffer: vec![0u8; listing.effective_buffer_size()],
            pending: 0,
            cursor: 0,
            done: false,
        })
    }

    /// Size of the reused fetch buffer.
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Issue one getattrlistbulk call.
    ///
    /// Returns Ok(true) if records were packed, Ok(false) once exhausted.
    fn fetch(&mut self) -> Result<bool, Error> {
        let mut request = self.request;

        let count = unsafe {
            ffi::getattrlistbulk(
                self.dirfd,
                &mut request,
                self.buffer.as_mut_ptr() as *mut libc::c_void,
                self.buffer.len(),
                self.options.bits(),
            )
        };

        if count < 0 {
            return Err(Error::Syscall(std::io::Error::last_os_error()));
        }

        self.pending = count as usize;
        self.cursor = 0;
        Ok(count > 0)
    }

    /// Parse the next pending record from the current buffer.
    fn next_pending(&mut self) -> Option<Result<Entry, ParseError>> {
        while self.pending > 0 {
            let mut parser = RecordParser::new(&self.buffer[self.cursor..], 1, self.packing);
            let result = parser.next_record();
            let consumed = parser.consumed();

            match result {
                Some(Ok(entry)) => {
                    self.cursor += consumed;
                    self.pending -= 1;
                    return Some(Ok(entry));
                }
                Some(Err(e)) => {
                    self.pending = 0;
                    return Some(Err(e));
                }
                // Record carried its own error and was skipped.
                None => {
                    self.cursor += consumed;
                    self.pending -= 1;
                }
            }
        }
        None
    }
}

impl Iterator for BulkListing {
    type Item = Result<Entry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some(result) = self.next_pending() {
                if result.is_err() {
                    self.done = true;
                }
                return Some(result.map_err(Error::from));
            }

            match self.fetch() {
                Ok(true) => continue,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl Drop for BulkListing {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.dirfd);
        }
    }
}

/// Open a directory and return its file descriptor.
fn open_directory(path: &Path) -> Result<RawFd, Error> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|_| Error::Open {
        path: path.to_owned(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path contains null byte"),
    })?;

    let fd = unsafe {
        libc::open(
            c_path.as_ptr(),
            libc::O_RDONLY | libc::O_DIRECTORY | libc::O_CLOEXEC,
        )
    };

    if fd < 0 {
        return Err(Error::Open {
            path: path.to_owned(),
            source: std::io::Error::last_os_error(),
        });
    }

    Ok(fd)
}
