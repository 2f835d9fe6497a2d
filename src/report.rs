//! Line output for a listing, and its print-and-return error policy.
//!
//! Entries go to `out` as `File: <name>, Size: <bytes> bytes`. The first
//! failure is written to `err` as one `perror`-style line and ends the
//! listing. Failures are never turned into an error return; only a failed
//! write to `out` or `err` is.

use crate::error::Error;
use crate::types::Entry;
use std::io::{self, Write};
use std::path::Path;

/// What a listing printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Entries written to `out`
    pub printed: usize,
    /// Whether a diagnostic was written to `err`
    pub failed: bool,
}

/// `File: <name>, Size: <bytes> bytes`. Missing sizes print as 0.
pub fn format_entry(entry: &Entry) -> String {
    format!("File: {}, Size: {} bytes", entry.name, entry.size_or_zero())
}

/// Print every entry until the stream ends or yields an error.
pub fn write_listing<I, W, E>(entries: I, mut out: W, mut err: E) -> io::Result<Summary>
where
    I: IntoIterator<Item = Result<Entry, Error>>,
    W: Write,
    E: Write,
{
    let mut summary = Summary::default();

    for entry in entries {
        match entry {
            Ok(entry) => {
                writeln!(out, "{}", format_entry(&entry))?;
                summary.printed += 1;
            }
            Err(e) => {
                out.flush()?;
                writeln!(err, "{}", e.diagnostic())?;
                summary.failed = true;
                break;
            }
        }
    }

    out.flush()?;
    Ok(summary)
}

/// List `path`, printing entries to `out` and a diagnostic to `err`.
///
/// An open failure prints `Failed to open directory: <reason>` and returns
/// early. A failed fetch prints `getattrlistbulk failed: <reason>` after
/// whatever was already listed. The directory is closed either way.
#[cfg(target_os = "macos")]
pub fn list_directory<P, W, E>(path: P, out: W, mut err: E) -> io::Result<Summary>
where
    P: AsRef<Path>,
    W: Write,
    E: Write,
{
    match crate::BulkListing::open(path, crate::Listing::default()) {
        Ok(listing) => write_listing(listing, out, err),
        Err(e) => {
            writeln!(err, "{}", e.diagnostic())?;
            Ok(Summary {
                printed: 0,
                failed: true,
            })
        }
    }
}

/// Without getattrlistbulk there is nothing to list.
#[cfg(not(target_os = "macos"))]
pub fn list_directory<P, W, E>(_path: P, out: W, err: E) -> io::Result<Summary>
where
    P: AsRef<Path>,
    W: Write,
    E: Write,
{
    write_listing(std::iter::once(Err(Error::NotSupported)), out, err)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, size: u64) -> Result<Entry, Error> {
        Ok(Entry {
            name: name.to_owned(),
            size: Some(size),
        })
    }

    #[test]
    fn test_format_entry() {
        let entry = Entry {
            name: "report.pdf".into(),
            size: Some(52_331),
        };
        assert_eq!(format_entry(&entry), "File: report.pdf, Size: 52331 bytes");

        let dir = Entry {
            name: "Projects".into(),
            size: None,
        };
        assert_eq!(format_entry(&dir), "File: Projects, Size: 0 bytes");
    }

    #[test]
    fn test_write_listing_prints_every_entry() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary =
            write_listing(vec![file("a", 1), file("b", 22)], &mut out, &mut err).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "File: a, Size: 1 bytes\nFile: b, Size: 22 bytes\n"
        );
        assert!(err.is_empty());
        assert_eq!(summary, Summary { printed: 2, failed: false });
    }

    #[test]
    fn test_write_listing_stops_at_first_error() {
        let entries = vec![
            file("kept", 5),
            Err(Error::Syscall(io::Error::from_raw_os_error(libc::EACCES))),
            file("never", 6),
        ];
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = write_listing(entries, &mut out, &mut err).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "File: kept, Size: 5 bytes\n");
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "getattrlistbulk failed: Permission denied\n"
        );
        assert_eq!(summary, Summary { printed: 1, failed: true });
    }

    #[test]
    fn test_empty_listing_prints_nothing() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = write_listing(Vec::<Result<Entry, Error>>::new(), &mut out, &mut err).unwrap();
        assert!(out.is_empty() && err.is_empty());
        assert_eq!(summary, Summary::default());
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    fn test_list_directory_unsupported() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let summary = list_directory("/tmp", &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(
            String::from_utf8(err).unwrap(),
            "getattrlistbulk unavailable: only supported on macOS\n"
        );
        assert!(summary.failed);
    }
}
