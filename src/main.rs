//! Print the name and logical size of every entry in one directory.
//!
//! Diagnostics go to standard error. The exit status is always success.

use std::io::{self, BufWriter};

/// Directory listed by this program.
const TARGET_DIR: &str = "/Users/Shared";

fn main() {
    let out = BufWriter::new(io::stdout().lock());
    let err = io::stderr().lock();

    // A broken pipe on either stream only cuts the output short.
    let _ = bulkls::list_directory(TARGET_DIR, out, err);
}
