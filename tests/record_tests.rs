//! Record parser tests with synthetic buffers.
//!
//! These build the byte layout `getattrlistbulk` produces, so they run on
//! any platform.

use bulkls::attr::{attrlist, CommonAttr, FileAttr, RECORD_HEADER_SIZE};
use bulkls::{write_listing, Entry, Error, Packing, RecordParser};

/// Pack one record: returned set, name reference, optional size, name bytes.
fn record(name: &[u8], size: Option<i64>) -> Vec<u8> {
    let common = CommonAttr::BULK_REQUIRED.bits();
    let file = if size.is_some() { FileAttr::TOTALSIZE.bits() } else { 0 };

    let mut body = Vec::new();
    for word in [common, 0, 0, file, 0] {
        body.extend_from_slice(&word.to_ne_bytes());
    }

    let size_len = if size.is_some() { 8 } else { 0 };
    // attrreference sits at record offset 24; name follows the fixed part.
    let name_rel = (8 + size_len) as i32;
    body.extend_from_slice(&name_rel.to_ne_bytes());
    body.extend_from_slice(&(name.len() as u32 + 1).to_ne_bytes());
    if let Some(size) = size {
        body.extend_from_slice(&size.to_ne_bytes());
    }
    body.extend_from_slice(name);
    body.push(0);

    let total = (4 + body.len() + 3) & !3;
    let mut out = (total as u32).to_ne_bytes().to_vec();
    out.extend(body);
    out.resize(total, 0);
    out
}

/// Pack a record for an entry the kernel could not stat.
fn errored_record(name: &[u8], errno: i32) -> Vec<u8> {
    let common = (CommonAttr::BULK_REQUIRED | CommonAttr::ERROR).bits();

    let mut body = Vec::new();
    for word in [common, 0, 0, 0, 0] {
        body.extend_from_slice(&word.to_ne_bytes());
    }
    // Name follows the reference and the error word.
    body.extend_from_slice(&12i32.to_ne_bytes());
    body.extend_from_slice(&(name.len() as u32 + 1).to_ne_bytes());
    body.extend_from_slice(&(errno as u32).to_ne_bytes());
    body.extend_from_slice(name);
    body.push(0);

    let total = (4 + body.len() + 3) & !3;
    let mut out = (total as u32).to_ne_bytes().to_vec();
    out.extend(body);
    out.resize(total, 0);
    out
}

#[test]
fn test_header_size() {
    assert_eq!(RECORD_HEADER_SIZE, 32);
    assert!(record(b"a", None).len() >= RECORD_HEADER_SIZE);
}

#[test]
fn test_parse_mixed_batch() {
    let mut buf = record(b"Documents", None);
    buf.extend(record(b"photo.jpg", Some(2_483_112)));
    buf.extend(record(b".hidden", Some(0)));

    let entries: Vec<Entry> = RecordParser::new(&buf, 3, Packing::Returned)
        .collect::<Result<_, _>>()
        .expect("parse batch");

    assert_eq!(
        entries,
        vec![
            Entry { name: "Documents".into(), size: None },
            Entry { name: "photo.jpg".into(), size: Some(2_483_112) },
            Entry { name: ".hidden".into(), size: Some(0) },
        ]
    );
}

#[test]
fn test_parser_reports_remaining() {
    let mut buf = record(b"one", Some(1));
    buf.extend(record(b"two", Some(2)));

    let mut parser = RecordParser::new(&buf, 2, Packing::Returned);
    assert_eq!(parser.remaining(), 2);
    parser.next().unwrap().unwrap();
    assert_eq!(parser.remaining(), 1);
    assert_eq!(parser.consumed(), record(b"one", Some(1)).len());
    parser.next().unwrap().unwrap();
    assert!(parser.next().is_none());
}

#[test]
fn test_truncated_buffer_is_parse_error() {
    let buf = record(b"cut-short.txt", Some(10));
    let truncated = &buf[..buf.len() - 8];

    let results: Vec<_> = RecordParser::new(truncated, 1, Packing::Returned).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(Error::Parse(_))));
}

#[test]
fn test_packing_for_request() {
    let request = attrlist::name_and_size();
    assert_eq!(Packing::for_request(&request, false), Packing::Returned);
    match Packing::for_request(&request, true) {
        Packing::Requested(set) => {
            assert_eq!(set.commonattr, request.commonattr);
            assert_eq!(set.fileattr, request.fileattr);
        }
        other => panic!("expected requested packing, got {:?}", other),
    }
}

#[test]
fn test_malformed_record_ends_listing() {
    let mut buf = record(b"a.txt", Some(3));
    buf.extend(record(b"b", None));
    // Third record claims more bytes than the buffer holds.
    let mut bad = record(b"c", Some(1));
    bad[..4].copy_from_slice(&4096u32.to_ne_bytes());
    buf.extend(bad);

    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = write_listing(
        RecordParser::new(&buf, 3, Packing::Returned),
        &mut out,
        &mut err,
    )
    .expect("write output");

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "File: a.txt, Size: 3 bytes\nFile: b, Size: 0 bytes\n"
    );
    assert_eq!(
        String::from_utf8(err).unwrap(),
        "getattrlistbulk returned a malformed record: buffer too small\n"
    );
    assert_eq!(summary.printed, 2);
    assert!(summary.failed);
}

#[test]
fn test_entry_error_does_not_end_listing() {
    let mut buf = record(b"first.txt", Some(10));
    buf.extend(errored_record(b"private", libc::EACCES));
    buf.extend(record(b"last.txt", Some(20)));

    let mut parser = RecordParser::new(&buf, 3, Packing::Returned);
    let mut out = Vec::new();
    let mut err = Vec::new();
    let summary = write_listing(&mut parser, &mut out, &mut err).expect("write output");

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "File: first.txt, Size: 10 bytes\nFile: last.txt, Size: 20 bytes\n"
    );
    assert!(err.is_empty());
    assert_eq!(summary.printed, 2);
    assert!(!summary.failed);
    assert_eq!(parser.skipped(), 1);
}
