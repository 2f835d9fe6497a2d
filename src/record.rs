//! Record parsing for getattrlistbulk result buffers.
//!
//! One call packs `count` records back to back. With the request this crate
//! issues, each record looks like:
//! ```text
//! +------------------+
//! | length (u32)     |  Total length of this record
//! +------------------+
//! | attribute_set    |  Which attributes are present (20 bytes)
//! +------------------+
//! | attrreference    |  Name: offset (i32) + length (u32), incl. NUL
//! +------------------+
//! | error (u32)      |  Only with ATTR_CMN_ERROR
//! +------------------+
//! | total size (i64) |  Only with ATTR_FILE_TOTALSIZE
//! +------------------+
//! | name bytes       |  NUL-terminated, referenced above
//! +------------------+
//! ```
//!
//! Without `FSOPT_PACK_INVAL_ATTRS` only returned attributes occupy space.
//! With it, every requested attribute has a slot and the returned set only
//! says which slots hold valid data.

use crate::attr::{attribute_set, attrlist, CommonAttr, FileAttr, RECORD_LENGTH_SIZE};
use crate::error::{Error, ParseError};
use crate::types::Entry;
use std::mem::size_of;

/// Where fixed attributes sit inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packing {
    /// Only attributes in the returned set are laid out.
    Returned,
    /// Every requested attribute is laid out (`FSOPT_PACK_INVAL_ATTRS`).
    Requested(attribute_set),
}

impl Packing {
    /// Layout for `request`, depending on whether invalid attributes are packed.
    pub fn for_request(request: &attrlist, pack_invalid: bool) -> Self {
        if !pack_invalid {
            return Packing::Returned;
        }
        Packing::Requested(attribute_set {
            commonattr: request.commonattr,
            volattr: request.volattr,
            dirattr: request.dirattr,
            fileattr: request.fileattr,
            forkattr: request.forkattr,
        })
    }

    fn slots<'s>(&'s self, returned: &'s attribute_set) -> &'s attribute_set {
        match self {
            Packing::Returned => returned,
            Packing::Requested(requested) => requested,
        }
    }
}

/// Parser over one filled result buffer.
///
/// Yields at most `count` entries and stops for good after the first
/// malformed record, since later offsets can no longer be trusted. A record
/// carrying its own nonzero `ATTR_CMN_ERROR` is well-formed: it is skipped
/// and parsing continues with the next one.
pub struct RecordParser<'a> {
    buffer: &'a [u8],
    offset: usize,
    remaining: usize,
    skipped: usize,
    packing: Packing,
    failed: bool,
}

impl<'a> RecordParser<'a> {
    /// Parse `count` records from the start of `buffer`.
    pub fn new(buffer: &'a [u8], count: usize, packing: Packing) -> Self {
        Self {
            buffer,
            offset: 0,
            remaining: count,
            skipped: 0,
            packing,
            failed: false,
        }
    }

    /// Records not yet parsed.
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.remaining
        }
    }

    /// Records passed over because the kernel reported an error for them.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Bytes of the buffer covered by records parsed so far.
    pub fn consumed(&self) -> usize {
        self.offset
    }

    pub(crate) fn next_record(&mut self) -> Option<Result<Entry, ParseError>> {
        loop {
            if self.failed || self.remaining == 0 {
                return None;
            }

            let result = self.split_record().and_then(|record| {
                Record {
                    bytes: record,
                    packing: self.packing,
                }
                .parse()
            });

            match result {
                Ok(Some(entry)) => {
                    self.remaining -= 1;
                    return Some(Ok(entry));
                }
                Ok(None) => {
                    self.remaining -= 1;
                    self.skipped += 1;
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }

    /// Cut the next record out of the buffer and advance past it.
    fn split_record(&mut self) -> Result<&'a [u8], ParseError> {
        let length = read_u32(self.buffer, self.offset).ok_or(ParseError::BufferTooSmall)? as usize;

        if length < RECORD_LENGTH_SIZE + size_of::<attribute_set>() {
            return Err(ParseError::InvalidEntryLength);
        }

        let end = self
            .offset
            .checked_add(length)
            .filter(|&end| end <= self.buffer.len())
            .ok_or(ParseError::BufferTooSmall)?;

        let record = &self.buffer[self.offset..end];
        self.offset = end;
        Ok(record)
    }
}

impl Iterator for RecordParser<'_> {
    type Item = Result<Entry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().map(|r| r.map_err(Error::from))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

/// A single record, bounded by its own length field.
struct Record<'a> {
    bytes: &'a [u8],
    packing: Packing,
}

impl Record<'_> {
    /// `Ok(None)` when the kernel reported an error for this entry.
    fn parse(&self) -> Result<Option<Entry>, ParseError> {
        let mut cursor = RECORD_LENGTH_SIZE;

        let returned = self.read_attribute_set(cursor)?;
        cursor += size_of::<attribute_set>();
        let slots = *self.packing.slots(&returned);

        let mut name = None;
        if slots.has_common(CommonAttr::NAME) {
            if returned.has_common(CommonAttr::NAME) {
                name = Some(self.read_name(cursor)?);
            }
            cursor += 8;
        }

        if slots.has_common(CommonAttr::ERROR) {
            if returned.has_common(CommonAttr::ERROR) {
                let errno = self.read_u32(cursor)?;
                if errno != 0 {
                    return Ok(None);
                }
            }
            cursor += 4;
        }

        let mut size = None;
        if slots.has_file(FileAttr::TOTALSIZE) && returned.has_file(FileAttr::TOTALSIZE) {
            let total = self.read_i64(cursor)?;
            if total < 0 {
                return Err(ParseError::NegativeSize(total));
            }
            size = Some(total as u64);
        }

        let name = name.ok_or(ParseError::MissingName)?;
        Ok(Some(Entry { name, size }))
    }

    fn read_u32(&self, offset: usize) -> Result<u32, ParseError> {
        read_u32(self.bytes, offset).ok_or(ParseError::UnexpectedEnd)
    }

    fn read_i32(&self, offset: usize) -> Result<i32, ParseError> {
        self.read_u32(offset).map(|v| v as i32)
    }

    fn read_i64(&self, offset: usize) -> Result<i64, ParseError> {
        let bytes: [u8; 8] = self
            .bytes
            .get(offset..offset + 8)
            .and_then(|b| b.try_into().ok())
            .ok_or(ParseError::UnexpectedEnd)?;
        Ok(i64::from_ne_bytes(bytes))
    }

    fn read_attribute_set(&self, offset: usize) -> Result<attribute_set, ParseError> {
        Ok(attribute_set {
            commonattr: self.read_u32(offset)?,
            volattr: self.read_u32(offset + 4)?,
            dirattr: self.read_u32(offset + 8)?,
            fileattr: self.read_u32(offset + 12)?,
            forkattr: self.read_u32(offset + 16)?,
        })
    }

    /// Resolve the attrreference at `ref_offset` to a name.
    fn read_name(&self, ref_offset: usize) -> Result<String, ParseError> {
        let data_offset = self.read_i32(ref_offset)?;
        let data_length = self.read_u32(ref_offset + 4)?;

        // Offset is relative to the attrreference itself.
        let start = (ref_offset as i64)
            .checked_add(i64::from(data_offset))
            .filter(|&s| s >= 0)
            .ok_or(ParseError::InvalidOffset)? as usize;
        let end = start
            .checked_add(data_length as usize)
            .filter(|&e| e <= self.bytes.len())
            .ok_or(ParseError::InvalidOffset)?;

        let raw = &self.bytes[start..end];
        let nul = raw
            .iter()
            .position(|&b| b == 0)
            .ok_or(ParseError::UnterminatedName)?;

        Ok(String::from_utf8_lossy(&raw[..nul]).into_owned())
    }
}

fn read_u32(buffer: &[u8], offset: usize) -> Option<u32> {
    let bytes: [u8; 4] = buffer.get(offset..offset.checked_add(4)?)?.try_into().ok()?;
    Some(u32::from_ne_bytes(bytes))
}
