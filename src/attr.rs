//! Wire layout for `getattrlistbulk` requests and returned records.
//!
//! Reference: /usr/include/sys/attr.h
//!
//! These definitions carry no platform code, so the record parser and its
//! tests build everywhere. Only the call itself lives behind `cfg(macos)`.

#![allow(non_camel_case_types)]

use bitflags::bitflags;

/// Attribute request descriptor passed to `getattrlistbulk`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct attrlist {
    pub bitmapcount: u16,
    pub reserved: u16,
    pub commonattr: u32,
    pub volattr: u32,
    pub dirattr: u32,
    pub fileattr: u32,
    pub forkattr: u32,
}

/// Bitmap of the attributes actually present in a returned record.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct attribute_set {
    pub commonattr: u32,
    pub volattr: u32,
    pub dirattr: u32,
    pub fileattr: u32,
    pub forkattr: u32,
}

/// Reference to variable-length data later in the same record.
///
/// `attr_dataoffset` is relative to the address of this struct, and
/// `attr_length` counts the trailing NUL for strings.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct attrreference {
    pub attr_dataoffset: i32,
    pub attr_length: u32,
}

pub const ATTR_BIT_MAP_COUNT: u16 = 5;

/// Size of the leading `length` field of every record.
pub const RECORD_LENGTH_SIZE: usize = std::mem::size_of::<u32>();

/// Smallest well-formed record: length, returned set, name reference.
pub const RECORD_HEADER_SIZE: usize = RECORD_LENGTH_SIZE
    + std::mem::size_of::<attribute_set>()
    + std::mem::size_of::<attrreference>();

bitflags! {
    /// Common attributes (commonattr field)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CommonAttr: u32 {
        const NAME = 0x00000001;
        const ERROR = 0x20000000;
        const RETURNED_ATTRS = 0x80000000;
        /// The pair every `getattrlistbulk` request must include.
        const BULK_REQUIRED = Self::NAME.bits() | Self::RETURNED_ATTRS.bits();
    }

    /// File-specific attributes (fileattr field)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FileAttr: u32 {
        const TOTALSIZE = 0x00000002;
    }

    /// Options for getattrlistbulk
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FsOptions: u64 {
        const NOFOLLOW = 0x00000001;
        const PACK_INVAL_ATTRS = 0x00000008;
    }
}

impl attrlist {
    /// The request this crate issues: name, per-entry error and logical size.
    pub fn name_and_size() -> Self {
        let common = CommonAttr::BULK_REQUIRED | CommonAttr::ERROR;

        attrlist {
            bitmapcount: ATTR_BIT_MAP_COUNT,
            reserved: 0,
            commonattr: common.bits(),
            volattr: 0,
            dirattr: 0,
            fileattr: FileAttr::TOTALSIZE.bits(),
            forkattr: 0,
        }
    }
}

impl attribute_set {
    pub fn has_common(&self, attr: CommonAttr) -> bool {
        self.commonattr & attr.bits() == attr.bits()
    }

    pub fn has_file(&self, attr: FileAttr) -> bool {
        self.fileattr & attr.bits() == attr.bits()
    }
}
