//! Byte-level layout of code table files.
//!
//! This module sits between the high-level [`CodeTableReader`](crate::CodeTableReader)
//! / [`CodeTableBuilder`](crate::CodeTableBuilder) and the raw bytes.
//!
//! # Module Organization
//!
//! - [`layout`]: Format constants
//! - [`header`]: Flag byte and index table
//! - [`record`]: Single record frames
//! - [`index`]: Computes the index table from sorted records
//!
//! # Architecture
//!
//! ```text
//! File Structure:
//! ┌─────────────────┐ 0x00
//! │  Flag (0x00)    │
//! ├─────────────────┤ 0x01
//! │  Index Table    │ ← header::parse() / header::write()
//! │  27 x u32 LE    │   (values from index::compute())
//! ├─────────────────┤ 0x6D
//! │  Record frames  │ ← record::read_frame() / record::write_frame()
//! │  grouped a..z   │
//! └─────────────────┘
//! ```

pub mod header;
pub mod index;
pub mod layout;
pub mod record;
