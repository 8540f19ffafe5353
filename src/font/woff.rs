//! WOFF 1.0 wrapper

use std::io::Write;

use anyhow::anyhow;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use ttf_parser::RawFace;

use crate::core::errors::ForgeResult;

const WOFF_SIGNATURE: &[u8; 4] = b"wOFF";
const WOFF_HEADER_LEN: usize = 44;
const WOFF_TABLE_ENTRY_LEN: usize = 20;

fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

/// One table of the wrapped font, as it is stored in the WOFF body
struct StoredTable<'a> {
    tag: [u8; 4],
    checksum: u32,
    original: &'a [u8],
    data: Vec<u8>,
}

fn deflate(data: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data)?;
    encoder.finish()
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Wrap a TrueType font into a WOFF file
///
/// Each table is stored compressed only when that makes it smaller.
pub fn wrap_woff(ttf: &[u8], version: (u16, u16)) -> ForgeResult<Vec<u8>> {
    let raw = RawFace::parse(ttf, 0)?;
    let flavor = ttf
        .get(..4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| anyhow!("font is too short for an sfnt header"))?;

    let mut tables = Vec::with_capacity(raw.table_records.len() as usize);
    for record in raw.table_records {
        let start = record.offset as usize;
        let original = ttf
            .get(start..start + record.length as usize)
            .ok_or_else(|| anyhow!("table '{}' lies outside the font", record.tag))?;
        let compressed = deflate(original)?;
        let data = if compressed.len() < original.len() {
            compressed
        } else {
            original.to_vec()
        };
        tables.push(StoredTable {
            tag: record.tag.to_bytes(),
            checksum: record.check_sum,
            original,
            data,
        });
    }

    let total_sfnt_size = 12
        + 16 * tables.len()
        + tables
            .iter()
            .map(|table| padded_len(table.original.len()))
            .sum::<usize>();

    let mut offset = WOFF_HEADER_LEN + WOFF_TABLE_ENTRY_LEN * tables.len();
    let mut directory = Vec::with_capacity(WOFF_TABLE_ENTRY_LEN * tables.len());
    for table in &tables {
        directory.extend_from_slice(&table.tag);
        put_u32(&mut directory, offset as u32);
        put_u32(&mut directory, table.data.len() as u32);
        put_u32(&mut directory, table.original.len() as u32);
        put_u32(&mut directory, table.checksum);
        offset += padded_len(table.data.len());
    }
    // the last table is not padded
    let length = offset
        - tables
            .last()
            .map_or(0, |table| padded_len(table.data.len()) - table.data.len());

    let mut woff = Vec::with_capacity(length);
    woff.extend_from_slice(WOFF_SIGNATURE);
    put_u32(&mut woff, flavor);
    put_u32(&mut woff, length as u32);
    put_u16(&mut woff, tables.len() as u16);
    put_u16(&mut woff, 0); // reserved
    put_u32(&mut woff, total_sfnt_size as u32);
    put_u16(&mut woff, version.0);
    put_u16(&mut woff, version.1);
    for _ in 0..5 {
        // metaOffset, metaLength, metaOrigLength, privOffset, privLength
        put_u32(&mut woff, 0);
    }
    woff.extend_from_slice(&directory);

    let last = tables.len().saturating_sub(1);
    for (idx, table) in tables.iter().enumerate() {
        woff.extend_from_slice(&table.data);
        if idx != last {
            woff.resize(padded_len(woff.len()), 0);
        }
    }
    Ok(woff)
}
