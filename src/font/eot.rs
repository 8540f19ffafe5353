//! Embedded OpenType wrapper
//!
//! Version 0x00020001 header, no MTX compression, no XOR obfuscation. The
//! header fields are taken from the wrapped font so a hinted TTF keeps its
//! own checksum.

use anyhow::{anyhow, ensure};
use ttf_parser::{name_id, Face, PlatformId, Tag};

use crate::core::errors::ForgeResult;

const EOT_VERSION: u32 = 0x0002_0001;
const EOT_MAGIC: u16 = 0x504C;
const DEFAULT_CHARSET: u8 = 1;
const WINDOWS_ENGLISH: u16 = 0x0409;

/// Little-endian writer for the EOT header
#[derive(Default)]
struct LeWriter(Vec<u8>);

impl LeWriter {
    fn u8(&mut self, value: u8) -> &mut Self {
        self.0.push(value);
        self
    }

    fn u16(&mut self, value: u16) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn u32(&mut self, value: u32) -> &mut Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.0.extend_from_slice(value);
        self
    }

    /// Padding word, size word, then the string itself
    fn name(&mut self, utf16le: &[u8]) -> &mut Self {
        self.u16(0).u16(utf16le.len() as u16).bytes(utf16le)
    }
}

/// Big-endian field of a raw table
fn be_u16(table: &[u8], offset: usize) -> ForgeResult<u16> {
    table
        .get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| anyhow!("table is truncated at offset {offset}"))
}

fn be_u32(table: &[u8], offset: usize) -> ForgeResult<u32> {
    table
        .get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| anyhow!("table is truncated at offset {offset}"))
}

fn raw_table<'a>(face: &Face<'a>, tag: &[u8; 4]) -> ForgeResult<&'a [u8]> {
    face.raw_face()
        .table(Tag::from_bytes(tag))
        .ok_or_else(|| anyhow!("font has no '{}' table", String::from_utf8_lossy(tag)))
}

/// Windows English name record, re-encoded as UTF-16LE
fn windows_name(face: &Face, id: u16) -> Vec<u8> {
    face.names()
        .into_iter()
        .find(|name| {
            name.platform_id == PlatformId::Windows
                && name.encoding_id == 1
                && name.language_id == WINDOWS_ENGLISH
                && name.name_id == id
        })
        .map(|name| {
            name.name
                .chunks_exact(2)
                .flat_map(|pair| [pair[1], pair[0]])
                .collect()
        })
        .unwrap_or_default()
}

/// Wrap a TrueType font into an EOT file
pub fn wrap_eot(ttf: &[u8]) -> ForgeResult<Vec<u8>> {
    let face = Face::parse(ttf, 0)?;
    let os2 = face
        .tables()
        .os2
        .ok_or_else(|| anyhow!("font has no 'OS/2' table"))?;
    let raw_os2 = raw_table(&face, b"OS/2")?;
    let head = raw_table(&face, b"head")?;

    let panose = raw_os2
        .get(32..42)
        .ok_or_else(|| anyhow!("OS/2 table is truncated"))?;
    let italic = matches!(os2.style(), ttf_parser::Style::Italic);
    let unicode_ranges = os2.unicode_ranges().0;

    let mut header = LeWriter::default();
    header
        .u32(0) // EOTSize, patched below
        .u32(ttf.len() as u32)
        .u32(EOT_VERSION)
        .u32(0) // Flags
        .bytes(panose)
        .u8(DEFAULT_CHARSET)
        .u8(italic as u8)
        .u32(os2.weight().to_number() as u32)
        .u16(be_u16(raw_os2, 8)?) // fsType
        .u16(EOT_MAGIC);
    for shift in [0, 32, 64, 96] {
        header.u32((unicode_ranges >> shift) as u32);
    }
    header
        .u32(be_u32(raw_os2, 78)?)
        .u32(be_u32(raw_os2, 82)?)
        .u32(be_u32(head, 8)?) // checkSumAdjustment
        .u32(0)
        .u32(0)
        .u32(0)
        .u32(0);
    header
        .name(&windows_name(&face, name_id::FAMILY))
        .name(&windows_name(&face, name_id::SUBFAMILY))
        .name(&windows_name(&face, name_id::VERSION))
        .name(&windows_name(&face, name_id::FULL_NAME))
        .u16(0) // Padding5
        .u16(0); // RootStringSize

    let mut eot = header.0;
    eot.extend_from_slice(ttf);
    let total = (eot.len() as u32).to_le_bytes();
    eot[..4].copy_from_slice(&total);
    Ok(eot)
}

/// The TTF payload of an EOT file
pub fn unwrap_eot(eot: &[u8]) -> ForgeResult<&[u8]> {
    let read_le = |offset: usize| -> ForgeResult<usize> {
        be_u32(eot, offset).map(|value| value.swap_bytes() as usize)
    };
    let total = read_le(0)?;
    let font_size = read_le(4)?;
    ensure!(
        total == eot.len() && font_size <= total,
        "EOT sizes do not match the file ({total} / {font_size} of {} bytes)",
        eot.len()
    );
    Ok(&eot[total - font_size..])
}
