use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::opcode;
use crate::cursor::ByteCursor;
use crate::error::{DecodeError, Result};
use crate::options::DecodeOptions;
use crate::section::{decode_section, Section};
use crate::trace::{Event, TraceSink};

/// Version and build string at the start of every bytecode file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header<'a> {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub build: Cow<'a, str>,
}

impl<'a> Header<'a> {
    /// Read `major, minor, patch, build\0, 0xFF`.
    pub fn decode(cursor: &mut ByteCursor<'a>) -> std::result::Result<Self, DecodeError> {
        let major = cursor.read_u8()?;
        let minor = cursor.read_u8()?;
        let patch = cursor.read_u8()?;
        let build = cursor.read_cstr()?;
        cursor.expect(opcode::SECTION_END)?;

        Ok(Self {
            major,
            minor,
            patch,
            build,
        })
    }

    pub fn version(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl fmt::Display for Header<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.version(), self.build)
    }
}

/// A fully decoded bytecode file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Disassembly<'a> {
    pub header: Header<'a>,
    pub root: Section<'a>,
}

/// An input buffer, immutable once loaded.
#[derive(Debug, Clone)]
pub struct Program {
    bytes: Vec<u8>,
}

impl Program {
    /// Read the whole file into memory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        info!(path = %path.display(), len = bytes.len(), "loaded bytecode");
        Ok(Self::from_bytes(bytes))
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn disassemble(
        &self,
        options: &DecodeOptions,
        sink: &mut dyn TraceSink,
    ) -> std::result::Result<Disassembly<'_>, DecodeError> {
        disassemble(&self.bytes, options, sink)
    }
}

/// Decode header, root literal section and root instruction stream of `bytes`.
///
/// Events are reported to `sink` as they are decoded. On error the sink keeps
/// whatever was reported before the failure; nothing after it is emitted.
pub fn disassemble<'a>(
    bytes: &'a [u8],
    options: &DecodeOptions,
    sink: &mut dyn TraceSink,
) -> std::result::Result<Disassembly<'a>, DecodeError> {
    sink.event(0, Event::ProgramSize(bytes.len()));

    let mut cursor = ByteCursor::new(bytes);
    let header = Header::decode(&mut cursor)?;
    debug!(version = %header.version(), build = %header.build, "read header");
    sink.event(0, Event::Header(&header));

    let root = decode_section(&mut cursor, 0, options, sink)?;

    Ok(Disassembly { header, root })
}
