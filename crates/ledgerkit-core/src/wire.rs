//! Low-level wire reading: a bounds-checked cursor over the input.
//!
//! Every read reports the offset it started at, so errors point at the
//! byte that could not be satisfied.

use crate::error::{CodecError, ErrorKind};

pub(crate) const MAJOR_UNSIGNED: u8 = 0;
pub(crate) const MAJOR_NEGATIVE: u8 = 1;
pub(crate) const MAJOR_BYTES: u8 = 2;
pub(crate) const MAJOR_TEXT: u8 = 3;
pub(crate) const MAJOR_ARRAY: u8 = 4;
pub(crate) const MAJOR_MAP: u8 = 5;
pub(crate) const MAJOR_TAG: u8 = 6;
pub(crate) const MAJOR_SIMPLE: u8 = 7;

/// Additional-info value marking an indefinite-length item.
pub(crate) const INDEFINITE: u8 = 31;
/// Terminator of an indefinite-length item.
pub(crate) const BREAK: u8 = 0xff;

pub(crate) const FALSE: u8 = 0xf4;
pub(crate) const TRUE: u8 = 0xf5;

/// Argument of an item head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Argument {
    Definite(u64),
    Indefinite,
}

/// A forward-only reader over a byte slice.
pub(crate) struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub(crate) fn peek_u8(&self) -> Result<u8, CodecError> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or(CodecError::new(ErrorKind::BufferUnderrun, self.pos))
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, CodecError> {
        let b = self.peek_u8()?;
        self.pos += 1;
        Ok(b)
    }

    /// Read `n` bytes. Lengths that would overflow the address space are
    /// reported as `LengthOverflow`, lengths past the end as `BufferUnderrun`.
    pub(crate) fn read_exact(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let start = self.pos;
        let end = start
            .checked_add(n)
            .ok_or(CodecError::new(ErrorKind::LengthOverflow, start))?;
        let slice = self
            .data
            .get(start..end)
            .ok_or(CodecError::new(ErrorKind::BufferUnderrun, start))?;
        self.pos = end;
        Ok(slice)
    }

    fn read_be<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N)?);
        Ok(out)
    }

    /// Read the argument following a head whose additional info is `ai`.
    /// `head` is the offset of the head byte.
    pub(crate) fn read_argument(&mut self, ai: u8, head: usize) -> Result<Argument, CodecError> {
        let value = match ai {
            0..=23 => u64::from(ai),
            24 => u64::from(self.read_u8()?),
            25 => u64::from(u16::from_be_bytes(self.read_be()?)),
            26 => u64::from(u32::from_be_bytes(self.read_be()?)),
            27 => u64::from_be_bytes(self.read_be()?),
            INDEFINITE => return Ok(Argument::Indefinite),
            _ => return Err(CodecError::new(ErrorKind::ReservedAdditionalInfo, head)),
        };
        Ok(Argument::Definite(value))
    }
}

/// Split a head byte into (major type, additional info).
pub(crate) const fn split_head(byte: u8) -> (u8, u8) {
    (byte >> 5, byte & 0x1f)
}

/// Convert a wire length to `usize`.
pub(crate) fn len_to_usize(len: u64, offset: usize) -> Result<usize, CodecError> {
    usize::try_from(len).map_err(|_| CodecError::new(ErrorKind::LengthOverflow, offset))
}
