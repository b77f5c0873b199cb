use super::error::{Error, Result};

/// Write cursor over a caller-owned, fixed-capacity output slice.
///
/// Every write goes through [`OutBuf::reserve`], which checks that the whole
/// unit fits before handing out the slot. A failed reservation leaves the
/// cursor where it was, so a unit is either written completely or not at all.
pub struct OutBuf<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> OutBuf<'a> {
    #[inline]
    pub fn new(buf: &'a mut [u8]) -> Self {
        OutBuf { buf, len: 0 }
    }

    /// Bytes written so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Claim the next `n` bytes, or fail with [`Error::Overflow`] without
    /// moving the cursor.
    #[inline]
    pub fn reserve(&mut self, n: usize) -> Result<&mut [u8]> {
        if n > self.remaining() {
            return Err(Error::Overflow);
        }
        let start = self.len;
        self.len += n;
        Ok(&mut self.buf[start..start + n])
    }

    #[inline]
    pub fn push(&mut self, b: u8) -> Result<()> {
        self.reserve(1)?[0] = b;
        Ok(())
    }

    #[inline]
    pub fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.reserve(bytes.len())?.copy_from_slice(bytes);
        Ok(())
    }

    /// The bytes written so far.
    #[inline]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Write a NUL byte right after the first `len` bytes of `buf`.
///
/// Opt-in for callers that hand the result to C-string consumers. The
/// terminator is never part of a transcoder's returned length.
pub fn nul_terminate(buf: &mut [u8], len: usize) -> Result<()> {
    match buf.get_mut(len) {
        Some(slot) => {
            *slot = 0;
            Ok(())
        }
        None => Err(Error::Overflow),
    }
}
