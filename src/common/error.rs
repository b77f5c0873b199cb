/// Failure outcome of a transcoder call.
///
/// Neither variant implies anything about the output buffer beyond "no byte
/// past its end was written"; bytes of an aborted call are unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The output buffer cannot hold the next unit.
    #[error("output buffer overflow")]
    Overflow,

    /// The input is ill-formed at `offset` (a bad percent-escape, or a
    /// rejected base64 symbol under strict decoding).
    #[error("malformed input at byte {offset}")]
    Malformed { offset: usize },
}

impl Error {
    /// True for [`Error::Overflow`]: the call may succeed with a larger buffer.
    #[inline]
    pub fn is_overflow(&self) -> bool {
        matches!(self, Error::Overflow)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
