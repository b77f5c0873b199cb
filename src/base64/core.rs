use log::{debug, error};

use crate::common::{Error, OutBuf, Result};

/// Standard base64 alphabet.
pub const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const PAD: u8 = b'=';

/// Decode table markers: not in the alphabet, and the `=` pad symbol.
const INVALID: u8 = 0xFF;
const PAD_SYMBOL: u8 = 0xFE;

/// ASCII byte -> 6-bit value, or one of the markers above.
const DECODE_TABLE: &[u8; 256] = &{
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < 64 {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table[PAD as usize] = PAD_SYMBOL;
    table
};

/// What the decoder does with a byte that is neither in the alphabet nor `=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidSymbols {
    /// Ignore it and keep going. Lets line breaks, spaces and stray
    /// separators in header values decode without preprocessing.
    #[default]
    Skip,
    /// Fail with [`Error::Malformed`] at its offset.
    Reject,
}

/// What the decoder does when the next group does not fit in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail with [`Error::Overflow`].
    #[default]
    Fail,
    /// Stop and return the whole groups decoded so far.
    Truncate,
}

/// Per-call decoder configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    pub invalid: InvalidSymbols,
    pub on_overflow: OverflowPolicy,
    /// Treat the first zero byte as the end of the input.
    pub stop_at_nul: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            invalid: InvalidSymbols::Skip,
            on_overflow: OverflowPolicy::Fail,
            stop_at_nul: true,
        }
    }
}

impl DecodeOptions {
    pub fn invalid(mut self, invalid: InvalidSymbols) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn on_overflow(mut self, policy: OverflowPolicy) -> Self {
        self.on_overflow = policy;
        self
    }

    pub fn stop_at_nul(mut self, stop: bool) -> Self {
        self.stop_at_nul = stop;
        self
    }
}

/// Encoded size of `n` input bytes: `4 * ceil(n / 3)`.
#[inline]
pub fn encoded_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// Upper bound on decoded size for `n` input bytes.
#[inline]
pub fn decoded_len_max(n: usize) -> usize {
    n / 4 * 3
}

/// Encode `input` into `out` as padded standard base64.
///
/// Returns `encoded_len(input.len())`, or [`Error::Overflow`] when a 4-byte
/// group does not fit. Groups are written whole or not at all.
pub fn encode(out: &mut [u8], input: &[u8]) -> Result<usize> {
    debug!(
        "string to base64 encode: {}, length: {}",
        input.escape_ascii(),
        input.len()
    );

    let mut w = OutBuf::new(out);

    for chunk in input.chunks(3) {
        let slot = match w.reserve(4) {
            Ok(slot) => slot,
            Err(e) => {
                error!("Buffer overflow in base64 encode");
                return Err(e);
            }
        };

        let b1 = chunk.get(1).copied().unwrap_or(0);
        let b2 = chunk.get(2).copied().unwrap_or(0);
        let v = (chunk[0] as u32) << 16 | (b1 as u32) << 8 | b2 as u32;

        slot[0] = ALPHABET[(v >> 18) as usize & 0x3F];
        slot[1] = ALPHABET[(v >> 12) as usize & 0x3F];
        slot[2] = if chunk.len() > 1 {
            ALPHABET[(v >> 6) as usize & 0x3F]
        } else {
            PAD
        };
        slot[3] = if chunk.len() > 2 {
            ALPHABET[v as usize & 0x3F]
        } else {
            PAD
        };
    }

    let len = encoded_len(input.len());
    debug_assert_eq!(w.len(), len);
    debug!(
        "base64 encoded string: {}, encoded length: {}",
        w.written().escape_ascii(),
        len
    );
    Ok(len)
}

/// Decode base64 `input` into `out` with the default options: skip
/// non-alphabet bytes, fail on overflow, stop at the first NUL.
pub fn decode(out: &mut [u8], input: &[u8]) -> Result<usize> {
    decode_with(out, input, DecodeOptions::default())
}

/// Decode base64 `input` into `out`.
///
/// Every four accepted symbols produce three bytes, less one per `=` in the
/// group, so padded input decodes to exactly the original bytes. A trailing
/// group of fewer than four symbols is dropped. The returned length never
/// includes a terminator; use [`nul_terminate`](crate::common::nul_terminate)
/// if one is needed.
pub fn decode_with(out: &mut [u8], input: &[u8], opts: DecodeOptions) -> Result<usize> {
    let input = if opts.stop_at_nul {
        memchr::memchr(0, input).map_or(input, |p| &input[..p])
    } else {
        input
    };

    let mut w = OutBuf::new(out);
    let mut acc: u32 = 0;
    let mut symbols: usize = 0;
    let mut pads: usize = 0;

    for (i, &c) in input.iter().enumerate() {
        let v = match DECODE_TABLE[c as usize] {
            INVALID => match opts.invalid {
                InvalidSymbols::Skip => continue,
                InvalidSymbols::Reject => {
                    debug!("Invalid base64 symbol {:#04x} at offset {}", c, i);
                    return Err(Error::Malformed { offset: i });
                }
            },
            PAD_SYMBOL => {
                pads += 1;
                0
            }
            v => v,
        };

        acc = acc << 6 | v as u32;
        symbols += 1;
        if symbols < 4 {
            continue;
        }

        let group = [(acc >> 16) as u8, (acc >> 8) as u8, acc as u8];
        let n = 3 - pads.min(3);
        if let Err(e) = w.put(&group[..n]) {
            match opts.on_overflow {
                OverflowPolicy::Fail => {
                    error!("Buffer overflow in base64 decode");
                    return Err(e);
                }
                OverflowPolicy::Truncate => {
                    debug!("base64 decode truncated at input offset {}", i);
                    symbols = 0;
                    break;
                }
            }
        }

        acc = 0;
        symbols = 0;
        pads = 0;
    }

    if symbols != 0 {
        debug!("Dropped {} trailing base64 symbols", symbols);
    }

    debug!(
        "base64 decoded string: {}, decoded length: {}",
        w.written().escape_ascii(),
        w.len()
    );
    Ok(w.len())
}
