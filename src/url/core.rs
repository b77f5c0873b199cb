use log::{debug, error};

use crate::common::{Error, OutBuf, Result};

/// Width of a percent-escape (`%XX`).
pub const ESCAPE_LEN: usize = 3;

/// Lowercase digits used when escaping.
const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// ASCII byte -> nibble value, 0xFF for anything that is not a hex digit.
const HEX_TABLE: &[u8; 256] = &{
    let mut table = [0xFF; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = match i as u8 {
            c @ b'0'..=b'9' => c - b'0',
            c @ b'a'..=b'f' => c - b'a' + 10,
            c @ b'A'..=b'F' => c - b'A' + 10,
            _ => 0xFF,
        };
        i += 1;
    }
    table
};

/// Combine two hex digits (either case) into a byte.
#[inline]
fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = HEX_TABLE[hi as usize];
    let lo = HEX_TABLE[lo as usize];
    if hi == 0xFF || lo == 0xFF {
        return None;
    }
    Some(hi << 4 | lo)
}

/// Bytes left as-is in a URL component: ASCII letters, digits, `- _ . ~`.
#[inline]
pub fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Exact number of output bytes `encode` needs for `input`.
pub fn encoded_len(input: &[u8]) -> usize {
    input
        .iter()
        .map(|&b| if is_unreserved(b) { 1 } else { ESCAPE_LEN })
        .sum()
}

/// Upper bound on `decode` output for `n` input bytes. Decoding never expands.
#[inline]
pub fn decoded_len_max(n: usize) -> usize {
    n
}

/// Decode `%XX` escapes in `input` into `out`.
///
/// Bytes other than `%` are copied. A `%` must be followed by two hex digits
/// (either case), otherwise the call fails with [`Error::Malformed`] at the
/// offset of the `%`. `+` is not treated as a space.
///
/// Capacity is checked before each unit is parsed, so a full buffer reports
/// [`Error::Overflow`] even if the next escape is also malformed.
pub fn decode(out: &mut [u8], input: &[u8]) -> Result<usize> {
    let mut w = OutBuf::new(out);
    let mut i = 0;

    while i < input.len() {
        // Copy the literal run up to the next escape in one go.
        let run_end = memchr::memchr(b'%', &input[i..]).map_or(input.len(), |p| i + p);
        if run_end > i {
            if let Err(e) = w.put(&input[i..run_end]) {
                error!("Buffer overflow in url decode");
                return Err(e);
            }
            i = run_end;
            continue;
        }

        let slot = match w.reserve(1) {
            Ok(slot) => slot,
            Err(e) => {
                error!("Buffer overflow in url decode");
                return Err(e);
            }
        };
        let byte = match (input.get(i + 1), input.get(i + 2)) {
            (Some(&hi), Some(&lo)) => hex_pair(hi, lo),
            _ => None,
        };
        match byte {
            Some(b) => slot[0] = b,
            None => {
                debug!("Malformed percent-escape in url decode at offset {}", i);
                return Err(Error::Malformed { offset: i });
            }
        }
        i += ESCAPE_LEN;
    }

    debug!(
        "URL decoded string: {}, length: {}",
        w.written().escape_ascii(),
        w.len()
    );
    Ok(w.len())
}

/// Percent-encode every byte of `input` outside the unreserved set into `out`.
///
/// Escapes use lowercase hex (`a b/c` -> `a%20b%2fc`). Returns the number of
/// bytes written or [`Error::Overflow`] once a unit does not fit; no partial
/// escape is ever written.
pub fn encode(out: &mut [u8], input: &[u8]) -> Result<usize> {
    let mut w = OutBuf::new(out);

    for &b in input {
        let unit = if is_unreserved(b) {
            w.push(b)
        } else {
            w.put(&[
                b'%',
                HEX_CHARS[(b >> 4) as usize],
                HEX_CHARS[(b & 0x0F) as usize],
            ])
        };
        if let Err(e) = unit {
            error!("Buffer overflow in url encode");
            return Err(e);
        }
    }

    debug!(
        "URL encoded string: {}, length: {}",
        w.written().escape_ascii(),
        w.len()
    );
    Ok(w.len())
}
