use log::{debug, error};

use crate::common::{OutBuf, Result};

/// Width of every numeric character reference emitted (`&#NN;`).
pub const ENTITY_LEN: usize = 5;

/// Numeric character reference for `b`, if `b` is one of the seven bytes
/// this encoder escapes: `" # & ' + < >`.
#[inline]
pub fn entity(b: u8) -> Option<&'static [u8; ENTITY_LEN]> {
    match b {
        b'"' => Some(b"&#34;"),
        b'#' => Some(b"&#35;"),
        b'&' => Some(b"&#38;"),
        b'\'' => Some(b"&#39;"),
        b'+' => Some(b"&#43;"),
        b'<' => Some(b"&#60;"),
        b'>' => Some(b"&#62;"),
        _ => None,
    }
}

/// Exact number of output bytes `encode` needs for `input`.
pub fn encoded_len(input: &[u8]) -> usize {
    input
        .iter()
        .map(|&b| if entity(b).is_some() { ENTITY_LEN } else { 1 })
        .sum()
}

/// Escape `input` into `out` for inclusion in generated HTML.
///
/// Each of `" # & ' + < >` becomes its 5-byte `&#NN;` reference; all other
/// bytes are copied. Returns the number of bytes written, or
/// [`Error::Overflow`](crate::common::Error::Overflow) as soon as a unit
/// does not fit. The output is not NUL-terminated.
pub fn encode(out: &mut [u8], input: &[u8]) -> Result<usize> {
    let mut w = OutBuf::new(out);

    for &b in input {
        let unit = match entity(b) {
            Some(e) => w.put(e),
            None => w.push(b),
        };
        if let Err(e) = unit {
            error!("Buffer overflow in html entity encode");
            return Err(e);
        }
    }

    debug!(
        "HTML entity encoded string: {}, length: {}",
        w.written().escape_ascii(),
        w.len()
    );
    Ok(w.len())
}
