use std::fs::File;
use std::io::{self, Read};
use std::ops::Deref;
use std::path::Path;

use memmap2::{Mmap, MmapOptions};

/// Input bytes for the CLI: either a read-only mapping or an owned Vec.
/// Dereferences to `&[u8]` so transcoders take it directly.
pub enum InputData {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Deref for InputData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            InputData::Mmap(m) => m,
            InputData::Owned(v) => v,
        }
    }
}

/// Files below this size are read into memory; larger ones are mapped.
const MMAP_THRESHOLD: u64 = 1024 * 1024;

/// Read `name` as the CLI input, where `-` means standard input.
pub fn read_input(name: &str) -> io::Result<InputData> {
    if name == "-" {
        return read_stdin().map(InputData::Owned);
    }
    read_file(Path::new(name))
}

/// Read a regular file with a single exact-size read, or mmap it when large.
pub fn read_file(path: &Path) -> io::Result<InputData> {
    let file = File::open(path)?;
    let metadata = file.metadata()?;
    let len = metadata.len();

    if len == 0 || !metadata.file_type().is_file() {
        // Empty or special file (fifo, /dev/stdin): size is unknown, stream it.
        let mut buf = Vec::new();
        let mut reader = file;
        reader.read_to_end(&mut buf)?;
        return Ok(InputData::Owned(buf));
    }

    if len < MMAP_THRESHOLD {
        let mut buf = vec![0u8; len as usize];
        let n = read_full(&mut &file, &mut buf)?;
        buf.truncate(n);
        return Ok(InputData::Owned(buf));
    }

    // SAFETY: read-only mapping; the CLI never writes through it.
    match unsafe { MmapOptions::new().map(&file) } {
        Ok(mmap) => {
            #[cfg(target_os = "linux")]
            {
                let _ = mmap.advise(memmap2::Advice::Sequential);
            }
            Ok(InputData::Mmap(mmap))
        }
        Err(_) => {
            let mut buf = Vec::with_capacity(len as usize);
            let mut reader = file;
            reader.read_to_end(&mut buf)?;
            Ok(InputData::Owned(buf))
        }
    }
}

/// Read all of stdin.
pub fn read_stdin() -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    io::stdin().lock().read_to_end(&mut buf)?;
    Ok(buf)
}

/// Fill `buf` from `reader`, retrying short reads until full or EOF.
#[inline]
fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
