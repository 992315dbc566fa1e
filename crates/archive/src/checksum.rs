use std::io::Read;
use std::path::Path;

use crc32fast::Hasher;

use crate::ArchiveError;

/// Computes CRC32 of `data` and returns the 8-digit uppercase hex form.
pub fn crc32_bytes(data: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(data);
    format!("{:08X}", hasher.finalize())
}

/// Computes CRC32 of an entire file and returns the 8-digit uppercase hex form.
pub fn crc32_file(path: &Path) -> Result<String, ArchiveError> {
    let mut file = std::fs::File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(format!("{:08X}", hasher.finalize()))
}
