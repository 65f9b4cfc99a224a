//! Streaming content fingerprints for archive entries
//!
//! Payloads are read through a fixed-size scratch buffer, so memory use is
//! bounded by the chunk size no matter how large an entry is.

use blake3::Hasher;
use std::io::{ErrorKind, Read};
use tracing::trace;

/// Default read chunk: 2 MiB
pub const DEFAULT_CHUNK_SIZE: usize = 2 * 1024 * 1024;

/// Largest read chunk a hasher will allocate: 256 MiB
pub const MAX_CHUNK_SIZE: usize = 256 * 1024 * 1024;

/// Result of hashing one payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentDigest {
    /// 64-bit content fingerprint
    pub fingerprint: u64,
    /// Total number of bytes observed on the stream
    pub bytes_read: u64,
}

/// Chunked payload hasher
///
/// Owns its scratch buffer and reuses it across calls. One hasher must not
/// be shared between concurrent hash operations; create one per thread.
pub struct ContentHasher {
    buf: Vec<u8>,
}

impl std::fmt::Debug for ContentHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentHasher")
            .field("chunk_size", &self.buf.len())
            .finish()
    }
}

impl ContentHasher {
    /// Create a hasher with the default 2 MiB chunk
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create a hasher reading `chunk_size` bytes at a time
    ///
    /// The size is clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            buf: vec![0u8; chunk_size.clamp(1, MAX_CHUNK_SIZE)],
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.buf.len()
    }

    /// Drain `reader` and fingerprint everything it yields
    ///
    /// Stops at the first zero-byte read. `Interrupted` reads are retried;
    /// any other I/O error is returned as-is.
    pub fn hash_reader<R: Read>(&mut self, mut reader: R) -> std::io::Result<ContentDigest> {
        let mut hasher = Hasher::new();
        let mut bytes_read: u64 = 0;

        loop {
            let n = match reader.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            bytes_read += n as u64;
            hasher.update(&self.buf[..n]);
        }

        let fingerprint = truncate(hasher.finalize());
        trace!(bytes_read, fingerprint, "Hashed entry payload");

        Ok(ContentDigest {
            fingerprint,
            bytes_read,
        })
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Fingerprint an in-memory payload
///
/// Produces the same value as [`ContentHasher::hash_reader`] over the same bytes.
pub fn fingerprint_bytes(content: &[u8]) -> u64 {
    let mut hasher = Hasher::new();
    hasher.update(content);
    truncate(hasher.finalize())
}

fn truncate(hash: blake3::Hash) -> u64 {
    let bytes = hash.as_bytes();
    let mut head = [0u8; 8];
    head.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(head)
}
