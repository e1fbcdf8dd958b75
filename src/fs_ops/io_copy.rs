//! Streaming copy between two already-open handles.
//!
//! - Reads fixed-size chunks into one scoped buffer (size comes from `Config`).
//! - A 0-byte read is end of source.
//! - Each chunk is written out completely before the next read; short writes
//!   are retried with the remainder.
//! - `EINTR` is retried on both sides; any other error ends the copy.
//!
//! The handles are borrowed: closing them is the caller's job.

use std::io::{self, Read, Write};
use std::path::Path;

use crate::errors::CopyError;

/// Result of a streaming copy operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyResult {
    /// Total bytes copied from source to destination.
    pub bytes: u64,
    /// Size of the buffer used for copying.
    pub buf_size: usize,
    /// Number of read calls that returned data.
    pub chunks: u64,
}

/// Copy everything from `reader` to `writer` in `buf_size` chunks.
///
/// `src`/`dst` only label errors.
pub fn copy_stream<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buf_size: usize,
    src: &Path,
    dst: &Path,
) -> Result<CopyResult, CopyError> {
    let mut buf = vec![0u8; buf_size.max(1)];
    let mut bytes: u64 = 0;
    let mut chunks: u64 = 0;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CopyError::ReadError {
                    path: src.to_path_buf(),
                    source: e,
                });
            }
        };
        write_chunk(writer, &buf[..n], dst)?;
        bytes += n as u64;
        chunks += 1;
    }

    Ok(CopyResult {
        bytes,
        buf_size: buf.len(),
        chunks,
    })
}

fn write_chunk<W: Write>(writer: &mut W, chunk: &[u8], dst: &Path) -> Result<(), CopyError> {
    let mut written = 0;
    while written < chunk.len() {
        match writer.write(&chunk[written..]) {
            Ok(0) => {
                return Err(CopyError::WriteError {
                    path: dst.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::WriteZero, "write returned 0 bytes"),
                });
            }
            Ok(k) => written += k,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(CopyError::WriteError {
                    path: dst.to_path_buf(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Cursor;
    use tempfile::tempdir;

    /// Deterministic pseudo-random bytes (xorshift).
    fn noise(len: usize, mut seed: u32) -> Vec<u8> {
        (0..len)
            .map(|_| {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                seed as u8
            })
            .collect()
    }

    fn copy_mem(data: &[u8], buf_size: usize) -> (Vec<u8>, CopyResult) {
        let mut out = Vec::new();
        let res = copy_stream(
            &mut Cursor::new(data),
            &mut out,
            buf_size,
            Path::new("src"),
            Path::new("dst"),
        )
        .unwrap();
        (out, res)
    }

    /// Writer that accepts at most `max` bytes per call.
    struct Trickle {
        out: Vec<u8>,
        max: usize,
        calls: usize,
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.calls += 1;
            let n = buf.len().min(self.max);
            self.out.extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(libc::EIO))
        }
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(libc::ENOSPC))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct InterruptOnce {
        inner: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn pseudo_random_2050_bytes_any_chunk_size() {
        let data = noise(2050, 0x9e37_79b9);
        for buf_size in [1, 7, 1024, 2049, 2050, 4096] {
            let (out, res) = copy_mem(&data, buf_size);
            assert_eq!(out.len(), 2050, "buf_size {buf_size}");
            assert_eq!(out, data, "buf_size {buf_size}");
            assert_eq!(res.bytes, 2050);
            assert_eq!(res.buf_size, buf_size);
        }
    }

    #[test]
    fn zero_length_and_exact_buffer_boundaries() {
        let (out, res) = copy_mem(&[], 1024);
        assert!(out.is_empty());
        assert_eq!(res.bytes, 0);
        assert_eq!(res.chunks, 0);

        let data = noise(1024, 7);
        let (out, res) = copy_mem(&data, 1024);
        assert_eq!(out, data);
        assert_eq!(res.chunks, 1);

        let data = noise(3 * 512 + 1, 11);
        let (out, res) = copy_mem(&data, 512);
        assert_eq!(out, data);
        assert_eq!(res.chunks, 4);
    }

    #[test]
    fn short_writes_are_completed() {
        let data = noise(3000, 42);
        let mut w = Trickle {
            out: Vec::new(),
            max: 100,
            calls: 0,
        };
        let res = copy_stream(
            &mut Cursor::new(&data),
            &mut w,
            1024,
            Path::new("s"),
            Path::new("d"),
        )
        .unwrap();
        assert_eq!(res.bytes, 3000);
        assert_eq!(w.out, data);
        assert_eq!(w.calls, 32);
    }

    #[test]
    fn read_failure_is_read_error() {
        let mut out = Vec::new();
        let err = copy_stream(&mut FailingReader, &mut out, 64, Path::new("s"), Path::new("d"))
            .unwrap_err();
        assert!(matches!(err, CopyError::ReadError { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn write_failure_is_write_error() {
        let err = copy_stream(
            &mut Cursor::new(b"data".to_vec()),
            &mut FullDisk,
            64,
            Path::new("s"),
            Path::new("d"),
        )
        .unwrap_err();
        match err {
            CopyError::WriteError { path, source } => {
                assert_eq!(path, Path::new("d"));
                assert_eq!(source.raw_os_error(), Some(libc::ENOSPC));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn zero_byte_write_is_write_error() {
        let mut w = Trickle {
            out: Vec::new(),
            max: 0,
            calls: 0,
        };
        let err = copy_stream(
            &mut Cursor::new(b"x".to_vec()),
            &mut w,
            8,
            Path::new("s"),
            Path::new("d"),
        )
        .unwrap_err();
        assert!(matches!(err, CopyError::WriteError { .. }));
    }

    #[test]
    fn interrupted_read_is_retried() {
        let mut r = InterruptOnce {
            inner: Cursor::new(b"again".to_vec()),
            interrupted: false,
        };
        let mut out = Vec::new();
        copy_stream(&mut r, &mut out, 2, Path::new("s"), Path::new("d")).unwrap();
        assert_eq!(out, b"again");
    }

    #[test]
    fn copies_between_real_files() {
        let dir = tempdir().unwrap();
        let src_path = dir.path().join("src.bin");
        let dst_path = dir.path().join("dst.bin");
        let data = noise(10_000, 3);
        fs::write(&src_path, &data).unwrap();

        let mut src = File::open(&src_path).unwrap();
        let mut dst = File::create(&dst_path).unwrap();
        let res = copy_stream(&mut src, &mut dst, 1024, &src_path, &dst_path).unwrap();
        drop(dst);
        assert_eq!(res.bytes, 10_000);
        assert_eq!(fs::read(&dst_path).unwrap(), data);
    }
}
