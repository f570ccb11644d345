use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::TransferError;

/// One chunk of the upload plan.
///
/// Chunk numbers are 1-based to match the wire protocol. The byte range is
/// a pure function of the number: `offset = (number - 1) * chunk_size`,
/// `len = min(chunk_size, file_size - offset)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    pub number: u32,
    pub offset: u64,
    pub len: u64,
}

/// Builds the chunk plan for a file of `file_size` bytes.
///
/// Returns `ceil(file_size / chunk_size)` specs covering the file exactly:
/// contiguous, non-overlapping, the final chunk possibly short. An empty
/// file yields an empty plan.
pub fn chunk_plan(file_size: u64, chunk_size: u64) -> Vec<ChunkSpec> {
    assert!(chunk_size > 0, "chunk_size must be positive");

    let total = file_size.div_ceil(chunk_size);
    (1..=total as u32)
        .map(|number| {
            let offset = (number as u64 - 1) * chunk_size;
            ChunkSpec {
                number,
                offset,
                len: chunk_size.min(file_size - offset),
            }
        })
        .collect()
}

/// Reads exactly one chunk's bytes from `path`.
///
/// Opens its own read handle and seeks to the chunk offset, so any number
/// of concurrent callers can read disjoint ranges of the same file without
/// sharing a cursor. Fails with [`TransferError::ShortRead`] if the file
/// has shrunk below the plan since it was built.
pub fn read_chunk(path: &Path, spec: &ChunkSpec) -> Result<Vec<u8>, TransferError> {
    let mut file = std::fs::File::open(path)?;
    file.seek(SeekFrom::Start(spec.offset))?;

    let mut buf = vec![0u8; spec.len as usize];
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            return Err(TransferError::ShortRead {
                offset: spec.offset,
                expected: buf.len(),
                actual: filled,
            });
        }
        filled += n;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MB: u64 = 1024 * 1024;

    fn assert_plan_covers(plan: &[ChunkSpec], file_size: u64, chunk_size: u64) {
        assert_eq!(plan.len() as u64, file_size.div_ceil(chunk_size));
        let mut expected_offset = 0;
        for (i, spec) in plan.iter().enumerate() {
            assert_eq!(spec.number as usize, i + 1);
            assert_eq!(spec.offset, expected_offset);
            assert!(spec.len > 0);
            expected_offset += spec.len;
        }
        assert_eq!(expected_offset, file_size);
    }

    #[test]
    fn plan_exact_multiple() {
        let plan = chunk_plan(12 * MB, 3 * MB);
        assert_plan_covers(&plan, 12 * MB, 3 * MB);
        assert!(plan.iter().all(|s| s.len == 3 * MB));
    }

    #[test]
    fn plan_short_final_chunk() {
        let plan = chunk_plan(10 * MB, 3 * MB);
        assert_plan_covers(&plan, 10 * MB, 3 * MB);
        assert_eq!(plan.len(), 4);
        assert_eq!(plan[0].len, 3 * MB);
        assert_eq!(plan[1].len, 3 * MB);
        assert_eq!(plan[2].len, 3 * MB);
        assert_eq!(plan[3].len, MB);
    }

    #[test]
    fn plan_single_chunk_larger_than_file() {
        let plan = chunk_plan(100, 4 * MB);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0], ChunkSpec { number: 1, offset: 0, len: 100 });
    }

    #[test]
    fn plan_empty_file() {
        assert!(chunk_plan(0, MB).is_empty());
    }

    #[test]
    fn plan_covers_odd_sizes() {
        for file_size in [1u64, 7, 4095, 4096, 4097, 123_457] {
            for chunk_size in [1u64, 3, 4096, 100_000] {
                assert_plan_covers(&chunk_plan(file_size, chunk_size), file_size, chunk_size);
            }
        }
    }

    #[test]
    fn read_chunk_returns_exact_ranges() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        std::fs::write(&path, b"AABBCCDDEE").unwrap();

        let plan = chunk_plan(10, 4);
        assert_eq!(read_chunk(&path, &plan[0]).unwrap(), b"AABB");
        assert_eq!(read_chunk(&path, &plan[1]).unwrap(), b"CCDD");
        // Short tail: only the bytes that exist, never padded.
        assert_eq!(read_chunk(&path, &plan[2]).unwrap(), b"EE");
    }

    #[test]
    fn read_chunk_out_of_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let plan = chunk_plan(10, 3);
        assert_eq!(read_chunk(&path, &plan[3]).unwrap(), b"9");
        assert_eq!(read_chunk(&path, &plan[1]).unwrap(), b"345");
        assert_eq!(read_chunk(&path, &plan[0]).unwrap(), b"012");
    }

    #[test]
    fn read_chunk_truncated_file_is_short_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test.bin");
        std::fs::write(&path, b"0123456789").unwrap();

        let plan = chunk_plan(10, 4);
        std::fs::write(&path, b"0123").unwrap();

        let err = read_chunk(&path, &plan[2]).unwrap_err();
        assert!(matches!(err, TransferError::ShortRead { .. }));
    }

    #[test]
    fn concurrent_reads_do_not_interfere() {
        use std::sync::Arc;
        use std::thread;

        let dir = TempDir::new().unwrap();
        let path = Arc::new(dir.path().join("test.bin"));
        let data: Vec<u8> = (0..40_960u32).map(|i| (i % 256) as u8).collect();
        std::fs::write(path.as_ref(), &data).unwrap();

        let plan = chunk_plan(data.len() as u64, 4096);
        let handles: Vec<_> = plan
            .iter()
            .map(|spec| {
                let path = Arc::clone(&path);
                let spec = *spec;
                thread::spawn(move || (spec, read_chunk(&path, &spec).unwrap()))
            })
            .collect();

        for h in handles {
            let (spec, bytes) = h.join().unwrap();
            let start = spec.offset as usize;
            assert_eq!(bytes, &data[start..start + spec.len as usize]);
        }
    }
}
