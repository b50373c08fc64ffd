//! File-backed byte source.

use super::ByteSource;
use std::fs::File;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A file on disk read with positioned reads.
///
/// The length is captured when the file is opened; the source is treated as
/// immutable afterwards. Reads are positioned (`pread` on Unix, `seek_read`
/// on Windows), so parallel line loads share the handle without a lock.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    name: String,
    len: u64,
    file: File,
}

impl FileSource {
    /// Open a file for reading.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from opening or reading metadata.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        Ok(Self {
            path: path.to_path_buf(),
            name,
            len,
            file,
        })
    }

    /// Path the source was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ByteSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn read_range(&self, range: Range<u64>) -> io::Result<Vec<u8>> {
        let end = range.end.min(self.len);
        if range.start >= end {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; (end - range.start) as usize];
        read_exact_at(&self.file, &mut buf, range.start)?;
        Ok(buf)
    }

    fn reopen(&self) -> io::Result<Option<Arc<dyn ByteSource>>> {
        Ok(Some(Arc::new(Self::open(&self.path)?)))
    }
}

#[cfg(unix)]
fn read_exact_at(file: &File, buf: &mut [u8], offset: u64) -> io::Result<()> {
    std::os::unix::fs::FileExt::read_exact_at(file, buf, offset)
}

#[cfg(windows)]
fn read_exact_at(file: &File, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
    use std::os::windows::fs::FileExt;

    while !buf.is_empty() {
        match file.seek_read(buf, offset) {
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => {
                buf = &mut buf[n..];
                offset += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_file(name: &str, content: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn open_records_name_and_length() {
        let path = temp_file("txtview_file_source_meta.txt", b"abc\ndef");
        let source = FileSource::open(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(source.name(), "txtview_file_source_meta.txt");
        assert_eq!(source.len(), 7);
        assert_eq!(source.path(), path.as_path());
    }

    #[test]
    fn read_range_returns_requested_slice() {
        let path = temp_file("txtview_file_source_slice.txt", b"abc\ndef");
        let source = FileSource::open(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(source.read_range(4..7).unwrap(), b"def");
        assert_eq!(source.read_range(0..1).unwrap(), b"a");
    }

    #[test]
    fn read_range_clamps_past_end() {
        let path = temp_file("txtview_file_source_clamp.txt", b"abc");
        let source = FileSource::open(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(source.read_range(1..100).unwrap(), b"bc");
        assert!(source.read_range(5..9).unwrap().is_empty());
    }

    #[test]
    fn parallel_reads_return_their_own_slices() {
        use rayon::prelude::*;

        let content: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
        let path = temp_file("txtview_file_source_parallel.txt", &content);
        let source = FileSource::open(&path).unwrap();
        let _ = fs::remove_file(&path);

        let starts: Vec<u64> = (0..256).map(|i| i * 250).collect();
        let slices: Vec<Vec<u8>> = starts
            .par_iter()
            .map(|&start| source.read_range(start..start + 97).unwrap())
            .collect();

        for (start, slice) in starts.iter().zip(slices) {
            let start = *start as usize;
            assert_eq!(slice, &content[start..start + 97]);
        }
    }

    #[test]
    fn reopen_picks_up_new_length() {
        let path = temp_file("txtview_file_source_reopen.txt", b"one\n");
        let source = FileSource::open(&path).unwrap();
        fs::write(&path, b"one\ntwo\n").unwrap();

        let fresh = source.reopen().unwrap().unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(source.len(), 4);
        assert_eq!(fresh.len(), 8);
        assert_eq!(fresh.name(), source.name());
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let err = FileSource::open("/nonexistent/txtview/missing.txt").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
