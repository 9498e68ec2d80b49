use crate::error::{CarveError, Result};
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

/// A seekable, length-known provider of raw bytes.
///
/// The scanner only borrows read access; ownership stays with the caller.
/// `read_at` never returns fewer bytes than requested unless the read runs
/// into end-of-source, and never reads past `len()`.
pub trait ByteSource {
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read up to `len` bytes starting at `offset`, clamped at end-of-source
    fn read_at(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>>;
}

fn check_bounds(offset: u64, len: usize, source_size: u64) -> Result<usize> {
    if offset > source_size {
        return Err(CarveError::InvalidOffset {
            offset,
            source_size,
        });
    }
    let end = offset
        .checked_add(len as u64)
        .ok_or(CarveError::InvalidSize {
            offset,
            size: len as u64,
            source_size,
        })?;
    // Clamp at end-of-source rather than erroring; short reads are only
    // allowed there.
    Ok(end.min(source_size).saturating_sub(offset) as usize)
}

/// Zero-copy memory-mapped source
#[derive(Debug)]
pub struct MappedSource {
    mmap: Mmap,
    size: u64,
    path: String,
}

impl MappedSource {
    /// Open a file with memory mapping
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_str = path_ref.display().to_string();

        let file = File::open(path_ref).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CarveError::FileNotFound(path_str.clone())
            } else {
                CarveError::Io(e)
            }
        })?;

        let size = file.metadata()?.len();

        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| CarveError::Mmap(format!("failed to map file: {}", e)))?
        };

        Ok(Self {
            mmap,
            size,
            path: path_str,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl ByteSource for MappedSource {
    fn len(&self) -> u64 {
        self.size
    }

    fn read_at(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        let take = check_bounds(offset, len, self.size)?;
        let start = offset as usize;
        Ok(Cow::Borrowed(&self.mmap[start..start + take]))
    }
}

/// Seek-and-read fallback source, used when memory mapping fails (pipes,
/// locked files, raw volumes exposed as block devices). The scanner never
/// knows which implementation it was given.
pub struct FileSource {
    file: Mutex<File>,
    size: u64,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().display().to_string();
        let file = File::open(path.as_ref()).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CarveError::FileNotFound(path_str)
            } else {
                CarveError::Io(e)
            }
        })?;
        let size = file.metadata()?.len();
        Ok(Self {
            file: Mutex::new(file),
            size,
        })
    }
}

impl ByteSource for FileSource {
    fn len(&self) -> u64 {
        self.size
    }

    fn read_at(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        let take = check_bounds(offset, len, self.size)?;
        let mut buf = vec![0u8; take];
        // A poisoned lock fails this read instead of panicking the scan
        let mut file = self.file.lock().map_err(|_| {
            CarveError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "file handle lock poisoned",
            ))
        })?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(&mut buf)?;
        Ok(Cow::Owned(buf))
    }
}

/// In-memory source, for library callers and tests
pub struct SliceSource {
    data: Vec<u8>,
}

impl SliceSource {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

impl From<&[u8]> for SliceSource {
    fn from(data: &[u8]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl ByteSource for SliceSource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_at(&self, offset: u64, len: usize) -> Result<Cow<'_, [u8]>> {
        let take = check_bounds(offset, len, self.data.len() as u64)?;
        let start = offset as usize;
        Ok(Cow::Borrowed(&self.data[start..start + take]))
    }
}

/// Open a path as a byte source, preferring the memory-mapped path and
/// falling back to buffered reads when mapping is not possible.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<Box<dyn ByteSource>> {
    match MappedSource::open(path.as_ref()) {
        Ok(source) => Ok(Box::new(source)),
        Err(CarveError::FileNotFound(p)) => Err(CarveError::FileNotFound(p)),
        Err(_) => Ok(Box::new(FileSource::open(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_reads() {
        let source = SliceSource::from(&b"0123456789"[..]);
        assert_eq!(source.len(), 10);

        let bytes = source.read_at(2, 4).unwrap();
        assert_eq!(&bytes[..], b"2345");
    }

    #[test]
    fn test_read_clamped_at_end() {
        let source = SliceSource::from(&b"abcdef"[..]);
        let bytes = source.read_at(4, 100).unwrap();
        assert_eq!(&bytes[..], b"ef");
    }

    #[test]
    fn test_read_past_end_is_error() {
        let source = SliceSource::from(&b"abc"[..]);
        assert!(source.read_at(4, 1).is_err());
    }

    #[test]
    fn test_mapped_source_roundtrip() {
        let path = std::env::temp_dir().join(format!("strcarve-src-{}.bin", std::process::id()));
        std::fs::write(&path, b"mapped source data").unwrap();

        let source = MappedSource::open(&path).unwrap();
        assert_eq!(source.len(), 18);
        assert_eq!(&source.read_at(7, 6).unwrap()[..], b"source");

        drop(source);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_poisoned_lock_fails_the_read_cleanly() {
        let path = std::env::temp_dir().join(format!("strcarve-psn-{}.bin", std::process::id()));
        std::fs::write(&path, b"payload").unwrap();
        let source = FileSource::open(&path).unwrap();

        let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = source.file.lock().unwrap();
            panic!("poison the lock");
        }));
        assert!(poisoned.is_err());

        let err = source.read_at(0, 4).unwrap_err();
        assert!(matches!(err, CarveError::Io(_)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = MappedSource::open("/nonexistent/strcarve-test.bin").unwrap_err();
        assert!(matches!(err, CarveError::FileNotFound(_)));
    }
}
