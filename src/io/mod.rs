//! Bounded I/O utilities for safe file reading.
//!
//! Every query reads at most a fixed window of a file, and rule files are
//! capped in size, so a hostile or huge input cannot make the engine read
//! unbounded data.

use std::fs::{File, FileTimes};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace, warn};

/// A bounded reader that limits the amount of data read.
pub struct BoundedReader<R> {
    inner: R,
    bytes_read: u64,
    limit: u64,
}

impl<R: Read> BoundedReader<R> {
    pub fn new(reader: R, limit: u64) -> Self {
        Self {
            inner: reader,
            bytes_read: 0,
            limit,
        }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl<R: Read> Read for BoundedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.bytes_read >= self.limit {
            return Ok(0); // EOF
        }

        let remaining = self.limit - self.bytes_read;
        let max_to_read = std::cmp::min(buf.len() as u64, remaining) as usize;
        let n = self.inner.read(&mut buf[..max_to_read])?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

/// Read-only file handle that only hands out bounded windows.
pub struct SafeFileReader {
    file: File,
    path: PathBuf,
    size: u64,
}

impl SafeFileReader {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        debug!(path = %path.display(), size, "Opened file for sniffing");
        Ok(Self {
            file,
            path: path.to_path_buf(),
            size,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read up to `len` bytes starting at `offset`. Short files give short
    /// windows; a window starting at or past EOF is empty.
    pub fn read_window_at(&mut self, offset: u64, len: usize) -> io::Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(offset))?;
        let mut reader = BoundedReader::new(&mut self.file, len as u64);
        let mut data = Vec::with_capacity(len.min(self.size.saturating_sub(offset) as usize));
        reader.read_to_end(&mut data)?;
        trace!(
            path = %self.path.display(),
            offset,
            len = data.len(),
            "Read window"
        );
        Ok(data)
    }

    /// Read the whole file, failing if it holds more than `limit` bytes.
    pub fn read_all(&mut self, limit: u64) -> io::Result<Vec<u8>> {
        if self.size > limit {
            warn!(
                path = %self.path.display(),
                size = self.size,
                limit,
                "File too large"
            );
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file too large: {} bytes (limit: {})", self.size, limit),
            ));
        }
        self.file.seek(SeekFrom::Start(0))?;
        let mut reader = BoundedReader::new(&mut self.file, limit);
        let mut data = Vec::with_capacity(self.size as usize);
        reader.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Put back access and modification times captured before reading.
    /// The inode change time moves regardless.
    pub fn restore_times(&self, accessed: SystemTime, modified: SystemTime) -> io::Result<()> {
        let times = FileTimes::new()
            .set_accessed(accessed)
            .set_modified(modified);
        self.file.set_times(times)
    }
}
