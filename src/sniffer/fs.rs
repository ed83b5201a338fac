//! Filesystem side of a file query: inode types, symlinks and the bounded
//! content read.

use crate::core::MagicResult;
use crate::heuristics::tag_strip;
use crate::io::SafeFileReader;
use crate::sniffer::refine::refine;
use crate::sniffer::{
    MimeMagic, MIME_BINARY_UNREADABLE, MIME_BINARY_ZEROSIZE, MIME_INODE_DIR,
    MIME_INODE_DIR_LOCKED, MIME_INODE_LINK, MIME_INODE_LINK_BROKEN,
};
use std::fs::{self, FileType, Metadata};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Symlinks followed before giving up and reporting `inode/link`.
pub const MAX_LINK_HOPS: usize = 16;

/// What the filesystem alone says about a path.
#[derive(Debug)]
pub enum FsVerdict {
    /// Classified without reading content.
    Sentinel(MagicResult),
    /// A symlink to classify through.
    Follow(PathBuf),
    /// A non-empty file whose content must be read.
    Regular(Metadata),
}

#[cfg(unix)]
fn special_inode_type(file_type: &FileType) -> Option<&'static str> {
    use crate::sniffer::{
        MIME_INODE_BDEV, MIME_INODE_CDEV, MIME_INODE_FIFO, MIME_INODE_SOCK,
    };
    use std::os::unix::fs::FileTypeExt;

    if file_type.is_char_device() {
        Some(MIME_INODE_CDEV)
    } else if file_type.is_block_device() {
        Some(MIME_INODE_BDEV)
    } else if file_type.is_fifo() {
        Some(MIME_INODE_FIFO)
    } else if file_type.is_socket() {
        Some(MIME_INODE_SOCK)
    } else {
        None
    }
}

#[cfg(not(unix))]
fn special_inode_type(_file_type: &FileType) -> Option<&'static str> {
    None
}

/// Resolve a link target relative to the directory holding the link.
fn resolve_link(link: &Path, target: PathBuf) -> PathBuf {
    if target.is_absolute() {
        target
    } else {
        link.parent()
            .map(|dir| dir.join(&target))
            .unwrap_or(target)
    }
}

/// Classify `path` from its metadata alone, when possible.
pub fn fs_magic(path: &Path, follow_links: bool) -> FsVerdict {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Can't stat");
            return FsVerdict::Sentinel(MagicResult::new(MIME_BINARY_UNREADABLE, 0));
        }
    };
    let file_type = meta.file_type();

    if file_type.is_dir() {
        let mime = if fs::read_dir(path).is_ok() {
            MIME_INODE_DIR
        } else {
            MIME_INODE_DIR_LOCKED
        };
        return FsVerdict::Sentinel(MagicResult::certain(mime));
    }

    if file_type.is_symlink() {
        let target = match fs::read_link(path) {
            Ok(target) => resolve_link(path, target),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Unreadable symlink");
                return FsVerdict::Sentinel(MagicResult::certain(MIME_INODE_LINK));
            }
        };
        if fs::metadata(&target).is_err() {
            return FsVerdict::Sentinel(MagicResult::certain(MIME_INODE_LINK_BROKEN));
        }
        return if follow_links {
            FsVerdict::Follow(target)
        } else {
            FsVerdict::Sentinel(MagicResult::certain(MIME_INODE_LINK))
        };
    }

    if let Some(mime) = special_inode_type(&file_type) {
        return FsVerdict::Sentinel(MagicResult::certain(mime));
    }

    if meta.len() == 0 {
        return FsVerdict::Sentinel(MagicResult::certain(MIME_BINARY_ZEROSIZE));
    }
    FsVerdict::Regular(meta)
}

impl MimeMagic {
    /// Classify the file at `path`. Never fails: filesystem problems map
    /// to the `inode/*` and `application/x-*` sentinel types.
    pub fn classify_file<P: AsRef<Path>>(&self, path: P) -> MagicResult {
        let path = path.as_ref();
        let result = self.classify_path(path, 0);
        debug!(path = %path.display(), mime = %result.mime_type, accuracy = result.accuracy, "Classified file");
        match path.file_name() {
            Some(name) => refine(result, &name.to_string_lossy()),
            None => result,
        }
    }

    fn classify_path(&self, path: &Path, hops: usize) -> MagicResult {
        match fs_magic(path, self.config().follow_links) {
            FsVerdict::Sentinel(result) => result,
            FsVerdict::Follow(_) if hops >= MAX_LINK_HOPS => {
                warn!(path = %path.display(), hops, "Too many levels of symbolic links");
                MagicResult::certain(MIME_INODE_LINK)
            }
            FsVerdict::Follow(target) => self.classify_path(&target, hops + 1),
            FsVerdict::Regular(meta) => self.classify_contents(path, &meta),
        }
    }

    fn classify_contents(&self, path: &Path, meta: &Metadata) -> MagicResult {
        let mut reader = match SafeFileReader::open(path) {
            Ok(reader) => reader,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Can't open");
                return MagicResult::certain(MIME_BINARY_UNREADABLE);
            }
        };

        let max_window = self.config().io.max_window;
        let result = match reader.read_window_at(0, max_window) {
            Ok(window) => match tag_strip(&window) {
                0 => self.sniff(&window),
                skip => {
                    debug!(path = %path.display(), skip, "Skipping ID3 tag");
                    match reader.read_window_at(skip as u64, max_window) {
                        Ok(rest) if rest.is_empty() => MagicResult::certain(MIME_BINARY_ZEROSIZE),
                        Ok(rest) => self.sniff(&rest),
                        Err(e) => {
                            debug!(path = %path.display(), error = %e, "Read failed");
                            MagicResult::certain(MIME_BINARY_UNREADABLE)
                        }
                    }
                }
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Read failed");
                MagicResult::certain(MIME_BINARY_UNREADABLE)
            }
        };

        if self.config().restores_access_time(path) {
            let times = meta.accessed().and_then(|a| Ok((a, meta.modified()?)));
            if let Err(e) = times.and_then(|(a, m)| reader.restore_times(a, m)) {
                debug!(path = %path.display(), error = %e, "Can't restore access time");
            }
        }
        result
    }
}
