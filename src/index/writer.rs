use crate::error::{IndexError, IoOp, Result};
use crate::index::types::{MODE_MASK, TEMP_MODE, temp_path_for};
use std::fs::{self, File, OpenOptions, Permissions};
use std::io::{BufWriter, Write};
use std::os::unix::fs::{MetadataExt, OpenOptionsExt, PermissionsExt};
use std::path::{Path, PathBuf};

/// Owner, group and permission bits to stamp on the published file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOwnership {
    pub uid: u32,
    pub gid: u32,
    /// Already masked to the low 12 bits
    pub mode: u32,
}

impl FileOwnership {
    pub fn from_metadata(meta: &fs::Metadata) -> Self {
        Self {
            uid: meta.uid(),
            gid: meta.gid(),
            mode: meta.mode() & MODE_MASK,
        }
    }
}

/// Steps of a publish, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    Write,
    Chown,
    Chmod,
    Close,
    Rename,
}

/// Writes the index to `<dest>~` and renames it over `dest`.
///
/// Until the temporary file has been closed successfully, dropping the
/// writer (on error or otherwise) removes it. After that the cleanup is
/// disarmed, so a failed rename leaves a complete `<dest>~` behind.
pub struct AtomicFileWriter {
    dest: PathBuf,
    temp: PathBuf,
    file: Option<BufWriter<File>>,
    armed: bool,
    bytes_written: u64,
    #[cfg(test)]
    fail_at: Option<WriteStep>,
}

impl AtomicFileWriter {
    /// Create (or truncate) the temporary file next to `dest`
    pub fn create(dest: &Path) -> Result<Self> {
        let temp = temp_path_for(dest);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(TEMP_MODE)
            .open(&temp)
            .map_err(|e| IndexError::io(IoOp::Open, &temp, e))?;

        Ok(Self {
            dest: dest.to_path_buf(),
            temp,
            file: Some(BufWriter::new(file)),
            armed: true,
            bytes_written: 0,
            #[cfg(test)]
            fail_at: None,
        })
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Append encoded records
    pub fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.fault(WriteStep::Write)
            .and_then(|()| self.writer()?.write_all(bytes))
            .map_err(|e| IndexError::io(IoOp::Write, &self.temp, e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Apply ownership and mode, close, then rename into place
    pub fn publish(mut self, ownership: FileOwnership) -> Result<()> {
        let mut writer = self
            .file
            .take()
            .ok_or_else(|| IndexError::io(IoOp::Write, &self.temp, closed()))?;

        writer
            .flush()
            .map_err(|e| IndexError::io(IoOp::Write, &self.temp, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| IndexError::io(IoOp::Write, &self.temp, e.into_error()))?;

        tracing::debug!(
            temp_file = %self.temp.display(),
            uid = ownership.uid,
            gid = ownership.gid,
            "chown"
        );
        self.fault(WriteStep::Chown)
            .and_then(|()| std::os::unix::fs::fchown(&file, Some(ownership.uid), Some(ownership.gid)))
            .map_err(|e| IndexError::io(IoOp::Chown, &self.temp, e))?;

        tracing::debug!(
            temp_file = %self.temp.display(),
            mode = %format!("0o{:04o}", ownership.mode),
            "chmod"
        );
        self.fault(WriteStep::Chmod)
            .and_then(|()| file.set_permissions(Permissions::from_mode(ownership.mode)))
            .map_err(|e| IndexError::io(IoOp::Chmod, &self.temp, e))?;

        // Dropping a File swallows close errors; syncing surfaces deferred write failures
        self.fault(WriteStep::Close)
            .and_then(|()| file.sync_all())
            .map_err(|e| IndexError::io(IoOp::Close, &self.temp, e))?;
        drop(file);

        self.armed = false;

        self.fault(WriteStep::Rename)
            .and_then(|()| fs::rename(&self.temp, &self.dest))
            .map_err(|source| IndexError::Rename {
                temp: self.temp.clone(),
                dest: self.dest.clone(),
                source,
            })
    }

    fn writer(&mut self) -> std::io::Result<&mut BufWriter<File>> {
        self.file.as_mut().ok_or_else(closed)
    }

    #[cfg(test)]
    fn fault(&self, step: WriteStep) -> std::io::Result<()> {
        if self.fail_at == Some(step) {
            return Err(std::io::Error::other(format!("injected {step:?} failure")));
        }
        Ok(())
    }

    #[cfg(not(test))]
    #[inline(always)]
    fn fault(&self, _step: WriteStep) -> std::io::Result<()> {
        Ok(())
    }
}

impl Drop for AtomicFileWriter {
    fn drop(&mut self) {
        if self.armed {
            // Close before unlinking; errors here are not actionable
            drop(self.file.take());
            let _ = fs::remove_file(&self.temp);
        }
    }
}

fn closed() -> std::io::Error {
    std::io::Error::other("temporary file already closed")
}
