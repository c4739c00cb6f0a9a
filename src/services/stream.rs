//! Stream primitives: open a file for reading, persist a readable stream.
//!
//! Persisting uses buffered I/O with 1 MiB buffers, then flushes and fsyncs
//! the destination before reporting the byte count.

use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Seek, SeekFrom, Write};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::errors::{Result, SlotIoError};

use super::helpers::io_error_with_help;

const BUF_SIZE: usize = 1024 * 1024;

/// A readable byte stream handed out to hosts by handle.
#[derive(Debug)]
pub enum Stream {
    File(File),
    Memory(Cursor<Vec<u8>>),
}

impl Stream {
    pub fn memory(bytes: Vec<u8>) -> Self {
        Stream::Memory(Cursor::new(bytes))
    }

    /// Read everything from the current position to the end.
    pub fn read_remaining(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for Stream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::File(f) => f.read(buf),
            Stream::Memory(c) => c.read(buf),
        }
    }
}

impl Seek for Stream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Stream::File(f) => f.seek(pos),
            Stream::Memory(c) => c.seek(pos),
        }
    }
}

#[async_trait]
pub trait StreamService: Send + Sync {
    fn open_file(&self, path: &Path) -> Result<Stream>;
    /// Copy `stream` into `path`. With `overwrite` false an existing file is a
    /// `Conflict`. Returns bytes written.
    fn save_file(&self, stream: &mut dyn Read, path: &Path, overwrite: bool) -> Result<u64>;
    fn exists(&self, path: &Path) -> bool;

    async fn open_file_async(&self, path: &Path) -> Result<Stream>;
    async fn save_file_async(&self, stream: Stream, path: &Path, overwrite: bool) -> Result<u64>;
    async fn exists_async(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStreamService;

fn destination_options(overwrite: bool) -> OpenOptions {
    let mut opts = OpenOptions::new();
    opts.write(true);
    if overwrite {
        opts.create(true).truncate(true);
    } else {
        opts.create_new(true);
    }
    opts
}

fn refuse_existing(path: &Path) -> SlotIoError {
    SlotIoError::Conflict(format!(
        "file '{}' already exists and overwrite was not requested",
        path.display()
    ))
}

#[async_trait]
impl StreamService for LocalStreamService {
    fn open_file(&self, path: &Path) -> Result<Stream> {
        let f = File::open(path).map_err(io_error_with_help("open file", path))?;
        Ok(Stream::File(f))
    }

    fn save_file(&self, stream: &mut dyn Read, path: &Path, overwrite: bool) -> Result<u64> {
        if !overwrite && path.exists() {
            return Err(refuse_existing(path));
        }
        let dst = destination_options(overwrite)
            .open(path)
            .map_err(io_error_with_help("create file", path))?;

        let mut reader = BufReader::with_capacity(BUF_SIZE, stream);
        let mut writer = BufWriter::with_capacity(BUF_SIZE, dst);
        let bytes = io::copy(&mut reader, &mut writer).map_err(io_error_with_help("write file", path))?;
        writer.flush().map_err(io_error_with_help("flush file", path))?;
        writer
            .get_ref()
            .sync_all()
            .map_err(io_error_with_help("sync file", path))?;

        info!(path = %path.display(), bytes, "Saved stream to file");
        Ok(bytes)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    async fn open_file_async(&self, path: &Path) -> Result<Stream> {
        let f = tokio::fs::File::open(path)
            .await
            .map_err(io_error_with_help("open file", path))?;
        Ok(Stream::File(f.into_std().await))
    }

    async fn save_file_async(&self, stream: Stream, path: &Path, overwrite: bool) -> Result<u64> {
        if !overwrite && self.exists_async(path).await {
            return Err(refuse_existing(path));
        }
        let dst = tokio::fs::OpenOptions::from(destination_options(overwrite))
            .open(path)
            .await
            .map_err(io_error_with_help("create file", path))?;
        let mut writer = tokio::io::BufWriter::with_capacity(BUF_SIZE, dst);

        let bytes = match stream {
            Stream::File(f) => {
                let mut reader = tokio::io::BufReader::with_capacity(BUF_SIZE, tokio::fs::File::from_std(f));
                tokio::io::copy(&mut reader, &mut writer).await
            }
            Stream::Memory(mut c) => tokio::io::copy(&mut c, &mut writer).await,
        }
        .map_err(io_error_with_help("write file", path))?;

        writer.flush().await.map_err(io_error_with_help("flush file", path))?;
        writer
            .get_ref()
            .sync_all()
            .await
            .map_err(io_error_with_help("sync file", path))?;

        info!(path = %path.display(), bytes, "Saved stream to file");
        Ok(bytes)
    }

    async fn exists_async(&self, path: &Path) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}
