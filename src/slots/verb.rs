//! The closed set of verbs a dispatcher answers to.

use std::fmt;
use std::str::FromStr;

use crate::errors::SlotIoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    FileSave,
    FileSaveBinary,
    FileLoad,
    FileLoadBinary,
    FileCopy,
    FileMove,
    FileDelete,
    FileExists,
    FileList,
    FileListRecursively,
    FileExecute,
    FileUnzip,
    FolderCreate,
    FolderCopy,
    FolderMove,
    FolderDelete,
    FolderExists,
    FolderList,
    FolderListRecursively,
    FolderRoot,
    PathGetFolder,
    StreamOpenFile,
    StreamSaveFile,
    StreamRead,
    StreamLoad,
    StreamClose,
    ContentZip,
    ContentZipStream,
}

impl Verb {
    pub const ALL: [Verb; 28] = [
        Verb::FileSave,
        Verb::FileSaveBinary,
        Verb::FileLoad,
        Verb::FileLoadBinary,
        Verb::FileCopy,
        Verb::FileMove,
        Verb::FileDelete,
        Verb::FileExists,
        Verb::FileList,
        Verb::FileListRecursively,
        Verb::FileExecute,
        Verb::FileUnzip,
        Verb::FolderCreate,
        Verb::FolderCopy,
        Verb::FolderMove,
        Verb::FolderDelete,
        Verb::FolderExists,
        Verb::FolderList,
        Verb::FolderListRecursively,
        Verb::FolderRoot,
        Verb::PathGetFolder,
        Verb::StreamOpenFile,
        Verb::StreamSaveFile,
        Verb::StreamRead,
        Verb::StreamLoad,
        Verb::StreamClose,
        Verb::ContentZip,
        Verb::ContentZipStream,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Verb::FileSave => "file.save",
            Verb::FileSaveBinary => "file.save.binary",
            Verb::FileLoad => "file.load",
            Verb::FileLoadBinary => "file.load.binary",
            Verb::FileCopy => "file.copy",
            Verb::FileMove => "file.move",
            Verb::FileDelete => "file.delete",
            Verb::FileExists => "file.exists",
            Verb::FileList => "file.list",
            Verb::FileListRecursively => "file.list-recursively",
            Verb::FileExecute => "file.execute",
            Verb::FileUnzip => "file.unzip",
            Verb::FolderCreate => "folder.create",
            Verb::FolderCopy => "folder.copy",
            Verb::FolderMove => "folder.move",
            Verb::FolderDelete => "folder.delete",
            Verb::FolderExists => "folder.exists",
            Verb::FolderList => "folder.list",
            Verb::FolderListRecursively => "folder.list-recursively",
            Verb::FolderRoot => "folder.root",
            Verb::PathGetFolder => "path.get-folder",
            Verb::StreamOpenFile => "stream.open-file",
            Verb::StreamSaveFile => "stream.save-file",
            Verb::StreamRead => "stream.read",
            Verb::StreamLoad => "stream.load",
            Verb::StreamClose => "stream.close",
            Verb::ContentZip => "content.zip",
            Verb::ContentZipStream => "content.zip-stream",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Verb {
    type Err = SlotIoError;

    /// Accepts the bare name or the `io.`-prefixed form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let bare = trimmed.strip_prefix("io.").unwrap_or(trimmed);
        Verb::ALL
            .into_iter()
            .find(|v| v.name() == bare)
            .ok_or_else(|| SlotIoError::invalid(trimmed, "unknown verb"))
    }
}

/// A verb plus whether the caller asked for the async variant (`wait.` prefix).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invocation {
    pub verb: Verb,
    pub wait: bool,
}

impl Invocation {
    pub fn parse(s: &str) -> Result<Self, SlotIoError> {
        let s = s.trim();
        match s.strip_prefix("wait.") {
            Some(rest) => Ok(Self { verb: rest.parse()?, wait: true }),
            None => Ok(Self { verb: s.parse()?, wait: false }),
        }
    }
}
