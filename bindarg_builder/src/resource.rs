//! Opening the resources bound to file fields.
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::error::CoerceError;

/// The path which stands for the standard input/output streams.
pub const STANDARD_STREAM: &str = "-";

const GZIP_SUFFIX: &str = ".gz";

/// How a file is accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Read from the start.
    Read,
    /// Truncate and write.
    Write,
    /// Write at the end.
    Append,
}

/// A parsed file mode, such as `r`, `wb` or `at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMode {
    access: Access,
    binary: bool,
}

impl FileMode {
    /// Text read mode (`r`).
    pub const READ: FileMode = FileMode {
        access: Access::Read,
        binary: false,
    };

    /// Parse a mode string.
    pub fn parse(mode: &str) -> Result<Self, CoerceError> {
        let unsupported = || CoerceError::UnsupportedMode(mode.to_string());
        let mut access = None;
        let mut binary = false;
        let mut text = false;

        for c in mode.chars() {
            match c {
                'r' if access.is_none() => access = Some(Access::Read),
                'w' if access.is_none() => access = Some(Access::Write),
                'a' if access.is_none() => access = Some(Access::Append),
                'b' if !binary && !text => binary = true,
                't' if !binary && !text => text = true,
                _ => return Err(unsupported()),
            }
        }

        let access = access.ok_or_else(unsupported)?;
        Ok(FileMode { access, binary })
    }

    /// The access.
    pub fn access(&self) -> Access {
        self.access
    }

    /// Whether the content is binary.
    pub fn is_binary(&self) -> bool {
        self.binary
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let access = match self.access {
            Access::Read => "r",
            Access::Write => "w",
            Access::Append => "a",
        };
        let content = if self.binary { "b" } else { "" };
        write!(f, "{access}{content}")
    }
}

pub(crate) fn check_encoding(encoding: &str) -> Result<(), CoerceError> {
    let normalized: String = encoding
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();

    if normalized == "utf8" {
        Ok(())
    } else {
        Err(CoerceError::UnsupportedEncoding(encoding.to_string()))
    }
}

/// Opens the resource named by a file field's raw value.
pub trait ResourceOpener: Send + Sync {
    /// Open `path` with `mode`; text modes decode with `encoding`.
    fn open(&self, path: &str, mode: FileMode, encoding: &str) -> Result<FileHandle, CoerceError>;
}

/// Opens files from the file system.
///
/// `-` opens the standard input (read) or output (write/append).
/// Paths ending in `.gz` are decompressed on read and compressed on write.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsOpener;

impl ResourceOpener for FsOpener {
    fn open(&self, path: &str, mode: FileMode, encoding: &str) -> Result<FileHandle, CoerceError> {
        if !mode.is_binary() {
            check_encoding(encoding)?;
        }

        let cannot_open = |error: io::Error| CoerceError::CannotOpen {
            path: path.to_string(),
            reason: error.to_string(),
        };
        let gzip = path.ends_with(GZIP_SUFFIX);

        let handle = match (path == STANDARD_STREAM, mode.access()) {
            (true, Access::Read) => {
                FileHandle::reader(path, mode, encoding, BufReader::new(io::stdin()))
            }
            (true, _) => FileHandle::writer(path, mode, encoding, io::stdout()),
            (false, Access::Read) => {
                let file = File::open(path).map_err(cannot_open)?;

                if gzip {
                    FileHandle::reader(
                        path,
                        mode,
                        encoding,
                        BufReader::new(MultiGzDecoder::new(file)),
                    )
                } else {
                    FileHandle::reader(path, mode, encoding, BufReader::new(file))
                }
            }
            (false, access) => {
                let file = match access {
                    Access::Append => OpenOptions::new().append(true).create(true).open(path),
                    _ => File::create(path),
                }
                .map_err(cannot_open)?;

                if gzip {
                    FileHandle::writer(
                        path,
                        mode,
                        encoding,
                        GzEncoder::new(file, Compression::default()),
                    )
                } else {
                    FileHandle::writer(path, mode, encoding, file)
                }
            }
        };

        debug!(path, %mode, gzip, "opened resource");
        Ok(handle)
    }
}

enum Stream {
    Reader(Box<dyn BufRead + Send>),
    Writer(Box<dyn Write + Send>),
}

// The underlying stream, shared by every clone of a handle.
#[derive(Clone)]
struct SharedStream(Arc<Mutex<Stream>>);

impl SharedStream {
    fn lock(&self) -> io::Result<MutexGuard<'_, Stream>> {
        self.0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stream lock poisoned"))
    }
}

impl Read for SharedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut *self.lock()? {
            Stream::Reader(reader) => reader.read(buf),
            Stream::Writer(_) => Ok(0),
        }
    }
}

impl Write for SharedStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.lock()? {
            Stream::Writer(writer) => writer.write(buf),
            Stream::Reader(_) => Ok(0),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.lock()? {
            Stream::Writer(writer) => writer.flush(),
            Stream::Reader(_) => Ok(()),
        }
    }
}

/// An open file (or standard stream), readable or writable depending on its mode.
///
/// Clones share the underlying stream and its position.
/// Each clone buffers its own reads.
pub struct FileHandle {
    path: String,
    mode: FileMode,
    encoding: String,
    readable: bool,
    stream: BufReader<SharedStream>,
}

impl FileHandle {
    fn new(path: String, mode: FileMode, encoding: String, stream: Stream) -> Self {
        Self {
            path,
            mode,
            encoding,
            readable: matches!(stream, Stream::Reader(_)),
            stream: BufReader::new(SharedStream(Arc::new(Mutex::new(stream)))),
        }
    }

    /// A readable handle over `reader`.
    pub fn reader(
        path: impl Into<String>,
        mode: FileMode,
        encoding: impl Into<String>,
        reader: impl BufRead + Send + 'static,
    ) -> Self {
        Self::new(path.into(), mode, encoding.into(), Stream::Reader(Box::new(reader)))
    }

    /// A writable handle over `writer`.
    pub fn writer(
        path: impl Into<String>,
        mode: FileMode,
        encoding: impl Into<String>,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self::new(path.into(), mode, encoding.into(), Stream::Writer(Box::new(writer)))
    }

    /// The path as given on the command line (or as the default).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The mode the handle was opened with.
    pub fn mode(&self) -> FileMode {
        self.mode
    }

    /// The text encoding.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Whether the handle reads.
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Whether the handle writes.
    pub fn is_writable(&self) -> bool {
        !self.readable
    }

    /// Whether `self` and `other` are clones of the same opened stream.
    pub fn same_stream(&self, other: &FileHandle) -> bool {
        Arc::ptr_eq(&self.stream.get_ref().0, &other.stream.get_ref().0)
    }

    fn unsupported(&self, operation: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("'{}' is not open for {operation}", self.path),
        )
    }
}

impl Clone for FileHandle {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            mode: self.mode,
            encoding: self.encoding.clone(),
            readable: self.readable,
            stream: BufReader::new(self.stream.get_ref().clone()),
        }
    }
}

impl fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("mode", &self.mode.to_string())
            .field("encoding", &self.encoding)
            .finish()
    }
}

impl Read for FileHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.readable {
            return Err(self.unsupported("reading"));
        }

        self.stream.read(buf)
    }
}

impl BufRead for FileHandle {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if !self.readable {
            return Err(self.unsupported("reading"));
        }

        self.stream.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.stream.consume(amt);
    }
}

impl Write for FileHandle {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.readable {
            return Err(self.unsupported("writing"));
        }

        self.stream.get_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.readable {
            return Ok(());
        }

        self.stream.get_mut().flush()
    }
}

macro_rules! file_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(FileHandle);

        impl $name {
            /// Unwrap into the handle.
            pub fn into_inner(self) -> FileHandle {
                self.0
            }
        }

        impl From<FileHandle> for $name {
            fn from(value: FileHandle) -> Self {
                $name(value)
            }
        }

        impl Deref for $name {
            type Target = FileHandle;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl Read for $name {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.0.read(buf)
            }
        }

        impl BufRead for $name {
            fn fill_buf(&mut self) -> io::Result<&[u8]> {
                self.0.fill_buf()
            }

            fn consume(&mut self, amt: usize) {
                self.0.consume(amt)
            }
        }

        impl Write for $name {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.write(buf)
            }

            fn flush(&mut self) -> io::Result<()> {
                self.0.flush()
            }
        }
    };
}

file_newtype!(
    /// A file field holding text.
    TextFile
);
file_newtype!(
    /// A file field holding bytes.
    BinaryFile
);

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    #[case("r", Access::Read, false)]
    #[case("rt", Access::Read, false)]
    #[case("rb", Access::Read, true)]
    #[case("w", Access::Write, false)]
    #[case("wb", Access::Write, true)]
    #[case("a", Access::Append, false)]
    #[case("ab", Access::Append, true)]
    fn mode_parse(#[case] mode: &str, #[case] access: Access, #[case] binary: bool) {
        // Execute
        let parsed = FileMode::parse(mode).unwrap();

        // Verify
        assert_eq!(parsed.access(), access);
        assert_eq!(parsed.is_binary(), binary);
    }

    #[rstest]
    #[case("")]
    #[case("x")]
    #[case("rw")]
    #[case("rbt")]
    #[case("r+")]
    fn mode_parse_invalid(#[case] mode: &str) {
        assert_matches!(FileMode::parse(mode), Err(CoerceError::UnsupportedMode(m)) if m == mode);
    }

    #[rstest]
    #[case("utf-8")]
    #[case("UTF8")]
    #[case("utf_8")]
    fn encoding_supported(#[case] encoding: &str) {
        assert_matches!(check_encoding(encoding), Ok(()));
    }

    #[test]
    fn encoding_unsupported() {
        assert_matches!(
            check_encoding("latin-1"),
            Err(CoerceError::UnsupportedEncoding(e)) if e == "latin-1"
        );
    }

    #[test]
    fn open_plain() {
        // Setup
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("a.txt");
        std::fs::write(&path, "hello\nworld\n").unwrap();

        // Execute
        let mut handle = FsOpener
            .open(path.to_str().unwrap(), FileMode::READ, "utf-8")
            .unwrap();

        // Verify
        let mut content = String::new();
        handle.read_to_string(&mut content).unwrap();
        assert_eq!(content, "hello\nworld\n");
        assert!(handle.is_readable());
    }

    #[test]
    fn open_gzip_read() {
        // Setup
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("a.txt.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"compressed").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        // Execute
        let mut handle = FsOpener
            .open(path.to_str().unwrap(), FileMode::READ, "utf-8")
            .unwrap();

        // Verify
        let mut content = String::new();
        handle.read_to_string(&mut content).unwrap();
        assert_eq!(content, "compressed");
    }

    #[test]
    fn open_gzip_write() {
        // Setup
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("out.gz");
        let path = path.to_str().unwrap();
        let mode = FileMode::parse("w").unwrap();

        // Execute
        let mut handle = FsOpener.open(path, mode, "utf-8").unwrap();
        handle.write_all(b"round").unwrap();
        drop(handle);

        // Verify
        let mut content = String::new();
        FsOpener
            .open(path, FileMode::READ, "utf-8")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "round");
    }

    #[test]
    fn open_missing() {
        // Setup
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("missing.txt");
        let path = path.to_str().unwrap();

        // Execute
        let result = FsOpener.open(path, FileMode::READ, "utf-8");

        // Verify
        assert_matches!(result, Err(CoerceError::CannotOpen { path: p, .. }) if p == path);
    }

    #[test]
    fn open_standard_stream() {
        // Execute
        let handle = FsOpener
            .open(STANDARD_STREAM, FileMode::parse("w").unwrap(), "utf-8")
            .unwrap();

        // Verify
        assert!(handle.is_writable());
        assert_eq!(handle.path(), "-");
    }

    #[test]
    fn handle_wrong_direction() {
        // Setup
        let mut handle = FileHandle::reader("mem", FileMode::READ, "utf-8", Cursor::new(vec![]));

        // Execute
        let result = handle.write(b"x");

        // Verify
        assert_matches!(result, Err(e) if e.kind() == io::ErrorKind::Unsupported);
    }

    #[test]
    fn clones_share_stream() {
        // Setup
        let mut first = FileHandle::reader("mem", FileMode::READ, "utf-8", Cursor::new(b"abc".to_vec()));
        let mut second = first.clone();

        // Execute
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        let mut rest = String::new();
        second.read_to_string(&mut rest).unwrap();

        // Verify
        assert_eq!(content, "abc");
        assert_eq!(rest, "");
        assert!(first.same_stream(&second));
        assert!(second.is_readable());
    }

    #[test]
    fn clones_share_writer() {
        // Setup
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("out.txt");
        let path = path.to_str().unwrap();
        let mut first = FsOpener.open(path, FileMode::parse("w").unwrap(), "utf-8").unwrap();
        let mut second = first.clone();

        // Execute
        first.write_all(b"one ").unwrap();
        second.write_all(b"two").unwrap();
        drop(first);
        drop(second);

        // Verify
        assert_eq!(std::fs::read_to_string(path).unwrap(), "one two");
    }

    #[test]
    fn text_file_reads() {
        // Setup
        let handle = FileHandle::reader("mem", FileMode::READ, "utf-8", Cursor::new(b"abc".to_vec()));
        let mut file = TextFile::from(handle);

        // Execute
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();

        // Verify
        assert_eq!(content, "abc");
        assert_eq!(file.path(), "mem");
    }
}
