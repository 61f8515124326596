//! # Extension Traits
//!
//! Convenience methods for backends.
//!
//! [`FsExt`] is blanket-implemented, so every [`Backend`] gets it for free.
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`read_all`](FsExt::read_all) | Read a whole file |
//! | [`write_all`](FsExt::write_all) | Write a whole file |
//!
//! ## JSON Support (Feature-Gated)
//!
//! With the `serde` feature enabled, [`FsExtJson`] adds `read_json` and
//! `write_json`.
//!
//! ```toml
//! [dependencies]
//! assetfs = { version = "0.1", features = ["serde"] }
//! ```

use crate::{Backend, ByteChannel, Feature, FsError, OpenMode};

/// Extension methods for any backend.
///
/// # Example
///
/// ```rust
/// use assetfs::{Backend, FsError, FsExt};
///
/// fn copy_save<B: Backend>(backend: &B) -> Result<(), FsError> {
///     let data = backend.read_all("/game/Save01.lsd")?;
///     backend.write_all("/game/Save02.lsd", &data, Default::default())
/// }
/// ```
pub trait FsExt: Backend {
    /// Read the whole file at `path`.
    ///
    /// # Errors
    ///
    /// Anything [`open_input`](crate::FsRead::open_input) returns, or
    /// [`FsError::Io`] if a read fails midway.
    fn read_all(&self, path: &str) -> Result<Vec<u8>, FsError> {
        let mut channel = self.open_input(path, OpenMode::BINARY)?;
        let mut out = Vec::new();
        let mut chunk = [0u8; crate::DEFAULT_BUFFER_SIZE];
        loop {
            match channel.read(&mut chunk) {
                Ok(0) => return Ok(out),
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(FsError::io("read", path, e)),
            }
        }
    }

    /// Write `data` to `path` and flush.
    ///
    /// # Errors
    ///
    /// - [`FsError::ReadOnly`] if the backend does not support writing
    /// - [`FsError::Io`] if a write or the final flush fails
    fn write_all(&self, path: &str, data: &[u8], mode: OpenMode) -> Result<(), FsError> {
        if !self.is_feature_supported(Feature::Write) {
            return Err(FsError::ReadOnly {
                operation: "write_all",
            });
        }
        let mut channel = self.open_output(path, mode)?;
        let mut rest = data;
        while !rest.is_empty() {
            match channel.write(rest) {
                Ok(0) => {
                    return Err(FsError::io(
                        "write",
                        path,
                        std::io::ErrorKind::WriteZero.into(),
                    ));
                }
                Ok(n) => rest = &rest[n..],
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => return Err(FsError::io("write", path, e)),
            }
        }
        channel.flush().map_err(|e| FsError::io("flush", path, e))
    }
}

impl<B: Backend + ?Sized> FsExt for B {}

#[cfg(feature = "serde")]
mod json {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    /// JSON serialization extension methods.
    ///
    /// Available when the `serde` feature is enabled.
    pub trait FsExtJson: Backend {
        /// Read a file and deserialize it as JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::NotFound` if the file doesn't exist
        /// - `FsError::Deserialization` if parsing fails
        fn read_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FsError> {
            let data = self.read_all(path)?;
            serde_json::from_slice(&data).map_err(|e| FsError::Deserialization(e.to_string()))
        }

        /// Serialize a value and write it as pretty-printed JSON.
        ///
        /// # Errors
        ///
        /// - `FsError::Serialization` if serialization fails
        /// - Anything [`FsExt::write_all`] returns
        fn write_json<T: Serialize>(&self, path: &str, value: &T) -> Result<(), FsError> {
            let json = serde_json::to_vec_pretty(value)
                .map_err(|e| FsError::Serialization(e.to_string()))?;
            self.write_all(path, &json, OpenMode::TEXT)
        }
    }

    impl<B: Backend + ?Sized> FsExtJson for B {}
}

#[cfg(feature = "serde")]
pub use json::FsExtJson;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Capabilities, DirEntry, FsDir, FsRead, FsWrite, MemoryChannel};
    use std::io::{self, SeekFrom};
    use std::sync::{Arc, Mutex};

    /// Single-file backend; writes land in `stored`.
    struct OneFile {
        stored: Arc<Mutex<Vec<u8>>>,
        writable: bool,
    }

    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl ByteChannel for Shared {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            // accept at most 3 bytes per call
            let n = buf.len().min(3);
            self.0.lock().unwrap().extend_from_slice(&buf[..n]);
            Ok(n)
        }
        fn seek(&mut self, _: SeekFrom) -> io::Result<u64> {
            Ok(0)
        }
        fn capabilities(&self) -> Capabilities {
            Capabilities::WRITE
        }
    }

    impl OneFile {
        fn new(contents: &[u8], writable: bool) -> Self {
            Self {
                stored: Arc::new(Mutex::new(contents.to_vec())),
                writable,
            }
        }
    }

    impl FsRead for OneFile {
        fn is_file(&self, path: &str) -> bool {
            path == "/f"
        }
        fn is_directory(&self, _: &str, _: bool) -> bool {
            false
        }
        fn file_size(&self, _: &str) -> i64 {
            self.stored.lock().unwrap().len() as i64
        }
        fn open_input(&self, path: &str, _: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
            if path != "/f" {
                return Err(FsError::NotFound { path: path.into() });
            }
            Ok(Box::new(MemoryChannel::owned(self.stored.lock().unwrap().clone())))
        }
        fn describe(&self, base_path: &str) -> String {
            base_path.to_string()
        }
    }

    impl FsWrite for OneFile {
        fn is_feature_supported(&self, _: Feature) -> bool {
            self.writable
        }
        fn open_output(&self, _: &str, _: OpenMode) -> Result<Box<dyn ByteChannel>, FsError> {
            self.stored.lock().unwrap().clear();
            Ok(Box::new(Shared(self.stored.clone())))
        }
        fn make_directory(&self, _: &str, _: bool) -> Result<(), FsError> {
            Ok(())
        }
    }

    impl FsDir for OneFile {
        fn list_directory(&self, _: &str) -> Result<Vec<DirEntry>, FsError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn read_all_reads_past_buffer_size() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let fs = OneFile::new(&data, true);
        assert_eq!(fs.read_all("/f").unwrap(), data);
    }

    #[test]
    fn read_all_propagates_not_found() {
        let fs = OneFile::new(b"", true);
        assert!(matches!(fs.read_all("/g"), Err(FsError::NotFound { .. })));
    }

    #[test]
    fn write_all_handles_short_writes() {
        let fs = OneFile::new(b"old", true);
        fs.write_all("/f", b"LcfSaveData", OpenMode::BINARY).unwrap();
        assert_eq!(fs.stored.lock().unwrap().as_slice(), b"LcfSaveData");
    }

    #[test]
    fn write_all_refuses_read_only() {
        let fs = OneFile::new(b"old", false);
        assert!(matches!(
            fs.write_all("/f", b"new", OpenMode::BINARY),
            Err(FsError::ReadOnly { .. })
        ));
        assert_eq!(fs.stored.lock().unwrap().as_slice(), b"old");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn json_round_trip() {
        let fs = OneFile::new(b"", true);
        let value = serde_json::json!({ "title": "Demo", "maps": [1, 2, 3] });
        fs.write_json("/f", &value).unwrap();
        let back: serde_json::Value = fs.read_json("/f").unwrap();
        assert_eq!(back, value);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn read_json_reports_bad_input() {
        let fs = OneFile::new(b"{ not json", true);
        let result: Result<serde_json::Value, _> = fs.read_json("/f");
        assert!(matches!(result, Err(FsError::Deserialization(_))));
    }
}
