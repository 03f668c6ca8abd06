use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

/// Somewhere to read cartridges from.
pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;
    fn open_for_read(&self, path: &Path) -> io::Result<Box<dyn Read>>;
}

/// The host filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct HostFilesystem;

impl Filesystem for HostFilesystem {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
    fn open_for_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// A filesystem that only holds what was put into it.
#[derive(Debug, Default, Clone)]
pub struct MemoryFilesystem {
    files: HashMap<PathBuf, Vec<u8>>,
}

impl MemoryFilesystem {
    pub fn new() -> MemoryFilesystem {
        MemoryFilesystem::default()
    }

    pub fn insert<P: Into<PathBuf>>(&mut self, path: P, contents: Vec<u8>) {
        self.files.insert(path.into(), contents);
    }
}

impl Filesystem for MemoryFilesystem {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }
    fn open_for_read(&self, path: &Path) -> io::Result<Box<dyn Read>> {
        match self.files.get(path) {
            Some(contents) => Ok(Box::new(Cursor::new(contents.clone()))),
            None => Err(io::Error::new(io::ErrorKind::NotFound, format!("{:?}", path))),
        }
    }
}
