//! Pages and their storage: one file `<title>.txt` per page in the
//! page directory, holding the raw body bytes. The directory is the
//! whole store; there is no index and nothing is cached.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use kstring::KString;

use crate::easy_fs::{easy_filenames_in_dir, write_file_atomically, FileKind};
use crate::title::Title;


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: Title,
    pub body: Vec<u8>,
}

impl Page {
    /// A page that has not been written yet.
    pub fn empty(title: Title) -> Self {
        Page { title, body: Vec::new() }
    }
}


#[derive(thiserror::Error, Debug)]
pub enum PageStoreError {
    /// Reading failed for whatever reason; the cause is kept for
    /// logging, callers treat all cases alike.
    #[error("page {title} not found or unreadable")]
    NotFound {
        title: Title,
        #[source]
        source: std::io::Error,
    },
    #[error("saving {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}


/// One mutex per title that has ever been saved in this process, so
/// that saves of the same page happen one after the other.
#[derive(Debug, Default)]
pub struct PageLocks(Mutex<HashMap<KString, Arc<Mutex<()>>>>);

impl PageLocks {
    pub fn lock_for(&self, title: &Title) -> Arc<Mutex<()>> {
        // A poisoned map only means another thread panicked while
        // inserting; the map itself is still usable.
        let mut map = self.0.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(title.as_kstring().clone()).or_default().clone()
    }
}


#[derive(Debug)]
pub struct PageStore {
    dir: PathBuf,
    locks: PageLocks,
}

impl PageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        PageStore {
            dir: dir.into(),
            locks: PageLocks::default(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, title: &Title) -> PathBuf {
        self.dir.join(title.filename())
    }

    pub fn load(&self, title: &Title) -> Result<Page, PageStoreError> {
        match std::fs::read(self.path_for(title)) {
            Ok(body) => Ok(Page { title: title.clone(), body }),
            Err(source) => Err(PageStoreError::NotFound {
                title: title.clone(),
                source
            })
        }
    }

    pub fn save(&self, page: &Page) -> Result<(), PageStoreError> {
        let path = self.path_for(&page.title);
        let lock = self.locks.lock_for(&page.title);
        let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
        write_file_atomically(&path, &page.body).map_err(
            |source| PageStoreError::Write { path, source })
    }

    /// All stored pages, sorted. Files whose name isn't a valid title
    /// plus `.txt` are ignored.
    pub fn titles(&self) -> Result<Vec<Title>> {
        let mut titles = Vec::new();
        for item in easy_filenames_in_dir(&self.dir)? {
            let (filename, kind) = item?;
            if kind != FileKind::File {
                continue;
            }
            if let Some(title) = filename.to_str()
                .and_then(|s| s.strip_suffix(".txt"))
                .and_then(Title::new)
            {
                titles.push(title);
            }
        }
        titles.sort();
        Ok(titles)
    }
}
