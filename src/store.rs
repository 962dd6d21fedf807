//! Page store module
//!
//! Maps page titles to files and back. A page's on-disk identity is exactly
//! `<title>.txt` inside the pages directory; nothing else determines
//! location. There is no locking and no cache: the file is the only durable
//! state, and concurrent saves to one title are last-writer-wins.

use std::io;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// A wiki page: a title and its raw body bytes.
///
/// Constructed fresh for every request; never cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            title: title.into(),
            body,
        }
    }

    /// An empty page for a title that has no file yet
    pub fn blank(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }
}

/// Filesystem-backed store for pages.
pub struct PageStore {
    root: PathBuf,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file backing a title.
    ///
    /// Titles reaching the store have already passed the router's
    /// alphanumeric check, so the join cannot escape the pages directory.
    fn page_path(&self, title: &str) -> PathBuf {
        self.root.join(format!("{title}.txt"))
    }

    /// Load the page for a title
    ///
    /// Any read failure reads as "no such page": missing file, permission
    /// error, whatever. The handlers' only on-miss policy is redirect (view)
    /// or blank page (edit), so the distinction is never surfaced.
    pub async fn load(&self, title: &str) -> Option<Page> {
        let body = tokio::fs::read(self.page_path(title)).await.ok()?;
        Some(Page::new(title, body))
    }

    /// Persist a page, creating the file if absent and truncating if present
    ///
    /// New files are created with owner-only read/write permission.
    pub async fn save(&self, page: &Page) -> io::Result<()> {
        let path = self.page_path(&page.title);

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).await?;
        file.write_all(&page.body).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());

        let page = Page::new("TestPage", b"hello=world".to_vec());
        store.save(&page).await.unwrap();

        let loaded = store.load("TestPage").await.unwrap();
        assert_eq!(loaded.title, "TestPage");
        assert_eq!(loaded.body, b"hello=world");
        assert!(dir.path().join("TestPage.txt").exists());
    }

    #[tokio::test]
    async fn test_round_trip_preserves_arbitrary_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());

        let body = vec![0u8, 159, 146, 150, 255, 10];
        store.save(&Page::new("Bin", body.clone())).await.unwrap();

        assert_eq!(store.load("Bin").await.unwrap().body, body);
    }

    #[tokio::test]
    async fn test_load_missing_page_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());

        assert!(store.load("NoSuchPage").await.is_none());
    }

    #[tokio::test]
    async fn test_save_truncates_previous_body() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());

        store
            .save(&Page::new("P", b"a much longer first body".to_vec()))
            .await
            .unwrap();
        store.save(&Page::new("P", b"short".to_vec())).await.unwrap();

        assert_eq!(store.load("P").await.unwrap().body, b"short");
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path().join("missing"));

        let err = store.save(&Page::blank("P")).await;
        assert!(err.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = PageStore::new(dir.path());
        store.save(&Page::new("P", b"x".to_vec())).await.unwrap();

        let mode = std::fs::metadata(dir.path().join("P.txt"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
