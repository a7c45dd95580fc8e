use chrono::Local;
use std::{io, path::Path};
use tokio::{
    fs::{File, OpenOptions},
    io::AsyncWriteExt,
    sync::Mutex,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Append-only command log shared by every connection.
///
/// Each entry is `<timestamp> - <message>\n`, written with one `write_all` under
/// the lock so entries from concurrent connections never interleave.
#[derive(Debug)]
pub struct AuditLog {
    file: Mutex<File>,
}

impl AuditLog {
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    pub async fn append(&self, message: &str) -> io::Result<()> {
        let entry = format!("{} - {}\n", Local::now().format(TIMESTAMP_FORMAT), message);

        let mut file = self.file.lock().await;
        file.write_all(entry.as_bytes()).await?;
        file.flush().await
    }

    pub async fn close(&self) -> io::Result<()> {
        let mut file = self.file.lock().await;
        file.flush().await?;
        file.sync_all().await
    }
}
