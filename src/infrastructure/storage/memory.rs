use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use anyhow::bail;
use anyhow::Result;
use dashmap::DashMap;

use crate::domain::models::Storage;

/// In-process storage for sessions that should not outlive the host. Reads
/// and writes can be made to fail on demand to exercise recovery paths.
#[derive(Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn get(&self, key: &str) -> Option<String> {
        return self.entries.get(key).map(|e| return e.value().to_string());
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("Storage is unavailable");
        }

        return Ok(self.get(key));
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("Storage quota exceeded");
        }

        self.entries.insert(key.to_string(), value.to_string());
        return Ok(());
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        return Ok(());
    }
}
