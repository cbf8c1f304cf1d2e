//! Local order file used by the checkout routes.
//!
//! Orders are kept as a JSON array in a single file. All access goes through
//! one async mutex, and every write replaces the file atomically: the new
//! array is written to a temp file in the same directory, flushed, then
//! renamed over the old one. A reader never sees a half-written file and two
//! concurrent checkouts cannot lose each other's order.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bazaar_core::OrderId;
use bazaar_core::order::PlacedOrder;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Errors raised by the order file.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    #[error("order file I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The file exists but is not a JSON array of orders. It is left
    /// untouched for an operator to inspect.
    #[error("order file is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to encode orders: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Append-mostly store of placed orders backed by a JSON file.
#[derive(Debug, Clone)]
pub struct OrderFileStore {
    inner: Arc<OrderFileStoreInner>,
}

#[derive(Debug)]
struct OrderFileStoreInner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OrderFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(OrderFileStoreInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Append an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderStoreError` if the file cannot be read, is corrupt, or
    /// cannot be rewritten.
    pub async fn append(&self, order: PlacedOrder) -> Result<(), OrderStoreError> {
        let _guard = self.inner.lock.lock().await;
        let mut orders = self.read_all().await?;
        orders.push(order);
        self.write_all(&orders).await
    }

    /// Find an order by id.
    ///
    /// # Errors
    ///
    /// Returns `OrderStoreError` if the file cannot be read or is corrupt.
    pub async fn get(&self, id: OrderId) -> Result<Option<PlacedOrder>, OrderStoreError> {
        let _guard = self.inner.lock.lock().await;
        let orders = self.read_all().await?;
        Ok(orders.into_iter().find(|order| order.id == id))
    }

    /// Every stored order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderStoreError` if the file cannot be read or is corrupt.
    pub async fn list(&self) -> Result<Vec<PlacedOrder>, OrderStoreError> {
        let _guard = self.inner.lock.lock().await;
        self.read_all().await
    }

    async fn read_all(&self) -> Result<Vec<PlacedOrder>, OrderStoreError> {
        let raw = match tokio::fs::read(&self.inner.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&raw).map_err(OrderStoreError::Corrupt)
    }

    async fn write_all(&self, orders: &[PlacedOrder]) -> Result<(), OrderStoreError> {
        let path = &self.inner.path;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(dir).await?;

        let encoded = serde_json::to_vec_pretty(orders).map_err(OrderStoreError::Encode)?;

        let file_name = path
            .file_name()
            .map_or_else(|| "orders.json".into(), |n| n.to_string_lossy().into_owned());
        let tmp = dir.join(format!(".{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()));

        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&encoded).await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::debug!(path = %path.display(), count = orders.len(), "Order file rewritten");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::Money;
    use bazaar_core::order::{CheckoutRequest, CustomerDetails, OrderLine};
    use chrono::Utc;

    use super::*;

    fn order(name: &str) -> PlacedOrder {
        CheckoutRequest {
            customer: CustomerDetails {
                name: name.to_string(),
                email: "buyer@shop.test".to_string(),
                phone: None,
                address: None,
            },
            lines: vec![OrderLine {
                slug: "oak-desk".to_string(),
                name: "Oak Desk".to_string(),
                unit_price: Money::from(250),
                quantity: 1,
            }],
        }
        .into_order(OrderId::generate(), Utc::now())
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = OrderFileStore::new(dir.path().join("orders.json"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = OrderFileStore::new(dir.path().join("nested/orders.json"));
        let placed = order("Ada");
        store.append(placed.clone()).await.unwrap();

        assert_eq!(store.get(placed.id).await.unwrap(), Some(placed));
        assert!(store.get(OrderId::generate()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        std::fs::write(&path, "{ broken").unwrap();
        let store = OrderFileStore::new(&path);

        let err = store.append(order("Ada")).await.unwrap_err();
        assert!(matches!(err, OrderStoreError::Corrupt(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
    }

    #[tokio::test]
    async fn test_concurrent_appends_all_land() {
        let dir = tempfile::tempdir().unwrap();
        let store = OrderFileStore::new(dir.path().join("orders.json"));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move { store.append(order(&format!("Buyer {i}"))).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 20);
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
