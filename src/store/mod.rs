pub mod disk;
pub mod memory;

use crate::core::cache::Cache;
use crate::core::config::AppConfig;
use disk::DiskCache;
use memory::MemoryCache;
use std::sync::Arc;
use tracing::warn;

const GEO_PARTITION: &str = "geo";

/// Opens the persistent cache for geolocation results under the data path.
/// Falls back to an in-memory cache when the disk store is unavailable.
pub fn open_geo_cache(config: &AppConfig) -> Arc<dyn Cache<String, String>> {
    let disk = config
        .data_path()
        .and_then(|path| DiskCache::<String, String>::open(&path.join("cache"), GEO_PARTITION));

    match disk {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!(error = %e, "Persistent cache unavailable, using memory cache");
            Arc::new(MemoryCache::<String, String>::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_geo_cache_uses_data_path() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            data_path: Some(dir.path().to_string_lossy().into_owned()),
            ..AppConfig::default()
        };

        let cache = open_geo_cache(&config);
        cache
            .put("user_country".to_string(), "SG".to_string(), None)
            .await;
        assert_eq!(
            cache.get(&"user_country".to_string()).await,
            Some("SG".to_string())
        );
        assert!(dir.path().join("cache").exists());
    }
}
