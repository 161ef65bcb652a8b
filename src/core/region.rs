//! Region completion against an authoritative boundary feature set.
//!
//! Boundary sets come from an injected async [`BoundaryLoader`] and are
//! memoized per map id: concurrent callers share one in-flight fetch, and a
//! successful result is reused for the completer's lifetime. Failed fetches
//! are evicted so a later call can retry.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::BoundaryLoadError;

/// One `(regionName, value)` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionValue {
    pub name: String,
    pub value: f64,
}

impl RegionValue {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

pub type RegionDataset = Vec<RegionValue>;

/// Ordered, duplicate-free region names defining a map's drawable area.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoundaryFeatureSet {
    names: IndexSet<String>,
}

impl BoundaryFeatureSet {
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Collects `features[*].properties.name` (falling back to the feature
    /// `id`) from a GeoJSON feature collection.
    pub fn from_geojson(collection: &Value) -> Result<Self, String> {
        let features = collection
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| "geojson payload has no `features` array".to_owned())?;
        let names = features.iter().filter_map(|feature| {
            feature
                .get("properties")
                .and_then(|props| props.get("name"))
                .or_else(|| feature.get("id"))
                .and_then(|name| match name {
                    Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                })
        });
        Ok(Self::new(names))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Async source of boundary feature sets, keyed by map id.
#[async_trait]
pub trait BoundaryLoader: Send + Sync {
    async fn load(&self, map_id: &str) -> Result<BoundaryFeatureSet, BoundaryLoadError>;
}

/// Loads `<root>/<map_id>.json` GeoJSON files.
#[derive(Debug, Clone)]
pub struct FileBoundaryLoader {
    root: PathBuf,
}

impl FileBoundaryLoader {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl BoundaryLoader for FileBoundaryLoader {
    async fn load(&self, map_id: &str) -> Result<BoundaryFeatureSet, BoundaryLoadError> {
        let valid_id = !map_id.is_empty()
            && map_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
        if !valid_id {
            return Err(BoundaryLoadError::Unsupported {
                map_id: map_id.to_owned(),
            });
        }
        let path = self.root.join(format!("{map_id}.json"));
        let bytes = read_boundary_file(&path).await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                BoundaryLoadError::Missing {
                    map_id: map_id.to_owned(),
                    detail: path.display().to_string(),
                }
            } else {
                BoundaryLoadError::Io {
                    map_id: map_id.to_owned(),
                    detail: err.to_string(),
                }
            }
        })?;
        let collection: Value =
            serde_json::from_slice(&bytes).map_err(|err| BoundaryLoadError::Decode {
                map_id: map_id.to_owned(),
                detail: err.to_string(),
            })?;
        BoundaryFeatureSet::from_geojson(&collection).map_err(|detail| {
            BoundaryLoadError::Decode {
                map_id: map_id.to_owned(),
                detail,
            }
        })
    }
}

/// `tokio::fs` inside a tokio runtime, a blocking read anywhere else.
async fn read_boundary_file(path: &Path) -> std::io::Result<Vec<u8>> {
    if tokio::runtime::Handle::try_current().is_ok() {
        tokio::fs::read(path).await
    } else {
        std::fs::read(path)
    }
}

type BoundaryFetch = Shared<BoxFuture<'static, Result<Arc<BoundaryFeatureSet>, BoundaryLoadError>>>;

pub struct RegionCompleter {
    loader: Arc<dyn BoundaryLoader>,
    timeout: Duration,
    cache: Mutex<HashMap<String, BoundaryFetch>>,
}

impl std::fmt::Debug for RegionCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cached = self
            .cache
            .lock()
            .map(|cache| cache.len())
            .unwrap_or_default();
        f.debug_struct("RegionCompleter")
            .field("timeout", &self.timeout)
            .field("cached_keys", &cached)
            .finish_non_exhaustive()
    }
}

impl RegionCompleter {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new(loader: Arc<dyn BoundaryLoader>) -> Self {
        Self {
            loader,
            timeout: Self::DEFAULT_TIMEOUT,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Bounds each fetch; enforced only when polled inside a tokio runtime.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Completes `sparse` against `boundary`: one entry per boundary name,
    /// in boundary order, zero where absent. Names outside the boundary are
    /// dropped; for duplicates the first occurrence wins.
    #[must_use]
    pub fn complete(sparse: &[RegionValue], boundary: &BoundaryFeatureSet) -> RegionDataset {
        let mut provided: IndexMap<&str, f64> = IndexMap::with_capacity(sparse.len());
        for entry in sparse {
            if !boundary.contains(&entry.name) {
                debug!(region = %entry.name, "dropping region outside boundary set");
                continue;
            }
            if provided.contains_key(entry.name.as_str()) {
                debug!(region = %entry.name, "ignoring duplicate region entry");
                continue;
            }
            let value = if entry.value.is_finite() {
                entry.value
            } else {
                0.0
            };
            provided.insert(entry.name.as_str(), value);
        }
        boundary
            .names()
            .map(|name| RegionValue::new(name, provided.get(name).copied().unwrap_or(0.0)))
            .collect()
    }

    /// Boundary set for `map_id`, fetched at most once while cached.
    pub async fn boundary(
        &self,
        map_id: &str,
    ) -> Result<Arc<BoundaryFeatureSet>, BoundaryLoadError> {
        let fetch = {
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = cache.get(map_id) {
                existing.clone()
            } else {
                let fetch = self.start_fetch(map_id);
                cache.insert(map_id.to_owned(), fetch.clone());
                fetch
            }
        };

        let result = fetch.clone().await;
        if let Err(err) = &result {
            warn!(map_id, error = %err, "boundary fetch failed; evicting cache entry");
            let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            if cache.get(map_id).is_some_and(|current| current.ptr_eq(&fetch)) {
                cache.remove(map_id);
            }
        }
        result
    }

    /// Fetches (or reuses) the boundary for `map_id` and completes `sparse`.
    pub async fn complete_for_map(
        &self,
        map_id: &str,
        sparse: &[RegionValue],
    ) -> Result<RegionDataset, BoundaryLoadError> {
        let boundary = self.boundary(map_id).await?;
        Ok(Self::complete(sparse, &boundary))
    }

    #[must_use]
    pub fn is_cached(&self, map_id: &str) -> bool {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(map_id)
    }

    fn start_fetch(&self, map_id: &str) -> BoundaryFetch {
        let loader = Arc::clone(&self.loader);
        let map_id = map_id.to_owned();
        let timeout = self.timeout;
        async move {
            debug!(map_id = %map_id, "fetching boundary feature set");
            // The timer needs a tokio reactor; other executors await the loader untimed.
            if tokio::runtime::Handle::try_current().is_err() {
                debug!(map_id = %map_id, "no tokio runtime; boundary fetch is not timed");
                return loader.load(&map_id).await.map(Arc::new);
            }
            let outcome = tokio::time::timeout(timeout, loader.load(&map_id)).await;
            match outcome {
                Ok(Ok(boundary)) => Ok(Arc::new(boundary)),
                Ok(Err(err)) => Err(err),
                Err(_) => Err(BoundaryLoadError::Timeout {
                    timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                    map_id,
                }),
            }
        }
        .boxed()
        .shared()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BoundaryFeatureSet, RegionCompleter, RegionValue};

    #[test]
    fn geojson_names_are_extracted_in_order_without_duplicates() {
        let collection = json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"name": "North"}},
                {"properties": {}, "id": "South"},
                {"properties": {"name": "North"}},
                {"properties": {"name": ""}}
            ]
        });
        let boundary = BoundaryFeatureSet::from_geojson(&collection).expect("geojson");
        assert_eq!(boundary.names().collect::<Vec<_>>(), vec!["North", "South"]);
    }

    #[test]
    fn duplicates_keep_first_value_and_non_finite_becomes_zero() {
        let boundary = BoundaryFeatureSet::new(["A", "B"]);
        let completed = RegionCompleter::complete(
            &[
                RegionValue::new("A", 1.0),
                RegionValue::new("A", 9.0),
                RegionValue::new("B", f64::NAN),
            ],
            &boundary,
        );
        assert_eq!(
            completed,
            vec![RegionValue::new("A", 1.0), RegionValue::new("B", 0.0)]
        );
    }
}
