//! Version scout: latest-version lookup and classification for tracked units
//!
//! This module provides:
//! - Registry dispatch per unit (npm, PyPI, python.org)
//! - Classification into Current / UpdateAvailable / FetchError
//! - Concurrent checks with a bounded number of in-flight requests,
//!   reported in input order

use crate::domain::{Registry, TrackedUnit, UpdateCandidate};
use crate::error::FetchFailure;
use crate::progress::Progress;
use crate::registry::{create_adapter, HttpClient, RegistryAdapter};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Default number of concurrent registry requests
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Looks up latest versions and classifies tracked units
pub struct VersionScout {
    /// Adapter per registry
    adapters: HashMap<Registry, Arc<dyn RegistryAdapter>>,
    /// Limits in-flight registry requests
    semaphore: Arc<Semaphore>,
}

impl VersionScout {
    /// Create a scout with the real npm, PyPI and python.org adapters
    pub fn new(client: HttpClient) -> Self {
        let adapters = Registry::all()
            .iter()
            .map(|registry| create_adapter(*registry, client.clone()))
            .collect();
        Self::with_adapters(adapters)
    }

    /// Create a scout from explicit adapters (one per registry; later wins)
    pub fn with_adapters(adapters: Vec<Arc<dyn RegistryAdapter>>) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.registry(), adapter))
            .collect();
        Self {
            adapters,
            semaphore: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
        }
    }

    /// Set the maximum number of concurrent registry requests
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        self
    }

    /// Fetch the latest published version for a unit
    pub async fn fetch_latest(&self, unit: &TrackedUnit) -> Result<String, FetchFailure> {
        let adapter = self.adapter_for(unit)?;
        fetch_with(adapter.as_ref(), unit).await
    }

    /// Fetch and classify one unit
    pub async fn check(&self, unit: &TrackedUnit) -> UpdateCandidate {
        let fetched = self.fetch_latest(unit).await;
        UpdateCandidate::classify(unit.clone(), fetched)
    }

    /// Check every unit; the result preserves input order
    pub async fn check_all(&self, units: &[TrackedUnit], progress: &Progress) -> Vec<UpdateCandidate> {
        let mut handles = Vec::with_capacity(units.len());

        for unit in units {
            let unit = unit.clone();
            let adapter = self.adapter_for(&unit);
            let semaphore = Arc::clone(&self.semaphore);

            handles.push(tokio::spawn(async move {
                let fetched = match adapter {
                    Ok(adapter) => match semaphore.acquire_owned().await {
                        Ok(_permit) => fetch_with(adapter.as_ref(), &unit).await,
                        Err(e) => Err(FetchFailure::network(
                            &unit.name,
                            unit.registry.display_name(),
                            e.to_string(),
                        )),
                    },
                    Err(failure) => Err(failure),
                };
                UpdateCandidate::classify(unit, fetched)
            }));
        }

        let mut candidates = Vec::with_capacity(units.len());
        for (unit, handle) in units.iter().zip(handles) {
            progress.set_message(&format!("Checking {}", unit.name));
            let candidate = match handle.await {
                Ok(candidate) => candidate,
                Err(e) => UpdateCandidate::fetch_error(
                    unit.clone(),
                    FetchFailure::network(&unit.name, unit.registry.display_name(), e.to_string()),
                ),
            };
            progress.inc();
            candidates.push(candidate);
        }

        candidates
    }

    fn adapter_for(&self, unit: &TrackedUnit) -> Result<Arc<dyn RegistryAdapter>, FetchFailure> {
        self.adapters
            .get(&unit.registry)
            .cloned()
            .ok_or_else(|| FetchFailure::Unsupported {
                package: unit.name.clone(),
                registry: unit.registry.display_name().to_string(),
            })
    }
}

async fn fetch_with(
    adapter: &dyn RegistryAdapter,
    unit: &TrackedUnit,
) -> Result<String, FetchFailure> {
    let result = adapter.fetch_latest(unit.query_name()).await;
    match &result {
        Ok(latest) => {
            tracing::debug!(package = %unit.name, tracked = %unit.tracked_version, latest = %latest, "fetched latest version")
        }
        Err(failure) => {
            tracing::warn!(package = %unit.name, registry = %unit.registry, reason = failure.kind(), "{}", failure)
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CandidateStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Registry serving fixed versions and recording queried names
    struct FixedRegistry {
        registry: Registry,
        versions: HashMap<String, String>,
        queried: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
        delay: Duration,
    }

    impl FixedRegistry {
        fn new(registry: Registry, versions: &[(&str, &str)]) -> Self {
            Self {
                registry,
                versions: versions
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                queried: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl RegistryAdapter for FixedRegistry {
        fn registry(&self) -> Registry {
            self.registry
        }

        async fn fetch_latest(&self, package: &str) -> Result<String, FetchFailure> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.queried.lock().unwrap().push(package.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.versions
                .get(package)
                .cloned()
                .ok_or_else(|| FetchFailure::not_found(package, self.registry_name()))
        }
    }

    #[tokio::test]
    async fn test_fetch_latest_uses_alias() {
        let npm = Arc::new(FixedRegistry::new(Registry::Npm, &[("@tanstack/react-query", "5.0.0")]));
        let scout = VersionScout::with_adapters(vec![npm.clone()]);
        let unit = TrackedUnit::new("TanStack Query", "4.0.0", Registry::Npm)
            .with_alias("@tanstack/react-query");

        assert_eq!(scout.fetch_latest(&unit).await.unwrap(), "5.0.0");
        assert_eq!(*npm.queried.lock().unwrap(), vec!["@tanstack/react-query"]);
    }

    #[tokio::test]
    async fn test_python_unit_uses_runtime_adapter() {
        let pypi = Arc::new(FixedRegistry::new(Registry::Pypi, &[("Python", "0.0.1")]));
        let runtime = Arc::new(FixedRegistry::new(Registry::PythonRuntime, &[("Python", "3.13.1")]));
        let scout = VersionScout::with_adapters(vec![pypi, runtime]);

        let unit = TrackedUnit::new("Python", "3.12.8", Registry::Pypi);
        let candidate = scout.check(&unit).await;
        assert_eq!(candidate.status, CandidateStatus::UpdateAvailable);
        assert_eq!(candidate.latest_version.as_deref(), Some("3.13.1"));
    }

    #[tokio::test]
    async fn test_missing_adapter_is_fetch_error() {
        let scout = VersionScout::with_adapters(Vec::new());
        let unit = TrackedUnit::new("react", "18.2.0", Registry::Npm);
        let candidate = scout.check(&unit).await;
        assert!(matches!(
            candidate.failure(),
            Some(FetchFailure::Unsupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_check_all_classifies_and_preserves_order() {
        let npm = Arc::new(FixedRegistry::new(
            Registry::Npm,
            &[("react", "18.3.0"), ("vite", "5.0.0")],
        ));
        let scout = VersionScout::with_adapters(vec![npm]);
        let units = vec![
            TrackedUnit::new("react", "18.2.0", Registry::Npm),
            TrackedUnit::new("ghost", "1.0.0", Registry::Npm),
            TrackedUnit::new("vite", "5.0.0", Registry::Npm),
        ];

        let candidates = scout.check_all(&units, &Progress::disabled()).await;

        let names: Vec<_> = candidates.iter().map(|c| c.unit.name.as_str()).collect();
        assert_eq!(names, vec!["react", "ghost", "vite"]);
        assert_eq!(candidates[0].status, CandidateStatus::UpdateAvailable);
        assert!(candidates[1].is_error());
        assert_eq!(candidates[2].status, CandidateStatus::Current);
    }

    #[tokio::test]
    async fn test_check_all_respects_concurrency_limit() {
        let versions: Vec<(String, String)> =
            (0..6).map(|i| (format!("pkg{}", i), "1.0.0".to_string())).collect();
        let refs: Vec<(&str, &str)> = versions
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let npm = Arc::new(
            FixedRegistry::new(Registry::Npm, &refs).with_delay(Duration::from_millis(20)),
        );
        let scout = VersionScout::with_adapters(vec![npm.clone()]).with_concurrency(2);
        let units: Vec<_> = (0..6)
            .map(|i| TrackedUnit::new(format!("pkg{}", i), "1.0.0", Registry::Npm))
            .collect();

        let candidates = scout.check_all(&units, &Progress::disabled()).await;

        assert_eq!(candidates.len(), 6);
        assert!(npm.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert!(candidates.iter().all(|c| c.status == CandidateStatus::Current));
    }

    #[tokio::test]
    async fn test_check_all_empty() {
        let scout = VersionScout::with_adapters(Vec::new());
        assert!(scout.check_all(&[], &Progress::disabled()).await.is_empty());
    }
}
