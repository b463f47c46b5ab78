use crate::error::{AppError, Result};
use crate::models::Coordinates;
use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Resolves free-form place names ("Memphis, TN") to coordinates.
///
/// `Ok(None)` means the service answered but knows no such place.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>>;

    fn backend_name(&self) -> &'static str;
}

// ── Nominatim ───────────────────────────────────────────────

#[derive(Clone)]
pub struct NominatimClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    pub fn new(base_url: String, user_agent: String) -> Self {
        NominatimClient {
            client: Client::new(),
            base_url,
            user_agent,
        }
    }
}

/// Nominatim returns coordinates as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimPlace {
    fn coordinates(&self) -> Result<Coordinates> {
        let lat: f64 = self
            .lat
            .parse()
            .map_err(|_| AppError::Geocoding(format!("Bad latitude '{}'", self.lat)))?;
        let lng: f64 = self
            .lon
            .parse()
            .map_err(|_| AppError::Geocoding(format!("Bad longitude '{}'", self.lon)))?;
        Coordinates::new(lat, lng).map_err(AppError::Geocoding)
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        let response = self
            .client
            .get(&self.base_url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| AppError::Geocoding(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(
                status = %status,
                query,
                "Nominatim HTTP error {}: {}",
                status, error_text
            );
            return Err(AppError::Geocoding(format!("HTTP {}: {}", status, error_text)));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| AppError::Geocoding(format!("Failed to parse response: {}", e)))?;

        let Some(place) = places.first() else {
            tracing::debug!(query, "Nominatim found nothing for '{}'", query);
            return Ok(None);
        };

        let coordinates = place.coordinates()?;
        tracing::debug!(
            query,
            lat = coordinates.lat,
            lng = coordinates.lng,
            "Geocoded '{}' to {}",
            query,
            place.display_name.as_deref().unwrap_or("unnamed place")
        );
        Ok(Some(coordinates))
    }

    fn backend_name(&self) -> &'static str {
        "nominatim"
    }
}

// ── Cache ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GeocodeCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entries: u64,
}

/// TTL-bounded cache in front of another geocoder. Both found and not-found
/// answers are cached; errors are not.
pub struct CachedGeocoder {
    inner: Arc<dyn Geocoder>,
    cache: Cache<String, Option<Coordinates>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, ttl_seconds: u64, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        CachedGeocoder {
            inner,
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> GeocodeCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        GeocodeCacheStats {
            hits,
            misses,
            hit_rate,
            entries: self.cache.entry_count(),
        }
    }
}

fn cache_key(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

#[async_trait]
impl Geocoder for CachedGeocoder {
    async fn geocode(&self, query: &str) -> Result<Option<Coordinates>> {
        let key = cache_key(query);

        if let Some(cached) = self.cache.get(&key).await {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Geocode cache hit: {}", key);
            return Ok(cached);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Geocode cache miss: {}", key);

        let resolved = self.inner.geocode(query).await?;
        self.cache.insert(key, resolved).await;
        Ok(resolved)
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
