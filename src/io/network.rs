//! HTTP range-read transport for remotely stored objects
//!
//! # Architecture
//!
//! [`HttpObject`] binds one HTTP/HTTPS URL and exposes it through
//! [`RangeRead`]: every read issues an HTTP `Range:` request for exactly the
//! requested interval, and the object size comes from a `HEAD` probe of
//! `Content-Length`. This is the transport collaborator of the partitioning
//! pipeline; retry and backoff live here, never in the core stages.
//!
//! - Automatic retry with exponential backoff
//! - Timeout handling
//! - Byte-bounded LRU cache over fetched intervals (parallel materializers
//!   of the same record re-read the same header interval, so those reads
//!   hit cache)
//!
//! # Status handling
//!
//! Both `206 Partial Content` and `200 OK` count as success. A 200 body is
//! the whole object, so it is sliced down to the requested interval. A
//! `416 Range Not Satisfiable` maps to an empty read, which callers treat
//! as end-of-file. Any other status is a fatal transport error.
//!
//! # Thread Safety
//!
//! `HttpObject` is shareable by reference across threads; the cache is
//! mutex-guarded and the underlying `reqwest` client pools connections.
//!
//! # Example
//!
//! ```no_run
//! use fastaslice::{build_index, plan_partitions, HttpObject, RangeRead};
//!
//! # fn main() -> fastaslice::Result<()> {
//! let object = HttpObject::new("https://example.com/genome.fasta")?;
//! let index = build_index(&object, 8 * 1024 * 1024)?;
//! let plans = plan_partitions(&index, object.size()?, 16)?;
//! # Ok(())
//! # }
//! ```

use crate::error::{FastaSliceError, Result};
use crate::io::store::RangeRead;
use bytes::Bytes;
use lru::LruCache;
use reqwest::blocking::Client;
use std::sync::Mutex;
use std::time::Duration;

/// Default cache size for fetched ranges (50 MB)
pub const DEFAULT_CACHE_SIZE: usize = 50 * 1024 * 1024;

/// Default HTTP timeout (2 minutes)
///
/// Preprocessing windows can be tens of megabytes. A 2-minute timeout allows
/// for connection establishment plus a full window download on slow or
/// congested networks.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Minimum cache size (1 MB)
pub const MIN_CACHE_SIZE: usize = 1024 * 1024;

/// Maximum cache size (10 GB)
///
/// Prevents accidental misconfiguration that could exhaust system memory.
pub const MAX_CACHE_SIZE: usize = 10 * 1024 * 1024 * 1024;

/// Cache key for the LRU cache
///
/// The cache is per-object, so a byte interval identifies an entry.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    start: u64,
    end: u64,
}

/// Byte-bounded cache that enforces size limits based on actual data size
///
/// Wraps LruCache to bound memory by bytes held rather than entry count,
/// evicting least-recently-used intervals once the limit would be exceeded.
struct ByteBoundedCache {
    cache: LruCache<CacheKey, Bytes>,
    current_size: usize,
    max_size: usize,
}

impl ByteBoundedCache {
    fn new(max_size: usize) -> Self {
        Self {
            cache: LruCache::unbounded(),
            current_size: 0,
            max_size,
        }
    }

    fn get(&mut self, key: &CacheKey) -> Option<&Bytes> {
        self.cache.get(key)
    }

    fn put(&mut self, key: CacheKey, value: Bytes) {
        let value_size = value.len();

        // A value larger than the whole cache is not worth caching
        if value_size > self.max_size {
            return;
        }

        if let Some(old) = self.cache.peek(&key) {
            self.current_size = self.current_size.saturating_sub(old.len());
        }

        while self.current_size + value_size > self.max_size && !self.cache.is_empty() {
            if let Some((_, evicted)) = self.cache.pop_lru() {
                self.current_size = self.current_size.saturating_sub(evicted.len());
            }
        }

        self.current_size += value_size;
        self.cache.push(key, value);
    }

    fn clear(&mut self) {
        self.cache.clear();
        self.current_size = 0;
    }

    fn len(&self) -> usize {
        self.cache.len()
    }

    fn current_bytes(&self) -> usize {
        self.current_size
    }

    fn max_bytes(&self) -> usize {
        self.max_size
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of entries currently in cache
    pub entries: usize,
    /// Current cache size in bytes
    pub current_bytes: usize,
    /// Maximum cache size in bytes
    pub max_bytes: usize,
}

/// One remotely stored object, addressed by URL and read via HTTP range
/// requests
///
/// Implements [`RangeRead`], so it can back every stage of the pipeline:
/// window scans, supplementary boundary resolution, and fragment
/// materialization.
pub struct HttpObject {
    client: Client,
    url: String,
    max_retries: u32,
    timeout: Duration,
    cache: Mutex<ByteBoundedCache>,
}

impl HttpObject {
    /// Create an HTTP object with default settings
    ///
    /// - Cache size: 50 MB
    /// - Timeout: 2 minutes
    /// - Max retries: 3
    pub fn new(url: &str) -> Result<Self> {
        Self::with_cache_size(url, DEFAULT_CACHE_SIZE)
    }

    /// Create an HTTP object with a custom cache size
    ///
    /// # Arguments
    ///
    /// * `url` - HTTP/HTTPS URL of the object
    /// * `cache_size_bytes` - Maximum cache size in bytes (1 MB - 10 GB)
    ///
    /// # Errors
    ///
    /// Returns an error if the cache size is outside valid bounds.
    pub fn with_cache_size(url: &str, cache_size_bytes: usize) -> Result<Self> {
        if cache_size_bytes < MIN_CACHE_SIZE {
            return Err(FastaSliceError::Network(format!(
                "Cache size too small: {} bytes (minimum: {} bytes = 1 MB)",
                cache_size_bytes, MIN_CACHE_SIZE
            )));
        }

        if cache_size_bytes > MAX_CACHE_SIZE {
            return Err(FastaSliceError::Network(format!(
                "Cache size too large: {} bytes (maximum: {} bytes = 10 GB)",
                cache_size_bytes, MAX_CACHE_SIZE
            )));
        }

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(format!("fastaslice/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FastaSliceError::Network(e.to_string()))?;

        Ok(Self {
            client,
            url: url.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            cache: Mutex::new(ByteBoundedCache::new(cache_size_bytes)),
        })
    }

    /// URL of the object
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get cache statistics
    pub fn cache_stats(&self) -> CacheStats {
        let cache = self.lock_cache();
        CacheStats {
            entries: cache.len(),
            current_bytes: cache.current_bytes(),
            max_bytes: cache.max_bytes(),
        }
    }

    /// Clear all cached ranges
    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    /// Lock the cache, recovering from a poisoned mutex by continuing with
    /// whatever state the cache holds (it is a best-effort byte cache)
    fn lock_cache(&self) -> std::sync::MutexGuard<'_, ByteBoundedCache> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fetch with automatic retry and exponential backoff
    fn fetch_with_retry(&self, start: u64, end: u64) -> Result<Bytes> {
        let mut attempts = 0;
        let mut backoff = Duration::from_millis(100);

        loop {
            match self.fetch_range_once(start, end) {
                Ok(data) => return Ok(data),
                Err(e) => {
                    attempts += 1;
                    if attempts >= self.max_retries {
                        return Err(e);
                    }

                    std::thread::sleep(backoff);
                    backoff *= 2;
                }
            }
        }
    }

    /// Single fetch attempt (no retry)
    fn fetch_range_once(&self, start: u64, end: u64) -> Result<Bytes> {
        let range_header = format!("bytes={}-{}", start, end - 1);

        let response = self
            .client
            .get(&self.url)
            .header("Range", range_header)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    FastaSliceError::Timeout {
                        seconds: self.timeout.as_secs(),
                        url: self.url.clone(),
                    }
                } else {
                    FastaSliceError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        match status.as_u16() {
            206 => {
                // Partial Content - the range was honored
            }
            200 => {
                // Full-content response - server ignored the Range header.
                // The body is the whole object; slice it down below.
            }
            416 => {
                // Range Not Satisfiable - the interval starts past
                // end-of-file, which callers treat as an ordinary EOF
                return Ok(Bytes::new());
            }
            _ if !status.is_success() => {
                return Err(FastaSliceError::Http {
                    status: status.as_u16(),
                    url: self.url.clone(),
                });
            }
            _ => {
                // Other success codes are unexpected but tolerated
            }
        }

        let bytes = response
            .bytes()
            .map_err(|e| FastaSliceError::Network(e.to_string()))?;

        if status.as_u16() == 200 {
            return Ok(slice_full_body(bytes, start, end));
        }

        // A 206 response may be shorter than requested (end of file) but
        // never longer
        let expected_size = (end - start) as usize;
        if bytes.len() > expected_size {
            return Err(FastaSliceError::Network(format!(
                "Server returned more data than requested: expected {} bytes, got {} bytes",
                expected_size,
                bytes.len()
            )));
        }

        Ok(bytes)
    }
}

/// Cut the requested interval out of a full-content (200) response body
fn slice_full_body(body: Bytes, start: u64, end: u64) -> Bytes {
    let len = body.len() as u64;
    let start = start.min(len);
    let end = end.min(len).max(start);
    body.slice(start as usize..end as usize)
}

impl RangeRead for HttpObject {
    fn read_range(&self, start: u64, end: u64) -> Result<Bytes> {
        if start >= end {
            return Ok(Bytes::new());
        }

        let key = CacheKey { start, end };

        if let Some(data) = self.lock_cache().get(&key) {
            return Ok(data.clone());
        }

        // Fetch outside the cache lock so parallel materializers do not
        // serialize on the network
        let data = self.fetch_with_retry(start, end)?;
        self.lock_cache().put(key, data.clone());

        Ok(data)
    }

    fn size(&self) -> Result<u64> {
        let response = self.client.head(&self.url).send().map_err(|e| {
            if e.is_timeout() {
                FastaSliceError::Timeout {
                    seconds: self.timeout.as_secs(),
                    url: self.url.clone(),
                }
            } else {
                FastaSliceError::Network(e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(FastaSliceError::Http {
                status: response.status().as_u16(),
                url: self.url.clone(),
            });
        }

        response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| {
                FastaSliceError::Network(format!(
                    "Server did not report a Content-Length for {}",
                    self.url
                ))
            })
    }
}
