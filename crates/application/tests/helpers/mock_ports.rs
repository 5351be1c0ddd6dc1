#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use cinefetch_application::ports::{
    CacheTier, Clock, FetchedImage, ImageOrigin, MovieProvider, PlaceholderRenderer,
};
use cinefetch_domain::config::HeaderProfile;
use cinefetch_domain::{CacheEntry, DomainError, FetchError, MovieRecord, SearchQuery};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

// ============================================================================
// ManualClock
// ============================================================================

pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }

    pub fn advance(&self, by: Duration) {
        self.now_ms.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(1_700_000_000_000)
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

// ============================================================================
// MockCacheTier
// ============================================================================

pub struct MockCacheTier {
    name: &'static str,
    entries: RwLock<HashMap<String, CacheEntry>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MockCacheTier {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }

    pub async fn count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn insert_raw(&self, entry: CacheEntry) {
        self.entries.write().await.insert(entry.key.clone(), entry);
    }
}

#[async_trait]
impl CacheTier for MockCacheTier {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock read failure".to_string()));
        }
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, entry: CacheEntry) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("mock write failure".to_string()));
        }
        self.entries.write().await.insert(entry.key.clone(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn remove_expired(&self, now_ms: u64) -> Result<u64, DomainError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now_ms));
        Ok((before - entries.len()) as u64)
    }

    async fn len(&self) -> Result<u64, DomainError> {
        Ok(self.entries.read().await.len() as u64)
    }
}

// ============================================================================
// MockMovieProvider
// ============================================================================

#[derive(Clone)]
pub enum ProviderBehavior {
    Items(Vec<MovieRecord>),
    Fail(FetchError),
    Hang(Duration),
}

pub struct MockMovieProvider {
    name: String,
    behavior: RwLock<ProviderBehavior>,
    search_calls: AtomicUsize,
    details_calls: AtomicUsize,
}

impl MockMovieProvider {
    pub fn new(name: &str, behavior: ProviderBehavior) -> Self {
        Self {
            name: name.to_string(),
            behavior: RwLock::new(behavior),
            search_calls: AtomicUsize::new(0),
            details_calls: AtomicUsize::new(0),
        }
    }

    pub fn returning(name: &str, items: Vec<MovieRecord>) -> Self {
        Self::new(name, ProviderBehavior::Items(items))
    }

    pub fn failing(name: &str, error: FetchError) -> Self {
        Self::new(name, ProviderBehavior::Fail(error))
    }

    pub fn hanging(name: &str, delay: Duration) -> Self {
        Self::new(name, ProviderBehavior::Hang(delay))
    }

    pub async fn set_behavior(&self, behavior: ProviderBehavior) {
        *self.behavior.write().await = behavior;
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> usize {
        self.details_calls.load(Ordering::SeqCst)
    }

    async fn respond(&self) -> Result<Vec<MovieRecord>, FetchError> {
        let behavior = self.behavior.read().await.clone();
        match behavior {
            ProviderBehavior::Items(items) => Ok(items),
            ProviderBehavior::Fail(e) => Err(e),
            ProviderBehavior::Hang(delay) => {
                tokio::time::sleep(delay).await;
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl MovieProvider for MockMovieProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<MovieRecord>, FetchError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.respond().await
    }

    async fn details(&self, id: &str) -> Result<Option<MovieRecord>, FetchError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        let items = self.respond().await?;
        Ok(items.into_iter().find(|m| m.id == id))
    }
}

// ============================================================================
// MockImageOrigin
// ============================================================================

pub struct MockImageOrigin {
    responses: RwLock<VecDeque<Result<FetchedImage, FetchError>>>,
    fallback: RwLock<Result<FetchedImage, FetchError>>,
    calls: AtomicUsize,
    user_agents: RwLock<Vec<String>>,
}

impl MockImageOrigin {
    pub fn serving(content_type: &str, body: &'static [u8]) -> Self {
        Self::with_fallback(Ok(FetchedImage {
            content_type: content_type.to_string(),
            bytes: Bytes::from_static(body),
        }))
    }

    pub fn failing(error: FetchError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Result<FetchedImage, FetchError>) -> Self {
        Self {
            responses: RwLock::new(VecDeque::new()),
            fallback: RwLock::new(fallback),
            calls: AtomicUsize::new(0),
            user_agents: RwLock::new(Vec::new()),
        }
    }

    /// Responses consumed in order before the fallback applies.
    pub async fn push(&self, response: Result<FetchedImage, FetchError>) {
        self.responses.write().await.push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn user_agents(&self) -> Vec<String> {
        self.user_agents.read().await.clone()
    }
}

#[async_trait]
impl ImageOrigin for MockImageOrigin {
    async fn fetch(&self, _url: &str, profile: &HeaderProfile) -> Result<FetchedImage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.user_agents
            .write()
            .await
            .push(profile.user_agent.clone());

        if let Some(next) = self.responses.write().await.pop_front() {
            return next;
        }
        self.fallback.read().await.clone()
    }
}

// ============================================================================
// StubRenderer
// ============================================================================

pub struct StubRenderer;

impl PlaceholderRenderer for StubRenderer {
    fn render(&self, title: &str) -> String {
        format!("<svg><text>{}</text></svg>", title)
    }
}

pub fn movie(id: &str, title: &str) -> MovieRecord {
    MovieRecord::new(id, title).with_poster(&format!("https://img.example.com/{}.jpg", id))
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
