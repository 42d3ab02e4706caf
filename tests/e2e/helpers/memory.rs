//! In-memory doubles for the repository and provider seams.
//!
//! Each double mirrors the single-statement semantics of its Postgres
//! counterpart by doing the whole check-and-write under one lock.

use async_trait::async_trait;
use bootcaster::domain::bootcast::{BootCast, NewBootCast};
use bootcaster::domain::compile::SpeakerVoice;
use bootcaster::domain::entitlement::{Plan, UserEntitlement, DEFAULT_ALLOWED_CASTS};
use bootcaster::domain::quota::ApiKey;
use bootcaster::domain::voice::{NewVoice, Voice};
use bootcaster::error::{AppError, AppResult};
use bootcaster::infrastructure::db::ReadinessCheck;
use bootcaster::infrastructure::repositories::{
    ApiKeyRepository, BootCastRepository, EntitlementRepository, SpeechRepository,
    VoiceRepository,
};
use chrono::{Duration, Utc};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration as StdDuration;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryApiKeyRepository {
    keys: RwLock<Vec<ApiKey>>,
}

impl InMemoryApiKeyRepository {
    /// Seed a key with a given counter; later seeds sort after earlier ones
    pub fn seed(&self, key: &str, usage_count: i32) -> ApiKey {
        push_key(&mut self.keys.write(), key, usage_count)
    }

    pub fn usage_of(&self, key: &str) -> Option<i32> {
        self.keys
            .read()
            .iter()
            .find(|k| k.key == key)
            .map(|k| k.usage_count)
    }
}

fn push_key(keys: &mut Vec<ApiKey>, key: &str, usage_count: i32) -> ApiKey {
    let created_at = Utc::now() + Duration::milliseconds(keys.len() as i64);
    let api_key = ApiKey {
        id: Uuid::new_v4(),
        key: key.to_string(),
        usage_count,
        created_at,
        updated_at: created_at,
    };
    keys.push(api_key.clone());
    api_key
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn insert(&self, key: &str) -> AppResult<Option<ApiKey>> {
        let mut keys = self.keys.write();
        if keys.iter().any(|k| k.key == key) {
            return Ok(None);
        }
        Ok(Some(push_key(&mut keys, key, 0)))
    }

    async fn find_by_key(&self, key: &str) -> AppResult<Option<ApiKey>> {
        Ok(self.keys.read().iter().find(|k| k.key == key).cloned())
    }

    async fn find_first_available(&self, max_usage: i32) -> AppResult<Option<ApiKey>> {
        let keys = self.keys.read();
        Ok(keys
            .iter()
            .filter(|k| k.usage_count < max_usage)
            .min_by_key(|k| k.created_at)
            .cloned())
    }

    async fn increment_if_below(&self, key: &str, max_usage: i32) -> AppResult<Option<ApiKey>> {
        let mut keys = self.keys.write();
        let updated = keys
            .iter_mut()
            .find(|k| k.key == key && k.usage_count < max_usage)
            .map(|k| {
                k.usage_count += 1;
                k.updated_at = Utc::now();
                k.clone()
            });
        Ok(updated)
    }

    async fn reset_all(&self) -> AppResult<u64> {
        let mut keys = self.keys.write();
        for key in keys.iter_mut() {
            key.usage_count = 0;
        }
        Ok(keys.len() as u64)
    }

    async fn list(&self) -> AppResult<Vec<ApiKey>> {
        let mut keys = self.keys.read().clone();
        keys.sort_by_key(|k| k.created_at);
        Ok(keys)
    }
}

#[derive(Default)]
pub struct InMemoryEntitlementRepository {
    entitlements: RwLock<Vec<UserEntitlement>>,
}

impl InMemoryEntitlementRepository {
    pub fn seed(&self, email: &str, plan: Plan, used_casts: i32, allowed_casts: i32) -> UserEntitlement {
        let now = Utc::now();
        let entitlement = UserEntitlement {
            id: Uuid::new_v4(),
            email: email.to_string(),
            plan,
            allowed_casts,
            used_casts,
            can_compile: used_casts < allowed_casts,
            created_at: now,
            updated_at: now,
        };
        self.entitlements.write().push(entitlement.clone());
        entitlement
    }

    pub fn get(&self, email: &str) -> Option<UserEntitlement> {
        self.entitlements
            .read()
            .iter()
            .find(|e| e.email == email)
            .cloned()
    }

    pub fn set_can_compile(&self, email: &str, can_compile: bool) {
        if let Some(e) = self.entitlements.write().iter_mut().find(|e| e.email == email) {
            e.can_compile = can_compile;
        }
    }
}

#[async_trait]
impl EntitlementRepository for InMemoryEntitlementRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        Ok(self.get(email))
    }

    async fn find_or_insert(&self, email: &str) -> AppResult<UserEntitlement> {
        let mut entitlements = self.entitlements.write();
        if let Some(existing) = entitlements.iter().find(|e| e.email == email) {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let entitlement = UserEntitlement {
            id: Uuid::new_v4(),
            email: email.to_string(),
            plan: Plan::Base,
            allowed_casts: DEFAULT_ALLOWED_CASTS,
            used_casts: 0,
            can_compile: true,
            created_at: now,
            updated_at: now,
        };
        entitlements.push(entitlement.clone());
        Ok(entitlement)
    }

    async fn claim_cast(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        let mut entitlements = self.entitlements.write();
        Ok(entitlements
            .iter_mut()
            .find(|e| e.email == email && e.can_compile && e.used_casts < e.allowed_casts)
            .map(|e| {
                e.used_casts += 1;
                e.can_compile = e.used_casts < e.allowed_casts;
                e.updated_at = Utc::now();
                e.clone()
            }))
    }

    async fn release_cast(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        let mut entitlements = self.entitlements.write();
        Ok(entitlements
            .iter_mut()
            .find(|e| e.email == email && e.used_casts > 0)
            .map(|e| {
                e.used_casts -= 1;
                e.can_compile = e.used_casts < e.allowed_casts;
                e.updated_at = Utc::now();
                e.clone()
            }))
    }

    async fn reopen_gate(&self, email: &str) -> AppResult<Option<UserEntitlement>> {
        let mut entitlements = self.entitlements.write();
        Ok(entitlements.iter_mut().find(|e| e.email == email).map(|e| {
            e.can_compile = true;
            e.updated_at = Utc::now();
            e.clone()
        }))
    }

    async fn update_plan(
        &self,
        email: &str,
        plan: Plan,
        allowed_casts: i32,
    ) -> AppResult<Option<UserEntitlement>> {
        let mut entitlements = self.entitlements.write();
        Ok(entitlements.iter_mut().find(|e| e.email == email).map(|e| {
            e.plan = plan;
            e.allowed_casts = allowed_casts;
            e.can_compile = true;
            e.updated_at = Utc::now();
            e.clone()
        }))
    }
}

#[derive(Default)]
pub struct InMemoryBootCastRepository {
    casts: RwLock<Vec<BootCast>>,
    fail_inserts: AtomicBool,
}

impl InMemoryBootCastRepository {
    /// Make every later insert fail like a lost database connection
    pub fn fail_inserts(&self) {
        self.fail_inserts.store(true, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<BootCast> {
        self.casts.read().clone()
    }

    pub fn count(&self) -> usize {
        self.casts.read().len()
    }
}

#[async_trait]
impl BootCastRepository for InMemoryBootCastRepository {
    async fn insert(&self, new_cast: NewBootCast) -> AppResult<BootCast> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset".to_string()));
        }
        let mut casts = self.casts.write();
        let cast = BootCast {
            id: Uuid::new_v4(),
            uid: new_cast.uid,
            bootcast_name: new_cast.bootcast_name,
            name1: new_cast.name1,
            name2: new_cast.name2,
            characters: new_cast.characters.into(),
            content: new_cast.content,
            link: new_cast.link,
            is_deleted: false,
            is_published: false,
            created_at: Utc::now() + Duration::milliseconds(casts.len() as i64),
        };
        casts.push(cast.clone());
        Ok(cast)
    }

    async fn find_by_owner(&self, uid: &str) -> AppResult<Vec<BootCast>> {
        let mut casts: Vec<BootCast> = self
            .casts
            .read()
            .iter()
            .filter(|c| c.uid == uid && !c.is_deleted)
            .cloned()
            .collect();
        casts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(casts)
    }

    async fn find_published(&self, limit: i64, offset: i64) -> AppResult<Vec<BootCast>> {
        let mut casts: Vec<BootCast> = self
            .casts
            .read()
            .iter()
            .filter(|c| c.is_published && !c.is_deleted)
            .cloned()
            .collect();
        casts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(casts
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_published(&self) -> AppResult<i64> {
        Ok(self
            .casts
            .read()
            .iter()
            .filter(|c| c.is_published && !c.is_deleted)
            .count() as i64)
    }

    async fn set_published(
        &self,
        id: Uuid,
        uid: &str,
        published: bool,
    ) -> AppResult<Option<BootCast>> {
        let mut casts = self.casts.write();
        Ok(casts
            .iter_mut()
            .find(|c| c.id == id && c.uid == uid && !c.is_deleted)
            .map(|c| {
                c.is_published = published;
                c.clone()
            }))
    }

    async fn soft_delete(&self, id: Uuid, uid: &str) -> AppResult<bool> {
        let mut casts = self.casts.write();
        match casts
            .iter_mut()
            .find(|c| c.id == id && c.uid == uid && !c.is_deleted)
        {
            Some(cast) => {
                cast.is_deleted = true;
                cast.is_published = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryVoiceRepository {
    voices: RwLock<Vec<Voice>>,
    list_calls: AtomicUsize,
}

impl InMemoryVoiceRepository {
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceRepository for InMemoryVoiceRepository {
    async fn list(&self) -> AppResult<Vec<Voice>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut voices = self.voices.read().clone();
        voices.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(voices)
    }

    async fn insert(&self, new_voice: NewVoice) -> AppResult<Option<Voice>> {
        let mut voices = self.voices.write();
        if voices.iter().any(|v| v.name == new_voice.name) {
            return Ok(None);
        }
        let voice = Voice {
            id: Uuid::new_v4(),
            name: new_voice.name,
            description: new_voice.description,
            voice_url: new_voice.voice_url,
            image_url: new_voice.image_url,
            created_at: Utc::now(),
        };
        voices.push(voice.clone());
        Ok(Some(voice))
    }
}

/// What the scripted provider saw
#[derive(Debug, Clone)]
pub struct SpeechCall {
    pub api_key: String,
    pub text: String,
    pub speakers: Option<[SpeakerVoice; 2]>,
}

/// Speech provider double returning canned PCM
pub struct ScriptedSpeechRepository {
    pcm: Mutex<Vec<u8>>,
    failure: Mutex<Option<String>>,
    delay: Mutex<Option<StdDuration>>,
    calls: Mutex<Vec<SpeechCall>>,
}

impl ScriptedSpeechRepository {
    pub fn new(pcm: Vec<u8>) -> Self {
        Self {
            pcm: Mutex::new(pcm),
            failure: Mutex::new(None),
            delay: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Hold every script call for `delay` so requests overlap
    pub fn respond_after(&self, delay: StdDuration) {
        *self.delay.lock() = Some(delay);
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    pub fn respond_with_pcm(&self, pcm: Vec<u8>) {
        *self.pcm.lock() = pcm;
    }

    pub fn calls(&self) -> Vec<SpeechCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl SpeechRepository for ScriptedSpeechRepository {
    async fn generate_script(&self, api_key: &str, prompt: &str) -> Result<String, String> {
        self.calls.lock().push(SpeechCall {
            api_key: api_key.to_string(),
            text: prompt.to_string(),
            speakers: None,
        });
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = self.failure.lock().clone() {
            return Err(message);
        }
        Ok(format!("Script for: {}", prompt))
    }

    async fn synthesize_dialogue(
        &self,
        api_key: &str,
        script: &str,
        speakers: &[SpeakerVoice; 2],
    ) -> Result<Vec<u8>, String> {
        self.calls.lock().push(SpeechCall {
            api_key: api_key.to_string(),
            text: script.to_string(),
            speakers: Some(speakers.clone()),
        });
        Ok(self.pcm.lock().clone())
    }
}

pub struct AlwaysReady;

#[async_trait]
impl ReadinessCheck for AlwaysReady {
    async fn is_ready(&self) -> bool {
        true
    }
}
