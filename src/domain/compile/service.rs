use super::error::CompileError;
use super::script::{audio_file_name, build_script_prompt};
use super::wav::{encode_wav, pcm_duration_secs};
use super::{CompileInput, CompileRequest};
use crate::domain::bootcast::{BootCast, BootCastService, BootCastServiceApi, NewBootCast};
use crate::domain::entitlement::{
    Eligibility, EntitlementError, EntitlementTracker, EntitlementTrackerApi, QUOTA_USED_MESSAGE,
};
use crate::domain::quota::{ApiKey, QuotaError, QuotaLedger, QuotaLedgerApi};
use crate::infrastructure::repositories::SpeechRepository;
use crate::infrastructure::storage::{AudioStorage, StorageError};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

const WAV_CONTENT_TYPE: &str = "audio/wav";
const MAX_NAME_ATTEMPTS: u32 = 100;

/// Turns text and two voices into a stored BootCast
pub struct CompilationPipeline {
    quota_ledger: Arc<QuotaLedger>,
    entitlement_tracker: Arc<EntitlementTracker>,
    bootcast_service: Arc<BootCastService>,
    speech_repo: Arc<dyn SpeechRepository>,
    storage: Arc<dyn AudioStorage>,
}

impl CompilationPipeline {
    pub fn new(
        quota_ledger: Arc<QuotaLedger>,
        entitlement_tracker: Arc<EntitlementTracker>,
        bootcast_service: Arc<BootCastService>,
        speech_repo: Arc<dyn SpeechRepository>,
        storage: Arc<dyn AudioStorage>,
    ) -> Self {
        Self {
            quota_ledger,
            entitlement_tracker,
            bootcast_service,
            speech_repo,
            storage,
        }
    }
}

#[async_trait]
pub trait CompilationPipelineApi: Send + Sync {
    /// Compile a BootCast for an already authenticated caller.
    ///
    /// Entitlement, validation and key checks all happen before any provider
    /// call, so a rejected request has no side effects. The user's cast is
    /// claimed before the provider runs and given back if anything fails.
    async fn compile(
        &self,
        uid: &str,
        email: &str,
        request: CompileRequest,
    ) -> Result<BootCast, CompileError>;
}

#[async_trait]
impl CompilationPipelineApi for CompilationPipeline {
    async fn compile(
        &self,
        uid: &str,
        email: &str,
        request: CompileRequest,
    ) -> Result<BootCast, CompileError> {
        let start_time = std::time::Instant::now();

        // 1. Entitlement gate
        self.guard_entitlement(email).await?;

        // 2. Input validation
        let input = request.validate()?;

        tracing::info!(
            uid = %uid,
            content_length = input.content.len(),
            is_prompt = input.is_prompt,
            speaker1 = %input.speakers[0].speaker,
            speaker2 = %input.speakers[1].speaker,
            "Compilation request accepted"
        );

        // 3. Provider key
        let api_key = self
            .quota_ledger
            .acquire_key()
            .await
            .map_err(|e| CompileError::Dependency(e.to_string()))?
            .ok_or(CompileError::NoKeyAvailable)?;

        // 4. Reserve the cast; concurrent requests past the quota stop here
        self.claim_cast(email).await?;

        // 5. Script, speech, WAV container and storage
        let (pcm, file_name, link) = match self.produce_audio(&api_key, &input).await {
            Ok(produced) => produced,
            Err(e) => {
                self.release_cast(email).await;
                return Err(e);
            }
        };

        // 6. Key usage and record
        let cast = match self.finalize(uid, &api_key, input, link).await {
            Ok(cast) => cast,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    file_name = %file_name,
                    key = %api_key.masked(),
                    email = %email,
                    "Compilation failed after audio was stored; key usage stays recorded"
                );
                if let Err(delete_err) = self.storage.delete(&file_name).await {
                    tracing::warn!(
                        error = %delete_err,
                        file_name = %file_name,
                        "Failed to remove orphaned audio file"
                    );
                }
                self.release_cast(email).await;
                return Err(e);
            }
        };

        tracing::info!(
            bootcast_id = %cast.id,
            uid = %uid,
            file_name = %file_name,
            audio_secs = format!("{:.1}", pcm_duration_secs(&pcm)),
            latency_ms = start_time.elapsed().as_millis(),
            "Compilation completed"
        );

        Ok(cast)
    }
}

impl CompilationPipeline {
    async fn guard_entitlement(&self, email: &str) -> Result<(), CompileError> {
        let eligibility = self
            .entitlement_tracker
            .check_eligibility(email)
            .await
            .map_err(map_entitlement_error)?;

        match eligibility {
            Eligibility::Allowed => Ok(()),
            Eligibility::Denied(reason) => {
                tracing::info!(email = %email, reason = %reason, "Compilation denied");
                Err(CompileError::Denied(reason))
            }
        }
    }

    async fn claim_cast(&self, email: &str) -> Result<(), CompileError> {
        self.entitlement_tracker
            .claim_compilation(email)
            .await
            .map_err(map_entitlement_error)?
            .map(|_| ())
            .ok_or_else(|| CompileError::Denied(QUOTA_USED_MESSAGE.to_string()))
    }

    async fn release_cast(&self, email: &str) {
        if let Err(e) = self.entitlement_tracker.release_compilation(email).await {
            tracing::error!(error = %e, email = %email, "Failed to release claimed cast");
        }
    }

    async fn produce_audio(
        &self,
        api_key: &ApiKey,
        input: &CompileInput,
    ) -> Result<(Vec<u8>, String, String), CompileError> {
        let pcm = self.synthesize(api_key, input).await?;

        let wav = encode_wav(&pcm)
            .map_err(|e| CompileError::Dependency(format!("WAV encoding failed: {}", e)))?;

        let (file_name, link) = self.store(wav).await?;
        Ok((pcm, file_name, link))
    }

    /// Store under the timestamped name, suffixing on collision
    async fn store(&self, wav: Vec<u8>) -> Result<(String, String), CompileError> {
        let now = Utc::now();
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let file_name = audio_file_name(now, attempt);
            match self
                .storage
                .put(wav.clone(), &file_name, WAV_CONTENT_TYPE)
                .await
            {
                Ok(link) => return Ok((file_name, link)),
                Err(StorageError::AlreadyExists(_)) => {
                    tracing::debug!(file_name = %file_name, "Audio name taken, retrying");
                }
                Err(e) => return Err(CompileError::Storage(e.to_string())),
            }
        }
        Err(CompileError::Storage(format!(
            "no free file name after {} attempts",
            MAX_NAME_ATTEMPTS
        )))
    }

    async fn synthesize(
        &self,
        api_key: &ApiKey,
        input: &CompileInput,
    ) -> Result<Vec<u8>, CompileError> {
        let prompt = build_script_prompt(
            &input.content,
            &input.speakers[0].speaker,
            &input.speakers[1].speaker,
            input.is_prompt,
        );

        let script = self
            .speech_repo
            .generate_script(&api_key.key, &prompt)
            .await
            .map_err(CompileError::Provider)?;
        if script.trim().is_empty() {
            return Err(CompileError::Provider("provider returned an empty script".to_string()));
        }

        let pcm = self
            .speech_repo
            .synthesize_dialogue(&api_key.key, &script, &input.speakers)
            .await
            .map_err(CompileError::Provider)?;
        if pcm.len() < 2 {
            return Err(CompileError::Provider("provider returned no audio".to_string()));
        }

        Ok(pcm)
    }

    async fn finalize(
        &self,
        uid: &str,
        api_key: &ApiKey,
        input: CompileInput,
        link: String,
    ) -> Result<BootCast, CompileError> {
        self.quota_ledger
            .record_usage(&api_key.key)
            .await
            .map_err(|e| match e {
                QuotaError::Exhausted => CompileError::Dependency(
                    "API key was exhausted by a concurrent request".to_string(),
                ),
                other => CompileError::Dependency(other.to_string()),
            })?;

        let [first, second] = input.speakers;
        let new_cast = NewBootCast {
            uid: uid.to_string(),
            bootcast_name: input.bootcast_name,
            name1: first.speaker,
            name2: second.speaker,
            characters: [first.voice, second.voice],
            content: input.content,
            link,
        };

        self.bootcast_service
            .create(new_cast)
            .await
            .map_err(|e| CompileError::Dependency(e.to_string()))
    }
}

fn map_entitlement_error(err: EntitlementError) -> CompileError {
    match err {
        EntitlementError::NotFound => CompileError::Denied("user not found".to_string()),
        EntitlementError::Invalid(msg) => CompileError::Denied(msg),
        EntitlementError::Dependency(msg) => CompileError::Dependency(msg),
    }
}
