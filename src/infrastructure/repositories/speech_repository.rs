use crate::domain::compile::SpeakerVoice;
use async_trait::async_trait;

/// Generative provider used by the compilation pipeline.
///
/// Every call carries the pooled API key chosen for the request, so the
/// implementation holds no credentials of its own.
#[async_trait]
pub trait SpeechRepository: Send + Sync {
    /// Produce the conversation script for a prompt
    async fn generate_script(&self, api_key: &str, prompt: &str) -> Result<String, String>;

    /// Voice a script with two speakers.
    ///
    /// Returns raw PCM: signed 16-bit little-endian, mono, 24 kHz.
    async fn synthesize_dialogue(
        &self,
        api_key: &str,
        script: &str,
        speakers: &[SpeakerVoice; 2],
    ) -> Result<Vec<u8>, String>;
}
