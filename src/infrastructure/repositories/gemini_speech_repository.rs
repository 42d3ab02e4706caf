use super::speech_repository::SpeechRepository;
use crate::domain::compile::SpeakerVoice;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini implementation of the speech repository, over the REST API
pub struct GeminiSpeechRepository {
    client: reqwest::Client,
    base_url: String,
    script_model: String,
    tts_model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[allow(dead_code)]
    mime_type: Option<String>,
    data: String,
}

impl GeminiSpeechRepository {
    pub fn new(
        base_url: impl Into<String>,
        script_model: impl Into<String>,
        tts_model: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            script_model: script_model.into(),
            tts_model: tts_model.into(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        body: &Value,
    ) -> Result<GenerateContentResponse, String> {
        let response = self
            .client
            .post(self.endpoint(model))
            .header(API_KEY_HEADER, api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Gemini request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(
                model = model,
                status = status.as_u16(),
                detail = %detail.chars().take(500).collect::<String>(),
                "Gemini API returned an error"
            );
            return Err(format!("Gemini API error: HTTP {}", status.as_u16()));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| format!("Failed to parse Gemini response: {}", e))
    }
}

pub(crate) fn script_request_body(prompt: &str) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }]
    })
}

pub(crate) fn dialogue_request_body(script: &str, speakers: &[SpeakerVoice; 2]) -> Value {
    let speaker_configs: Vec<Value> = speakers
        .iter()
        .map(|s| {
            json!({
                "speaker": s.speaker,
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": s.voice } }
            })
        })
        .collect();

    json!({
        "contents": [{ "parts": [{ "text": script }] }],
        "generationConfig": {
            "responseModalities": ["AUDIO"],
            "speechConfig": {
                "multiSpeakerVoiceConfig": { "speakerVoiceConfigs": speaker_configs }
            }
        }
    })
}

fn first_part(response: GenerateContentResponse) -> Option<Part> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
}

#[async_trait]
impl SpeechRepository for GeminiSpeechRepository {
    async fn generate_script(&self, api_key: &str, prompt: &str) -> Result<String, String> {
        tracing::info!(
            model = %self.script_model,
            prompt_length = prompt.len(),
            "Calling Gemini for script"
        );

        let response = self
            .generate_content(api_key, &self.script_model, &script_request_body(prompt))
            .await?;

        first_part(response)
            .and_then(|p| p.text)
            .ok_or_else(|| "Gemini returned no script text".to_string())
    }

    async fn synthesize_dialogue(
        &self,
        api_key: &str,
        script: &str,
        speakers: &[SpeakerVoice; 2],
    ) -> Result<Vec<u8>, String> {
        tracing::info!(
            model = %self.tts_model,
            script_length = script.len(),
            voice1 = %speakers[0].voice,
            voice2 = %speakers[1].voice,
            "Calling Gemini for speech"
        );

        let response = self
            .generate_content(
                api_key,
                &self.tts_model,
                &dialogue_request_body(script, speakers),
            )
            .await?;

        let encoded = first_part(response)
            .and_then(|p| p.inline_data)
            .map(|d| d.data)
            .ok_or_else(|| "Gemini returned no audio data".to_string())?;

        let pcm = STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| format!("Invalid base64 audio from Gemini: {}", e))?;

        tracing::debug!(pcm_bytes = pcm.len(), "Gemini audio received");
        Ok(pcm)
    }
}
