pub mod error;
pub mod script;
pub mod service;
pub mod wav;

pub use error::CompileError;
pub use service::{CompilationPipeline, CompilationPipelineApi};

use crate::domain::bootcast::BootCast;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BOOTCAST_NAME: &str = "Untitled BootCast";

/// Body of POST /compile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    pub content: Option<String>,
    pub characters: Option<Vec<String>>,
    pub name1: Option<String>,
    pub name2: Option<String>,
    #[serde(default, rename = "isPromptit", alias = "isPrompit", alias = "isPrompt")]
    pub is_prompt: bool,
    pub bootcast_name: Option<String>,
}

/// A speaker role bound to a prebuilt provider voice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerVoice {
    pub speaker: String,
    pub voice: String,
}

/// A compile request that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct CompileInput {
    pub content: String,
    pub speakers: [SpeakerVoice; 2],
    pub is_prompt: bool,
    pub bootcast_name: String,
}

impl CompileRequest {
    /// Both speakers named and distinct, exactly two voices, non-blank content
    pub fn validate(self) -> Result<CompileInput, CompileError> {
        let content = self
            .content
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| CompileError::Invalid("content is required".to_string()))?
            .to_string();

        let name1 = required_name(self.name1.as_deref(), "name1")?;
        let name2 = required_name(self.name2.as_deref(), "name2")?;
        if name1.eq_ignore_ascii_case(&name2) {
            return Err(CompileError::Invalid(
                "name1 and name2 must be different speakers".to_string(),
            ));
        }

        let characters = self.characters.unwrap_or_default();
        if characters.len() != 2 {
            return Err(CompileError::Invalid(format!(
                "exactly two characters are required, got {}",
                characters.len()
            )));
        }
        let voices: Vec<String> = characters.iter().map(|c| c.trim().to_string()).collect();
        if voices.iter().any(|v| v.is_empty()) {
            return Err(CompileError::Invalid(
                "character voices cannot be empty".to_string(),
            ));
        }

        let bootcast_name = self
            .bootcast_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_BOOTCAST_NAME)
            .to_string();

        Ok(CompileInput {
            content,
            speakers: [
                SpeakerVoice {
                    speaker: name1,
                    voice: voices[0].clone(),
                },
                SpeakerVoice {
                    speaker: name2,
                    voice: voices[1].clone(),
                },
            ],
            is_prompt: self.is_prompt,
            bootcast_name,
        })
    }
}

fn required_name(value: Option<&str>, field: &str) -> Result<String, CompileError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| CompileError::Invalid(format!("{} is required", field)))
}

/// `data` of a successful POST /compile
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    pub id: uuid::Uuid,
    pub uid: String,
    pub content: String,
    pub characters: Vec<String>,
    pub link: String,
    pub name1: String,
    pub name2: String,
    pub bootcast_name: String,
}

impl From<BootCast> for CompileResponse {
    fn from(cast: BootCast) -> Self {
        Self {
            id: cast.id,
            uid: cast.uid,
            content: cast.content,
            characters: cast.characters,
            link: cast.link,
            name1: cast.name1,
            name2: cast.name2,
            bootcast_name: cast.bootcast_name,
        }
    }
}
