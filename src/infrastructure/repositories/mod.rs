pub mod api_key_repository;
pub mod bootcast_repository;
pub mod entitlement_repository;
pub mod gemini_speech_repository;
pub mod speech_repository;
pub mod voice_repository;

pub use api_key_repository::{ApiKeyRepository, PostgresApiKeyRepository};
pub use bootcast_repository::{BootCastRepository, PostgresBootCastRepository};
pub use entitlement_repository::{EntitlementRepository, PostgresEntitlementRepository};
pub use gemini_speech_repository::GeminiSpeechRepository;
pub use speech_repository::SpeechRepository;
pub use voice_repository::{PostgresVoiceRepository, VoiceRepository};
