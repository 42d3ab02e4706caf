use chrono::{DateTime, Utc};

/// Build the text sent to the script model.
///
/// Plain content is wrapped in a two-speaker instruction; prompt mode hands
/// the user's text to the model untouched.
pub fn build_script_prompt(content: &str, name1: &str, name2: &str, is_prompt: bool) -> String {
    if is_prompt {
        content.to_string()
    } else {
        format!(
            "TTS the following conversation between {} and {}: {}",
            name1, name2, content
        )
    }
}

/// `BootCaster_YYYY-MM-DD_HH-MM-SS.wav`, UTC. Attempts after the first get
/// a `_N` suffix so compilations finishing in the same second never collide.
pub fn audio_file_name(now: DateTime<Utc>, attempt: u32) -> String {
    let stamp = now.format("%Y-%m-%d_%H-%M-%S");
    if attempt == 0 {
        format!("BootCaster_{}.wav", stamp)
    } else {
        format!("BootCaster_{}_{}.wav", stamp, attempt)
    }
}
