//! Text-to-speech example.
//!
//! Lists a few voices, then synthesizes a sentence with the first one and
//! streams the audio into `audio_tts/`.
//!
//! Run with:
//! ```bash
//! export CAMB_API_KEY="your-api-key"
//! cargo run -p camb-sdk --example tts -- "Hello, World!"
//! ```

use std::env;
use std::time::Duration;

use camb::{Client, Gender, PollOptions, TtsRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = env::args()
        .nth(1)
        .unwrap_or_else(|| "Hello, World! My name is Camb.".to_string());

    let client = Client::from_env()?;

    let voices = client.voices().list().await?;
    for voice in voices.iter().take(5) {
        println!("{:>8}  {}", voice.id, voice.voice_name);
    }
    let voice_id = voices.first().map(|v| v.id).ok_or("no voices available")?;

    let request = TtsRequest {
        text,
        voice_id,
        language: 1,
        gender: Gender::Male,
        age: Some(30),
    };
    let opts = PollOptions::new().interval(Duration::from_secs(3));

    let audio = client.tts(&request, &opts).await?;
    println!(
        "Wrote {} bytes to {} (run {})",
        audio.bytes,
        audio.path.display(),
        audio.run_id
    );

    Ok(())
}
