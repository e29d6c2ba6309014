//! End-to-end dubbing example.
//!
//! Submits a public video URL for dubbing, waits for the run to finish and
//! prints the URLs of the dubbed media.
//!
//! Run with:
//! ```bash
//! export CAMB_API_KEY="your-api-key"
//! cargo run -p camb-sdk --example dubbing -- https://example.com/video.mp4 76
//! ```

use std::env;
use std::time::Duration;

use camb::{Client, DubbingRequest, PollOptions};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let video_url = args
        .next()
        .ok_or("usage: dubbing <video-url> [target-language-id]")?;
    let target_language: u32 = match args.next() {
        Some(id) => id.parse()?,
        None => 76,
    };

    // Reads CAMB_API_KEY
    let client = Client::from_env()?;

    let task = client
        .dubbing()
        .create(&DubbingRequest {
            video_url,
            target_language,
            ..Default::default()
        })
        .await?;
    println!("Dubbing task submitted: {}", task.id());

    let opts = PollOptions::new().interval(Duration::from_secs(3));
    let run_id = task.wait_run_id(&opts).await?;
    println!("Dubbing finished, run {}", run_id);

    let info = task.fetch(&run_id).await?;
    println!("Dubbed video: {}", info.video_url);
    println!("Dubbed audio: {}", info.audio_url);

    Ok(())
}
