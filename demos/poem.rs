//! Generates one poem for a local image file, without the web page.
//!
//! ```bash
//! GOOGLE_API_KEY=... cargo run --example poem -- path/to/photo.jpg [temperature]
//! ```

use poemcraft::{
    logger, resolve_credential, AppConfig, GeminiClient, ImageUpload, PoemApp, Temperature,
    DEFAULT_PROMPT,
};
use std::{env, fs, sync::Arc};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    logger::init()?;

    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: poem <image> [temperature]")?;
    let temperature = args
        .next()
        .and_then(|raw| Temperature::parse(&raw))
        .unwrap_or_default();

    let config = AppConfig::from_env();
    let credential = resolve_credential("", config.fallback_api_key.as_deref())?;
    let upload = ImageUpload::new(fs::read(&path)?).with_filename(path.clone());

    let app = PoemApp::new(Arc::new(GeminiClient::new(&config.gemini)), &config);
    let (image, result) = app
        .generate(&credential, DEFAULT_PROMPT, Some(upload), temperature)
        .await?;

    log::info!("{} ({}x{}) at temperature {}", path, image.width, image.height, temperature);
    println!("{}", result.text);
    Ok(())
}
