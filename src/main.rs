mod config;
mod error;
mod handlers;
mod models;
mod prompts;
mod services;

use anyhow::{bail, Result};
use dotenv::dotenv;
use std::env;
use std::sync::Arc;

use config::Config;
use handlers::FoodAnalyzer;
use models::AnalysisOutcome;
use services::GeminiClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    let image_path = match env::args().nth(1) {
        Some(path) => path,
        None => bail!("usage: macrosnap <image-path>"),
    };

    let config = Config::from_env()?;
    log::info!("🚀 Starting macrosnap with model: {}", config.model);

    let gemini = Arc::new(GeminiClient::new(&config)?);
    let analyzer = FoodAnalyzer::new(gemini, config.lenient_classify);

    match analyzer.analyze(&image_path).await? {
        AnalysisOutcome::Macros(report) => println!("{}", report),
        AnalysisOutcome::NotFood => println!("Food not recognized"),
    }

    Ok(())
}
