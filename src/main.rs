use anyhow::{Context, Result};
use dotenv::dotenv;
use log::info;
use std::env;
use std::fs;

use repolens::services::github::GitHubClient;
use repolens::services::store::CriteriaStore;
use repolens::{default_data_dir, ui};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let data_dir = default_data_dir()?;
    fs::create_dir_all(&data_dir).with_context(|| format!("creating {}", data_dir.display()))?;

    // The terminal is in raw mode while the app runs, so logs go to a file.
    let log_file = fs::File::create(data_dir.join("repolens.log"))?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let github_token = env::var("GITHUB_TOKEN").ok();
    let client = GitHubClient::new(github_token).context("creating GitHub client")?;
    let store = CriteriaStore::new(&data_dir);

    info!("starting repolens");
    ui::run(client, store).await
}
