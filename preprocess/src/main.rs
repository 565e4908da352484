use anyhow::{Context, Result};
use preprocess::config::Config;
use std::{env, path::PathBuf, sync::Arc};
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
/// Prepare hand gesture datasets for training
struct Args {
    #[structopt(long, default_value = "preprocess.json5")]
    /// configuration file
    pub config_file: PathBuf,
}

#[tokio::main]
pub async fn main() -> Result<()> {
    // show info messages unless RUST_LOG says otherwise
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    // parse arguments
    let Args { config_file } = Args::from_args();
    let config = Arc::new(
        Config::open(&config_file)
            .with_context(|| format!("failed to load config file '{}'", config_file.display()))?,
    );

    // start preprocessing program
    preprocess::start(config).await?;

    Ok(())
}
