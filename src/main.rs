use clap::Parser;
use deploy_scripts::{cli::Cli, config::NetworkProfile, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let Cli {
        network,
        priv_key,
        deployments_dir,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let profile = NetworkProfile::from_env(network, priv_key)?;
    command.run(&profile, &deployments_dir).await
}
