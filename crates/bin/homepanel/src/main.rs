use anyhow::Context;
use tracing_subscriber::EnvFilter;

use homepanel::config::Config;
use homepanel::console::Console;

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter)
        .with_context(|| format!("invalid log filter {:?}", config.logging.filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut console = Console::new(&config.engine, config.console.clone())
        .context("building automation engine")?;
    tracing::info!(
        devices = console.engine().list_devices().len(),
        scenes = console.engine().scenes().len(),
        "control panel ready"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    console.run(stdin.lock(), &mut stdout.lock())?;

    tracing::info!("control panel closed");
    Ok(())
}
