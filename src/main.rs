use anyhow::Context;
use clap::Parser;
use conduit_interfaces::cli::Cli;
use conduit_interfaces::emit::{OutputTarget, write_schema};
use conduit_interfaces::registry::{self, RegistrySource};
use conduit_interfaces::{build_schema, tracing as logging};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_format);

    let sources = if cli.registry.is_empty() {
        vec![RegistrySource::Stdin]
    } else {
        cli.registry
            .iter()
            .map(|arg| RegistrySource::from_arg(arg))
            .collect::<Result<Vec<_>, _>>()?
    };

    tracing::info!("Reading {} registry source(s)", sources.len());
    let methods = registry::load_all(&sources, cli.output.as_deref()).await?;

    let schema = build_schema(&methods).context("Registry produced an invalid method")?;

    let target = OutputTarget::from(cli.output);
    write_schema(&schema, &target, cli.pretty)
        .await
        .inspect_err(|e| tracing::error!("Failed to emit schema: {:#}", e))?;

    Ok(())
}
