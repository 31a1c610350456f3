//! cfnbridge CLI
//!
//! Converts a CloudFormation resource-provider schema into a CDK construct
//! library package by driving the cfn2ts generator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use cfnbridge_cli::{install_interrupt_handler, toolchain, Cli, CliError, Result};
use config::Config;
use pipeline::Pipeline;

#[tokio::main]
async fn main() {
    let cli = match Cli::parse_lenient(std::env::args_os()) {
        Ok(cli) => cli,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(cli.config.as_deref())?;
    logging::init(cli.log_level(&config));

    let cwd = std::env::current_dir().map_err(CliError::CurrentDir)?;
    let options = cli.pipeline_options(&config, &cwd)?;
    let pipeline = Pipeline::new(options, toolchain(&config)).with_interrupt(install_interrupt_handler()?);

    if cli.translate_only {
        let translation = pipeline.translate_only().await?;
        if cli.spec_out.is_none() {
            println!("{}", translation.spec.to_json_pretty()?);
        }
        return Ok(());
    }

    let report = pipeline.run().await?;
    println!("Generated {} in {}", report.type_name, report.package_dir.display());
    Ok(())
}
