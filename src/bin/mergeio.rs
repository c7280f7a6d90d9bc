//! Thin CLI shell around the merge engine.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mergeio::MergeBuilder;
use mergeio::cli::MergeCli;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = MergeCli::parse();
    match run(cli) {
        Ok(output_path) => println!("{output_path}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: MergeCli) -> Result<String, mergeio::MergeError> {
    let request = cli.into_request()?;
    let engine = MergeBuilder::from_request(request).build()?;
    let outcome = engine.run()?;
    Ok(outcome.output_path.display().to_string())
}
