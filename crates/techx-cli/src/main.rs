use std::io::{BufRead, Write};

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "techx-cli")]
#[command(about = "Ensemble sentiment analysis by majority vote")]
struct Cli {
    /// Text to analyze; read one line from stdin when omitted
    #[arg(long)]
    text: Option<String>,

    /// Print the analysis as JSON instead of the console report
    #[arg(long)]
    json: bool,
}

/// Prompt on `output` and read a single line from `input`, without the
/// trailing newline.
fn read_sentence(input: &mut impl BufRead, output: &mut impl Write) -> anyhow::Result<String> {
    write!(output, "Enter a sentence: ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = techx_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    eprintln!("Loading models, please wait...");
    let ensemble = techx_sentiment::Ensemble::load(&config).await?;

    let text = match cli.text {
        Some(text) => text,
        None => read_sentence(&mut std::io::stdin().lock(), &mut std::io::stdout())?,
    };

    let result = ensemble.analyze(&text).await?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        print!("{}", techx_sentiment::render_report(&result));
    }

    Ok(())
}
