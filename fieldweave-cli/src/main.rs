//! Fieldweave CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fieldweave::commands::{run_render, run_tokens};
use fieldweave::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("fieldweave=debug,fieldweave_templating=debug,fieldweave_fields=debug,fieldweave_config=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = dispatch_command(cli).await;
    std::process::exit(exit_code);
}

async fn dispatch_command(cli: Cli) -> i32 {
    let result = match cli.command {
        Commands::Render(args) => run_render(&args).await,
        Commands::Tokens { source, scope } => run_tokens(&source, &scope).await,
    };
    match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            1
        }
    }
}
