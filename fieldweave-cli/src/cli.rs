//! CLI definition for the fieldweave command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

/// Fieldweave - record-driven templates
///
/// Renders templates such as `{name} owned by {ownerid.fullname}` against
/// records loaded from a YAML dataset.
#[derive(Parser, Debug)]
#[command(name = "fieldweave")]
#[command(version)]
#[command(about = "Render record-driven templates")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a template against one record of a dataset
    Render(RenderArgs),
    /// List the top-level tokens a render pass would visit
    Tokens {
        #[command(flatten)]
        source: TemplateSource,
        /// Only list tokens for this scope
        #[arg(long, default_value = "")]
        scope: String,
    },
}

/// Where the template text comes from.
#[derive(Args, Debug, Clone)]
pub struct TemplateSource {
    /// Template text
    #[arg(long, conflicts_with = "template_file", required_unless_present = "template_file")]
    pub template: Option<String>,
    /// Read the template from a file
    #[arg(long)]
    pub template_file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// YAML dataset holding the records
    #[arg(long)]
    pub data: PathBuf,
    /// Directory of entity definition YAML files
    #[arg(long)]
    pub fields: Option<PathBuf>,
    /// Entity of the record to render against
    #[arg(long)]
    pub entity: String,
    /// Id of the record to render against
    #[arg(long)]
    pub id: Uuid,
    #[command(flatten)]
    pub source: TemplateSource,
    /// Running number for [#start|format] placeholders
    #[arg(long, default_value_t = 0)]
    pub sequence: u64,
    /// Only consume tokens prefixed with this scope
    #[arg(long, default_value = "")]
    pub scope: String,
    /// Render failed relationship hops as empty text
    #[arg(long)]
    pub suppress_path_errors: bool,
    /// Replace text in resolved field values (repeatable)
    #[arg(long = "replace", value_name = "FROM=TO", value_parser = parse_replacement)]
    pub replace: Vec<(String, String)>,
    /// Engine configuration file (.yaml, .toml or .json)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Seed the random source for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_replacement(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((from, _)) if from.is_empty() => Err("replacement needs a non-empty FROM".to_string()),
        Some((from, to)) => Ok((from.to_string(), to.to_string())),
        None => Err(format!("expected FROM=TO, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_render_arguments() {
        let cli = Cli::try_parse_from([
            "fieldweave",
            "render",
            "--data",
            "data.yaml",
            "--entity",
            "account",
            "--id",
            "2b0f4a1e-96f4-4a7b-8d5e-0c1f6a2b9e11",
            "--template",
            "{name}",
            "--replace",
            "&=and",
            "--replace",
            "a=b=c",
            "--sequence",
            "3",
            "-d",
        ])
        .unwrap();
        assert!(cli.debug);
        let Commands::Render(args) = cli.command else {
            panic!("expected render");
        };
        assert_eq!(args.sequence, 3);
        assert_eq!(args.source.template.as_deref(), Some("{name}"));
        assert_eq!(
            args.replace,
            vec![
                ("&".to_string(), "and".to_string()),
                ("a".to_string(), "b=c".to_string())
            ]
        );
    }

    #[test]
    fn template_source_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["fieldweave", "tokens"]).is_err());
        assert!(Cli::try_parse_from([
            "fieldweave",
            "tokens",
            "--template",
            "x",
            "--template-file",
            "t.txt"
        ])
        .is_err());
    }

    #[test]
    fn replacement_syntax() {
        assert!(parse_replacement("novalue").is_err());
        assert!(parse_replacement("=x").is_err());
        assert_eq!(
            parse_replacement("a=").unwrap(),
            ("a".to_string(), String::new())
        );
    }
}
