//! Command implementations.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use fieldweave_common::Pretty;
use fieldweave_config::ConfigProvider;
use fieldweave_fields::{ColumnSet, FieldsContext, RecordAccess, RecordStore};
use fieldweave_templating::{top_level_tokens, RandomSource, RenderOptions, TemplateEngine};
use tracing::debug;

use crate::cli::{RenderArgs, TemplateSource};

impl TemplateSource {
    /// The template text, read from disk when given as a file.
    pub async fn read(&self) -> Result<String> {
        match (&self.template, &self.template_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading template {}", path.display())),
            (None, None) => bail!("no template given"),
        }
    }
}

/// Render the template and return the output text.
pub async fn run_render(args: &RenderArgs) -> Result<String> {
    let template = args.source.read().await?;

    let mut provider = ConfigProvider::new();
    if let Some(path) = &args.config {
        provider = provider.with_file(path);
    }
    let config = provider.load()?;
    debug!("Engine configuration: {}", Pretty(&config));

    let store = RecordStore::load(&args.data)
        .await
        .with_context(|| format!("loading dataset {}", args.data.display()))?;
    let metadata = match &args.fields {
        Some(dir) => FieldsContext::open(dir).build().await?,
        None => FieldsContext::default(),
    };

    let record = store.retrieve(&args.entity, &args.id, &ColumnSet::All)?;
    debug!("Rendering against record: {}", Pretty(&record));

    let random = match args.seed {
        Some(seed) => RandomSource::seeded(seed),
        None => RandomSource::from_entropy(),
    };
    let engine = TemplateEngine::builder(Arc::new(store), Arc::new(metadata))
        .with_config(config)
        .with_random(Arc::new(random))
        .build();

    let mut options = RenderOptions::new()
        .with_sequence(args.sequence)
        .with_scope(args.scope.clone())
        .with_suppress_path_errors(args.suppress_path_errors);
    if !args.replace.is_empty() {
        options = options.with_replace_patterns(args.replace.iter().cloned().collect());
    }

    Ok(engine.render_with_options(&record, &options, &template)?)
}

/// List the top-level tokens of a template, one per line.
pub async fn run_tokens(source: &TemplateSource, scope: &str) -> Result<String> {
    let template = source.read().await?;
    let lines: Vec<String> = top_level_tokens(&template, scope)
        .into_iter()
        .map(|span| {
            format!(
                "{}..{}\t{}\t{}",
                span.start,
                span.end,
                span.kind,
                span.text(&template)
            )
        })
        .collect();
    Ok(lines.join("\n"))
}
