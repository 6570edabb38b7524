//! Apply command handler

use super::utils::load_records;
use crate::cli::ApplyArgs;
use crate::config::{read_structured, Config, FileFormat};
use crate::error::{Error, ErrorContext, Result};
use crate::logging::{redaction, timing::Timer};
use crate::output::OutputWriter;
use pipeform_core::{
    InMemoryRepository, LookupContext, PipelineDefinition, RequestContext, TransformPipeline,
};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace, warn};

/// Handle the apply command
#[instrument(skip_all, fields(pipeline = %args.pipeline.display(), input = %args.input.display()))]
pub async fn handle_apply(args: ApplyArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("apply", &args.pipeline.display().to_string());

    let definition: PipelineDefinition = read_structured(&args.pipeline)?;
    let pipeline_name = definition.name.clone();
    let pipeline = TransformPipeline::from_definition(definition);
    pipeline.validate()?;
    info!(
        name = pipeline_name.as_deref().unwrap_or("unnamed"),
        steps = pipeline.step_count(),
        "Loaded pipeline"
    );

    let batch = load_records(&args.input)?;
    output.info(&format!(
        "Applying {} step(s) to {} record(s)",
        pipeline.step_count(),
        batch.len()
    ))?;

    let lookup = if pipeline.requires_lookup() {
        let entities = args.entities.as_deref().or(config.lookup.entities.as_deref());
        let request = RequestContext {
            channel_token: args
                .channel_token
                .clone()
                .or_else(|| config.lookup.channel_token.clone()),
            language_code: config.lookup.language_code.clone(),
        };
        Some(build_lookup_context(entities, request, output)?)
    } else {
        None
    };

    let progress = output.progress_bar(batch.len() as u64, "records");
    let mut results = Vec::with_capacity(batch.len());
    for (index, record) in batch.records().iter().enumerate() {
        trace!(index, record = %redaction::redacted_json(record), "Transforming record");
        let transformed = match &lookup {
            Some(lookup) => pipeline.apply_with_lookup(record, lookup).await,
            None => pipeline.apply(record),
        }
        .map_err(|e| {
            debug!(index, error = %e, "Record failed");
            e
        })?;
        results.push(transformed);
        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!(
        records = results.len(),
        elapsed_ms = timer.elapsed().as_millis() as u64,
        "Pipeline applied"
    );

    let transformed = batch.reshape(results);
    match args.save_to {
        Some(path) => {
            save_records(&path, &transformed)?;
            output.success(&format!("✓ Records saved to {}", path.display()))?;
        }
        None => {
            output.section("Transformed Records")?;
            output.data(&transformed)?;
        }
    }

    Ok(())
}

/// Build the lookup context from an entity fixtures file
fn build_lookup_context(
    entities: Option<&Path>,
    request: RequestContext,
    output: &mut OutputWriter,
) -> Result<LookupContext> {
    let repository = match entities {
        Some(path) => {
            let fixtures: Value = read_structured(path)?;
            let repository = InMemoryRepository::from_fixtures(&fixtures)?;
            debug!(path = %path.display(), entities = repository.len(), "Loaded entity fixtures");
            repository
        }
        None => {
            warn!("Pipeline has LOOKUP steps but no entity fixtures were given");
            output.warning("⚠ No entity fixtures given; entity lookups will resolve to null")?;
            InMemoryRepository::new()
        }
    };

    Ok(LookupContext::new(Arc::new(repository)).with_request(request))
}

/// Write transformed records, choosing YAML or JSON by the file extension
fn save_records(path: &Path, records: &Value) -> Result<()> {
    let content = match FileFormat::from_path(path) {
        FileFormat::Yaml => serde_yaml::to_string(records)?,
        FileFormat::Json => serde_json::to_string_pretty(records)?,
        FileFormat::Toml => {
            return Err(Error::invalid_args(format!(
                "cannot save records as TOML: {}",
                path.display()
            )))
        }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use serde_json::json;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn quiet_output() -> OutputWriter {
        OutputWriter::with_writer(OutputFormat::Json, false, Box::new(std::io::sink()))
    }

    fn read_json(path: &Path) -> Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_apply_pipeline_to_record_array() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = write_file(
            dir.path(),
            "pipeline.yaml",
            r#"
name: products
transforms:
  - id: name
    field: name
    type: TRIM
  - id: slug
    field: name
    target: slug
    type: SLUGIFY
  - id: price
    field: price
    type: PARSE_NUMBER
"#,
        );
        let input = write_file(
            dir.path(),
            "records.json",
            r#"[{"name": "  Blue Shoe ", "price": "1,299.50"}, {"name": "Red Hat", "price": "12"}]"#,
        );
        let out = dir.path().join("out").join("records.json");

        let args = ApplyArgs {
            pipeline,
            input,
            entities: None,
            channel_token: None,
            save_to: Some(out.clone()),
        };
        handle_apply(args, &Config::default(), &mut quiet_output())
            .await
            .unwrap();

        assert_eq!(
            read_json(&out),
            json!([
                {"name": "Blue Shoe", "slug": "blue-shoe", "price": 1299.5},
                {"name": "Red Hat", "slug": "red-hat", "price": 12}
            ])
        );
    }

    #[tokio::test]
    async fn test_apply_resolves_lookups_from_fixtures() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = write_file(
            dir.path(),
            "pipeline.json",
            r#"{"transforms": [{"id": "collection", "field": "collection", "type": "LOOKUP",
                "config": {"entityType": "Collection"}}]}"#,
        );
        let input = write_file(dir.path(), "record.json", r#"{"collection": "summer"}"#);
        let entities = write_file(
            dir.path(),
            "entities.json",
            r#"{"Collection": [{"id": 10, "code": "summer"}]}"#,
        );
        let out = dir.path().join("record.out.json");

        let args = ApplyArgs {
            pipeline,
            input,
            entities: Some(entities),
            channel_token: Some("eu-store".to_string()),
            save_to: Some(out.clone()),
        };
        handle_apply(args, &Config::default(), &mut quiet_output())
            .await
            .unwrap();

        // A single input object stays a single object
        assert_eq!(read_json(&out), json!({"collection": 10}));
    }

    #[tokio::test]
    async fn test_apply_reports_unknown_transform() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = write_file(
            dir.path(),
            "pipeline.json",
            r#"{"transforms": [{"id": "x", "field": "sku", "type": "CUSTOM_X"}]}"#,
        );
        let input = write_file(dir.path(), "record.json", r#"{"sku": "A"}"#);

        let args = ApplyArgs {
            pipeline,
            input,
            entities: None,
            channel_token: None,
            save_to: None,
        };
        let err = handle_apply(args, &Config::default(), &mut quiet_output())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Core(pipeform_core::Error::UnknownTransform { .. })
        ));
    }

    #[test]
    fn test_save_records_as_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.yaml");
        save_records(&path, &json!([{"sku": "A"}])).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "- sku: A\n");

        let toml = dir.path().join("out.toml");
        assert!(matches!(
            save_records(&toml, &json!([])),
            Err(Error::InvalidArgs(_))
        ));
    }
}
