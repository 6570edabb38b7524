//! Transform command handler

use super::utils::{parse_json_arg, parse_value_arg};
use crate::cli::TransformArgs;
use crate::error::{Error, Result};
use crate::output::{EvaluationReport, OutputWriter};
use pipeform_core::{apply_transform, is_built_in_transform, TransformConfig, TransformType};
use tracing::debug;

/// Handle the transform command
pub fn handle_transform(args: TransformArgs, output: &mut OutputWriter) -> Result<()> {
    let report = run_transform(args)?;
    debug!(transform = %report.kind, result = %report.result, "Transform applied");
    output.evaluation(&report)
}

fn run_transform(args: TransformArgs) -> Result<EvaluationReport> {
    let transform_type = args.transform_type.to_uppercase();
    if !is_built_in_transform(&transform_type) {
        return Err(Error::UnknownTransform {
            name: args.transform_type,
        });
    }
    if transform_type == TransformType::Lookup.as_str() {
        return Err(Error::invalid_args(
            "LOOKUP needs an entity store; use it inside a pipeline with 'pipeform apply --entities'",
        ));
    }

    let value = parse_value_arg(args.value.as_deref());
    let config: TransformConfig = match parse_json_arg("options", args.options.as_deref())? {
        Some(options) => serde_json::from_value(options)
            .map_err(|e| Error::invalid_args(format!("--options is not a transform configuration: {}", e)))?,
        None => TransformConfig::default(),
    };
    let record = parse_json_arg("record", args.record.as_deref())?;

    let result = apply_transform(&transform_type, &value, &config, record.as_ref()).ok_or_else(|| {
        Error::UnknownTransform {
            name: transform_type.clone(),
        }
    })?;

    Ok(EvaluationReport {
        kind: transform_type,
        source: None,
        input: value,
        result,
    })
}
