//! Eval command handler

use super::utils::{parse_json_arg, parse_value_arg};
use crate::cli::{EvalArgs, EvalTarget};
use crate::error::Result;
use crate::output::{EvaluationReport, OutputWriter};
use pipeform_core::{evaluate_condition, evaluate_expression};
use serde_json::Value;
use tracing::debug;

/// Handle the eval command
pub fn handle_eval(args: EvalArgs, output: &mut OutputWriter) -> Result<()> {
    let report = evaluate(args.target)?;
    debug!(kind = %report.kind, result = %report.result, "Evaluated");
    output.evaluation(&report)
}

fn evaluate(target: EvalTarget) -> Result<EvaluationReport> {
    let (kind, input) = match target {
        EvalTarget::Condition(input) => ("condition", input),
        EvalTarget::Expression(input) => ("expression", input),
    };

    let value = parse_value_arg(input.value.as_deref());
    let record = parse_json_arg("record", input.record.as_deref())?;

    let result = if kind == "condition" {
        Value::Bool(evaluate_condition(&input.source, &value, record.as_ref()))
    } else {
        evaluate_expression(&input.source, &value, record.as_ref())
    };

    Ok(EvaluationReport {
        kind: kind.to_string(),
        source: Some(input.source),
        input: value,
        result,
    })
}
