use vintner_core::api::{AppConfig, CliError, Workflow};
use vintner_plugins::factory::build_workflow;

use super::cli::PredictArgs;

/// Run the prediction workflow once, in-process. The input file is left in place.
pub async fn handle_predict(args: PredictArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let workflow = build_workflow(cfg)?;
    tracing::info!(file = %args.file.display(), "running one-off prediction");

    let result = workflow.run(&args.file).await?;
    let out = if args.pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .map_err(|e| CliError::Command(format!("failed to encode result: {e}")))?;

    println!("{out}");
    Ok(0)
}
