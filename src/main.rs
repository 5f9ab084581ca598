use anyhow::Context;
use giraf_integration::configuration::{ReportFormat, get_configuration};
use giraf_integration::context::AccountContext;
use giraf_integration::runner::ScenarioRunner;
use giraf_integration::scenarios::{ACCOUNT_SCENARIO, account_controller};
use giraf_integration::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = get_subscriber("giraf-integration".into(), "info".into(), std::io::stderr);
    init_subscriber(subscriber)?;

    let configuration = get_configuration().context("Failed to read configuration.")?;
    let client = configuration
        .api
        .client()
        .context("Failed to build the account API client.")?;
    tracing::info!(base_url = %configuration.api.base_url, "Running account checks");

    let mut context = AccountContext::new(client, configuration.accounts);
    let report = ScenarioRunner::from_settings(&configuration.runner)
        .run(ACCOUNT_SCENARIO, account_controller().into_plan(), &mut context)
        .await;

    match configuration.runner.report_format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => println!("{report}"),
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} steps did not pass",
            report.failed() + report.skipped(),
            report.steps.len()
        );
    }
    Ok(())
}
