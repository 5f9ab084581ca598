use crate::fake_account_api::{FakeAccountApi, Quirks};
use giraf_integration::configuration::{Settings, get_configuration};
use giraf_integration::context::AccountContext;
use giraf_integration::runner::{RunReport, ScenarioRunner};
use giraf_integration::scenarios::{ACCOUNT_SCENARIO, account_controller};
use giraf_integration::telemetry::{get_subscriber, init_subscriber};
use std::sync::{LazyLock, Mutex};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use wiremock::matchers::any;
use wiremock::{Mock, MockServer};

// This holds the guard for the entire lifetime of the test process
static LOG_GUARD: Mutex<Option<WorkerGuard>> = Mutex::new(None);

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to install the tracing subscriber");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, test_writer());
        init_subscriber(subscriber).expect("Failed to install the tracing subscriber");
    }
});

fn test_writer() -> NonBlocking {
    let filename = log_file_name(std::env::args(), chrono::Utc::now());
    let _ = std::fs::create_dir_all("tests/logs/nextest");
    let _ = std::fs::create_dir_all("tests/logs/cargo_test");
    let file_appender = tracing_appender::rolling::never("tests/logs", filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Store the guard to prevent it from being dropped
    *LOG_GUARD.lock().unwrap() = Some(guard);

    non_blocking
}

/// nextest runs one test per process and passes its name after `--exact`;
/// a plain `cargo test` run shares one file named after its start time.
fn log_file_name(
    args: impl Iterator<Item = String>,
    started_at: chrono::DateTime<chrono::Utc>,
) -> String {
    match args.skip_while(|arg| arg != "--exact").nth(1) {
        Some(test_name) => format!(
            "nextest/{}.log",
            test_name.replace("::", "-").replace(' ', "_")
        ),
        None => format!(
            "cargo_test/{}-{}.log",
            started_at.format("%Y%m%dT%H%M%S%.3f"),
            std::process::id()
        ),
    }
}

pub struct TestApi {
    pub server: MockServer,
    pub fake: FakeAccountApi,
    pub configuration: Settings,
}

impl TestApi {
    pub fn context(&self) -> AccountContext {
        let client = self
            .configuration
            .api
            .client()
            .expect("Failed to build the account API client.");
        AccountContext::new(client, self.configuration.accounts.clone())
    }

    pub async fn run_account_scenario(&self, fail_fast: bool) -> (RunReport, AccountContext) {
        let mut context = self.context();
        let report = ScenarioRunner::new(fail_fast)
            .run(ACCOUNT_SCENARIO, account_controller().into_plan(), &mut context)
            .await;
        (report, context)
    }
}

pub async fn spawn_account_api(quirks: Quirks) -> TestApi {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    let server = MockServer::start().await;
    let fake = FakeAccountApi::seeded(quirks);
    Mock::given(any())
        .respond_with(fake.clone())
        .mount(&server)
        .await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.api.base_url = format!("{}/", server.uri());
        c.api.timeout_milliseconds = 2000;
        c
    };

    TestApi {
        server,
        fake,
        configuration,
    }
}

/// Names of the steps that did not pass, in execution order.
pub fn failed_steps(report: &RunReport) -> Vec<&'static str> {
    report
        .steps
        .iter()
        .filter(|step| !matches!(step.outcome, giraf_integration::runner::StepOutcome::Passed))
        .map(|step| step.name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::log_file_name;
    use chrono::TimeZone;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn a_test_run_by_name_logs_to_its_own_file() {
        let started_at = chrono::Utc.with_ymd_and_hms(2024, 6, 10, 14, 7, 14).unwrap();

        let name = log_file_name(
            args(&["api-1a2b", "--exact", "account_scenario::fail_fast_stops", "--nocapture"]),
            started_at,
        );

        assert_eq!(name, "nextest/account_scenario-fail_fast_stops.log");
    }

    #[test]
    fn separate_cargo_test_runs_log_to_separate_files() {
        let first = chrono::Utc.with_ymd_and_hms(2024, 6, 10, 14, 7, 14).unwrap();
        let second = first + chrono::Duration::seconds(90);

        let a = log_file_name(args(&["api-1a2b"]), first);
        let b = log_file_name(args(&["api-1a2b"]), second);

        assert!(a.starts_with("cargo_test/20240610T140714.000-"), "{a}");
        assert_ne!(a, b);
    }
}
