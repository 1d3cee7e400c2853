//! Check Command
//!
//! Probe the hosting API and the configured model provider.
//!
//! Usage:
//!   reporoast check [--provider P] [--model M]

use std::process::ExitCode;

use tokio::runtime::Runtime;

use crate::ai::preflight::{PreflightCheck, PreflightResult};
use crate::ai::provider::{ProviderConfig, create_provider};
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::hosting::GitHubClient;
use crate::types::Result;

pub fn run(provider: Option<String>, model: Option<String>) -> Result<ExitCode> {
    let mut config = ConfigLoader::load()?;
    ConfigLoader::apply_overrides(&mut config, provider, model, |key| std::env::var(key).ok())?;

    let output = Output::new();
    output.header("reporoast pre-flight");
    for warning in config.startup_warnings() {
        output.warning(&warning);
    }

    let hosting = GitHubClient::new(&config.hosting)?;
    let llm = create_provider(&ProviderConfig::from(&config.llm))?;

    let runtime = Runtime::new()?;
    let result = runtime.block_on(PreflightCheck::new().run(&hosting, llm.as_ref()));

    print_report(&output, &result);
    Ok(if result.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_report(output: &Output, result: &PreflightResult) {
    output.section("Checks");
    for check in &result.checks {
        let line = format!("{} ({}ms)", check.message, check.duration_ms);
        if check.passed {
            output.success(&line);
        } else {
            output.error(&line);
        }
    }

    for warning in &result.warnings {
        output.warning(warning);
    }

    if !result.recommendations.is_empty() {
        output.section("Recommendations");
        for rec in &result.recommendations {
            output.info(rec);
        }
    }

    println!();
    if result.passed {
        output.success("Ready to roast");
    } else {
        output.error(&format!("{} check(s) failed", result.errors.len()));
    }
}
