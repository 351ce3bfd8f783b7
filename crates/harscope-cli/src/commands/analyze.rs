use crate::OutputFormat;
use anyhow::Result;
use harscope_core::har::{Har, HarReader};
use harscope_detectors::{HarReport, ReportAssembler, Severity};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

/// 100 MiB
pub const DEFAULT_MAX_BYTES: u64 = 100 * 1024 * 1024;

const SUCCESS_MESSAGE: &str = "HAR analysis complete";
const INVALID_FORMAT_MESSAGE: &str = "Invalid HAR format: make sure the file is valid JSON";

/// Exit code for input the caller has to fix
const CLIENT_ERROR: u8 = 2;
/// Exit code for failures inside the analysis itself
const ANALYSIS_ERROR: u8 = 1;

/// Response wrapper written for `--format json`
#[derive(Debug, Serialize)]
pub struct Envelope<'a> {
    pub success: bool,
    pub data: Option<&'a HarReport>,
    pub message: &'a str,
}

/// Validate and parse a capture file
pub fn load_har(file: &Path, max_bytes: u64) -> harscope_core::Result<Har> {
    let is_har = file
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("har"));
    if !is_har {
        return Err(harscope_core::Error::UnsupportedFile(
            file.display().to_string(),
        ));
    }

    let size = fs::metadata(file)?.len();
    if size > max_bytes {
        return Err(harscope_core::Error::TooLarge {
            size,
            limit: max_bytes,
        });
    }

    let bytes = fs::read(file)?;
    HarReader::from_slice(&bytes)
}

/// Analyze a HAR file and return the full report
pub async fn analyze_har(file: &Path, max_bytes: u64) -> Result<HarReport> {
    tracing::debug!("Reading HAR file: {}", file.display());

    let har = load_har(file, max_bytes)?;
    let report = ReportAssembler::analyze_shared(Arc::new(har)).await?;

    Ok(report)
}

/// Map a failed analysis onto the message shown to the caller and the
/// process exit code.
pub fn describe_failure(err: &anyhow::Error) -> (String, u8) {
    let core = err.downcast_ref::<harscope_core::Error>().or_else(|| {
        match err.downcast_ref::<harscope_detectors::Error>() {
            Some(harscope_detectors::Error::Core(inner)) => Some(inner),
            _ => None,
        }
    });

    match core {
        Some(harscope_core::Error::Parse(_)) => (INVALID_FORMAT_MESSAGE.to_string(), CLIENT_ERROR),
        Some(
            inner @ (harscope_core::Error::UnsupportedFile(_)
            | harscope_core::Error::TooLarge { .. }),
        ) => (inner.to_string(), CLIENT_ERROR),
        _ => (format!("Analysis failed: {}", err), ANALYSIS_ERROR),
    }
}

pub async fn execute(file: &Path, max_bytes: u64, format: OutputFormat) -> Result<ExitCode> {
    tracing::info!("Analyzing HAR file: {}", file.display());

    let spinner = format.shows_progress().then(|| {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(format!("Analyzing {}", file.display()));
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    });

    let outcome = analyze_har(file, max_bytes).await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match outcome {
        Ok(report) => {
            match format {
                OutputFormat::Json => output_json(&report)?,
                OutputFormat::Table => output_table(&report),
                OutputFormat::Pretty => output_pretty(&report),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::debug!("Analysis error: {:?}", err);
            let (message, code) = describe_failure(&err);
            output_failure(&message, format)?;
            Ok(ExitCode::from(code))
        }
    }
}

fn output_json(report: &HarReport) -> Result<()> {
    let envelope = Envelope {
        success: true,
        data: Some(report),
        message: SUCCESS_MESSAGE,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

fn output_failure(message: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let envelope = Envelope {
                success: false,
                data: None,
                message,
            };
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        _ => eprintln!("{} {}", console::style("Error:").bold().red(), message),
    }
    Ok(())
}

fn output_table(report: &HarReport) {
    let summary = &report.summary;
    let performance = &report.performance;

    println!("Metric,Value");
    println!("Total Requests,{}", summary.total_requests);
    println!("Successful Requests,{}", summary.successful_requests);
    println!("Failed Requests,{}", summary.failed_requests);
    println!("Success Rate,{}", summary.success_rate);
    println!("Average Response Time,{}", summary.avg_response_time);
    println!("Total Size (bytes),{}", summary.total_size_bytes);
    println!("Min Response Time (ms),{:.2}", performance.min_response_time_ms);
    println!("Max Response Time (ms),{:.2}", performance.max_response_time_ms);
    println!("Domains,{}", report.domains.total_domains);
    println!("Anomalies,{}", report.anomalies.total_anomalies);
}

fn severity_label(severity: Severity) -> console::StyledObject<&'static str> {
    use console::style;

    match severity {
        Severity::High => style(severity.as_str()).red().bold(),
        Severity::Medium => style(severity.as_str()).yellow(),
        Severity::Low => style(severity.as_str()).dim(),
    }
}

fn output_pretty(report: &HarReport) {
    use console::style;

    println!("\n{}", style("HAR Analysis Report").bold().cyan());
    println!("{}", style("===================").cyan());

    let summary = &report.summary;
    println!("\n{}", style("Summary:").bold());
    println!("  Total Requests:     {}", summary.total_requests);
    println!(
        "  Succeeded / Failed: {} / {}",
        summary.successful_requests, summary.failed_requests
    );
    println!("  Success Rate:       {}", summary.success_rate);
    println!("  Avg Response Time:  {}", summary.avg_response_time);
    println!("  Total Size:         {}", summary.total_size);
    println!("  Analyzed At:        {}", summary.analysis_time);

    let performance = &report.performance;
    println!("\n{}", style("Performance:").bold());
    println!(
        "  Min / Avg / Max:    {:.2} / {:.2} / {:.2} ms",
        performance.min_response_time_ms,
        performance.avg_response_time_ms,
        performance.max_response_time_ms
    );
    println!("  Avg Transfer Size:  {}", performance.avg_transfer_size);
    if !performance.slowest_requests.is_empty() {
        println!("\n{}", style("Slowest Requests:").bold());
        for req in &performance.slowest_requests {
            println!(
                "  #{} [{}] {} {} - {}",
                req.index, req.time, req.method, req.status, req.url
            );
        }
    }

    let errors = &report.errors;
    if errors.total_errors > 0 {
        println!(
            "\n{} {} ({})",
            style("Errors:").bold(),
            errors.total_errors,
            errors.error_rate
        );
        for (status_line, details) in &errors.error_breakdown {
            println!("  {} x{}", style(status_line).red(), details.len());
            if let Some(first) = details.first() {
                let diagnosis = &first.error_analysis;
                println!("    {}: {}", diagnosis.category, diagnosis.description);
                if let Some(solution) = diagnosis.solutions.first() {
                    println!("    Try: {}", solution);
                }
            }
        }
    }

    let anomalies = &report.anomalies;
    let (high, medium, low) =
        anomalies
            .severities()
            .fold((0, 0, 0), |(high, medium, low), severity| match severity {
                Severity::High => (high + 1, medium, low),
                Severity::Medium => (high, medium + 1, low),
                Severity::Low => (high, medium, low + 1),
            });
    println!(
        "\n{} {} (high {}, medium {}, low {})",
        style("Anomalies:").bold(),
        anomalies.total_anomalies,
        high,
        medium,
        low
    );
    for finding in &anomalies.redirect_loops {
        println!(
            "  [{}] {} ({})",
            severity_label(finding.severity),
            finding.description,
            finding.url
        );
    }
    for finding in &anomalies.duplicate_requests {
        println!(
            "  [{}] {} ({} {})",
            severity_label(finding.severity),
            finding.description,
            finding.method,
            finding.url
        );
    }
    for finding in anomalies
        .suspicious_patterns
        .iter()
        .chain(&anomalies.performance_issues)
        .chain(&anomalies.security_concerns)
    {
        println!(
            "  [{}] {}: {}",
            severity_label(finding.severity),
            finding.kind.as_str(),
            finding.description
        );
    }

    if !report.domains.domain_stats.is_empty() {
        println!("\n{}", style("Domains:").bold());
        for stat in &report.domains.domain_stats {
            println!(
                "  {:<40} {:>5} requests  {:>10}  errors {}",
                stat.domain, stat.request_count, stat.total_size, stat.error_rate
            );
        }
    }

    if !report.file_types.is_empty() {
        println!("\n{}", style("Content Types:").bold());
        for stat in &report.file_types {
            println!(
                "  {:<40} {:>5}  {:>10}  {}",
                stat.content_type, stat.count, stat.total_size, stat.percentage
            );
        }
    }

    println!(); // trailing newline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_failure_is_client_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = anyhow::Error::from(harscope_core::Error::Parse(parse));

        let (message, code) = describe_failure(&err);

        assert_eq!(message, INVALID_FORMAT_MESSAGE);
        assert_eq!(code, CLIENT_ERROR);
    }

    #[test]
    fn test_wrapped_core_error_is_unwrapped() {
        let core = harscope_core::Error::TooLarge { size: 10, limit: 5 };
        let err = anyhow::Error::from(harscope_detectors::Error::Core(core));

        let (message, code) = describe_failure(&err);

        assert!(message.contains("exceeding the 5 byte limit"));
        assert_eq!(code, CLIENT_ERROR);
    }

    #[test]
    fn test_other_failures_are_analysis_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = anyhow::Error::from(harscope_core::Error::Io(io));

        let (message, code) = describe_failure(&err);

        assert_eq!(message, "Analysis failed: Failed to read HAR file: gone");
        assert_eq!(code, ANALYSIS_ERROR);
    }
}
