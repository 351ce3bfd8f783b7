use crate::Result;
use crate::anomalies::{AnomalyDetector, AnomalyReport};
use crate::failures::{ErrorAnalysis, ErrorAnalyzer};
use harscope_core::analysis::{
    Analyzer, DomainAnalyzer, DomainStats, FileTypeAnalyzer, FileTypeStat, PerformanceAnalyzer,
    PerformanceStats, RequestAnalyzer, RequestDetail, SummaryAnalyzer, SummaryStats,
    TimelineAnalyzer, TimelineEvent,
};
use harscope_core::har::Har;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task;

/// Complete diagnostic report for one capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarReport {
    pub summary: SummaryStats,
    pub requests: Vec<RequestDetail>,
    pub performance: PerformanceStats,
    pub errors: ErrorAnalysis,
    pub anomalies: AnomalyReport,
    pub domains: DomainStats,
    pub file_types: Vec<FileTypeStat>,
    pub timeline: Vec<TimelineEvent>,
}

pub struct ReportAssembler;

impl ReportAssembler {
    /// Run every analysis in turn over the capture
    pub fn analyze(har: &Har) -> Result<HarReport> {
        tracing::debug!("Assembling report for {} entries", har.log.entries.len());

        let report = HarReport {
            summary: SummaryAnalyzer.analyze(har)?,
            requests: RequestAnalyzer.analyze(har)?,
            performance: PerformanceAnalyzer::default().analyze(har)?,
            errors: ErrorAnalyzer::analyze(har)?,
            anomalies: AnomalyDetector::analyze(har)?,
            domains: DomainAnalyzer.analyze(har)?,
            file_types: FileTypeAnalyzer.analyze(har)?,
            timeline: TimelineAnalyzer.analyze(har)?,
        };

        tracing::info!(
            "Report assembled: {} requests, {} errors, {} anomalies",
            report.summary.total_requests,
            report.errors.total_errors,
            report.anomalies.total_anomalies
        );

        Ok(report)
    }

    /// Same report as [`ReportAssembler::analyze`], with the analyses fanned
    /// out over the blocking pool against one shared snapshot.
    pub async fn analyze_shared(har: Arc<Har>) -> Result<HarReport> {
        tracing::debug!(
            "Assembling report for {} entries concurrently",
            har.log.entries.len()
        );

        let (summary, requests, performance, errors, anomalies, domains, file_types, timeline) = tokio::try_join!(
            spawn_analysis(&har, |har| Ok(SummaryAnalyzer.analyze(har)?)),
            spawn_analysis(&har, |har| Ok(RequestAnalyzer.analyze(har)?)),
            spawn_analysis(&har, |har| Ok(PerformanceAnalyzer::default().analyze(har)?)),
            spawn_analysis(&har, ErrorAnalyzer::analyze),
            spawn_analysis(&har, AnomalyDetector::analyze),
            spawn_analysis(&har, |har| Ok(DomainAnalyzer.analyze(har)?)),
            spawn_analysis(&har, |har| Ok(FileTypeAnalyzer.analyze(har)?)),
            spawn_analysis(&har, |har| Ok(TimelineAnalyzer.analyze(har)?)),
        )?;

        tracing::info!(
            "Report assembled: {} requests, {} errors, {} anomalies",
            summary.total_requests,
            errors.total_errors,
            anomalies.total_anomalies
        );

        Ok(HarReport {
            summary,
            requests,
            performance,
            errors,
            anomalies,
            domains,
            file_types,
            timeline,
        })
    }
}

async fn spawn_analysis<T, F>(har: &Arc<Har>, analysis: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Har) -> Result<T> + Send + 'static,
{
    let har = Arc::clone(har);
    task::spawn_blocking(move || analysis(&har)).await?
}
