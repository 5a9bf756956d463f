use crate::demo::cli_service;
use crate::infra::InMemoryProfileStore;
use apex_score::error::AppError;
use apex_score::profiles::{
    filler_identifier, ActionType, ApplicantService, LoanStatus, RiskLevel, StoredProfile,
};
use clap::Args;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Number of filler applicants to export when no identifiers are given
    #[arg(long, default_value_t = 25)]
    pub(crate) count: usize,
    /// Export these identifiers instead of the filler portfolio (repeatable)
    #[arg(long = "identifier")]
    pub(crate) identifiers: Vec<String>,
    /// Destination file; stdout when omitted
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    number: u64,
    id: Uuid,
    identifier: &'a str,
    name: &'a str,
    occupation: &'a str,
    city: &'a str,
    country: &'a str,
    apex_score: u8,
    risk_level: RiskLevel,
    location_consistency: u8,
    ip_vs_address: u8,
    device_stability: u8,
    sim_changes: u8,
    travel_frequency: u8,
    loans: usize,
    defaults: usize,
    currency: &'a str,
    outstanding_debt: u64,
    action_type: ActionType,
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let ExportArgs {
        count,
        identifiers,
        output,
    } = args;
    let (_, service) = cli_service()?;
    let records = collect_records(&service, count, &identifiers)?;

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)?;
            write_csv(&service, &records, file)?;
            eprintln!("Wrote {} applicants to {}", records.len(), path.display());
        }
        None => write_csv(&service, &records, std::io::stdout().lock())?,
    }
    Ok(())
}

fn collect_records(
    service: &ApplicantService<InMemoryProfileStore>,
    count: usize,
    identifiers: &[String],
) -> Result<Vec<StoredProfile>, AppError> {
    if identifiers.is_empty() {
        // Generated directly so the listing caps do not truncate the export.
        return (1..=count as u64)
            .map(|index| {
                service
                    .get_or_create(&filler_identifier(index))
                    .map_err(AppError::from)
            })
            .collect();
    }

    identifiers
        .iter()
        .map(|identifier| service.get_or_create(identifier).map_err(AppError::from))
        .collect()
}

fn write_csv<W: Write>(
    service: &ApplicantService<InMemoryProfileStore>,
    records: &[StoredProfile],
    sink: W,
) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(sink);
    for stored in records {
        let profile = &stored.profile;
        let action = service.recommendation(stored);
        let row = ExportRow {
            number: stored.number,
            id: profile.id,
            identifier: &profile.identifier,
            name: &profile.name,
            occupation: &profile.occupation,
            city: &profile.location.city,
            country: &profile.location.country,
            apex_score: profile.apex_score,
            risk_level: profile.risk_level,
            location_consistency: profile.bsi.location_consistency,
            ip_vs_address: profile.bsi.ip_vs_address,
            device_stability: profile.bsi.device_stability,
            sim_changes: profile.bsi.sim_changes,
            travel_frequency: profile.bsi.travel_frequency,
            loans: profile.tfd.loan_history.len(),
            defaults: profile.tfd.count(LoanStatus::Default),
            currency: &profile.tfd.currency,
            outstanding_debt: profile.tfd.outstanding_debt,
            action_type: action.action_type,
        };
        writer.serialize(row).map_err(std::io::Error::from)?;
    }
    writer.flush()?;
    Ok(())
}
