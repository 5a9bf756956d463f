use crate::infra::InMemoryProfileStore;
use apex_score::config::AppConfig;
use apex_score::error::AppError;
use apex_score::profiles::{
    build_service, ApplicantService, BehavioralIndicators, ScoringVariant, StoredProfile,
    DEFAULT_RISK_THRESHOLD,
};
use clap::Args;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ProfileArgs {
    /// Email address or full name of the applicant
    pub(crate) identifier: String,
    /// Print the full profile as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) location_consistency: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) ip_vs_address: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) device_stability: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) sim_changes: u8,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) travel_frequency: u8,
    /// Scoring formula (behavioral or blended). Defaults to the configured one.
    #[arg(long)]
    pub(crate) variant: Option<ScoringVariant>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Size of the synthetic portfolio listed after the seeded applicants
    #[arg(long, default_value_t = 10)]
    pub(crate) portfolio: usize,
    /// Score threshold for the high-risk section
    #[arg(long, default_value_t = DEFAULT_RISK_THRESHOLD)]
    pub(crate) threshold: u8,
}

/// Service wired from the environment, backed by a fresh in-memory store.
pub(crate) fn cli_service() -> Result<(AppConfig, ApplicantService<InMemoryProfileStore>), AppError>
{
    let config = AppConfig::load()?;
    let store = Arc::new(InMemoryProfileStore::with_capacity(config.store.capacity));
    let service = build_service(store, &config.profiles)?;
    Ok((config, service))
}

pub(crate) fn run_profile(args: ProfileArgs) -> Result<(), AppError> {
    let (_, service) = cli_service()?;
    let stored = service.get_or_create(&args.identifier)?;

    if args.json {
        let json = serde_json::to_string_pretty(&stored.profile).map_err(std::io::Error::from)?;
        println!("{json}");
        return Ok(());
    }

    render_profile(&service, &stored);
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let (_, service) = cli_service()?;
    let bsi = BehavioralIndicators {
        location_consistency: args.location_consistency,
        ip_vs_address: args.ip_vs_address,
        device_stability: args.device_stability,
        sim_changes: args.sim_changes,
        travel_frequency: args.travel_frequency,
    };

    let outcome = service.score(&bsi, None, args.variant)?;
    println!(
        "ApexScore {} ({} risk, {} formula)",
        outcome.apex_score,
        outcome.risk_level.label(),
        outcome.variant
    );
    for row in service.generator().scorer().breakdown(&bsi).components {
        println!(
            "  - {} {}: {} x {:.2} = {:.1}",
            row.code, row.label, row.score, row.weight, row.contribution
        );
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        portfolio,
        threshold,
    } = args;
    let (config, service) = cli_service()?;

    println!("ApexScore demo");
    println!(
        "Scoring formula: {} | allowed email domains: {}",
        service.generator().scorer().variant(),
        service.generator().policy().allowed_domains().join(", ")
    );

    println!("\nSeeded applicants");
    for identifier in &config.profiles.seed_identifiers {
        match service.get_or_create(identifier) {
            Ok(stored) => render_profile(&service, &stored),
            Err(err) => println!("  Skipped {identifier}: {err}"),
        }
    }

    let listed = service.list(portfolio, None)?;
    println!("\nPortfolio ({} applicants)", listed.len());
    for summary in &listed {
        println!(
            "  #{:<3} {:<28} {:<24} score {:>3} ({}) | debt {}",
            summary.number,
            summary.name,
            summary.location,
            summary.apex_score,
            summary.risk_level.label(),
            summary.outstanding_debt
        );
    }

    let stats = service.stats()?;
    println!("\nPortfolio statistics");
    println!(
        "- {} applicants | average score {:.1} | {} high risk",
        stats.total_applicants, stats.average_score, stats.high_risk_percentage
    );
    for (level, count) in &stats.risk_distribution {
        println!("  - {level}: {count}");
    }
    println!("- {} applicants with an active default", stats.active_defaults);

    let flagged = service.high_risk(threshold)?;
    println!("\nBelow threshold {threshold}: {} applicants", flagged.len());
    for entry in &flagged {
        println!(
            "  - #{} {} score {} | urgency {:?}{}",
            entry.summary.number,
            entry.summary.name,
            entry.summary.apex_score,
            entry.urgency,
            if entry.has_default { " | defaulted" } else { "" }
        );
    }

    Ok(())
}

fn render_profile(
    service: &ApplicantService<InMemoryProfileStore>,
    stored: &StoredProfile,
) {
    let profile = &stored.profile;
    println!(
        "- #{} {} <{}> | {} | {}",
        stored.number,
        profile.name,
        profile.identifier,
        profile.occupation,
        profile.location.display()
    );
    println!(
        "  ApexScore {} ({} risk) | {} loans, outstanding {}{}",
        profile.apex_score,
        profile.risk_level.label(),
        profile.tfd.loan_history.len(),
        profile.tfd.formatted_debt(),
        if profile.has_default() {
            " | has defaulted"
        } else {
            ""
        }
    );
    println!(
        "  Indicators: location {} | ip/address {} | device {} | sim {} | travel {}",
        profile.bsi.location_consistency,
        profile.bsi.ip_vs_address,
        profile.bsi.device_stability,
        profile.bsi.sim_changes,
        profile.bsi.travel_frequency
    );

    let action = service.recommendation(stored);
    println!(
        "  Recommended action: {:?} ({:?}) {}",
        action.action_type, action.priority, action.recommendation
    );
    if let Some(rationale) = &action.rationale {
        println!("  Rationale: {rationale}");
    }
}
