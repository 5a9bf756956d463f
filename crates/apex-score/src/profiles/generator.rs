//! Deterministic synthesis of applicant profiles (`generator-v1`).
//!
//! Draw order per stage stream:
//! - location: country, city, street number, street, latitude jitter, longitude jitter
//! - identity: first, middle and last name, occupation, phone groups
//! - stability: tier bucket, then the five indicators in field order
//! - financial: loan count, then per loan institution, amount, purpose, year,
//!   month, day, status and (late/default only) days overdue
//! - device: model, OS version, fingerprint, IP octets, ISP
//!
//! Changing any of the above changes generated profiles and requires a new
//! `GENERATOR_VERSION`.

use chrono::NaiveDate;
use uuid::Uuid;

use super::domain::{
    ApplicantProfile, BehavioralIndicators, Coordinates, DeviceMetadata, FinancialHistory,
    LoanRecord, LoanStatus, Location, NetworkMetadata, RiskLevel,
};
use super::identifier::{IdentifierError, IdentifierPolicy};
use super::reference::{
    CountryReference, COUNTRIES, DEVICE_MODELS, FIRST_NAMES, LAST_NAMES, LOAN_PURPOSES,
    MIDDLE_NAMES, OCCUPATIONS, OS_VERSIONS,
};
use super::scoring::{RiskScorer, ScoringError};
use super::seed::{derive_seed, Seed, SeededStream, Stage};

pub const GENERATOR_VERSION: &str = "generator-v1";

const MAX_LOANS: u64 = 10;
const LOAN_YEARS: (u64, u64) = (2019, 2024);
const COORDINATE_JITTER: f64 = 0.1;

/// Tier bucket weights in draw order: Low, Medium, High.
const BUCKET_WEIGHTS: [u64; 3] = [40, 35, 25];
const BUCKETS: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

/// Inclusive indicator ranges per bucket, in field order. Each band keeps the
/// behavioral score inside the bucket's risk band.
const INDICATOR_BANDS: [[(u64, u64); 5]; 3] = [
    [(85, 98), (80, 95), (85, 98), (85, 98), (5, 30)],
    [(60, 78), (50, 72), (55, 75), (50, 72), (38, 60)],
    [(25, 52), (20, 50), (25, 55), (15, 45), (60, 95)],
];

/// Builds profiles from identifiers using the static reference tables.
#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    countries: &'static [CountryReference],
    policy: IdentifierPolicy,
    scorer: RiskScorer,
}

impl ProfileGenerator {
    pub fn new(policy: IdentifierPolicy, scorer: RiskScorer) -> Result<Self, GeneratorConfigError> {
        Self::with_countries(COUNTRIES, policy, scorer)
    }

    pub fn with_countries(
        countries: &'static [CountryReference],
        policy: IdentifierPolicy,
        scorer: RiskScorer,
    ) -> Result<Self, GeneratorConfigError> {
        if countries.is_empty() {
            return Err(GeneratorConfigError::EmptyCountryTable);
        }

        for country in countries {
            let tables = [
                ("cities", country.cities.is_empty()),
                ("streets", country.streets.is_empty()),
                ("banks", country.banks.is_empty()),
                ("isps", country.isps.is_empty()),
                ("ip_prefixes", country.ip_prefixes.is_empty()),
            ];
            if let Some((table, _)) = tables.into_iter().find(|(_, empty)| *empty) {
                return Err(GeneratorConfigError::EmptyReference {
                    country: country.name,
                    table,
                });
            }
            if country.loan_amount.0 > country.loan_amount.1 {
                return Err(GeneratorConfigError::InvalidLoanRange {
                    country: country.name,
                });
            }
        }

        Ok(Self {
            countries,
            policy,
            scorer,
        })
    }

    pub fn policy(&self) -> &IdentifierPolicy {
        &self.policy
    }

    pub fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Validates a raw identifier and returns its normalized cache key.
    pub fn identify(&self, raw: &str) -> Result<String, IdentifierError> {
        self.policy.validate(raw).map(|(identifier, _)| identifier)
    }

    pub fn generate(&self, raw: &str) -> Result<ApplicantProfile, GenerationError> {
        let identifier = self.identify(raw)?;
        let seed = derive_seed(&identifier);
        Ok(self.synthesize(&identifier, seed)?)
    }

    /// Synthesizes the full profile for an already normalized identifier.
    pub fn synthesize(&self, identifier: &str, seed: Seed) -> Result<ApplicantProfile, ScoringError> {
        let (country, location) = draw_location(&mut seed.stream(Stage::Location), self.countries);
        let (name, occupation, phone) = draw_identity(&mut seed.stream(Stage::Identity), country);
        let (_, bsi) = draw_stability(&mut seed.stream(Stage::Stability));
        let tfd = draw_financial(&mut seed.stream(Stage::Financial), country);
        let (device, network) = draw_device(&mut seed.stream(Stage::Device), country);

        let outcome = self.scorer.score(&bsi, Some(&tfd))?;

        Ok(ApplicantProfile {
            id: profile_id(&seed),
            identifier: identifier.to_string(),
            generator_version: GENERATOR_VERSION.to_string(),
            name,
            occupation,
            phone,
            location,
            bsi,
            tfd,
            device,
            network,
            apex_score: outcome.apex_score,
            risk_level: outcome.risk_level,
        })
    }
}

fn profile_id(seed: &Seed) -> Uuid {
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&seed.as_bytes()[16..]);
    uuid::Builder::from_random_bytes(bytes).into_uuid()
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

fn draw_location(
    stream: &mut SeededStream,
    countries: &'static [CountryReference],
) -> (&'static CountryReference, Location) {
    let country = stream.pick(countries);
    let city = stream.pick(country.cities);
    let number = stream.between(1, 250);
    let street = stream.pick(country.streets);
    let lat = city.lat + (stream.unit() - 0.5) * COORDINATE_JITTER;
    let lng = city.lng + (stream.unit() - 0.5) * COORDINATE_JITTER;

    let location = Location {
        country: country.name.to_string(),
        country_code: country.code.to_string(),
        region: country.region.to_string(),
        city: city.name.to_string(),
        address: format!("{number} {street}, {}", city.name),
        coordinates: Coordinates {
            lat: round4(lat),
            lng: round4(lng),
        },
    };

    (country, location)
}

fn draw_identity(stream: &mut SeededStream, country: &CountryReference) -> (String, String, String) {
    let first = stream.pick(FIRST_NAMES);
    let middle = stream.pick(MIDDLE_NAMES);
    let last = stream.pick(LAST_NAMES);
    let occupation = stream.pick(OCCUPATIONS);
    let phone = format!(
        "{} {} {} {}",
        country.dial_code,
        stream.between(700, 899),
        stream.between(100, 999),
        stream.between(1000, 9999)
    );

    (
        format!("{first} {middle} {last}"),
        occupation.to_string(),
        phone,
    )
}

pub(crate) fn draw_stability(stream: &mut SeededStream) -> (RiskLevel, BehavioralIndicators) {
    let bucket = stream.weighted(&BUCKET_WEIGHTS);
    let band = &INDICATOR_BANDS[bucket];
    let mut values = [0u8; 5];
    for (value, (low, high)) in values.iter_mut().zip(band.iter()) {
        *value = stream.between(*low, *high) as u8;
    }

    let bsi = BehavioralIndicators {
        location_consistency: values[0],
        ip_vs_address: values[1],
        device_stability: values[2],
        sim_changes: values[3],
        travel_frequency: values[4],
    };

    (BUCKETS[bucket], bsi)
}

fn draw_financial(stream: &mut SeededStream, country: &CountryReference) -> FinancialHistory {
    let count = stream.below(MAX_LOANS + 1);
    let (min_amount, max_amount) = country.loan_amount;
    let mut loans = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let institution = stream.pick(country.banks);
        let amount = stream.between(min_amount / 1_000, max_amount / 1_000).max(1) * 1_000;
        let purpose = stream.pick(LOAN_PURPOSES);
        let year = stream.between(LOAN_YEARS.0, LOAN_YEARS.1) as i32;
        let month = stream.between(1, 12) as u32;
        let day = stream.between(1, 28) as u32;
        let status = *stream.pick(&LoanStatus::ALL);
        let days_overdue = match status {
            LoanStatus::Late => Some(stream.between(1, 60) as u16),
            LoanStatus::Default => Some(stream.between(90, 365) as u16),
            _ => None,
        };

        // Day is capped at 28, so every drawn date exists.
        let disbursed_on = NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN);

        loans.push(LoanRecord {
            institution: institution.to_string(),
            amount,
            purpose: purpose.to_string(),
            disbursed_on,
            status,
            days_overdue,
        });
    }

    loans.sort_by_key(|loan| loan.disbursed_on);
    FinancialHistory::from_loans(country.currency, loans)
}

fn draw_device(
    stream: &mut SeededStream,
    country: &CountryReference,
) -> (DeviceMetadata, NetworkMetadata) {
    let model = stream.pick(DEVICE_MODELS);
    let os_version = stream.pick(OS_VERSIONS);
    let fingerprint = stream.fill_hex(8);
    let prefix = stream.pick(country.ip_prefixes);
    let third = stream.below(256);
    let fourth = stream.between(1, 254);
    let isp = stream.pick(country.isps);

    (
        DeviceMetadata {
            model: model.to_string(),
            os_version: os_version.to_string(),
            fingerprint,
        },
        NetworkMetadata {
            ip_address: format!("{}.{}.{third}.{fourth}", prefix[0], prefix[1]),
            isp: isp.to_string(),
        },
    )
}

/// Invalid reference tables. Fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneratorConfigError {
    #[error("the country reference table is empty")]
    EmptyCountryTable,
    #[error("reference table '{table}' for {country} is empty")]
    EmptyReference {
        country: &'static str,
        table: &'static str,
    },
    #[error("loan amount range for {country} is inverted")]
    InvalidLoanRange { country: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
