//! Shared fixtures for integration tests.
#![allow(dead_code)]

use polars::prelude::{Column, DataFrame, Series};
use premium_core::{frame, rng::SeededRng};
use std::path::PathBuf;

/// One raw input record. `None` writes an empty cell.
#[derive(Debug, Clone)]
pub struct RawRow {
    pub customer_id:     i64,
    pub age:             i64,
    pub marital_status:  &'static str,
    pub occupation:      Option<&'static str>,
    pub education_level: Option<&'static str>,
    pub geo_info:        Option<&'static str>,
    pub location:        Option<&'static str>,
    pub coverage_amount: i64,
    pub premium_amount:  Option<f64>,
    pub deductible:      i64,
    pub claim_history:   Option<f64>,
    pub risk_profile:    i64,
    pub prev_claims:     Option<i64>,
    pub credit_score:    Option<i64>,
}

impl RawRow {
    pub fn new(customer_id: i64) -> Self {
        Self {
            customer_id,
            age:             30 + customer_id % 40,
            marital_status:  "Married",
            occupation:      Some("Engineer"),
            education_level: Some("Bachelor's Degree"),
            geo_info:        Some("Mizoram"),
            location:        Some("76160"),
            coverage_amount: 366_603,
            premium_amount:  Some(1000.0),
            deductible:      2749,
            claim_history:   Some(0.0),
            risk_profile:    1,
            prev_claims:     Some(0),
            credit_score:    Some(650),
        }
    }

    /// Cell for a raw header name.
    fn cell(&self, header: &str) -> String {
        fn opt<T: ToString>(v: &Option<T>) -> String {
            v.as_ref().map(T::to_string).unwrap_or_default()
        }
        match header {
            "Customer ID"             => self.customer_id.to_string(),
            "Age"                     => self.age.to_string(),
            "Gender"                  => "Female".into(),
            "Marital Status"          => self.marital_status.into(),
            "Occupation"              => opt(&self.occupation),
            "Income Level"            => "70541".into(),
            "Education Level"         => opt(&self.education_level),
            "Geographic Information"  => opt(&self.geo_info),
            "Location"                => opt(&self.location),
            "Coverage Amount"         => self.coverage_amount.to_string(),
            "Premium Amount"          => opt(&self.premium_amount),
            "Deductible"              => self.deductible.to_string(),
            "Policy Type"             => "Group".into(),
            "Claim History"           => opt(&self.claim_history),
            "Risk Profile"            => self.risk_profile.to_string(),
            "Previous Claims History" => opt(&self.prev_claims),
            "Credit Score"            => opt(&self.credit_score),
            _                         => "ignored".into(),
        }
    }
}

/// Raw headers in source order plus two columns preparation drops.
pub fn raw_headers() -> Vec<&'static str> {
    let mut headers: Vec<&'static str> = premium_core::schema::source_names();
    headers.insert(3, "Purchase History");
    headers.push("Segmentation Group");
    headers
}

pub fn raw_csv(headers: &[&str], rows: &[RawRow]) -> String {
    let mut out = headers.join(",");
    out.push('\n');
    for row in rows {
        let cells: Vec<String> = headers.iter().map(|h| row.cell(h)).collect();
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

pub fn raw_table(rows: &[RawRow]) -> DataFrame {
    frame::read_csv_text(&raw_csv(&raw_headers(), rows)).expect("raw csv parses")
}

/// `n` raw records with every predictor varying. About a third claim;
/// a quarter of those have no prior claims on record.
pub fn varied_raw_rows(n: usize, seed: u64) -> Vec<RawRow> {
    const MARITAL: [&str; 3] = ["Divorced", "Married", "Single"];
    const OCCUPATION: [&str; 3] = ["Artist", "Doctor", "Engineer"];
    const DEDUCTIBLE: [i64; 3] = [500, 1000, 2000];

    let mut rng = SeededRng::new(seed).with_name("raw-fixture");
    (0..n)
        .map(|i| {
            let risk = ((i / 9) % 3) as i64;
            let claim = rng.next_f64() < 0.2 + 0.1 * risk as f64;
            let history = if claim {
                (800.0 * (1.0 + risk as f64) * (0.5 + rng.next_f64())).round()
            } else {
                0.0
            };
            let prev_claims = if claim && rng.next_f64() < 0.25 {
                0
            } else {
                1 + rng.next_u64_below(3) as i64
            };
            RawRow {
                age:             18 + rng.next_u64_below(60) as i64,
                marital_status:  MARITAL[i % 3],
                occupation:      Some(OCCUPATION[(i / 3) % 3]),
                coverage_amount: 10_000 + 1_000 * rng.next_u64_below(90) as i64,
                premium_amount:  Some(500.0 + rng.next_u64_below(1500) as f64),
                deductible:      DEDUCTIBLE[rng.next_u64_below(3) as usize],
                claim_history:   Some(history),
                risk_profile:    risk,
                prev_claims:     Some(prev_claims),
                credit_score:    Some(300 + rng.next_u64_below(550) as i64),
                ..RawRow::new(1000 + i as i64)
            }
        })
        .collect()
}

/// A unique scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("premium-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

/// A clean table of `n` records with balanced categorical levels and
/// claims whose probability and size grow with risk_profile.
/// `with_claim_amount` adds a `claim_amount` column.
pub fn synthetic_clean(n: usize, seed: u64, with_claim_amount: bool) -> DataFrame {
    const MARITAL: [&str; 4] = ["Divorced", "Married", "Single", "Widowed"];
    const OCCUPATION: [&str; 4] = ["Artist", "Doctor", "Engineer", "Unknown"];
    const DEDUCTIBLE: [i64; 3] = [500, 1000, 2000];

    let mut rng = SeededRng::new(seed).with_name("fixture");
    let mut ids = Vec::with_capacity(n);
    let mut age = Vec::with_capacity(n);
    let mut credit = Vec::with_capacity(n);
    let mut coverage = Vec::with_capacity(n);
    let mut deductible = Vec::with_capacity(n);
    let mut marital = Vec::with_capacity(n);
    let mut occupation = Vec::with_capacity(n);
    let mut risk = Vec::with_capacity(n);
    let mut history = Vec::with_capacity(n);
    let mut prev = Vec::with_capacity(n);
    let mut has_claim = Vec::with_capacity(n);
    let mut severity = Vec::with_capacity(n);
    let mut amount = Vec::with_capacity(n);

    for i in 0..n {
        let r = ((i / 16) % 4) as i64;
        let claim = rng.next_f64() < 0.2 + 0.1 * r as f64;
        let prev_claims = rng.next_u64_below(4) as i64;
        let total = if claim {
            (1000.0 * (1.0 + r as f64) * (0.5 + rng.next_f64())).round()
        } else {
            0.0
        };

        ids.push(format!("{}", 1000 + i));
        age.push(18 + rng.next_u64_below(60) as i64);
        credit.push(300 + rng.next_u64_below(550) as i64);
        coverage.push(10_000 + 1_000 * rng.next_u64_below(90) as i64);
        deductible.push(DEDUCTIBLE[rng.next_u64_below(3) as usize]);
        marital.push(MARITAL[i % 4]);
        occupation.push(OCCUPATION[(i / 4) % 4]);
        risk.push(r);
        history.push(total);
        prev.push(prev_claims);
        has_claim.push(i64::from(claim));
        severity.push(total / prev_claims.max(1) as f64);
        amount.push(total * 0.8 + 50.0 * r as f64);
    }

    let mut columns: Vec<Column> = vec![
        Series::new("customer_id".into(), ids).into(),
        Series::new("age".into(), age).into(),
        Series::new("credit_score".into(), credit).into(),
        Series::new("coverage_amount".into(), coverage).into(),
        Series::new("deductible".into(), deductible).into(),
        Series::new("marital_status".into(), marital).into(),
        Series::new("occupation".into(), occupation).into(),
        Series::new("risk_profile".into(), risk).into(),
        Series::new("claim_history".into(), history).into(),
        Series::new("prev_claims".into(), prev).into(),
        Series::new("has_claim".into(), has_claim).into(),
        Series::new("claim_severity".into(), severity).into(),
    ];
    if with_claim_amount {
        columns.push(Series::new("claim_amount".into(), amount).into());
    }
    DataFrame::new(columns).expect("fixture columns have equal length")
}
