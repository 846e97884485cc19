//! Canonical column names for the raw, clean and model tables.

/// Raw column → canonical name, in the order the clean table keeps them.
pub const SOURCE_COLUMNS: [(&str, &str); 17] = [
    ("Customer ID",             "customer_id"),
    ("Age",                     "age"),
    ("Gender",                  "gender"),
    ("Marital Status",          "marital_status"),
    ("Occupation",              "occupation"),
    ("Income Level",            "income_level"),
    ("Education Level",         "education_level"),
    ("Geographic Information",  "geo_info"),
    ("Location",                "location"),
    ("Coverage Amount",         "coverage_amount"),
    ("Premium Amount",          "premium_amount"),
    ("Deductible",              "deductible"),
    ("Policy Type",             "policy_type"),
    ("Claim History",           "claim_history"),
    ("Risk Profile",            "risk_profile"),
    ("Previous Claims History", "prev_claims"),
    ("Credit Score",            "credit_score"),
];

pub const CUSTOMER_ID:     &str = "customer_id";
pub const OCCUPATION:      &str = "occupation";
pub const EDUCATION_LEVEL: &str = "education_level";
pub const GEO_INFO:        &str = "geo_info";
pub const LOCATION:        &str = "location";
pub const PREMIUM_AMOUNT:  &str = "premium_amount";
pub const CLAIM_HISTORY:   &str = "claim_history";
pub const PREV_CLAIMS:     &str = "prev_claims";
pub const CREDIT_SCORE:    &str = "credit_score";

pub const HAS_CLAIM:       &str = "has_claim";
pub const CLAIM_FREQUENCY: &str = "claim_frequency";
pub const CLAIM_SEVERITY:  &str = "claim_severity";
pub const LOSS_RATIO:      &str = "loss_ratio";

/// Fields added by preparation, appended after the renamed columns.
pub const DERIVED_COLUMNS: [&str; 4] = [HAS_CLAIM, CLAIM_FREQUENCY, CLAIM_SEVERITY, LOSS_RATIO];

/// Text columns whose missing cells become `UNKNOWN`.
pub const UNKNOWN_FILLED: [&str; 4] = [OCCUPATION, EDUCATION_LEVEL, GEO_INFO, LOCATION];
pub const UNKNOWN: &str = "Unknown";

/// Numeric predictors, in design-matrix order.
pub const NUMERIC_FEATURES: [&str; 4] = ["age", CREDIT_SCORE, "coverage_amount", "deductible"];

/// Predictors that are one-hot encoded with one reference level dropped.
pub const CATEGORICAL_FEATURES: [&str; 3] = ["marital_status", OCCUPATION, "risk_profile"];

/// Name of the intercept column in every GLM design matrix.
pub const INTERCEPT: &str = "const";

pub fn source_names() -> Vec<&'static str> {
    SOURCE_COLUMNS.iter().map(|(raw, _)| *raw).collect()
}

/// The 21 columns of the clean table, in output order.
pub fn clean_columns() -> Vec<&'static str> {
    SOURCE_COLUMNS
        .iter()
        .map(|(_, canonical)| *canonical)
        .chain(DERIVED_COLUMNS)
        .collect()
}
