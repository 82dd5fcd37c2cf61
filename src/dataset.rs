//! Precomputed factorizations of 2^p - 1 and 2^p + 1
//!
//! The dataset is a JSON array of records:
//!
//! ```json
//! { "form": "2^11-1", "p": 11, "type": "minus", "number": "2047", "factors": "23, 89" }
//! ```
//!
//! An empty `factors` string means the number is prime.

use num_bigint::BigInt;
use num_traits::One;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::numeric::{distinct_factors, primality, Primality};

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("record {form}: '{text}' is not a decimal integer")]
    BadNumber { form: String, text: String },
}

/// Which side of the power of two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Minus,
    Plus,
}

impl Family {
    pub fn sign(self) -> char {
        match self {
            Family::Minus => '-',
            Family::Plus => '+',
        }
    }

    /// Label such as `2^11-1`.
    pub fn form(self, p: u64) -> String {
        format!("2^{}{}1", p, self.sign())
    }

    pub fn value(self, p: u32) -> BigInt {
        let power = BigInt::one() << p;
        match self {
            Family::Minus => power - 1,
            Family::Plus => power + 1,
        }
    }
}

/// One record as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorRecord {
    pub form: String,
    pub p: u64,
    #[serde(rename = "type")]
    pub family: Family,
    pub number: String,
    pub factors: String,
}

/// A record with its numbers parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    pub form: String,
    pub p: u64,
    pub family: Family,
    pub value: BigInt,
    pub factors: Vec<BigInt>,
}

impl TryFrom<FactorRecord> for Factorization {
    type Error = DatasetError;

    fn try_from(record: FactorRecord) -> Result<Self, Self::Error> {
        let parse = |text: &str| {
            BigInt::parse_bytes(text.trim().as_bytes(), 10).ok_or_else(|| DatasetError::BadNumber {
                form: record.form.clone(),
                text: text.to_string(),
            })
        };
        let value = parse(&record.number)?;
        let mut factors = record
            .factors
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse)
            .collect::<Result<Vec<_>, _>>()?;
        factors.sort();
        factors.dedup();

        Ok(Self {
            form: record.form,
            p: record.p,
            family: record.family,
            value,
            factors,
        })
    }
}

/// Lookup table keyed by (family, p).
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    entries: HashMap<(Family, u64), Factorization>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let dataset = Self::from_json(&content)?;
        info!(path = %path.display(), records = dataset.len(), "Loaded factorization dataset");
        Ok(dataset)
    }

    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let records: Vec<FactorRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<FactorRecord>) -> Result<Self, DatasetError> {
        let mut entries = HashMap::with_capacity(records.len());
        for record in records {
            let entry = Factorization::try_from(record)?;
            if entries.insert((entry.family, entry.p), entry).is_some() {
                debug!("Duplicate dataset record replaced");
            }
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, family: Family, p: u64) -> Option<&Factorization> {
        self.entries.get(&(family, p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build records for 2^p ± 1, p in 1..=max_p, with best-effort trial division.
pub fn generate(max_p: u32) -> Vec<FactorRecord> {
    generate_range(1..=max_p)
}

/// Build records for the given exponents. Values below 2 are skipped, and so
/// is every value whose factorization trial division cannot complete: an
/// empty factor list is only written for a proven prime.
pub fn generate_range(exponents: RangeInclusive<u32>) -> Vec<FactorRecord> {
    let mut records = Vec::new();
    for p in exponents {
        for family in [Family::Minus, Family::Plus] {
            let value = family.value(p);
            if value < BigInt::from(2) {
                continue;
            }
            let Some(factors) = proven_factors(&value) else {
                warn!(form = %family.form(p as u64), "Factorization incomplete, record skipped");
                continue;
            };
            records.push(FactorRecord {
                form: family.form(p as u64),
                p: p as u64,
                family,
                number: value.to_string(),
                factors: factors.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", "),
            });
        }
        debug!(p, "Generated dataset records");
    }
    records
}

/// Distinct prime factors of a composite, or an empty list for a prime.
/// `None` when any part is only a probable prime.
fn proven_factors(value: &BigInt) -> Option<Vec<BigInt>> {
    match primality(value) {
        Primality::Prime => Some(Vec::new()),
        Primality::ProbablePrime => None,
        Primality::Composite => {
            let factors = distinct_factors(value);
            factors
                .iter()
                .all(|f| primality(f) == Primality::Prime)
                .then_some(factors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"form": "2^11-1", "p": 11, "type": "minus", "number": "2047", "factors": "23, 89"},
        {"form": "2^13-1", "p": 13, "type": "minus", "number": "8191", "factors": ""},
        {"form": "2^3+1", "p": 3, "type": "plus", "number": "9", "factors": "3"}
    ]"#;

    #[test]
    fn test_lookup() {
        let data = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(data.len(), 3);

        let m11 = data.lookup(Family::Minus, 11).unwrap();
        assert_eq!(m11.value, BigInt::from(2047));
        assert_eq!(m11.factors, vec![BigInt::from(23), BigInt::from(89)]);

        let m13 = data.lookup(Family::Minus, 13).unwrap();
        assert!(m13.factors.is_empty());

        assert!(data.lookup(Family::Plus, 11).is_none());
    }

    #[test]
    fn test_bad_number_names_record() {
        let json = r#"[{"form": "2^5-1", "p": 5, "type": "minus", "number": "3l", "factors": ""}]"#;
        match Dataset::from_json(json) {
            Err(DatasetError::BadNumber { form, text }) => {
                assert_eq!(form, "2^5-1");
                assert_eq!(text, "3l");
            }
            other => panic!("expected BadNumber, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_family_is_json_error() {
        let json = r#"[{"form": "x", "p": 5, "type": "times", "number": "3", "factors": ""}]"#;
        assert!(matches!(Dataset::from_json(json), Err(DatasetError::Json(_))));
    }

    #[test]
    fn test_generate_matches_known_values() {
        let records = generate(12);
        // 2^1 - 1 = 1 is skipped
        assert_eq!(records.len(), 23);
        let m11 = records.iter().find(|r| r.form == "2^11-1").unwrap();
        assert_eq!(m11.number, "2047");
        assert_eq!(m11.factors, "23, 89");
        let p3 = records.iter().find(|r| r.form == "2^3+1").unwrap();
        assert_eq!(p3.factors, "3");

        let data = Dataset::from_records(records).unwrap();
        assert!(data.lookup(Family::Minus, 7).unwrap().factors.is_empty());
    }

    #[test]
    fn test_generate_never_writes_unproven_primes() {
        // 2^67 - 1 = 193707721 * 761838257287, both above the trial bound
        let records = generate_range(67..=67);
        assert!(records.iter().all(|r| r.form != "2^67-1"));

        let data = Dataset::from_records(records).unwrap();
        assert!(data.lookup(Family::Minus, 67).is_none());
    }

    #[test]
    fn test_generate_lists_only_prime_factors() {
        for record in generate_range(20..=30) {
            let entry = Factorization::try_from(record).unwrap();
            if entry.factors.is_empty() {
                assert_eq!(primality(&entry.value), Primality::Prime, "{}", entry.form);
            }
            for f in &entry.factors {
                assert_eq!(primality(f), Primality::Prime, "{}: {}", entry.form, f);
            }
        }
    }

    #[test]
    fn test_bundled_dataset_parses() {
        let json = include_str!("../data/mersenne.json");
        let data = Dataset::from_json(json).unwrap();
        assert!(data.lookup(Family::Minus, 13).is_some());
    }
}
