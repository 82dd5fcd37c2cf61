//! Scene building - parameter sets, formula families and resolved entries

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::dataset::{Dataset, Family};
use crate::numeric::{distinct_factors, primality, Formula, Primality};

/// Widest `a..b` range accepted in a parameter set.
pub const MAX_RANGE_SPAN: u64 = 10_000;

/// Formula family selected in the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormulaKind {
    Minus,
    Plus,
    Custom,
}

impl FormulaKind {
    pub const ALL: [FormulaKind; 3] = [FormulaKind::Minus, FormulaKind::Plus, FormulaKind::Custom];

    pub fn label(self) -> &'static str {
        match self {
            FormulaKind::Minus => "2^p - 1",
            FormulaKind::Plus => "2^p + 1",
            FormulaKind::Custom => "Custom f(n)",
        }
    }

    /// Dataset family backing the fixed formulas.
    pub fn family(self) -> Option<Family> {
        match self {
            FormulaKind::Minus => Some(Family::Minus),
            FormulaKind::Plus => Some(Family::Plus),
            FormulaKind::Custom => None,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "minus" | "-" => Some(FormulaKind::Minus),
            "plus" | "+" => Some(FormulaKind::Plus),
            "custom" => Some(FormulaKind::Custom),
            _ => None,
        }
    }
}

/// Parse a parameter set such as `5,7,11..13` into sorted, distinct values.
///
/// Tokens that do not parse are dropped. Reversed ranges are accepted,
/// ranges wider than `MAX_RANGE_SPAN` are dropped.
pub fn parse_params(input: &str) -> Vec<u64> {
    let mut values = BTreeSet::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if let Some((a, b)) = token.split_once("..") {
            match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
                (Ok(a), Ok(b)) => {
                    let (lo, hi) = (a.min(b), a.max(b));
                    if hi - lo > MAX_RANGE_SPAN {
                        warn!(token, "Parameter range too wide, dropped");
                        continue;
                    }
                    values.extend(lo..=hi);
                }
                _ => debug!(token, "Dropped invalid parameter range"),
            }
        } else {
            match token.parse::<u64>() {
                Ok(v) => {
                    values.insert(v);
                }
                Err(_) => debug!(token, "Dropped invalid parameter"),
            }
        }
    }
    values.into_iter().collect()
}

/// One resolved number of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionEntry {
    pub label: String,
    pub p: u64,
    pub value: BigInt,
    pub primality: Primality,
    pub factors: Vec<BigInt>,
}

impl SelectionEntry {
    pub fn is_prime(&self) -> bool {
        self.primality.is_prime()
    }
}

/// Everything that determines a scene. A rebuild is only needed when this
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneInputs {
    pub formula: FormulaKind,
    pub custom_formula: String,
    pub params: String,
}

/// Resolved entries plus the set of values drawn as markers.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub entries: Vec<SelectionEntry>,
    marker_values: HashSet<BigInt>,
}

impl Scene {
    pub fn new(entries: Vec<SelectionEntry>) -> Self {
        let mut marker_values = HashSet::new();
        marker_values.insert(BigInt::from(1));
        for entry in &entries {
            marker_values.insert(BigInt::from(entry.p));
            marker_values.insert(entry.value.clone());
            marker_values.extend(entry.factors.iter().cloned());
        }
        Self {
            entries,
            marker_values,
        }
    }

    /// Whether a background cell is covered by a marker.
    pub fn is_marker(&self, n: &BigInt) -> bool {
        self.marker_values.contains(n)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve inputs into a scene. Returns `None` when the parameter set is
/// empty, in which case the caller keeps its previous scene.
pub fn build_scene(inputs: &SceneInputs, dataset: &Dataset) -> Option<Scene> {
    let params = parse_params(&inputs.params);
    if params.is_empty() {
        debug!(params = %inputs.params, "Empty parameter set, scene unchanged");
        return None;
    }

    let entries = match inputs.formula.family() {
        Some(family) => params
            .iter()
            .filter_map(|&p| resolve_dataset(dataset, family, p))
            .collect(),
        None => match Formula::parse(&inputs.custom_formula) {
            Ok(formula) => params
                .iter()
                .filter_map(|&p| resolve_custom(&formula, p))
                .collect(),
            Err(e) => {
                warn!(formula = %inputs.custom_formula, error = %e, "Custom formula rejected");
                Vec::new()
            }
        },
    };
    Some(Scene::new(entries))
}

fn resolve_dataset(dataset: &Dataset, family: Family, p: u64) -> Option<SelectionEntry> {
    let Some(record) = dataset.lookup(family, p) else {
        debug!(p, form = %family.form(p), "No dataset record");
        return None;
    };
    // the dataset lists no factors for primes
    let primality = if record.factors.is_empty() {
        Primality::Prime
    } else {
        Primality::Composite
    };
    Some(SelectionEntry {
        label: record.form.clone(),
        p,
        value: record.value.clone(),
        primality,
        factors: record.factors.clone(),
    })
}

fn resolve_custom(formula: &Formula, p: u64) -> Option<SelectionEntry> {
    let value = match formula.eval(&BigInt::from(p)) {
        Ok(v) => v,
        Err(e) => {
            warn!(formula = formula.source(), p, error = %e, "Formula evaluation failed");
            return None;
        }
    };
    let primality = primality(&value);
    let factors = if primality.is_prime() {
        Vec::new()
    } else {
        distinct_factors(&value)
    };
    Some(SelectionEntry {
        label: format!("{}, n={}", formula.source(), p),
        p,
        value,
        primality,
        factors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset::from_records(crate::dataset::generate(16)).unwrap()
    }

    fn inputs(formula: FormulaKind, custom: &str, params: &str) -> SceneInputs {
        SceneInputs {
            formula,
            custom_formula: custom.to_string(),
            params: params.to_string(),
        }
    }

    #[test]
    fn test_parse_params() {
        assert_eq!(parse_params("5,7,11..13"), vec![5, 7, 11, 12, 13]);
        assert_eq!(parse_params("3,3,3"), vec![3]);
        assert_eq!(parse_params(" 13..11 , 2"), vec![2, 11, 12, 13]);
        assert_eq!(parse_params("x, 4, -2, 1..y"), vec![4]);
        assert!(parse_params("").is_empty());
        assert!(parse_params("1..20000").is_empty());
    }

    #[test]
    fn test_mersenne_entries() {
        let scene = build_scene(&inputs(FormulaKind::Minus, "", "11,13"), &dataset()).unwrap();
        assert_eq!(scene.entries.len(), 2);

        let m11 = &scene.entries[0];
        assert_eq!(m11.label, "2^11-1");
        assert_eq!(m11.value, BigInt::from(2047));
        assert_eq!(m11.factors, vec![BigInt::from(23), BigInt::from(89)]);
        assert!(!m11.is_prime());

        let m13 = &scene.entries[1];
        assert_eq!(m13.value, BigInt::from(8191));
        assert!(m13.factors.is_empty());
        assert!(m13.is_prime());
    }

    #[test]
    fn test_dataset_miss_is_skipped() {
        let scene = build_scene(&inputs(FormulaKind::Plus, "", "3,400"), &dataset()).unwrap();
        assert_eq!(scene.entries.len(), 1);
        assert_eq!(scene.entries[0].value, BigInt::from(9));
        assert_eq!(scene.entries[0].factors, vec![BigInt::from(3)]);
    }

    #[test]
    fn test_custom_formula_entries() {
        let scene = build_scene(&inputs(FormulaKind::Custom, "n^2+1", "4,5"), &Dataset::default())
            .unwrap();
        assert_eq!(scene.entries[0].value, BigInt::from(17));
        assert!(scene.entries[0].is_prime());
        assert_eq!(scene.entries[0].label, "n^2+1, n=4");
        assert_eq!(scene.entries[1].value, BigInt::from(26));
        assert_eq!(scene.entries[1].factors, vec![BigInt::from(2), BigInt::from(13)]);
    }

    #[test]
    fn test_custom_failures_skip_values() {
        let scene = build_scene(&inputs(FormulaKind::Custom, "n/2", "3,4"), &Dataset::default())
            .unwrap();
        assert_eq!(scene.entries.len(), 1);
        assert_eq!(scene.entries[0].value, BigInt::from(2));

        let broken = build_scene(&inputs(FormulaKind::Custom, "n +* 2", "3"), &Dataset::default())
            .unwrap();
        assert!(broken.is_empty());
    }

    #[test]
    fn test_dataset_primes_are_trusted() {
        // far beyond the trial-division bound
        let data = Dataset::from_json(include_str!("../data/mersenne.json")).unwrap();
        let scene = build_scene(&inputs(FormulaKind::Minus, "", "61,89"), &data).unwrap();
        assert_eq!(scene.entries.len(), 2);
        for entry in &scene.entries {
            assert_eq!(entry.primality, Primality::Prime, "{}", entry.label);
            assert_eq!(entry.primality.label(), "prime");
        }
    }

    #[test]
    fn test_oversized_custom_value_is_skipped() {
        let scene = build_scene(&inputs(FormulaKind::Custom, "(2^65536)^65536+1", "1,2"), &Dataset::default())
            .unwrap();
        assert!(scene.is_empty());
    }

    #[test]
    fn test_empty_params_keep_previous_scene() {
        assert!(build_scene(&inputs(FormulaKind::Minus, "", "abc"), &dataset()).is_none());
    }

    #[test]
    fn test_marker_values() {
        let scene = build_scene(&inputs(FormulaKind::Minus, "", "11"), &dataset()).unwrap();
        for v in [1u32, 11, 23, 89, 2047] {
            assert!(scene.is_marker(&BigInt::from(v)), "{} should be a marker", v);
        }
        assert!(!scene.is_marker(&BigInt::from(12)));
    }
}
