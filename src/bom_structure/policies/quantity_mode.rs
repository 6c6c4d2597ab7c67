use crate::bom_structure::domain::Quantity;
use serde::{Deserialize, Serialize};

/// QuantityMode policy for turning edge quantities into counts when flattening
///
/// The same tree can be read two ways:
/// - `PerInstance`: each node contributes its own edge quantity, once per
///   occurrence in the tree. `A→B(2)→D(3)` yields `D` three times.
/// - `Compounded`: a node's quantity is multiplied by the multiplicities of all
///   of its ancestors. `A→B(2)→D(3)` yields `D` six times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityMode {
    #[default]
    PerInstance,
    Compounded,
}

impl QuantityMode {
    /// Count of a node given its own multiplicity and the multiplier inherited from its parent
    ///
    /// # Returns
    /// `(count_for_this_node, multiplier_for_its_children)`
    pub fn apply(self, own: u64, inherited: u64) -> (u64, u64) {
        match self {
            QuantityMode::PerInstance => (own, 1),
            QuantityMode::Compounded => {
                let compounded = own.saturating_mul(inherited);
                (compounded, compounded)
            }
        }
    }

    /// Multiplicity of a quantity, defaulting malformed values to one
    pub fn multiplicity_or_default(quantity: &Quantity) -> u64 {
        quantity.multiplicity().unwrap_or(1)
    }
}

impl std::str::FromStr for QuantityMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "per_instance" => Ok(QuantityMode::PerInstance),
            "compounded" => Ok(QuantityMode::Compounded),
            _ => Err(format!(
                "Invalid quantity mode: {}. Please specify 'per-instance' or 'compounded'",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_per_instance_ignores_inherited_multiplier() {
        assert_eq!(QuantityMode::PerInstance.apply(3, 2), (3, 1));
    }

    #[test]
    fn test_compounded_multiplies_down() {
        assert_eq!(QuantityMode::Compounded.apply(3, 2), (6, 6));
        assert_eq!(QuantityMode::Compounded.apply(0, 5), (0, 0));
    }

    #[test]
    fn test_compounded_saturates() {
        assert_eq!(QuantityMode::Compounded.apply(u64::MAX, 2).0, u64::MAX);
    }

    #[test]
    fn test_from_str_accepts_both_spellings() {
        assert_eq!(QuantityMode::from_str("per-instance").unwrap(), QuantityMode::PerInstance);
        assert_eq!(QuantityMode::from_str("PER_INSTANCE").unwrap(), QuantityMode::PerInstance);
        assert_eq!(QuantityMode::from_str("compounded").unwrap(), QuantityMode::Compounded);
        assert!(QuantityMode::from_str("sum").is_err());
    }

    #[test]
    fn test_multiplicity_or_default() {
        assert_eq!(QuantityMode::multiplicity_or_default(&Quantity::Malformed("x".into())), 1);
        assert_eq!(QuantityMode::multiplicity_or_default(&Quantity::Amount(4.7)), 4);
    }

    #[test]
    fn test_deserialize_snake_case() {
        let mode: QuantityMode = serde_json::from_str("\"compounded\"").unwrap();
        assert_eq!(mode, QuantityMode::Compounded);
    }
}
