//! Dimension reconciler: which candidates are genuinely new.

use std::collections::HashSet;

use foodprice_core::dimension::{KeyMap, NaturalKey};

/// Keep the candidates whose natural key is absent from `persisted`.
///
/// Matching is exact on every attribute. Candidate order is preserved and a
/// key repeated among the candidates is reported once.
pub fn new_keys(candidates: Vec<NaturalKey>, persisted: &KeyMap) -> Vec<NaturalKey> {
  let mut seen = HashSet::new();
  candidates
    .into_iter()
    .filter(|key| !persisted.contains_key(key))
    .filter(|key| seen.insert(key.clone()))
    .collect()
}

#[cfg(test)]
mod tests {
  use foodprice_core::dimension::{CommodityKey, SurrogateKey};

  use super::*;

  fn commodity(name: &str, unit: &str) -> NaturalKey {
    NaturalKey::Commodity(CommodityKey {
      category:  "cereals and tubers".into(),
      commodity: name.into(),
      unit:      unit.into(),
    })
  }

  #[test]
  fn everything_is_new_against_empty_store() {
    let candidates = vec![commodity("Maize", "KG"), commodity("Beans", "KG")];
    assert_eq!(new_keys(candidates.clone(), &KeyMap::new()), candidates);
  }

  #[test]
  fn persisted_keys_are_filtered() {
    let persisted = KeyMap::from([(commodity("Maize", "KG"), SurrogateKey(1))]);
    let fresh = new_keys(
      vec![commodity("Maize", "KG"), commodity("Beans", "KG")],
      &persisted,
    );
    assert_eq!(fresh, vec![commodity("Beans", "KG")]);
  }

  #[test]
  fn one_differing_attribute_is_a_new_key() {
    let persisted = KeyMap::from([(commodity("Maize", "KG"), SurrogateKey(1))]);
    let fresh = new_keys(
      vec![commodity("Maize", "90 KG"), commodity("maize", "KG")],
      &persisted,
    );
    assert_eq!(fresh.len(), 2);
  }

  #[test]
  fn repeated_candidates_reported_once() {
    let fresh = new_keys(
      vec![commodity("Maize", "KG"), commodity("Maize", "KG")],
      &KeyMap::new(),
    );
    assert_eq!(fresh.len(), 1);
  }
}
