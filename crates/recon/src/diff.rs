// Archivo: diff.rs
// Propósito: motor de diferencias de relaciones. Dada la lista anterior y la
// nueva de ids relacionados calcula qué ids se agregaron y cuáles se
// retiraron. Función pura, total y sin E/S.
use indexmap::IndexSet;
use std::hash::Hash;

/// Resultado del diff: ids agregados y retirados, en el orden de aparición
/// de la lista que los originó (nueva para `added`, anterior para
/// `removed`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDiff<T> {
    pub added: Vec<T>,
    pub removed: Vec<T>,
}

impl<T> RelationDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Calcula `added = new − old` y `removed = old − new` con semántica de
/// conjuntos: el orden es irrelevante y los duplicados colapsan. Dos listas
/// iguales como conjuntos pero con distinto orden producen un diff vacío,
/// de modo que una reordenación no dispara trabajo de reconciliación.
pub fn relation_diff<T: Copy + Eq + Hash>(old: &[T], new: &[T]) -> RelationDiff<T> {
    let old_set: IndexSet<T> = old.iter().copied().collect();
    let new_set: IndexSet<T> = new.iter().copied().collect();
    RelationDiff { added: new_set.difference(&old_set).copied().collect(),
                   removed: old_set.difference(&new_set).copied().collect() }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn diff_of_equal_sets_is_empty() {
    assert!(relation_diff(&[1, 2, 3], &[1, 2, 3]).is_empty());
  }

  #[test]
  fn diff_ignores_order() {
    assert!(relation_diff(&[3, 1, 2], &[1, 2, 3]).is_empty());
  }

  #[test]
  fn diff_collapses_duplicates() {
    let d = relation_diff(&[1, 1, 2], &[2, 2, 3, 3]);
    assert_eq!(d.added, vec![3]);
    assert_eq!(d.removed, vec![1]);
  }

  #[test]
  fn diff_against_empty_sides() {
    let d = relation_diff(&[], &[7, 8]);
    assert_eq!(d.added, vec![7, 8]);
    assert!(d.removed.is_empty());

    let d = relation_diff(&[7, 8], &[]);
    assert!(d.added.is_empty());
    assert_eq!(d.removed, vec![7, 8]);
  }

  #[test]
  fn diff_is_symmetric_difference_split() {
    let d = relation_diff(&[1, 2, 3], &[2, 3, 4]);
    assert_eq!(d.added, vec![4]);
    assert_eq!(d.removed, vec![1]);
  }
}
