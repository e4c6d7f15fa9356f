// ids.rs
//
// Ids tipados del dominio. Internamente son uuid v4 (forma nativa del
// almacenamiento); la forma externa es siempre el string con guiones. La
// conversión entre ambas formas ocurre únicamente en la frontera con el
// almacenamiento o al ensamblar vistas.
use crate::{DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Comportamiento común de los ids tipados.
pub trait TypedId:
  Copy + Eq + Ord + std::hash::Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
  /// Uuid interno (forma nativa).
  fn raw(&self) -> Uuid;

  /// Construye el id a partir del uuid interno.
  fn from_raw(raw: Uuid) -> Self;

  /// Forma externa (string) del id.
  fn external(&self) -> String {
    self.raw().to_string()
  }
}

macro_rules! define_id {
  ($name:ident, $label:literal) => {
    #[doc = concat!("Id interno de ", $label, ".")]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(Uuid);

    impl $name {
      /// Genera un id nuevo (uuid v4).
      pub fn new() -> Self {
        Self(Uuid::new_v4())
      }

      /// Parsea la forma externa validando el formato.
      pub fn parse_external(raw: &str) -> Result<Self> {
        Uuid::parse_str(raw.trim()).map(Self)
                                   .map_err(|_| DomainError::Validation(format!("ID inválido para {}: {}", $label, raw)))
      }
    }

    impl TypedId for $name {
      fn raw(&self) -> Uuid {
        self.0
      }

      fn from_raw(raw: Uuid) -> Self {
        Self(raw)
      }
    }

    impl Default for $name {
      fn default() -> Self {
        Self::new()
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
      }
    }
  };
}

define_id!(CompanyId, "empresa");
define_id!(DepartmentId, "departamento");
define_id!(EmployeeId, "funcionario");
define_id!(ClientId, "cliente");
define_id!(ProjectId, "proyecto");
define_id!(ContractId, "contrato");

/// Colapsa duplicados de una lista de relación preservando el orden de
/// aparición. Las listas de relación se tratan como conjuntos.
pub(crate) fn dedup_ids<T: PartialEq + Copy>(ids: Vec<T>) -> Vec<T> {
  let mut out: Vec<T> = Vec::with_capacity(ids.len());
  for id in ids {
    if !out.contains(&id) {
      out.push(id);
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn external_roundtrip() {
    let id = ProjectId::new();
    let parsed = ProjectId::parse_external(&id.external()).unwrap();
    assert_eq!(id, parsed);
  }

  #[test]
  fn parse_external_rejects_garbage() {
    match CompanyId::parse_external("no-es-un-uuid") {
      Err(DomainError::Validation(_)) => {}
      other => panic!("se esperaba Validation, se obtuvo {:?}", other),
    }
  }

  #[test]
  fn dedup_preserves_first_occurrence() {
    let a = EmployeeId::new();
    let b = EmployeeId::new();
    assert_eq!(dedup_ids(vec![a, b, a, b, a]), vec![a, b]);
  }
}
