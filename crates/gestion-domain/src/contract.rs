// contract.rs
use crate::validate::{no_negativo, texto_obligatorio};
use crate::{ContractId, DomainError, ProjectId, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

static ESTADOS_VALIDOS: Lazy<HashSet<&'static str>> = Lazy::new(|| HashSet::from(["activo", "suspendido", "encerrado"]));

/// Moneda por defecto de los contratos.
pub const MONEDA_POR_DEFECTO: &str = "BRL";

/// Contrato: vinculado uno-a-uno con su proyecto. El `project_id` es
/// inmutable después de la creación; intentar cambiarlo produce `Conflict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
  id: ContractId,
  terms: String,
  status: String,
  valid_from: NaiveDate,
  valid_until: Option<NaiveDate>,
  max_quantity: i32,
  total_value: f64,
  currency: String,
  project_id: ProjectId,
}

impl Contract {
  #[allow(clippy::too_many_arguments)]
  pub fn new(terms: &str,
             status: &str,
             valid_from: NaiveDate,
             valid_until: Option<NaiveDate>,
             max_quantity: i32,
             total_value: f64,
             currency: &str,
             project_id: ProjectId)
             -> Result<Self> {
    Self::from_parts(ContractId::new(),
                     terms,
                     status,
                     valid_from,
                     valid_until,
                     max_quantity,
                     total_value,
                     currency,
                     project_id)
  }

  #[allow(clippy::too_many_arguments)]
  pub fn from_parts(id: ContractId,
                    terms: &str,
                    status: &str,
                    valid_from: NaiveDate,
                    valid_until: Option<NaiveDate>,
                    max_quantity: i32,
                    total_value: f64,
                    currency: &str,
                    project_id: ProjectId)
                    -> Result<Self> {
    texto_obligatorio(terms, "Las condiciones de servicio")?;
    let status = status.trim().to_lowercase();
    if !ESTADOS_VALIDOS.contains(status.as_str()) {
      return Err(DomainError::Validation(format!("Estado de contrato inválido: {}", status)));
    }
    if let Some(hasta) = valid_until {
      if hasta < valid_from {
        return Err(DomainError::Validation("La vigencia no puede terminar antes de empezar".to_string()));
      }
    }
    if max_quantity <= 0 {
      return Err(DomainError::Validation("La cantidad máxima debe ser positiva".to_string()));
    }
    no_negativo(total_value, "El valor total")?;
    let currency = currency.trim().to_uppercase();
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
      return Err(DomainError::Validation(format!("Moneda inválida: {}", currency)));
    }
    Ok(Self { id,
              terms: terms.trim().to_string(),
              status,
              valid_from,
              valid_until,
              max_quantity,
              total_value,
              currency,
              project_id })
  }

  pub fn with_id(mut self, id: ContractId) -> Self {
    self.id = id;
    self
  }

  pub fn id(&self) -> ContractId {
    self.id
  }

  pub fn terms(&self) -> &str {
    &self.terms
  }

  pub fn status(&self) -> &str {
    &self.status
  }

  pub fn valid_from(&self) -> NaiveDate {
    self.valid_from
  }

  pub fn valid_until(&self) -> Option<NaiveDate> {
    self.valid_until
  }

  pub fn max_quantity(&self) -> i32 {
    self.max_quantity
  }

  pub fn total_value(&self) -> f64 {
    self.total_value
  }

  pub fn currency(&self) -> &str {
    &self.currency
  }

  pub fn project_id(&self) -> ProjectId {
    self.project_id
  }
}
