// company.rs
use crate::ids::dedup_ids;
use crate::validate::{email_valido, solo_digitos, texto_obligatorio};
use crate::{CompanyId, DepartmentId, DomainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Empresa: dueña exclusiva de un conjunto de departamentos. La lista
/// `department_ids` es la cara autoritativa de la relación; el reconciliador
/// mantiene la referencia inversa (`Department::company_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
  id: CompanyId,
  name: String,
  tax_id: String,
  legal_name: String,
  trade_name: String,
  contact_email: String,
  department_ids: Vec<DepartmentId>,
}

impl Company {
  /// Crea una empresa nueva con id generado.
  pub fn new(name: &str,
             tax_id: &str,
             legal_name: &str,
             trade_name: &str,
             contact_email: &str,
             department_ids: Vec<DepartmentId>)
             -> Result<Self> {
    Self::from_parts(CompanyId::new(), name, tax_id, legal_name, trade_name, contact_email, department_ids)
  }

  /// Construye una empresa con un id conocido (rehidratación desde el
  /// almacenamiento o reemplazo en una actualización). Revalida todo.
  pub fn from_parts(id: CompanyId,
                    name: &str,
                    tax_id: &str,
                    legal_name: &str,
                    trade_name: &str,
                    contact_email: &str,
                    department_ids: Vec<DepartmentId>)
                    -> Result<Self> {
    texto_obligatorio(name, "El nombre de la empresa")?;
    texto_obligatorio(legal_name, "La razón social")?;
    texto_obligatorio(trade_name, "El nombre de fantasía")?;
    solo_digitos(tax_id, "El CNPJ")?;
    if tax_id.len() != 14 {
      return Err(DomainError::Validation("El CNPJ debe tener exactamente 14 dígitos".to_string()));
    }
    email_valido(contact_email)?;
    Ok(Self { id,
              name: name.trim().to_string(),
              tax_id: tax_id.to_string(),
              legal_name: legal_name.trim().to_string(),
              trade_name: trade_name.trim().to_string(),
              contact_email: contact_email.trim().to_string(),
              department_ids: dedup_ids(department_ids) })
  }

  /// Reasigna el id conservando el resto de los campos. Usado por el
  /// reconciliador al aplicar una actualización sobre un id existente.
  pub fn with_id(mut self, id: CompanyId) -> Self {
    self.id = id;
    self
  }

  pub fn id(&self) -> CompanyId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn tax_id(&self) -> &str {
    &self.tax_id
  }

  pub fn legal_name(&self) -> &str {
    &self.legal_name
  }

  pub fn trade_name(&self) -> &str {
    &self.trade_name
  }

  pub fn contact_email(&self) -> &str {
    &self.contact_email
  }

  pub fn department_ids(&self) -> &[DepartmentId] {
    &self.department_ids
  }

  /// Añade un departamento a la lista (sin duplicar).
  pub fn push_department(&mut self, id: DepartmentId) {
    if !self.department_ids.contains(&id) {
      self.department_ids.push(id);
    }
  }

  /// Retira un departamento de la lista si está presente.
  pub fn pull_department(&mut self, id: &DepartmentId) {
    self.department_ids.retain(|d| d != id);
  }
}

impl fmt::Display for Company {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Company({}, CNPJ: {})", self.name, self.tax_id)
  }
}
