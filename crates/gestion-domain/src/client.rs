// client.rs
use crate::ids::dedup_ids;
use crate::validate::{email_valido, solo_digitos, texto_obligatorio};
use crate::{ClientId, DomainError, ProjectId, Result};
use serde::{Deserialize, Serialize};

/// Cliente: dueño exclusivo de sus proyectos. Retirar un proyecto de la
/// lista lo elimina en cascada (junto con su contrato).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
  id: ClientId,
  name: String,
  tax_id: String,
  legal_name: String,
  trade_name: String,
  contact_email: String,
  project_ids: Vec<ProjectId>,
}

impl Client {
  pub fn new(name: &str,
             tax_id: &str,
             legal_name: &str,
             trade_name: &str,
             contact_email: &str,
             project_ids: Vec<ProjectId>)
             -> Result<Self> {
    Self::from_parts(ClientId::new(), name, tax_id, legal_name, trade_name, contact_email, project_ids)
  }

  pub fn from_parts(id: ClientId,
                    name: &str,
                    tax_id: &str,
                    legal_name: &str,
                    trade_name: &str,
                    contact_email: &str,
                    project_ids: Vec<ProjectId>)
                    -> Result<Self> {
    texto_obligatorio(name, "El nombre del cliente")?;
    texto_obligatorio(legal_name, "La razón social")?;
    texto_obligatorio(trade_name, "El nombre de fantasía")?;
    // CPF (11) o CNPJ (14)
    solo_digitos(tax_id, "El CNPJ/CPF")?;
    if tax_id.len() != 11 && tax_id.len() != 14 {
      return Err(DomainError::Validation("El CNPJ/CPF debe tener 11 o 14 dígitos".to_string()));
    }
    email_valido(contact_email)?;
    Ok(Self { id,
              name: name.trim().to_string(),
              tax_id: tax_id.to_string(),
              legal_name: legal_name.trim().to_string(),
              trade_name: trade_name.trim().to_string(),
              contact_email: contact_email.trim().to_string(),
              project_ids: dedup_ids(project_ids) })
  }

  pub fn with_id(mut self, id: ClientId) -> Self {
    self.id = id;
    self
  }

  pub fn id(&self) -> ClientId {
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

  pub fn project_ids(&self) -> &[ProjectId] {
    &self.project_ids
  }

  pub fn push_project(&mut self, id: ProjectId) {
    if !self.project_ids.contains(&id) {
      self.project_ids.push(id);
    }
  }

  pub fn pull_project(&mut self, id: &ProjectId) {
    self.project_ids.retain(|p| p != id);
  }
}
