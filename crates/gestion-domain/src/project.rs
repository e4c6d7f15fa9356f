// project.rs
use crate::ids::dedup_ids;
use crate::validate::texto_obligatorio;
use crate::{ClientId, ContractId, EmployeeId, ProjectId, Result};
use serde::{Deserialize, Serialize};

/// Proyecto: pertenece a exactamente un cliente, tiene a lo sumo un contrato
/// (relación uno-a-uno exclusiva) y comparte funcionarios con otros
/// proyectos (muchos-a-muchos, sin cascada).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  id: ProjectId,
  name: String,
  description: String,
  employee_ids: Vec<EmployeeId>,
  contract_id: Option<ContractId>,
  client_id: ClientId,
}

impl Project {
  pub fn new(name: &str,
             description: &str,
             employee_ids: Vec<EmployeeId>,
             contract_id: Option<ContractId>,
             client_id: ClientId)
             -> Result<Self> {
    Self::from_parts(ProjectId::new(), name, description, employee_ids, contract_id, client_id)
  }

  pub fn from_parts(id: ProjectId,
                    name: &str,
                    description: &str,
                    employee_ids: Vec<EmployeeId>,
                    contract_id: Option<ContractId>,
                    client_id: ClientId)
                    -> Result<Self> {
    texto_obligatorio(name, "El nombre del proyecto")?;
    texto_obligatorio(description, "La descripción del proyecto")?;
    Ok(Self { id,
              name: name.trim().to_string(),
              description: description.trim().to_string(),
              employee_ids: dedup_ids(employee_ids),
              contract_id,
              client_id })
  }

  pub fn with_id(mut self, id: ProjectId) -> Self {
    self.id = id;
    self
  }

  pub fn id(&self) -> ProjectId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn employee_ids(&self) -> &[EmployeeId] {
    &self.employee_ids
  }

  pub fn contract_id(&self) -> Option<ContractId> {
    self.contract_id
  }

  pub fn client_id(&self) -> ClientId {
    self.client_id
  }

  pub fn set_client(&mut self, client_id: ClientId) {
    self.client_id = client_id;
  }

  /// Fija o limpia la referencia al contrato. El contrato es exclusivo del
  /// proyecto; la coherencia del vínculo la garantiza el reconciliador.
  pub fn set_contract(&mut self, contract_id: Option<ContractId>) {
    self.contract_id = contract_id;
  }

  pub fn push_employee(&mut self, id: EmployeeId) {
    if !self.employee_ids.contains(&id) {
      self.employee_ids.push(id);
    }
  }

  pub fn pull_employee(&mut self, id: &EmployeeId) {
    self.employee_ids.retain(|e| e != id);
  }
}
