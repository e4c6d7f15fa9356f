// department.rs
use crate::ids::dedup_ids;
use crate::validate::{no_negativo, texto_obligatorio};
use crate::{CompanyId, DepartmentId, EmployeeId, Result};
use serde::{Deserialize, Serialize};

/// Departamento: pertenece a exactamente una empresa y es dueño exclusivo de
/// sus funcionarios (borrarlo los borra en cascada).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
  id: DepartmentId,
  name: String,
  budget: f64,
  status: String,
  company_id: CompanyId,
  employee_ids: Vec<EmployeeId>,
}

impl Department {
  pub fn new(name: &str, budget: f64, status: &str, company_id: CompanyId, employee_ids: Vec<EmployeeId>) -> Result<Self> {
    Self::from_parts(DepartmentId::new(), name, budget, status, company_id, employee_ids)
  }

  pub fn from_parts(id: DepartmentId,
                    name: &str,
                    budget: f64,
                    status: &str,
                    company_id: CompanyId,
                    employee_ids: Vec<EmployeeId>)
                    -> Result<Self> {
    texto_obligatorio(name, "El nombre del departamento")?;
    texto_obligatorio(status, "El estado del departamento")?;
    no_negativo(budget, "El presupuesto")?;
    Ok(Self { id,
              name: name.trim().to_string(),
              budget,
              status: status.trim().to_string(),
              company_id,
              employee_ids: dedup_ids(employee_ids) })
  }

  pub fn with_id(mut self, id: DepartmentId) -> Self {
    self.id = id;
    self
  }

  pub fn id(&self) -> DepartmentId {
    self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn budget(&self) -> f64 {
    self.budget
  }

  pub fn status(&self) -> &str {
    &self.status
  }

  pub fn company_id(&self) -> CompanyId {
    self.company_id
  }

  pub fn employee_ids(&self) -> &[EmployeeId] {
    &self.employee_ids
  }

  /// Reapunta el departamento a otra empresa. La lista de la empresa la
  /// mantiene el reconciliador.
  pub fn set_company(&mut self, company_id: CompanyId) {
    self.company_id = company_id;
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
