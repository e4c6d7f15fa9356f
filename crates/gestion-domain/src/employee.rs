// employee.rs
use crate::ids::dedup_ids;
use crate::validate::{email_valido, no_negativo, texto_obligatorio};
use crate::{DepartmentId, EmployeeId, ProjectId, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Funcionario: pertenece a exactamente un departamento (relación exclusiva
/// desde el lado del departamento) y participa en un conjunto compartido de
/// proyectos. El email se normaliza a minúsculas; la unicidad entre
/// funcionarios la verifica el reconciliador contra la colección.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
  id: EmployeeId,
  email: String,
  name: String,
  role: String,
  salary: f64,
  phone: String,
  department_id: DepartmentId,
  project_ids: Vec<ProjectId>,
}

impl Employee {
  pub fn new(email: &str,
             name: &str,
             role: &str,
             salary: f64,
             phone: &str,
             department_id: DepartmentId,
             project_ids: Vec<ProjectId>)
             -> Result<Self> {
    Self::from_parts(EmployeeId::new(), email, name, role, salary, phone, department_id, project_ids)
  }

  #[allow(clippy::too_many_arguments)]
  pub fn from_parts(id: EmployeeId,
                    email: &str,
                    name: &str,
                    role: &str,
                    salary: f64,
                    phone: &str,
                    department_id: DepartmentId,
                    project_ids: Vec<ProjectId>)
                    -> Result<Self> {
    email_valido(email)?;
    texto_obligatorio(name, "El nombre del funcionario")?;
    texto_obligatorio(role, "El cargo")?;
    texto_obligatorio(phone, "El teléfono")?;
    no_negativo(salary, "El salario")?;
    Ok(Self { id,
              email: email.trim().to_lowercase(),
              name: name.trim().to_string(),
              role: role.trim().to_string(),
              salary,
              phone: phone.trim().to_string(),
              department_id,
              project_ids: dedup_ids(project_ids) })
  }

  pub fn with_id(mut self, id: EmployeeId) -> Self {
    self.id = id;
    self
  }

  pub fn id(&self) -> EmployeeId {
    self.id
  }

  pub fn email(&self) -> &str {
    &self.email
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn role(&self) -> &str {
    &self.role
  }

  pub fn salary(&self) -> f64 {
    self.salary
  }

  pub fn phone(&self) -> &str {
    &self.phone
  }

  pub fn department_id(&self) -> DepartmentId {
    self.department_id
  }

  pub fn project_ids(&self) -> &[ProjectId] {
    &self.project_ids
  }

  pub fn set_department(&mut self, department_id: DepartmentId) {
    self.department_id = department_id;
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

impl fmt::Display for Employee {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Employee({}, {})", self.name, self.email)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::DomainError;

  #[test]
  fn email_is_normalized() {
    let dep = DepartmentId::new();
    let emp = Employee::new(" Ana.Lima@Empresa.COM ", "Ana Lima", "Dev", 4200.0, "+55 11 98888-0000", dep, vec![]).unwrap();
    assert_eq!(emp.email(), "ana.lima@empresa.com");
  }

  #[test]
  fn rejects_bad_email_and_negative_salary() {
    let dep = DepartmentId::new();
    assert!(matches!(Employee::new("sin-arroba", "Ana", "Dev", 100.0, "tel", dep, vec![]),
                     Err(DomainError::Validation(_))));
    assert!(matches!(Employee::new("a@b.com", "Ana", "Dev", -1.0, "tel", dep, vec![]),
                     Err(DomainError::Validation(_))));
  }

  #[test]
  fn project_list_collapses_duplicates() {
    let dep = DepartmentId::new();
    let p = ProjectId::new();
    let emp = Employee::new("a@b.com", "Ana", "Dev", 100.0, "tel", dep, vec![p, p]).unwrap();
    assert_eq!(emp.project_ids(), &[p]);
    let mut emp = emp;
    emp.push_project(p);
    assert_eq!(emp.project_ids().len(), 1);
  }
}
