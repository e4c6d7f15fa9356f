// Archivo: assembler.rs
// Propósito: ensamblador de vistas detalladas. Produce proyecciones de
// lectura con las relaciones directas embebidas (un nivel) en lugar de
// referidas por id, tanto para una entidad puntual como para listados
// paginados. Todos los ids, incluidos los anidados dentro de relaciones
// embebidas, salen en la forma externa (string); la forma interna no cruza
// esta frontera.
//
// La lectura es tolerante: una referencia embebida que no resuelve se omite
// (listas) o queda en `None` (uno-a-uno). La política estricta aplica a las
// escrituras, no a las proyecciones.
use crate::store::EntityStore;
use chrono::NaiveDate;
use gestion_domain::{Client, Company, Contract, Department, DomainError, Employee, Project, Result, TypedId};
use gestion_domain::{ClientId, CompanyId, ContractId, DepartmentId, EmployeeId, ProjectId};
use serde::Serialize;

/// Valida los parámetros de paginación y devuelve `(skip, limit)`.
/// `page` es base cero y los valores negativos se llevan a cero; un `limit`
/// no positivo se rechaza en lugar de ajustarse en silencio.
pub fn page_window(page: i64, limit: i64) -> Result<(i64, i64)> {
    if limit <= 0 {
        return Err(DomainError::Validation(format!("El límite de página debe ser positivo, se recibió {}", limit)));
    }
    Ok((page.max(0).saturating_mul(limit), limit))
}

// ----- vistas planas (forma externa) -----

#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    pub id: String,
    pub name: String,
    pub tax_id: String,
    pub legal_name: String,
    pub trade_name: String,
    pub contact_email: String,
    pub department_ids: Vec<String>,
}

impl From<&Company> for CompanyView {
    fn from(company: &Company) -> Self {
        Self { id: company.id().external(),
               name: company.name().to_string(),
               tax_id: company.tax_id().to_string(),
               legal_name: company.legal_name().to_string(),
               trade_name: company.trade_name().to_string(),
               contact_email: company.contact_email().to_string(),
               department_ids: company.department_ids().iter().map(TypedId::external).collect() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentView {
    pub id: String,
    pub name: String,
    pub budget: f64,
    pub status: String,
    pub company_id: String,
    pub employee_ids: Vec<String>,
}

impl From<&Department> for DepartmentView {
    fn from(department: &Department) -> Self {
        Self { id: department.id().external(),
               name: department.name().to_string(),
               budget: department.budget(),
               status: department.status().to_string(),
               company_id: department.company_id().external(),
               employee_ids: department.employee_ids().iter().map(TypedId::external).collect() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeView {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
    pub salary: f64,
    pub phone: String,
    pub department_id: String,
    pub project_ids: Vec<String>,
}

impl From<&Employee> for EmployeeView {
    fn from(employee: &Employee) -> Self {
        Self { id: employee.id().external(),
               email: employee.email().to_string(),
               name: employee.name().to_string(),
               role: employee.role().to_string(),
               salary: employee.salary(),
               phone: employee.phone().to_string(),
               department_id: employee.department_id().external(),
               project_ids: employee.project_ids().iter().map(TypedId::external).collect() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientView {
    pub id: String,
    pub name: String,
    pub tax_id: String,
    pub legal_name: String,
    pub trade_name: String,
    pub contact_email: String,
    pub project_ids: Vec<String>,
}

impl From<&Client> for ClientView {
    fn from(client: &Client) -> Self {
        Self { id: client.id().external(),
               name: client.name().to_string(),
               tax_id: client.tax_id().to_string(),
               legal_name: client.legal_name().to_string(),
               trade_name: client.trade_name().to_string(),
               contact_email: client.contact_email().to_string(),
               project_ids: client.project_ids().iter().map(TypedId::external).collect() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub employee_ids: Vec<String>,
    pub contract_id: Option<String>,
    pub client_id: String,
}

impl From<&Project> for ProjectView {
    fn from(project: &Project) -> Self {
        Self { id: project.id().external(),
               name: project.name().to_string(),
               description: project.description().to_string(),
               employee_ids: project.employee_ids().iter().map(TypedId::external).collect(),
               contract_id: project.contract_id().map(|c| c.external()),
               client_id: project.client_id().external() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractView {
    pub id: String,
    pub terms: String,
    pub status: String,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub max_quantity: i32,
    pub total_value: f64,
    pub currency: String,
    pub project_id: String,
}

impl From<&Contract> for ContractView {
    fn from(contract: &Contract) -> Self {
        Self { id: contract.id().external(),
               terms: contract.terms().to_string(),
               status: contract.status().to_string(),
               valid_from: contract.valid_from(),
               valid_until: contract.valid_until(),
               max_quantity: contract.max_quantity(),
               total_value: contract.total_value(),
               currency: contract.currency().to_string(),
               project_id: contract.project_id().external() }
    }
}

// ----- vistas detalladas (relaciones embebidas, un nivel) -----

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetailed {
    #[serde(flatten)]
    pub company: CompanyView,
    pub departments: Vec<DepartmentView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DepartmentDetailed {
    #[serde(flatten)]
    pub department: DepartmentView,
    pub company: Option<CompanyView>,
    pub employees: Vec<EmployeeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetailed {
    #[serde(flatten)]
    pub employee: EmployeeView,
    pub department: Option<DepartmentView>,
    pub projects: Vec<ProjectView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientDetailed {
    #[serde(flatten)]
    pub client: ClientView,
    pub projects: Vec<ProjectView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetailed {
    #[serde(flatten)]
    pub project: ProjectView,
    pub client: Option<ClientView>,
    pub contract: Option<ContractView>,
    pub employees: Vec<EmployeeView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContractDetailed {
    #[serde(flatten)]
    pub contract: ContractView,
    pub project: Option<ProjectView>,
}

/// Ensamblador de vistas detalladas sobre un almacenamiento inyectado.
pub struct DetailAssembler<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> DetailAssembler<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    fn hydrate_company(&self, company: &Company) -> Result<CompanyDetailed> {
        let mut departments = Vec::new();
        for dep_id in company.department_ids() {
            if let Some(dep) = self.store.departments().find(dep_id)? {
                departments.push(DepartmentView::from(&dep));
            }
        }
        Ok(CompanyDetailed { company: CompanyView::from(company), departments })
    }

    fn hydrate_department(&self, department: &Department) -> Result<DepartmentDetailed> {
        let company = self.store
                          .companies()
                          .find(&department.company_id())?
                          .map(|c| CompanyView::from(&c));
        let mut employees = Vec::new();
        for emp_id in department.employee_ids() {
            if let Some(emp) = self.store.employees().find(emp_id)? {
                employees.push(EmployeeView::from(&emp));
            }
        }
        Ok(DepartmentDetailed { department: DepartmentView::from(department), company, employees })
    }

    fn hydrate_employee(&self, employee: &Employee) -> Result<EmployeeDetailed> {
        let department = self.store
                             .departments()
                             .find(&employee.department_id())?
                             .map(|d| DepartmentView::from(&d));
        let mut projects = Vec::new();
        for project_id in employee.project_ids() {
            if let Some(project) = self.store.projects().find(project_id)? {
                projects.push(ProjectView::from(&project));
            }
        }
        Ok(EmployeeDetailed { employee: EmployeeView::from(employee), department, projects })
    }

    fn hydrate_client(&self, client: &Client) -> Result<ClientDetailed> {
        let mut projects = Vec::new();
        for project_id in client.project_ids() {
            if let Some(project) = self.store.projects().find(project_id)? {
                projects.push(ProjectView::from(&project));
            }
        }
        Ok(ClientDetailed { client: ClientView::from(client), projects })
    }

    fn hydrate_project(&self, project: &Project) -> Result<ProjectDetailed> {
        let client = self.store.clients().find(&project.client_id())?.map(|c| ClientView::from(&c));
        let contract = match project.contract_id() {
            Some(contract_id) => self.store
                                     .contracts()
                                     .find(&contract_id)?
                                     .map(|c| ContractView::from(&c)),
            None => None,
        };
        let mut employees = Vec::new();
        for emp_id in project.employee_ids() {
            if let Some(emp) = self.store.employees().find(emp_id)? {
                employees.push(EmployeeView::from(&emp));
            }
        }
        Ok(ProjectDetailed { project: ProjectView::from(project), client, contract, employees })
    }

    fn hydrate_contract(&self, contract: &Contract) -> Result<ContractDetailed> {
        let project = self.store
                          .projects()
                          .find(&contract.project_id())?
                          .map(|p| ProjectView::from(&p));
        Ok(ContractDetailed { contract: ContractView::from(contract), project })
    }

    // ----- lectura puntual -----

    pub fn company_detailed(&self, id: &CompanyId) -> Result<CompanyDetailed> {
        let company = self.store
                          .companies()
                          .find(id)?
                          .ok_or_else(|| DomainError::NotFound(format!("Empresa {} no encontrada", id)))?;
        self.hydrate_company(&company)
    }

    pub fn department_detailed(&self, id: &DepartmentId) -> Result<DepartmentDetailed> {
        let department = self.store
                             .departments()
                             .find(id)?
                             .ok_or_else(|| DomainError::NotFound(format!("Departamento {} no encontrado", id)))?;
        self.hydrate_department(&department)
    }

    pub fn employee_detailed(&self, id: &EmployeeId) -> Result<EmployeeDetailed> {
        let employee = self.store
                           .employees()
                           .find(id)?
                           .ok_or_else(|| DomainError::NotFound(format!("Funcionario {} no encontrado", id)))?;
        self.hydrate_employee(&employee)
    }

    pub fn client_detailed(&self, id: &ClientId) -> Result<ClientDetailed> {
        let client = self.store
                         .clients()
                         .find(id)?
                         .ok_or_else(|| DomainError::NotFound(format!("Cliente {} no encontrado", id)))?;
        self.hydrate_client(&client)
    }

    pub fn project_detailed(&self, id: &ProjectId) -> Result<ProjectDetailed> {
        let project = self.store
                          .projects()
                          .find(id)?
                          .ok_or_else(|| DomainError::NotFound(format!("Proyecto {} no encontrado", id)))?;
        self.hydrate_project(&project)
    }

    pub fn contract_detailed(&self, id: &ContractId) -> Result<ContractDetailed> {
        let contract = self.store
                           .contracts()
                           .find(id)?
                           .ok_or_else(|| DomainError::NotFound(format!("Contrato {} no encontrado", id)))?;
        self.hydrate_contract(&contract)
    }

    // ----- listados paginados (orden estable por id ascendente) -----

    pub fn companies_detailed(&self, page: i64, limit: i64) -> Result<Vec<CompanyDetailed>> {
        let (skip, limit) = page_window(page, limit)?;
        self.store
            .companies()
            .list(skip, limit)?
            .iter()
            .map(|c| self.hydrate_company(c))
            .collect()
    }

    pub fn departments_detailed(&self, page: i64, limit: i64) -> Result<Vec<DepartmentDetailed>> {
        let (skip, limit) = page_window(page, limit)?;
        self.store
            .departments()
            .list(skip, limit)?
            .iter()
            .map(|d| self.hydrate_department(d))
            .collect()
    }

    pub fn employees_detailed(&self, page: i64, limit: i64) -> Result<Vec<EmployeeDetailed>> {
        let (skip, limit) = page_window(page, limit)?;
        self.store
            .employees()
            .list(skip, limit)?
            .iter()
            .map(|e| self.hydrate_employee(e))
            .collect()
    }

    pub fn clients_detailed(&self, page: i64, limit: i64) -> Result<Vec<ClientDetailed>> {
        let (skip, limit) = page_window(page, limit)?;
        self.store
            .clients()
            .list(skip, limit)?
            .iter()
            .map(|c| self.hydrate_client(c))
            .collect()
    }

    pub fn projects_detailed(&self, page: i64, limit: i64) -> Result<Vec<ProjectDetailed>> {
        let (skip, limit) = page_window(page, limit)?;
        self.store
            .projects()
            .list(skip, limit)?
            .iter()
            .map(|p| self.hydrate_project(p))
            .collect()
    }

    pub fn contracts_detailed(&self, page: i64, limit: i64) -> Result<Vec<ContractDetailed>> {
        let (skip, limit) = page_window(page, limit)?;
        self.store
            .contracts()
            .list(skip, limit)?
            .iter()
            .map(|c| self.hydrate_contract(c))
            .collect()
    }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn page_window_rejects_non_positive_limit() {
    assert!(matches!(page_window(0, 0), Err(DomainError::Validation(_))));
    assert!(matches!(page_window(0, -5), Err(DomainError::Validation(_))));
  }

  #[test]
  fn page_window_clamps_negative_page() {
    assert_eq!(page_window(-3, 10).unwrap(), (0, 10));
    assert_eq!(page_window(2, 10).unwrap(), (20, 10));
  }
}
