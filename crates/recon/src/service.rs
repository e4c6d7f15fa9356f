// Archivo: service.rs
// Propósito: implementar `GestionService`, la capa orquestadora que expone
// las operaciones de alto nivel sobre el dominio (altas/cambios/bajas
// reconciliadas, vistas detalladas, conteos y filtros por nombre). Esta capa
// es la que debe invocar un handler HTTP u otro transporte; recibe entidades
// ya validadas y devuelve vistas o un error estructurado del dominio.
use crate::assembler::{ClientDetailed, CompanyDetailed, ContractDetailed, DepartmentDetailed, DetailAssembler,
                       EmployeeDetailed, ProjectDetailed};
use crate::reconciler::Reconciler;
use crate::store::EntityStore;
use gestion_domain::{Client, Company, Contract, Department, Employee, Project, Result};
use gestion_domain::{ClientId, CompanyId, ContractId, DepartmentId, EmployeeId, ProjectId};
use std::sync::Arc;

/// Servicio de alto nivel sobre un almacenamiento inyectado. El
/// reconciliador y el ensamblador se construyen por operación; el servicio
/// no guarda estado propio.
pub struct GestionService<S>
    where S: EntityStore
{
    store: Arc<S>,
}

impl<S> GestionService<S> where S: EntityStore + 'static
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(self.store.as_ref())
    }

    fn assembler(&self) -> DetailAssembler<'_> {
        DetailAssembler::new(self.store.as_ref())
    }

    // ----- empresas -----

    pub fn create_company(&self, draft: Company) -> Result<CompanyId> {
        self.reconciler().create_company(draft)
    }

    pub fn update_company(&self, id: &CompanyId, draft: Company) -> Result<Company> {
        self.reconciler().update_company(id, draft)
    }

    pub fn delete_company(&self, id: &CompanyId) -> Result<Company> {
        self.reconciler().delete_company(id)
    }

    pub fn company_detailed(&self, id: &CompanyId) -> Result<CompanyDetailed> {
        self.assembler().company_detailed(id)
    }

    pub fn list_companies_detailed(&self, page: i64, limit: i64) -> Result<Vec<CompanyDetailed>> {
        self.assembler().companies_detailed(page, limit)
    }

    pub fn count_companies(&self) -> Result<i64> {
        self.store.companies().count()
    }

    pub fn find_companies_by_name(&self, needle: &str) -> Result<Vec<Company>> {
        self.store.companies().find_by_name(needle)
    }

    // ----- departamentos -----

    pub fn create_department(&self, draft: Department) -> Result<DepartmentId> {
        self.reconciler().create_department(draft)
    }

    pub fn update_department(&self, id: &DepartmentId, draft: Department) -> Result<Department> {
        self.reconciler().update_department(id, draft)
    }

    pub fn delete_department(&self, id: &DepartmentId) -> Result<Department> {
        self.reconciler().delete_department(id)
    }

    pub fn department_detailed(&self, id: &DepartmentId) -> Result<DepartmentDetailed> {
        self.assembler().department_detailed(id)
    }

    pub fn list_departments_detailed(&self, page: i64, limit: i64) -> Result<Vec<DepartmentDetailed>> {
        self.assembler().departments_detailed(page, limit)
    }

    pub fn count_departments(&self) -> Result<i64> {
        self.store.departments().count()
    }

    pub fn find_departments_by_name(&self, needle: &str) -> Result<Vec<Department>> {
        self.store.departments().find_by_name(needle)
    }

    // ----- funcionarios -----

    pub fn create_employee(&self, draft: Employee) -> Result<EmployeeId> {
        self.reconciler().create_employee(draft)
    }

    pub fn update_employee(&self, id: &EmployeeId, draft: Employee) -> Result<Employee> {
        self.reconciler().update_employee(id, draft)
    }

    pub fn delete_employee(&self, id: &EmployeeId) -> Result<Employee> {
        self.reconciler().delete_employee(id)
    }

    pub fn employee_detailed(&self, id: &EmployeeId) -> Result<EmployeeDetailed> {
        self.assembler().employee_detailed(id)
    }

    pub fn list_employees_detailed(&self, page: i64, limit: i64) -> Result<Vec<EmployeeDetailed>> {
        self.assembler().employees_detailed(page, limit)
    }

    pub fn count_employees(&self) -> Result<i64> {
        self.store.employees().count()
    }

    pub fn find_employees_by_name(&self, needle: &str) -> Result<Vec<Employee>> {
        self.store.employees().find_by_name(needle)
    }

    // ----- clientes -----

    pub fn create_client(&self, draft: Client) -> Result<ClientId> {
        self.reconciler().create_client(draft)
    }

    pub fn update_client(&self, id: &ClientId, draft: Client) -> Result<Client> {
        self.reconciler().update_client(id, draft)
    }

    pub fn delete_client(&self, id: &ClientId) -> Result<Client> {
        self.reconciler().delete_client(id)
    }

    pub fn client_detailed(&self, id: &ClientId) -> Result<ClientDetailed> {
        self.assembler().client_detailed(id)
    }

    pub fn list_clients_detailed(&self, page: i64, limit: i64) -> Result<Vec<ClientDetailed>> {
        self.assembler().clients_detailed(page, limit)
    }

    pub fn count_clients(&self) -> Result<i64> {
        self.store.clients().count()
    }

    pub fn find_clients_by_name(&self, needle: &str) -> Result<Vec<Client>> {
        self.store.clients().find_by_name(needle)
    }

    // ----- proyectos -----

    pub fn create_project(&self, draft: Project) -> Result<ProjectId> {
        self.reconciler().create_project(draft)
    }

    pub fn update_project(&self, id: &ProjectId, draft: Project) -> Result<Project> {
        self.reconciler().update_project(id, draft)
    }

    pub fn delete_project(&self, id: &ProjectId) -> Result<Project> {
        self.reconciler().delete_project(id)
    }

    pub fn project_detailed(&self, id: &ProjectId) -> Result<ProjectDetailed> {
        self.assembler().project_detailed(id)
    }

    pub fn list_projects_detailed(&self, page: i64, limit: i64) -> Result<Vec<ProjectDetailed>> {
        self.assembler().projects_detailed(page, limit)
    }

    pub fn count_projects(&self) -> Result<i64> {
        self.store.projects().count()
    }

    pub fn find_projects_by_name(&self, needle: &str) -> Result<Vec<Project>> {
        self.store.projects().find_by_name(needle)
    }

    // ----- contratos -----

    pub fn create_contract(&self, draft: Contract) -> Result<ContractId> {
        self.reconciler().create_contract(draft)
    }

    pub fn update_contract(&self, id: &ContractId, draft: Contract) -> Result<Contract> {
        self.reconciler().update_contract(id, draft)
    }

    pub fn delete_contract(&self, id: &ContractId) -> Result<Contract> {
        self.reconciler().delete_contract(id)
    }

    pub fn contract_detailed(&self, id: &ContractId) -> Result<ContractDetailed> {
        self.assembler().contract_detailed(id)
    }

    pub fn list_contracts_detailed(&self, page: i64, limit: i64) -> Result<Vec<ContractDetailed>> {
        self.assembler().contracts_detailed(page, limit)
    }

    pub fn count_contracts(&self) -> Result<i64> {
        self.store.contracts().count()
    }
}
