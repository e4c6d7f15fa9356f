// Archivo: reconciler.rs
// Propósito: implementar el reconciliador de relaciones. Cada alta, cambio o
// baja de una entidad con campos de relación pasa por acá: se valida toda
// referencia foránea contra el almacenamiento, se arma el plan de escritura
// completo (referencias inversas, reasignaciones, cascadas) y recién después
// se ejecuta. Política uniforme y estricta: un id relacionado que no
// resuelve a una fila existente aborta la operación con `NotFound` sin
// escribir nada.
//
// Semántica de relaciones:
// - Exclusivas (Empresa→Departamento, Departamento→Funcionario,
//   Cliente→Proyecto, Proyecto→Contrato): retirar del lado dueño elimina la
//   entidad poseída en cascada; agregar reasigna (se la retira del dueño
//   anterior).
// - Compartidas (Funcionario↔Proyecto): retirar sólo limpia el vínculo de
//   ambos lados, las entidades persisten.
use crate::diff::relation_diff;
use crate::plan::{WriteOp, WritePlan};
use crate::store::EntityStore;
use gestion_domain::{Client, Company, Contract, Department, DomainError, Employee, Project, Result, TypedId};
use gestion_domain::{ClientId, CompanyId, ContractId, DepartmentId, EmployeeId, ProjectId};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Reconciliador de relaciones sobre un almacenamiento inyectado. El ciclo
/// de vida del handle se limita a una operación lógica; no hay estado
/// propio.
pub struct Reconciler<'a> {
    store: &'a dyn EntityStore,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: &'a dyn EntityStore) -> Self {
        Self { store }
    }

    // ----- resolución estricta de referencias -----

    fn require_company(&self, id: &CompanyId) -> Result<Company> {
        self.store
            .companies()
            .find(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Empresa {} no encontrada", id)))
    }

    fn require_department(&self, id: &DepartmentId) -> Result<Department> {
        self.store
            .departments()
            .find(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Departamento {} no encontrado", id)))
    }

    fn require_employee(&self, id: &EmployeeId) -> Result<Employee> {
        self.store
            .employees()
            .find(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Funcionario {} no encontrado", id)))
    }

    fn require_client(&self, id: &ClientId) -> Result<Client> {
        self.store
            .clients()
            .find(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Cliente {} no encontrado", id)))
    }

    fn require_project(&self, id: &ProjectId) -> Result<Project> {
        self.store
            .projects()
            .find(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Proyecto {} no encontrado", id)))
    }

    fn require_contract(&self, id: &ContractId) -> Result<Contract> {
        self.store
            .contracts()
            .find(id)?
            .ok_or_else(|| DomainError::NotFound(format!("Contrato {} no encontrado", id)))
    }

    /// Unicidad del email entre funcionarios. El contrato de almacenamiento
    /// no expone índices únicos, así que se verifica contra la colección.
    fn check_unique_email(&self, email: &str, exclude: Option<EmployeeId>) -> Result<()> {
        for emp in self.store.employees().all()? {
            if exclude == Some(emp.id()) {
                continue;
            }
            if emp.email() == email {
                return Err(DomainError::Conflict(format!("Ya existe un funcionario con el email {}", email)));
            }
        }
        Ok(())
    }

    // ----- cascadas compartidas -----

    /// Planifica la eliminación en cascada de funcionarios: retira sus ids
    /// de todos los proyectos que los referencien y elimina cada fila
    /// existente. Ids repetidos o ya ausentes no generan escrituras.
    fn plan_purge_employees(&self, ids: &[EmployeeId], plan: &mut WritePlan) -> Result<()> {
        let ids: Vec<EmployeeId> = ids.iter()
                                      .copied()
                                      .collect::<indexmap::IndexSet<_>>()
                                      .into_iter()
                                      .collect();
        if ids.is_empty() {
            return Ok(());
        }
        for project in self.store.projects().all()? {
            if ids.iter().any(|id| project.employee_ids().contains(id)) {
                let mut project = project;
                for id in &ids {
                    project.pull_employee(id);
                }
                plan.push(WriteOp::SaveProject(project));
            }
        }
        log::info!("cascada: eliminando {} funcionario(s)", ids.len());
        for id in &ids {
            if self.store.employees().find(id)?.is_some() {
                plan.push(WriteOp::DeleteEmployee(*id));
            } else {
                log::warn!("funcionario {} ya ausente al planificar la cascada", id);
            }
        }
        Ok(())
    }

    /// Planifica la eliminación en cascada de proyectos: retira sus ids de
    /// todos los funcionarios, elimina el contrato asociado (si hay) y la
    /// fila del proyecto.
    fn plan_purge_projects(&self, projects: &[Project], plan: &mut WritePlan) -> Result<()> {
        if projects.is_empty() {
            return Ok(());
        }
        let ids: Vec<ProjectId> = projects.iter().map(|p| p.id()).collect();
        for employee in self.store.employees().all()? {
            if ids.iter().any(|id| employee.project_ids().contains(id)) {
                let mut employee = employee;
                for id in &ids {
                    employee.pull_project(id);
                }
                plan.push(WriteOp::SaveEmployee(employee));
            }
        }
        log::info!("cascada: eliminando {} proyecto(s)", projects.len());
        for project in projects {
            if let Some(contract_id) = project.contract_id() {
                if self.store.contracts().find(&contract_id)?.is_some() {
                    plan.push(WriteOp::DeleteContract(contract_id));
                }
            }
            plan.push(WriteOp::DeleteProject(project.id()));
        }
        Ok(())
    }

    // ----- empresas -----

    /// Alta de empresa. Cada departamento referido debe existir; los que
    /// pertenecían a otra empresa se reasignan (se los retira del dueño
    /// anterior).
    pub fn create_company(&self, draft: Company) -> Result<CompanyId> {
        let id = draft.id();
        let mut plan = WritePlan::new();
        let mut previous_owners: BTreeMap<Uuid, Company> = BTreeMap::new();
        for dep_id in draft.department_ids() {
            let mut dep = self.require_department(dep_id)?;
            let prev = dep.company_id();
            if prev != id {
                if let Some(owner) = self.find_company_cached(&prev, &mut previous_owners)? {
                    owner.pull_department(dep_id);
                }
                dep.set_company(id);
                plan.push(WriteOp::SaveDepartment(dep));
            }
        }
        for owner in previous_owners.into_values() {
            plan.push(WriteOp::SaveCompany(owner));
        }
        plan.push(WriteOp::InsertCompany(draft));
        plan.execute(self.store)?;
        Ok(id)
    }

    /// Cambio de empresa. Departamentos retirados de la lista se eliminan en
    /// cascada (con sus funcionarios); los agregados se reasignan.
    pub fn update_company(&self, id: &CompanyId, draft: Company) -> Result<Company> {
        let old = self.require_company(id)?;
        let updated = draft.with_id(*id);

        // Fase de validación y armado del plan.
        let mut plan = WritePlan::new();
        let diff = relation_diff(old.department_ids(), updated.department_ids());

        let mut doomed_employees: Vec<EmployeeId> = Vec::new();
        for dep_id in &diff.removed {
            match self.store.departments().find(dep_id)? {
                Some(dep) => {
                    doomed_employees.extend_from_slice(dep.employee_ids());
                    plan.push(WriteOp::DeleteDepartment(*dep_id));
                }
                None => log::warn!("departamento {} ya ausente al reconciliar la empresa {}", dep_id, id),
            }
        }
        self.plan_purge_employees(&doomed_employees, &mut plan)?;

        let mut previous_owners: BTreeMap<Uuid, Company> = BTreeMap::new();
        for dep_id in &diff.added {
            let mut dep = self.require_department(dep_id)?;
            let prev = dep.company_id();
            if prev != *id {
                if let Some(owner) = self.find_company_cached(&prev, &mut previous_owners)? {
                    owner.pull_department(dep_id);
                }
            }
            dep.set_company(*id);
            plan.push(WriteOp::SaveDepartment(dep));
        }
        for owner in previous_owners.into_values() {
            plan.push(WriteOp::SaveCompany(owner));
        }
        plan.push(WriteOp::SaveCompany(updated.clone()));
        plan.execute(self.store)?;
        Ok(updated)
    }

    /// Baja de empresa: elimina en cascada sus departamentos y los
    /// funcionarios de éstos.
    pub fn delete_company(&self, id: &CompanyId) -> Result<Company> {
        let company = self.require_company(id)?;
        let mut plan = WritePlan::new();
        let mut doomed_employees: Vec<EmployeeId> = Vec::new();
        for dep_id in company.department_ids() {
            match self.store.departments().find(dep_id)? {
                Some(dep) => {
                    doomed_employees.extend_from_slice(dep.employee_ids());
                    plan.push(WriteOp::DeleteDepartment(*dep_id));
                }
                None => log::warn!("departamento {} ya ausente al eliminar la empresa {}", dep_id, id),
            }
        }
        self.plan_purge_employees(&doomed_employees, &mut plan)?;
        plan.push(WriteOp::DeleteCompany(*id));
        plan.execute(self.store)?;
        Ok(company)
    }

    // ----- departamentos -----

    /// Alta de departamento. La empresa dueña debe existir; los funcionarios
    /// referidos se reasignan desde su departamento anterior.
    pub fn create_department(&self, draft: Department) -> Result<DepartmentId> {
        let id = draft.id();
        let mut company = self.require_company(&draft.company_id())?;
        let mut plan = WritePlan::new();
        let mut previous_departments: BTreeMap<Uuid, Department> = BTreeMap::new();
        for emp_id in draft.employee_ids() {
            let mut emp = self.require_employee(emp_id)?;
            let prev = emp.department_id();
            if prev != id {
                if let Some(owner) = self.find_department_cached(&prev, &mut previous_departments)? {
                    owner.pull_employee(emp_id);
                }
                emp.set_department(id);
                plan.push(WriteOp::SaveEmployee(emp));
            }
        }
        for owner in previous_departments.into_values() {
            plan.push(WriteOp::SaveDepartment(owner));
        }
        company.push_department(id);
        plan.push(WriteOp::SaveCompany(company));
        plan.push(WriteOp::InsertDepartment(draft));
        plan.execute(self.store)?;
        Ok(id)
    }

    /// Cambio de departamento. Un cambio de empresa dueña reubica la
    /// referencia en ambas listas; los funcionarios retirados se eliminan en
    /// cascada y los agregados se reasignan.
    pub fn update_department(&self, id: &DepartmentId, draft: Department) -> Result<Department> {
        let old = self.require_department(id)?;
        let updated = draft.with_id(*id);
        let mut plan = WritePlan::new();

        let mut new_company = self.require_company(&updated.company_id())?;
        if updated.company_id() != old.company_id() {
            if let Some(mut prev) = self.store.companies().find(&old.company_id())? {
                prev.pull_department(id);
                plan.push(WriteOp::SaveCompany(prev));
            }
            new_company.push_department(*id);
            plan.push(WriteOp::SaveCompany(new_company));
        }

        let diff = relation_diff(old.employee_ids(), updated.employee_ids());
        self.plan_purge_employees(&diff.removed, &mut plan)?;

        let mut previous_departments: BTreeMap<Uuid, Department> = BTreeMap::new();
        for emp_id in &diff.added {
            let mut emp = self.require_employee(emp_id)?;
            let prev = emp.department_id();
            if prev != *id {
                if let Some(owner) = self.find_department_cached(&prev, &mut previous_departments)? {
                    owner.pull_employee(emp_id);
                }
            }
            emp.set_department(*id);
            plan.push(WriteOp::SaveEmployee(emp));
        }
        for owner in previous_departments.into_values() {
            plan.push(WriteOp::SaveDepartment(owner));
        }
        plan.push(WriteOp::SaveDepartment(updated.clone()));
        plan.execute(self.store)?;
        Ok(updated)
    }

    /// Baja de departamento: lo retira de la empresa dueña y elimina sus
    /// funcionarios en cascada.
    pub fn delete_department(&self, id: &DepartmentId) -> Result<Department> {
        let department = self.require_department(id)?;
        let mut plan = WritePlan::new();
        if let Some(mut company) = self.store.companies().find(&department.company_id())? {
            company.pull_department(id);
            plan.push(WriteOp::SaveCompany(company));
        }
        self.plan_purge_employees(department.employee_ids(), &mut plan)?;
        plan.push(WriteOp::DeleteDepartment(*id));
        plan.execute(self.store)?;
        Ok(department)
    }

    // ----- funcionarios -----

    /// Alta de funcionario. El departamento dueño debe existir, el email no
    /// puede repetirse y cada proyecto referido recibe la referencia
    /// inversa.
    pub fn create_employee(&self, draft: Employee) -> Result<EmployeeId> {
        let id = draft.id();
        let mut department = self.require_department(&draft.department_id())?;
        self.check_unique_email(draft.email(), None)?;
        let mut plan = WritePlan::new();
        for project_id in draft.project_ids() {
            let mut project = self.require_project(project_id)?;
            project.push_employee(id);
            plan.push(WriteOp::SaveProject(project));
        }
        department.push_employee(id);
        plan.push(WriteOp::SaveDepartment(department));
        plan.push(WriteOp::InsertEmployee(draft));
        plan.execute(self.store)?;
        Ok(id)
    }

    /// Cambio de funcionario. Proyectos son relación compartida: agregar o
    /// retirar sólo ajusta el vínculo en ambos lados.
    pub fn update_employee(&self, id: &EmployeeId, draft: Employee) -> Result<Employee> {
        let old = self.require_employee(id)?;
        let updated = draft.with_id(*id);
        self.check_unique_email(updated.email(), Some(*id))?;
        let mut plan = WritePlan::new();

        let mut new_department = self.require_department(&updated.department_id())?;
        if updated.department_id() != old.department_id() {
            if let Some(mut prev) = self.store.departments().find(&old.department_id())? {
                prev.pull_employee(id);
                plan.push(WriteOp::SaveDepartment(prev));
            }
            new_department.push_employee(*id);
            plan.push(WriteOp::SaveDepartment(new_department));
        }

        let diff = relation_diff(old.project_ids(), updated.project_ids());
        for project_id in &diff.removed {
            match self.store.projects().find(project_id)? {
                Some(mut project) => {
                    project.pull_employee(id);
                    plan.push(WriteOp::SaveProject(project));
                }
                None => log::warn!("proyecto {} ya ausente al reconciliar el funcionario {}", project_id, id),
            }
        }
        for project_id in &diff.added {
            let mut project = self.require_project(project_id)?;
            project.push_employee(*id);
            plan.push(WriteOp::SaveProject(project));
        }
        plan.push(WriteOp::SaveEmployee(updated.clone()));
        plan.execute(self.store)?;
        Ok(updated)
    }

    /// Baja de funcionario: limpia el vínculo en su departamento y en cada
    /// proyecto; no hay cascada (la relación con proyectos es compartida).
    pub fn delete_employee(&self, id: &EmployeeId) -> Result<Employee> {
        let employee = self.require_employee(id)?;
        let mut plan = WritePlan::new();
        if let Some(mut department) = self.store.departments().find(&employee.department_id())? {
            department.pull_employee(id);
            plan.push(WriteOp::SaveDepartment(department));
        }
        for project_id in employee.project_ids() {
            if let Some(mut project) = self.store.projects().find(project_id)? {
                project.pull_employee(id);
                plan.push(WriteOp::SaveProject(project));
            }
        }
        plan.push(WriteOp::DeleteEmployee(*id));
        plan.execute(self.store)?;
        Ok(employee)
    }

    // ----- clientes -----

    /// Alta de cliente. Cada proyecto referido debe existir; los que
    /// pertenecían a otro cliente se reasignan.
    pub fn create_client(&self, draft: Client) -> Result<ClientId> {
        let id = draft.id();
        let mut plan = WritePlan::new();
        let mut previous_owners: BTreeMap<Uuid, Client> = BTreeMap::new();
        for project_id in draft.project_ids() {
            let mut project = self.require_project(project_id)?;
            let prev = project.client_id();
            if prev != id {
                if let Some(owner) = self.find_client_cached(&prev, &mut previous_owners)? {
                    owner.pull_project(project_id);
                }
                project.set_client(id);
                plan.push(WriteOp::SaveProject(project));
            }
        }
        for owner in previous_owners.into_values() {
            plan.push(WriteOp::SaveClient(owner));
        }
        plan.push(WriteOp::InsertClient(draft));
        plan.execute(self.store)?;
        Ok(id)
    }

    /// Cambio de cliente. Proyectos retirados se eliminan en cascada (con su
    /// contrato); los agregados se reasignan desde su cliente anterior.
    pub fn update_client(&self, id: &ClientId, draft: Client) -> Result<Client> {
        let old = self.require_client(id)?;
        let updated = draft.with_id(*id);
        let mut plan = WritePlan::new();

        let diff = relation_diff(old.project_ids(), updated.project_ids());
        let mut doomed: Vec<Project> = Vec::new();
        for project_id in &diff.removed {
            match self.store.projects().find(project_id)? {
                Some(project) => doomed.push(project),
                None => log::warn!("proyecto {} ya ausente al reconciliar el cliente {}", project_id, id),
            }
        }
        self.plan_purge_projects(&doomed, &mut plan)?;

        let mut previous_owners: BTreeMap<Uuid, Client> = BTreeMap::new();
        for project_id in &diff.added {
            let mut project = self.require_project(project_id)?;
            let prev = project.client_id();
            if prev != *id {
                if let Some(owner) = self.find_client_cached(&prev, &mut previous_owners)? {
                    owner.pull_project(project_id);
                }
            }
            project.set_client(*id);
            plan.push(WriteOp::SaveProject(project));
        }
        for owner in previous_owners.into_values() {
            plan.push(WriteOp::SaveClient(owner));
        }
        plan.push(WriteOp::SaveClient(updated.clone()));
        plan.execute(self.store)?;
        Ok(updated)
    }

    /// Baja de cliente: elimina en cascada sus proyectos y los contratos de
    /// éstos.
    pub fn delete_client(&self, id: &ClientId) -> Result<Client> {
        let client = self.require_client(id)?;
        let mut plan = WritePlan::new();
        let mut owned: Vec<Project> = Vec::new();
        for project_id in client.project_ids() {
            match self.store.projects().find(project_id)? {
                Some(project) => owned.push(project),
                None => log::warn!("proyecto {} ya ausente al eliminar el cliente {}", project_id, id),
            }
        }
        self.plan_purge_projects(&owned, &mut plan)?;
        plan.push(WriteOp::DeleteClient(*id));
        plan.execute(self.store)?;
        Ok(client)
    }

    // ----- proyectos -----

    /// Alta de proyecto. El cliente dueño debe existir y recibe la
    /// referencia; los funcionarios referidos reciben el vínculo inverso. Un
    /// proyecto no puede nacer apuntando a un contrato: el vínculo se crea
    /// al crear el contrato.
    pub fn create_project(&self, draft: Project) -> Result<ProjectId> {
        if draft.contract_id().is_some() {
            return Err(DomainError::Validation("El contrato se asocia al crear el contrato, no al crear el proyecto".to_string()));
        }
        let id = draft.id();
        let mut client = self.require_client(&draft.client_id())?;
        let mut plan = WritePlan::new();
        for emp_id in draft.employee_ids() {
            let mut emp = self.require_employee(emp_id)?;
            emp.push_project(id);
            plan.push(WriteOp::SaveEmployee(emp));
        }
        client.push_project(id);
        plan.push(WriteOp::SaveClient(client));
        plan.push(WriteOp::InsertProject(draft));
        plan.execute(self.store)?;
        Ok(id)
    }

    /// Cambio de proyecto. Cambiar el contrato a otro distinto es un
    /// conflicto (vínculo uno-a-uno inmutable); dejarlo en `None` elimina el
    /// contrato existente. Cliente y funcionarios se reconcilian como en las
    /// demás operaciones.
    pub fn update_project(&self, id: &ProjectId, draft: Project) -> Result<Project> {
        let old = self.require_project(id)?;
        let updated = draft.with_id(*id);
        let mut plan = WritePlan::new();

        match (old.contract_id(), updated.contract_id()) {
            (Some(contract_id), None) => {
                if self.store.contracts().find(&contract_id)?.is_some() {
                    plan.push(WriteOp::DeleteContract(contract_id));
                }
            }
            (Some(a), Some(b)) if a != b => {
                return Err(DomainError::Conflict("No es posible cambiar el contrato de un proyecto".to_string()));
            }
            (None, Some(_)) => {
                return Err(DomainError::Conflict("El contrato se asocia al crear el contrato".to_string()));
            }
            _ => {}
        }

        let mut new_client = self.require_client(&updated.client_id())?;
        if updated.client_id() != old.client_id() {
            if let Some(mut prev) = self.store.clients().find(&old.client_id())? {
                prev.pull_project(id);
                plan.push(WriteOp::SaveClient(prev));
            }
            new_client.push_project(*id);
            plan.push(WriteOp::SaveClient(new_client));
        }

        let diff = relation_diff(old.employee_ids(), updated.employee_ids());
        for emp_id in &diff.removed {
            match self.store.employees().find(emp_id)? {
                Some(mut emp) => {
                    emp.pull_project(id);
                    plan.push(WriteOp::SaveEmployee(emp));
                }
                None => log::warn!("funcionario {} ya ausente al reconciliar el proyecto {}", emp_id, id),
            }
        }
        for emp_id in &diff.added {
            let mut emp = self.require_employee(emp_id)?;
            emp.push_project(*id);
            plan.push(WriteOp::SaveEmployee(emp));
        }
        plan.push(WriteOp::SaveProject(updated.clone()));
        plan.execute(self.store)?;
        Ok(updated)
    }

    /// Baja de proyecto: lo retira del cliente, elimina su contrato (si hay)
    /// y limpia el vínculo en cada funcionario.
    pub fn delete_project(&self, id: &ProjectId) -> Result<Project> {
        let project = self.require_project(id)?;
        let mut plan = WritePlan::new();
        if let Some(mut client) = self.store.clients().find(&project.client_id())? {
            client.pull_project(id);
            plan.push(WriteOp::SaveClient(client));
        }
        if let Some(contract_id) = project.contract_id() {
            if self.store.contracts().find(&contract_id)?.is_some() {
                plan.push(WriteOp::DeleteContract(contract_id));
            }
        }
        for emp_id in project.employee_ids() {
            if let Some(mut emp) = self.store.employees().find(emp_id)? {
                emp.pull_project(id);
                plan.push(WriteOp::SaveEmployee(emp));
            }
        }
        plan.push(WriteOp::DeleteProject(*id));
        plan.execute(self.store)?;
        Ok(project)
    }

    // ----- contratos -----

    /// Alta de contrato. El proyecto debe existir (si no, `NotFound` y no se
    /// persiste nada) y no puede tener ya otro contrato.
    pub fn create_contract(&self, draft: Contract) -> Result<ContractId> {
        let id = draft.id();
        let mut project = self.require_project(&draft.project_id())?;
        if project.contract_id().is_some() {
            return Err(DomainError::Conflict(format!("El proyecto {} ya tiene un contrato", project.id())));
        }
        let mut plan = WritePlan::new();
        project.set_contract(Some(id));
        plan.push(WriteOp::SaveProject(project));
        plan.push(WriteOp::InsertContract(draft));
        plan.execute(self.store)?;
        Ok(id)
    }

    /// Cambio de contrato. El proyecto dueño es inmutable.
    pub fn update_contract(&self, id: &ContractId, draft: Contract) -> Result<Contract> {
        let old = self.require_contract(id)?;
        if draft.project_id() != old.project_id() {
            return Err(DomainError::Conflict("No es posible cambiar el proyecto de un contrato".to_string()));
        }
        let updated = draft.with_id(*id);
        let mut plan = WritePlan::new();
        plan.push(WriteOp::SaveContract(updated.clone()));
        plan.execute(self.store)?;
        Ok(updated)
    }

    /// Baja de contrato: limpia la referencia en el proyecto dueño.
    pub fn delete_contract(&self, id: &ContractId) -> Result<Contract> {
        let contract = self.require_contract(id)?;
        let mut plan = WritePlan::new();
        if let Some(mut project) = self.store.projects().find(&contract.project_id())? {
            project.set_contract(None);
            plan.push(WriteOp::SaveProject(project));
        }
        plan.push(WriteOp::DeleteContract(*id));
        plan.execute(self.store)?;
        Ok(contract)
    }

    // ----- caches locales de dueños anteriores -----
    //
    // Varios ids agregados pueden compartir el mismo dueño anterior; cada
    // dueño se carga una sola vez y se escribe una sola vez con todos los
    // retiros aplicados. Un dueño anterior ausente no es error: la fila que
    // lo referenciaba se está reasignando de todos modos.

    fn find_company_cached<'b>(&self,
                               id: &CompanyId,
                               cache: &'b mut BTreeMap<Uuid, Company>)
                               -> Result<Option<&'b mut Company>> {
        if !cache.contains_key(&id.raw()) {
            match self.store.companies().find(id)? {
                Some(company) => {
                    cache.insert(id.raw(), company);
                }
                None => return Ok(None),
            }
        }
        Ok(cache.get_mut(&id.raw()))
    }

    fn find_department_cached<'b>(&self,
                                  id: &DepartmentId,
                                  cache: &'b mut BTreeMap<Uuid, Department>)
                                  -> Result<Option<&'b mut Department>> {
        if !cache.contains_key(&id.raw()) {
            match self.store.departments().find(id)? {
                Some(department) => {
                    cache.insert(id.raw(), department);
                }
                None => return Ok(None),
            }
        }
        Ok(cache.get_mut(&id.raw()))
    }

    fn find_client_cached<'b>(&self,
                              id: &ClientId,
                              cache: &'b mut BTreeMap<Uuid, Client>)
                              -> Result<Option<&'b mut Client>> {
        if !cache.contains_key(&id.raw()) {
            match self.store.clients().find(id)? {
                Some(client) => {
                    cache.insert(id.raw(), client);
                }
                None => return Ok(None),
            }
        }
        Ok(cache.get_mut(&id.raw()))
    }
}
