use gestion_domain::{Client, Company, Contract, Department, DomainError, Employee, Project};
use gestion_domain::{ClientId, CompanyId, DepartmentId, ProjectId};
use recon::reconciler::Reconciler;
use recon::store::EntityStore;
use recon::stubs::InMemoryStore;

fn empresa(nombre: &str) -> Company {
  Company::new(nombre, "12345678000190", "Razón Social SA", "Fantasía", "contato@empresa.com", vec![]).unwrap()
}

fn departamento(nombre: &str, company_id: CompanyId) -> Department {
  Department::new(nombre, 250_000.0, "activo", company_id, vec![]).unwrap()
}

fn funcionario(email: &str, department_id: DepartmentId) -> Employee {
  Employee::new(email, "Ana Lima", "Dev", 9000.0, "+55 11 98888-0000", department_id, vec![]).unwrap()
}

fn cliente(nombre: &str) -> Client {
  Client::new(nombre, "12345678000190", "Cliente SA", "Cliente", "compras@cliente.com", vec![]).unwrap()
}

fn proyecto(nombre: &str, client_id: ClientId) -> Project {
  Project::new(nombre, "Descripción del proyecto", vec![], None, client_id).unwrap()
}

fn contrato(project_id: ProjectId) -> Contract {
  let desde = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
  Contract::new("Soporte y mantenimiento", "activo", desde, None, 12, 120_000.0, "BRL", project_id).unwrap()
}

#[test]
fn delete_department_cascades_employees_out_of_projects() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d = recon.create_department(departamento("Ingeniería", c)).unwrap();
  let e1 = recon.create_employee(funcionario("e1@acme.com", d)).unwrap();
  let e2 = recon.create_employee(funcionario("e2@acme.com", d)).unwrap();

  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p = {
    let draft = Project::new("Website", "Portal institucional", vec![e1, e2], None, cl).unwrap();
    recon.create_project(draft).unwrap()
  };
  assert_eq!(store.projects().find(&p).unwrap().unwrap().employee_ids().len(), 2);

  recon.delete_department(&d).unwrap();

  // funcionarios eliminados y retirados del proyecto
  assert!(store.employees().find(&e1).unwrap().is_none());
  assert!(store.employees().find(&e2).unwrap().is_none());
  assert!(store.projects().find(&p).unwrap().unwrap().employee_ids().is_empty());
  // el departamento ya no figura en la empresa
  assert!(store.companies().find(&c).unwrap().unwrap().department_ids().is_empty());
  assert!(store.departments().find(&d).unwrap().is_none());
}

#[test]
fn unlinking_shared_project_keeps_both_alive() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d = recon.create_department(departamento("Ingeniería", c)).unwrap();
  let e1 = recon.create_employee(funcionario("e1@acme.com", d)).unwrap();
  let e2 = recon.create_employee(funcionario("e2@acme.com", d)).unwrap();
  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p1 = recon.create_project(Project::new("P1", "d", vec![e1, e2], None, cl).unwrap()).unwrap();
  let p2 = recon.create_project(Project::new("P2", "d", vec![e1], None, cl).unwrap()).unwrap();

  // retirar p1 de los proyectos de e1
  let actual = store.employees().find(&e1).unwrap().unwrap();
  let draft = Employee::new("e1@acme.com", "Ana Lima", "Dev", 9000.0, "tel", d, vec![p2]).unwrap();
  recon.update_employee(&actual.id(), draft).unwrap();

  // e1 sigue vivo, p1 conserva a e2, p2 conserva a e1
  assert!(store.employees().find(&e1).unwrap().is_some());
  let p1_doc = store.projects().find(&p1).unwrap().unwrap();
  assert_eq!(p1_doc.employee_ids(), &[e2]);
  let p2_doc = store.projects().find(&p2).unwrap().unwrap();
  assert_eq!(p2_doc.employee_ids(), &[e1]);
}

#[test]
fn moving_department_between_companies_leaves_single_owner() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c1 = recon.create_company(empresa("Acme")).unwrap();
  let c2 = recon.create_company(empresa("Initech")).unwrap();
  let d = recon.create_department(departamento("Ventas", c1)).unwrap();

  // mover el departamento reescribiendo su empresa dueña
  let draft = Department::new("Ventas", 250_000.0, "activo", c2, vec![]).unwrap();
  recon.update_department(&d, draft).unwrap();

  let c1_doc = store.companies().find(&c1).unwrap().unwrap();
  let c2_doc = store.companies().find(&c2).unwrap().unwrap();
  assert!(c1_doc.department_ids().is_empty());
  assert_eq!(c2_doc.department_ids(), &[d]);
  assert_eq!(store.departments().find(&d).unwrap().unwrap().company_id(), c2);
}

#[test]
fn adding_department_via_company_update_reassigns_it() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c1 = recon.create_company(empresa("Acme")).unwrap();
  let c2 = recon.create_company(empresa("Initech")).unwrap();
  let d = recon.create_department(departamento("Ventas", c1)).unwrap();

  // la empresa c2 reclama el departamento en su propia lista
  let draft = Company::from_parts(c2, "Initech", "12345678000190", "Initech SA", "Initech", "c@initech.com", vec![d]).unwrap();
  recon.update_company(&c2, draft).unwrap();

  assert!(store.companies().find(&c1).unwrap().unwrap().department_ids().is_empty());
  assert_eq!(store.companies().find(&c2).unwrap().unwrap().department_ids(), &[d]);
  assert_eq!(store.departments().find(&d).unwrap().unwrap().company_id(), c2);
}

#[test]
fn update_with_same_relations_is_idempotent() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d = recon.create_department(departamento("Ingeniería", c)).unwrap();
  let e = recon.create_employee(funcionario("e@acme.com", d)).unwrap();
  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p = recon.create_project(Project::new("P", "d", vec![e], None, cl).unwrap()).unwrap();

  let draft = Employee::new("e@acme.com", "Ana Lima", "Dev", 9500.0, "tel", d, vec![p]).unwrap();
  recon.update_employee(&e, draft.clone()).unwrap();
  recon.update_employee(&e, draft).unwrap();

  // sin duplicaciones ni retiros espurios en ninguno de los dos lados
  assert_eq!(store.projects().find(&p).unwrap().unwrap().employee_ids(), &[e]);
  assert_eq!(store.employees().find(&e).unwrap().unwrap().project_ids(), &[p]);
  assert_eq!(store.departments().find(&d).unwrap().unwrap().employee_ids(), &[e]);
}

#[test]
fn reordered_relation_list_triggers_no_work() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d = recon.create_department(departamento("Ingeniería", c)).unwrap();
  let e1 = recon.create_employee(funcionario("e1@acme.com", d)).unwrap();
  let e2 = recon.create_employee(funcionario("e2@acme.com", d)).unwrap();

  // misma lista de funcionarios en otro orden: nadie debe ser eliminado
  let draft = Department::new("Ingeniería", 250_000.0, "activo", c, vec![e2, e1]).unwrap();
  recon.update_department(&d, draft).unwrap();

  assert!(store.employees().find(&e1).unwrap().is_some());
  assert!(store.employees().find(&e2).unwrap().is_some());
}

#[test]
fn contract_for_missing_project_persists_nothing() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let draft = contrato(ProjectId::new());
  match recon.create_contract(draft) {
    Err(DomainError::NotFound(_)) => {}
    other => panic!("se esperaba NotFound, se obtuvo {:?}", other),
  }
  assert_eq!(store.contracts().count().unwrap(), 0);
}

#[test]
fn contract_lifecycle_keeps_one_to_one_link() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p1 = recon.create_project(proyecto("P1", cl)).unwrap();
  let p2 = recon.create_project(proyecto("P2", cl)).unwrap();
  let k = recon.create_contract(contrato(p1)).unwrap();

  assert_eq!(store.projects().find(&p1).unwrap().unwrap().contract_id(), Some(k));

  // segundo contrato sobre el mismo proyecto: conflicto
  assert!(matches!(recon.create_contract(contrato(p1)), Err(DomainError::Conflict(_))));

  // el proyecto dueño es inmutable
  let draft = contrato(p2).with_id(k);
  assert!(matches!(recon.update_contract(&k, draft), Err(DomainError::Conflict(_))));

  // la baja del contrato limpia la referencia del proyecto
  recon.delete_contract(&k).unwrap();
  assert_eq!(store.projects().find(&p1).unwrap().unwrap().contract_id(), None);
}

#[test]
fn dropping_contract_from_project_deletes_it() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p = recon.create_project(proyecto("P", cl)).unwrap();
  let k = recon.create_contract(contrato(p)).unwrap();

  // actualizar el proyecto dejando el contrato en None lo elimina
  let draft = Project::new("P", "Descripción del proyecto", vec![], None, cl).unwrap();
  recon.update_project(&p, draft).unwrap();
  assert!(store.contracts().find(&k).unwrap().is_none());
}

#[test]
fn project_cannot_be_created_pointing_at_a_contract() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p = recon.create_project(proyecto("P", cl)).unwrap();
  let k = recon.create_contract(contrato(p)).unwrap();

  let draft = Project::new("Otro", "d", vec![], Some(k), cl).unwrap();
  assert!(matches!(recon.create_project(draft), Err(DomainError::Validation(_))));
}

#[test]
fn deleting_client_cascades_projects_and_contracts() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d = recon.create_department(departamento("Ingeniería", c)).unwrap();
  let e = recon.create_employee(funcionario("e@acme.com", d)).unwrap();
  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p = recon.create_project(Project::new("P", "d", vec![e], None, cl).unwrap()).unwrap();
  let k = recon.create_contract(contrato(p)).unwrap();

  recon.delete_client(&cl).unwrap();

  assert!(store.clients().find(&cl).unwrap().is_none());
  assert!(store.projects().find(&p).unwrap().is_none());
  assert!(store.contracts().find(&k).unwrap().is_none());
  // el funcionario persiste pero sin el vínculo
  let e_doc = store.employees().find(&e).unwrap().unwrap();
  assert!(e_doc.project_ids().is_empty());
}

#[test]
fn strict_policy_rejects_unknown_relation_ids_without_writes() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d = recon.create_department(departamento("Ingeniería", c)).unwrap();
  let e = recon.create_employee(funcionario("e@acme.com", d)).unwrap();
  let cl = recon.create_client(cliente("Globex")).unwrap();

  // proyecto que refiere un funcionario inexistente: nada se persiste
  let fantasma = gestion_domain::EmployeeId::new();
  let draft = Project::new("P", "d", vec![e, fantasma], None, cl).unwrap();
  match recon.create_project(draft) {
    Err(DomainError::NotFound(_)) => {}
    other => panic!("se esperaba NotFound, se obtuvo {:?}", other),
  }
  assert_eq!(store.projects().count().unwrap(), 0);
  // el funcionario existente no fue tocado
  assert!(store.employees().find(&e).unwrap().unwrap().project_ids().is_empty());
  assert!(store.clients().find(&cl).unwrap().unwrap().project_ids().is_empty());
}

#[test]
fn duplicate_employee_email_is_a_conflict() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d = recon.create_department(departamento("Ingeniería", c)).unwrap();
  recon.create_employee(funcionario("ana@acme.com", d)).unwrap();

  match recon.create_employee(funcionario("ANA@acme.com", d)) {
    Err(DomainError::Conflict(_)) => {}
    other => panic!("se esperaba Conflict, se obtuvo {:?}", other),
  }
  assert_eq!(store.employees().count().unwrap(), 1);
}

#[test]
fn deleting_company_takes_departments_and_employees_along() {
  let store = InMemoryStore::new();
  let recon = Reconciler::new(&store);

  let c = recon.create_company(empresa("Acme")).unwrap();
  let d1 = recon.create_department(departamento("Ingeniería", c)).unwrap();
  let d2 = recon.create_department(departamento("Ventas", c)).unwrap();
  let e1 = recon.create_employee(funcionario("e1@acme.com", d1)).unwrap();
  let e2 = recon.create_employee(funcionario("e2@acme.com", d2)).unwrap();
  let cl = recon.create_client(cliente("Globex")).unwrap();
  let p = recon.create_project(Project::new("P", "d", vec![e1, e2], None, cl).unwrap()).unwrap();

  recon.delete_company(&c).unwrap();

  assert!(store.companies().find(&c).unwrap().is_none());
  assert!(store.departments().find(&d1).unwrap().is_none());
  assert!(store.departments().find(&d2).unwrap().is_none());
  assert!(store.employees().find(&e1).unwrap().is_none());
  assert!(store.employees().find(&e2).unwrap().is_none());
  assert!(store.projects().find(&p).unwrap().unwrap().employee_ids().is_empty());
}
