use gestion_domain::{Client, Company, Contract, Department, DomainError, Employee, Project, TypedId};
use gestion_persistence::DieselEntityStore;
use recon::service::GestionService;
use recon::store::EntityStore;
use std::sync::Arc;
use uuid::Uuid;

// Base SQLite en archivo temporal para evitar problemas de URI en distintos
// builds de sqlite. Cada test usa su propio archivo.
fn store_temporal() -> (DieselEntityStore, std::path::PathBuf) {
  let tmp_path = std::env::temp_dir().join(format!("gestion_test_{}.db", Uuid::new_v4()));
  let store = DieselEntityStore::new(tmp_path.to_str().unwrap()).expect("no se pudo crear el store");
  (store, tmp_path)
}

#[test]
fn diesel_store_roundtrips_entities_at_the_boundary() {
  if cfg!(feature = "pg") {
    eprintln!("test sólo-sqlite omitido porque la feature 'pg' está habilitada");
    return;
  }
  let (store, tmp_path) = store_temporal();

  let company = Company::new("Acme", "12345678000190", "Acme SA", "Acme", "c@acme.com", vec![]).unwrap();
  store.companies().insert(company.clone()).unwrap();
  let leida = store.companies().find(&company.id()).unwrap().expect("la empresa debe existir");
  assert_eq!(leida, company);

  // actualización por id
  let mut con_relacion = leida.clone();
  con_relacion.push_department(gestion_domain::DepartmentId::new());
  store.companies().save(con_relacion.clone()).unwrap();
  let releida = store.companies().find(&company.id()).unwrap().unwrap();
  assert_eq!(releida.department_ids(), con_relacion.department_ids());

  // baja y NotFound posterior
  store.companies().delete(&company.id()).unwrap();
  assert!(store.companies().find(&company.id()).unwrap().is_none());
  assert!(matches!(store.companies().delete(&company.id()), Err(DomainError::NotFound(_))));

  let _ = std::fs::remove_file(tmp_path);
}

#[test]
fn reconciled_lifecycle_over_diesel_store() {
  if cfg!(feature = "pg") {
    eprintln!("test sólo-sqlite omitido porque la feature 'pg' está habilitada");
    return;
  }
  let (store, tmp_path) = store_temporal();
  let svc = GestionService::new(Arc::new(store));

  let c = svc.create_company(Company::new("Acme", "12345678000190", "Acme SA", "Acme", "c@acme.com", vec![]).unwrap())
             .unwrap();
  let d = svc.create_department(Department::new("Ingeniería", 100_000.0, "activo", c, vec![]).unwrap())
             .unwrap();
  let e = svc.create_employee(Employee::new("ana@acme.com", "Ana", "Dev", 9000.0, "tel", d, vec![]).unwrap())
             .unwrap();
  let cl = svc.create_client(Client::new("Globex", "12345678901", "Globex SA", "Globex", "g@g.com", vec![]).unwrap())
              .unwrap();
  let p = svc.create_project(Project::new("Website", "Portal", vec![e], None, cl).unwrap()).unwrap();
  let desde = chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
  let k = svc.create_contract(Contract::new("Soporte", "activo", desde, None, 3, 30_000.0, "BRL", p).unwrap())
             .unwrap();

  // las referencias inversas quedaron escritas en la base
  let detalle = svc.project_detailed(&p).unwrap();
  assert_eq!(detalle.contract.as_ref().unwrap().id, k.external());
  assert_eq!(detalle.employees.len(), 1);

  // contrato sobre proyecto inexistente: NotFound y nada persistido
  let fantasma = gestion_domain::ProjectId::new();
  let r = svc.create_contract(Contract::new("Otro", "activo", desde, None, 1, 1.0, "BRL", fantasma).unwrap());
  assert!(matches!(r, Err(DomainError::NotFound(_))));
  assert_eq!(svc.count_contracts().unwrap(), 1);

  // la cascada del departamento también funciona sobre Diesel
  svc.delete_department(&d).unwrap();
  assert_eq!(svc.count_employees().unwrap(), 0);
  let detalle = svc.project_detailed(&p).unwrap();
  assert!(detalle.employees.is_empty());
  assert!(detalle.project.employee_ids.is_empty());

  let _ = std::fs::remove_file(tmp_path);
}

#[test]
fn duplicate_email_hits_the_unique_index() {
  if cfg!(feature = "pg") {
    eprintln!("test sólo-sqlite omitido porque la feature 'pg' está habilitada");
    return;
  }
  let (store, tmp_path) = store_temporal();
  let svc = GestionService::new(Arc::new(store));

  let c = svc.create_company(Company::new("Acme", "12345678000190", "Acme SA", "Acme", "c@acme.com", vec![]).unwrap())
             .unwrap();
  let d = svc.create_department(Department::new("Ingeniería", 100_000.0, "activo", c, vec![]).unwrap())
             .unwrap();
  svc.create_employee(Employee::new("ana@acme.com", "Ana", "Dev", 9000.0, "tel", d, vec![]).unwrap())
     .unwrap();
  let r = svc.create_employee(Employee::new("ana@acme.com", "Otra Ana", "QA", 8000.0, "tel", d, vec![]).unwrap());
  assert!(matches!(r, Err(DomainError::Conflict(_))));

  let _ = std::fs::remove_file(tmp_path);
}

#[test]
fn listing_is_stable_and_paginated_over_diesel() {
  if cfg!(feature = "pg") {
    eprintln!("test sólo-sqlite omitido porque la feature 'pg' está habilitada");
    return;
  }
  let (store, tmp_path) = store_temporal();

  for i in 0..5 {
    let c = Client::new(&format!("Cliente {}", i), "12345678901", "Razón", "Fantasía", "c@c.com", vec![]).unwrap();
    store.clients().insert(c).unwrap();
  }
  let todos = store.clients().all().unwrap();
  assert_eq!(todos.len(), 5);
  let externos: Vec<String> = todos.iter().map(|c| c.id().external()).collect();
  let ordenados = {
    let mut v = externos.clone();
    v.sort();
    v
  };
  assert_eq!(externos, ordenados);

  let pagina = store.clients().list(2, 2).unwrap();
  assert_eq!(pagina.len(), 2);
  assert_eq!(pagina[0].id(), todos[2].id());

  let _ = std::fs::remove_file(tmp_path);
}
