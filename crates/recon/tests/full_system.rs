use gestion_domain::{Client, Company, Contract, Department, DomainError, Employee, Project, TypedId};
use recon::service::GestionService;
use recon::stubs::InMemoryStore;
use std::sync::Arc;

fn servicio() -> GestionService<InMemoryStore> {
  GestionService::new(Arc::new(InMemoryStore::new()))
}

#[test]
fn client_detailed_view_follows_project_lifecycle() {
  let svc = servicio();

  // crear Cliente {nome: "Acme", projetos: []}
  let c1 = svc.create_client(Client::new("Acme", "12345678901", "Acme Ltda", "Acme", "acme@cliente.com", vec![]).unwrap())
              .unwrap();

  // crear Proyecto {nome: "Website", cliente_id: c1}
  let p1 = svc.create_project(Project::new("Website", "Sitio institucional", vec![], None, c1).unwrap())
              .unwrap();

  // la vista detallada del cliente ahora embebe el proyecto
  let detalle = svc.client_detailed(&c1).unwrap();
  assert_eq!(detalle.projects.len(), 1);
  assert_eq!(detalle.projects[0].id, p1.external());
  assert_eq!(detalle.projects[0].client_id, c1.external());

  // al eliminar el proyecto la lista queda vacía
  svc.delete_project(&p1).unwrap();
  let detalle = svc.client_detailed(&c1).unwrap();
  assert!(detalle.projects.is_empty());
  assert!(detalle.client.project_ids.is_empty());
}

#[test]
fn detailed_views_expose_only_external_string_ids() {
  let svc = servicio();

  let c = svc.create_company(Company::new("Acme", "12345678000190", "Acme SA", "Acme", "c@acme.com", vec![]).unwrap())
             .unwrap();
  let d = svc.create_department(Department::new("Ingeniería", 100_000.0, "activo", c, vec![]).unwrap())
             .unwrap();
  let e = svc.create_employee(Employee::new("ana@acme.com", "Ana", "Dev", 9000.0, "tel", d, vec![]).unwrap())
             .unwrap();

  let detalle = svc.department_detailed(&d).unwrap();
  assert_eq!(detalle.department.id, d.external());
  let empresa = detalle.company.clone().expect("la empresa dueña debe venir embebida");
  assert_eq!(empresa.id, c.external());
  // ids anidados dentro de la relación embebida, también en forma externa
  assert_eq!(empresa.department_ids, vec![d.external()]);
  assert_eq!(detalle.employees.len(), 1);
  assert_eq!(detalle.employees[0].id, e.external());
  assert_eq!(detalle.employees[0].department_id, d.external());

  // la serialización no deja ningún campo con forma interna
  let json = serde_json::to_value(&detalle).unwrap();
  assert_eq!(json["company"]["id"], serde_json::json!(c.external()));
  assert_eq!(json["employees"][0]["department_id"], serde_json::json!(d.external()));
}

#[test]
fn project_detailed_embeds_client_contract_and_employees() {
  let svc = servicio();

  let c = svc.create_company(Company::new("Acme", "12345678000190", "Acme SA", "Acme", "c@acme.com", vec![]).unwrap())
             .unwrap();
  let d = svc.create_department(Department::new("Ingeniería", 100_000.0, "activo", c, vec![]).unwrap())
             .unwrap();
  let e = svc.create_employee(Employee::new("ana@acme.com", "Ana", "Dev", 9000.0, "tel", d, vec![]).unwrap())
             .unwrap();
  let cl = svc.create_client(Client::new("Globex", "12345678901", "Globex SA", "Globex", "g@g.com", vec![]).unwrap())
              .unwrap();
  let p = svc.create_project(Project::new("Website", "Portal", vec![e], None, cl).unwrap()).unwrap();
  let desde = chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
  let k = svc.create_contract(Contract::new("Soporte", "activo", desde, None, 5, 50_000.0, "BRL", p).unwrap())
             .unwrap();

  let detalle = svc.project_detailed(&p).unwrap();
  assert_eq!(detalle.client.unwrap().id, cl.external());
  assert_eq!(detalle.contract.unwrap().id, k.external());
  assert_eq!(detalle.employees[0].id, e.external());

  let contrato = svc.contract_detailed(&k).unwrap();
  assert_eq!(contrato.project.unwrap().id, p.external());
}

#[test]
fn paginated_listing_validates_limit_and_clamps_page() {
  let svc = servicio();
  for i in 0..7 {
    svc.create_client(Client::new(&format!("Cliente {}", i), "12345678901", "Razón", "Fantasía", "c@c.com", vec![]).unwrap())
       .unwrap();
  }

  match svc.list_clients_detailed(0, 0) {
    Err(DomainError::Validation(_)) => {}
    other => panic!("se esperaba Validation, se obtuvo {:?}", other),
  }
  assert!(matches!(svc.list_clients_detailed(1, -3), Err(DomainError::Validation(_))));

  // página negativa equivale a la primera
  let primera = svc.list_clients_detailed(-2, 3).unwrap();
  assert_eq!(primera.len(), 3);

  // paginación estable: sin solapamiento entre páginas consecutivas
  let segunda = svc.list_clients_detailed(1, 3).unwrap();
  let tercera = svc.list_clients_detailed(2, 3).unwrap();
  assert_eq!(segunda.len(), 3);
  assert_eq!(tercera.len(), 1);
  let mut vistos: Vec<String> = Vec::new();
  for pagina in [&primera, &segunda, &tercera] {
    for c in pagina.iter() {
      assert!(!vistos.contains(&c.client.id));
      vistos.push(c.client.id.clone());
    }
  }
  assert_eq!(vistos.len(), 7);
}

#[test]
fn counts_and_name_filters() {
  let svc = servicio();
  let c = svc.create_company(Company::new("Acme Corporación", "12345678000190", "Acme SA", "Acme", "c@acme.com", vec![]).unwrap())
             .unwrap();
  svc.create_department(Department::new("Ingeniería de Datos", 10_000.0, "activo", c, vec![]).unwrap())
     .unwrap();
  svc.create_department(Department::new("Ventas", 5_000.0, "activo", c, vec![]).unwrap())
     .unwrap();

  assert_eq!(svc.count_companies().unwrap(), 1);
  assert_eq!(svc.count_departments().unwrap(), 2);
  assert_eq!(svc.count_contracts().unwrap(), 0);

  let encontrados = svc.find_departments_by_name("ingeniería").unwrap();
  assert_eq!(encontrados.len(), 1);
  assert_eq!(encontrados[0].name(), "Ingeniería de Datos");
  assert!(svc.find_companies_by_name("acme").unwrap().len() == 1);
  assert!(svc.find_companies_by_name("globex").unwrap().is_empty());
}
