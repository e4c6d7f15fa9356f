use gestion_domain::{Company, CompanyId, Department, DepartmentId};
use recon::service::GestionService;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;

/// Pequeño menú interactivo para administrar el dominio de gestión usando
/// el store provisto por `gestion-persistence`.
///
/// Opciones soportadas:
/// 1) Ver empresas (tabla con id y nombre)
/// 2) Crear empresa
/// 3) Crear departamento en una empresa
/// 4) Ver empresa detallada (JSON)
/// 5) Eliminar departamento (cascada sobre sus funcionarios)
/// 6) Ver conteos por colección
/// 7) Salir
fn main() -> Result<(), Box<dyn Error>> {
    // Inicializar store (aplica migraciones embebidas si procede)
    let store = gestion_persistence::new_from_env().map_err(|e| Box::new(e) as Box<dyn Error>)?;
    let service = GestionService::new(Arc::new(store));

    loop {
        println!("\n== Gestión CLI ==");
        println!("1) Ver empresas");
        println!("2) Crear empresa");
        println!("3) Crear departamento");
        println!("4) Ver empresa detallada");
        println!("5) Eliminar departamento");
        println!("6) Ver conteos");
        println!("7) Salir");
        print!("Elige una opción: ");
        io::stdout().flush().ok();

        let mut choice = String::new();
        io::stdin().read_line(&mut choice)?;
        match choice.trim() {
            "1" => {
                match service.list_companies_detailed(0, 50) {
                    Ok(empresas) => {
                        println!("\nID                                   | NOMBRE               | DEPARTAMENTOS");
                        println!("--------------------------------------------------------------------------");
                        for e in empresas {
                            println!("{} | {:20} | {}", e.company.id, e.company.name, e.departments.len());
                        }
                    }
                    Err(e) => eprintln!("Error listando empresas: {}", e),
                }
            }
            "2" => {
                let nombre = prompt("Nombre: ")?;
                let cnpj = prompt("CNPJ (14 dígitos): ")?;
                let razon = prompt("Razón social: ")?;
                let fantasia = prompt("Nombre de fantasía: ")?;
                let email = prompt("Email de contacto: ")?;
                let draft = match Company::new(nombre.trim(), cnpj.trim(), razon.trim(), fantasia.trim(), email.trim(), vec![]) {
                    Ok(c) => c,
                    Err(e) => { eprintln!("Datos inválidos: {}", e); continue; }
                };
                match service.create_company(draft) {
                    Ok(id) => println!("Empresa creada: {}", id),
                    Err(e) => eprintln!("Error creando empresa: {}", e),
                }
            }
            "3" => {
                let empresa = prompt("Id de la empresa dueña: ")?;
                let empresa_id = match CompanyId::parse_external(&empresa) {
                    Ok(id) => id,
                    Err(e) => { eprintln!("{}", e); continue; }
                };
                let nombre = prompt("Nombre del departamento: ")?;
                let presupuesto_s = prompt("Presupuesto: ")?;
                let presupuesto: f64 = match presupuesto_s.trim().parse() {
                    Ok(v) => v,
                    Err(_) => { eprintln!("Presupuesto inválido"); continue; }
                };
                let estado = prompt("Estado (ej: activo): ")?;
                let draft = match Department::new(nombre.trim(), presupuesto, estado.trim(), empresa_id, vec![]) {
                    Ok(d) => d,
                    Err(e) => { eprintln!("Datos inválidos: {}", e); continue; }
                };
                match service.create_department(draft) {
                    Ok(id) => println!("Departamento creado: {}", id),
                    Err(e) => eprintln!("Error creando departamento: {}", e),
                }
            }
            "4" => {
                let empresa = prompt("Id de la empresa: ")?;
                let empresa_id = match CompanyId::parse_external(&empresa) {
                    Ok(id) => id,
                    Err(e) => { eprintln!("{}", e); continue; }
                };
                match service.company_detailed(&empresa_id) {
                    Ok(detalle) => match serde_json::to_string_pretty(&detalle) {
                        Ok(json) => println!("{}", json),
                        Err(e) => eprintln!("Error serializando la vista: {}", e),
                    },
                    Err(e) => eprintln!("Error obteniendo la empresa: {}", e),
                }
            }
            "5" => {
                let dep = prompt("Id del departamento a eliminar: ")?;
                let dep_id = match DepartmentId::parse_external(&dep) {
                    Ok(id) => id,
                    Err(e) => { eprintln!("{}", e); continue; }
                };
                let confirm = prompt(&format!("La baja de {} elimina sus funcionarios. Escribir 'yes' para confirmar: ", dep_id))?;
                if confirm.trim().to_lowercase() == "yes" {
                    match service.delete_department(&dep_id) {
                        Ok(d) => println!("Departamento eliminado: {}", d.name()),
                        Err(e) => eprintln!("Error eliminando departamento: {}", e),
                    }
                } else {
                    println!("Baja cancelada");
                }
            }
            "6" => {
                let conteos = [("empresas", service.count_companies()),
                               ("departamentos", service.count_departments()),
                               ("funcionarios", service.count_employees()),
                               ("clientes", service.count_clients()),
                               ("proyectos", service.count_projects()),
                               ("contratos", service.count_contracts())];
                for (nombre, conteo) in conteos {
                    match conteo {
                        Ok(n) => println!("{:14}: {}", nombre, n),
                        Err(e) => eprintln!("{:14}: error ({})", nombre, e),
                    }
                }
            }
            "7" => {
                println!("Saliendo...");
                break;
            }
            other => {
                println!("Opción inválida: {}", other);
            }
        }
    }

    Ok(())
}

fn prompt(msg: &str) -> io::Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s)
}
