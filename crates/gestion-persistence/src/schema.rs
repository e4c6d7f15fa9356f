// Esquema Diesel de las seis colecciones del dominio.
// Los ids son Text (uuid en forma externa); las listas de relación se
// guardan como Text con un arreglo JSON de ids externos; las fechas como
// Text ISO. La conversión a tipos del dominio ocurre en la frontera
// (store_persistence).
use diesel::allow_tables_to_appear_in_same_query;

diesel::table! {
    companies (id) {
        id -> Text,
        name -> Text,
        tax_id -> Text,
        legal_name -> Text,
        trade_name -> Text,
        contact_email -> Text,
        department_ids -> Text,
    }
}

diesel::table! {
    departments (id) {
        id -> Text,
        name -> Text,
        budget -> Double,
        status -> Text,
        company_id -> Text,
        employee_ids -> Text,
    }
}

diesel::table! {
    employees (id) {
        id -> Text,
        email -> Text,
        name -> Text,
        role -> Text,
        salary -> Double,
        phone -> Text,
        department_id -> Text,
        project_ids -> Text,
    }
}

diesel::table! {
    clients (id) {
        id -> Text,
        name -> Text,
        tax_id -> Text,
        legal_name -> Text,
        trade_name -> Text,
        contact_email -> Text,
        project_ids -> Text,
    }
}

diesel::table! {
    projects (id) {
        id -> Text,
        name -> Text,
        description -> Text,
        employee_ids -> Text,
        contract_id -> Nullable<Text>,
        client_id -> Text,
    }
}

diesel::table! {
    contracts (id) {
        id -> Text,
        terms -> Text,
        status -> Text,
        valid_from -> Text,
        valid_until -> Nullable<Text>,
        max_quantity -> Integer,
        total_value -> Double,
        currency -> Text,
        project_id -> Text,
    }
}

allow_tables_to_appear_in_same_query!(companies, departments, employees, clients, projects, contracts);
