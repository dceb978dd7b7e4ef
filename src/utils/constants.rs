/// Timón Pet Store service definitions and dashboard constants
///
/// Based on the platform's microservice layout (one FastAPI service per port)

use std::time::Duration;

/// Service definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceDef {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub description_es: &'static str,
    pub port: u16,
}

/// All platform services, in dashboard order
pub const SERVICES: &[ServiceDef] = &[
    ServiceDef {
        key: "auth",
        display_name: "Auth Service",
        description: "Users, roles and JWT authentication",
        description_es: "Gestión de usuarios, roles y autenticación (JWT)",
        port: 8001,
    },
    ServiceDef {
        key: "veterinaria",
        display_name: "Veterinaria Service",
        description: "Clinical histories, consultations and pet documents",
        description_es: "Historiales clínicos, consultas y documentos de mascotas",
        port: 8002,
    },
    ServiceDef {
        key: "peluqueria",
        display_name: "Peluquería Service",
        description: "Grooming appointment scheduling",
        description_es: "Agenda y gestión de turnos de peluquería",
        port: 8003,
    },
    ServiceDef {
        key: "petshop",
        display_name: "Pet Shop Service",
        description: "Inventory, products, suppliers and point of sale",
        description_es: "Inventario, productos, proveedores y punto de venta",
        port: 8004,
    },
];

/// Look up a service definition by key
pub fn service_def(key: &str) -> Option<&'static ServiceDef> {
    SERVICES.iter().find(|s| s.key == key)
}

pub const DEFAULT_TARGET_HOST: &str = "localhost";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub const APP_NAME: &str = "timon-dash";
pub const PLATFORM_NAME: &str = "Timón Pet Store";

/// Static sidebar navigation entries (English, Spanish)
pub const NAV_ITEMS: &[(&str, &str)] = &[
    ("Dashboard", "Dashboard"),
    ("Veterinary", "Veterinaria"),
    ("Grooming", "Peluquería"),
    ("Shop", "Tienda"),
    ("Clients", "Clientes"),
    ("Login", "Iniciar sesión"),
];

/// Platform feature summary: (title, english, spanish)
pub const FEATURES: &[(&str, &str, &str)] = &[
    (
        "Auth",
        "JWT with roles (veterinarian, groomer, admin, client)",
        "Sistema JWT con roles (veterinario, peluquero, admin, cliente)",
    ),
    (
        "Veterinaria",
        "Clinical histories, consultations and documents",
        "Gestión de historiales clínicos, consultas y documentos",
    ),
    (
        "Peluquería",
        "Appointments and grooming services",
        "Sistema de turnos y gestión de servicios",
    ),
    (
        "Pet Shop",
        "Inventory, suppliers and point of sale",
        "Inventario, proveedores y punto de venta",
    ),
    (
        "Database",
        "PostgreSQL with one schema per microservice",
        "PostgreSQL con esquemas separados por microservicio",
    ),
    (
        "Architecture",
        "FastAPI microservices with a React frontend",
        "Microservicios con FastAPI y React",
    ),
];
