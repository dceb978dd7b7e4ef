pub mod dashboard;

// Status presentation shared by the terminal dashboard and the web page.
// Views map a `Tone` to their own colour (ratatui Color, CSS variable).

use serde::{Deserialize, Serialize};

use crate::core::ServiceStatus;

pub use dashboard::Dashboard;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Es,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Danger,
    Warning,
}

impl Tone {
    pub fn css_var(&self) -> &'static str {
        match self {
            Tone::Success => "var(--color-success)",
            Tone::Danger => "var(--color-danger)",
            Tone::Warning => "var(--color-warning)",
        }
    }
}

pub fn status_tone(status: ServiceStatus) -> Tone {
    match status {
        ServiceStatus::Online => Tone::Success,
        ServiceStatus::Offline => Tone::Danger,
        ServiceStatus::Loading => Tone::Warning,
    }
}

pub fn status_label(status: ServiceStatus, locale: Locale) -> &'static str {
    match (status, locale) {
        (ServiceStatus::Online, Locale::En) => "online",
        (ServiceStatus::Offline, Locale::En) => "offline",
        (ServiceStatus::Loading, Locale::En) => "checking",
        (ServiceStatus::Online, Locale::Es) => "En línea",
        (ServiceStatus::Offline, Locale::Es) => "Sin conexión",
        (ServiceStatus::Loading, Locale::Es) => "Verificando...",
    }
}

/// Fixed UI text
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub services: &'static str,
    pub port: &'static str,
    pub last_check: &'static str,
    pub never: &'static str,
    pub features: &'static str,
    pub api_docs: &'static str,
    pub api_docs_hint: &'static str,
    pub online_summary: &'static str,
    pub navigation: &'static str,
}

const STRINGS_EN: Strings = Strings {
    title: "Control Panel - Timón Pet Store",
    subtitle: "Comprehensive management platform for pet stores",
    services: "Services",
    port: "Port",
    last_check: "Last check",
    never: "never",
    features: "System Features",
    api_docs: "API Documentation",
    api_docs_hint: "Documentation endpoints are available at:",
    online_summary: "online",
    navigation: "Navigation",
};

const STRINGS_ES: Strings = Strings {
    title: "Panel de Control - Timón Pet Store",
    subtitle: "Plataforma integral de gestión para tiendas de mascotas",
    services: "Servicios",
    port: "Puerto",
    last_check: "Última verificación",
    never: "nunca",
    features: "Características del Sistema",
    api_docs: "Documentación de la API",
    api_docs_hint: "Los endpoints de documentación están disponibles en:",
    online_summary: "en línea",
    navigation: "Navegación",
};

pub fn strings(locale: Locale) -> &'static Strings {
    match locale {
        Locale::En => &STRINGS_EN,
        Locale::Es => &STRINGS_ES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tones() {
        assert_eq!(status_tone(ServiceStatus::Online), Tone::Success);
        assert_eq!(status_tone(ServiceStatus::Offline), Tone::Danger);
        assert_eq!(status_tone(ServiceStatus::Loading), Tone::Warning);
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(status_label(ServiceStatus::Online, Locale::En), "online");
        assert_eq!(status_label(ServiceStatus::Offline, Locale::En), "offline");
        assert_eq!(status_label(ServiceStatus::Loading, Locale::En), "checking");
        assert_eq!(status_label(ServiceStatus::Offline, Locale::Es), "Sin conexión");
    }

    #[test]
    fn test_locale_parses_from_config() {
        #[derive(Deserialize)]
        struct Wrapper {
            lang: Locale,
        }
        let parsed: Wrapper = toml::from_str("lang = \"es\"").unwrap();
        assert_eq!(parsed.lang, Locale::Es);
    }
}
