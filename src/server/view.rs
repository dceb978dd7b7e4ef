/// HTML rendering of the dashboard
///
/// Pure function of a registry snapshot; the page reloads itself on the poll
/// interval so it never shows data older than one cycle.

use std::fmt::Write;

use crate::core::{ServiceRecord, ServiceRegistry, ServiceStatus};
use crate::screens::{status_label, status_tone, strings, Locale};
use crate::utils::{format_clock, html_escape, service_def, FEATURES, NAV_ITEMS, PLATFORM_NAME};

const STYLE: &str = r#"
:root {
  --color-success: #2e7d32;
  --color-danger: #c62828;
  --color-warning: #f9a825;
  --color-text: #212121;
  --color-text-light: #757575;
}
body { margin: 0; font-family: system-ui, sans-serif; color: var(--color-text); display: flex; }
.app-sidebar { width: 200px; min-height: 100vh; background: #263238; color: #eceff1; padding: 16px; }
.app-sidebar li { list-style: none; padding: 6px 0; }
.app-sidebar li.active { font-weight: bold; }
.dashboard { flex: 1; padding: 24px; }
.services-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); gap: 16px; }
.service-card, .card { border: 1px solid #e0e0e0; border-radius: 8px; padding: 16px; margin-bottom: 16px; }
.service-status { display: flex; align-items: center; gap: 8px; }
.status-indicator { width: 12px; height: 12px; border-radius: 50%; }
.muted { color: var(--color-text-light); }
"#;

pub fn render_page(
    registry: &ServiceRegistry,
    locale: Locale,
    target_host: &str,
    refresh_secs: u64,
) -> String {
    let text = strings(locale);
    let lang = match locale {
        Locale::En => "en",
        Locale::Es => "es",
    };

    let mut html = String::with_capacity(8 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta http-equiv=\"refresh\" content=\"{}\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n",
        lang,
        refresh_secs,
        html_escape(PLATFORM_NAME),
        STYLE
    );

    html.push_str("<aside class=\"app-sidebar\">\n");
    let _ = writeln!(html, "<strong>{}</strong>", html_escape(PLATFORM_NAME));
    let _ = writeln!(html, "<nav aria-label=\"{}\"><ul>", html_escape(text.navigation));
    for (i, (en, es)) in NAV_ITEMS.iter().enumerate() {
        let label = match locale {
            Locale::En => en,
            Locale::Es => es,
        };
        let class = if i == 0 { " class=\"active\"" } else { "" };
        let _ = writeln!(html, "<li{}>{}</li>", class, html_escape(label));
    }
    html.push_str("</ul></nav>\n</aside>\n");

    html.push_str("<main class=\"dashboard\">\n");
    let _ = writeln!(html, "<h1>{}</h1>", html_escape(text.title));
    let _ = writeln!(
        html,
        "<p>{} <strong>{}/{} {}</strong></p>",
        html_escape(text.subtitle),
        registry.count(ServiceStatus::Online),
        registry.len(),
        html_escape(text.online_summary)
    );

    html.push_str("<div class=\"services-grid\">\n");
    for record in registry.iter() {
        render_card(&mut html, record, locale);
    }
    html.push_str("</div>\n");

    let _ = writeln!(html, "<div class=\"card\">\n<h2>{}</h2>\n<ul>", html_escape(text.features));
    for (title, en, es) in FEATURES {
        let detail = match locale {
            Locale::En => en,
            Locale::Es => es,
        };
        let _ = writeln!(
            html,
            "<li><strong>{}:</strong> {}</li>",
            html_escape(title),
            html_escape(detail)
        );
    }
    html.push_str("</ul>\n</div>\n");

    let _ = writeln!(
        html,
        "<div class=\"card\">\n<h2>{}</h2>\n<p>{}</p>\n<ul>",
        html_escape(text.api_docs),
        html_escape(text.api_docs_hint)
    );
    for record in registry.iter() {
        let _ = writeln!(
            html,
            "<li><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{} - Swagger UI</a></li>",
            html_escape(&record.docs_url(target_host)),
            html_escape(&record.name)
        );
    }
    html.push_str("</ul>\n</div>\n</main>\n</body>\n</html>\n");

    html
}

fn render_card(html: &mut String, record: &ServiceRecord, locale: Locale) {
    let text = strings(locale);
    let description = match (locale, service_def(&record.key)) {
        (Locale::Es, Some(def)) => def.description_es,
        _ => record.description.as_str(),
    };
    let last_check = record
        .last_checked
        .map(format_clock)
        .unwrap_or_else(|| text.never.to_string());

    let _ = write!(
        html,
        "<div class=\"service-card\" data-service=\"{key}\">\n\
         <h3>{name}</h3>\n<p>{description}</p>\n\
         <div class=\"service-status\">\n\
         <div class=\"status-indicator {status}\" style=\"background-color: {color}\"></div>\n\
         <span>{label}</span>\n\
         <span class=\"muted\" style=\"margin-left: auto\">{port_label}: {port}</span>\n\
         </div>\n<small class=\"muted\">{last_check_label}: {last_check}</small>\n</div>\n",
        key = html_escape(&record.key),
        name = html_escape(&record.name),
        description = html_escape(description),
        status = record.status.as_str(),
        color = status_tone(record.status).css_var(),
        label = html_escape(status_label(record.status, locale)),
        port_label = html_escape(text.port),
        port = record.port,
        last_check_label = html_escape(text.last_check),
        last_check = html_escape(&last_check),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ProbeError, ProbeOutcome};

    #[test]
    fn test_loading_page() {
        let page = render_page(&ServiceRegistry::default(), Locale::En, "localhost", 30);

        assert!(page.contains("<meta http-equiv=\"refresh\" content=\"30\">"));
        assert_eq!(page.matches("class=\"service-card\"").count(), 4);
        assert_eq!(page.matches("var(--color-warning)\"></div>").count(), 4);
        assert_eq!(page.matches("<span>checking</span>").count(), 4);
        assert!(page.contains("0/4 online"));
    }

    #[test]
    fn test_all_offline_page() {
        let mut registry = ServiceRegistry::default();
        for key in registry.keys() {
            registry.apply(&key, &ProbeOutcome::offline(1, &ProbeError::Status(500)));
        }

        let page = render_page(&registry, Locale::En, "localhost", 30);
        assert_eq!(page.matches("status-indicator offline").count(), 4);
        assert_eq!(page.matches("var(--color-danger)\"></div>").count(), 4);
        assert_eq!(page.matches("<span>offline</span>").count(), 4);
    }

    #[test]
    fn test_docs_links() {
        let page = render_page(&ServiceRegistry::default(), Locale::En, "pets.local", 30);
        for port in 8001..=8004 {
            assert!(page.contains(&format!("href=\"http://pets.local:{}/docs\"", port)));
        }
        assert!(page.contains("Auth Service - Swagger UI"));
    }

    #[test]
    fn test_spanish_page() {
        let mut registry = ServiceRegistry::default();
        registry.apply("auth", &ProbeOutcome::online(5));

        let page = render_page(&registry, Locale::Es, "localhost", 30);
        assert!(page.contains("<html lang=\"es\">"));
        assert!(page.contains("<span>En línea</span>"));
        assert_eq!(page.matches("<span>Verificando...</span>").count(), 3);
        assert!(page.contains("Puerto: 8001"));
        assert!(page.contains("<li>Iniciar sesión</li>"));
        assert!(page.contains(
            "<li><strong>Architecture:</strong> Microservicios con FastAPI y React</li>"
        ));
    }

    #[test]
    fn test_text_is_escaped() {
        let registry = ServiceRegistry::from_records(vec![ServiceRecord::new(
            "x",
            "<script>alert(1)</script>",
            9000,
            "a & b",
        )]);

        let page = render_page(&registry, Locale::En, "localhost", 30);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;"));
        assert!(page.contains("a &amp; b"));
    }
}
