/// The fixed observability-stack diagram.
use crate::diagram::graph::{Diagram, Direction, Icon};
use std::path::Path;

/// Asset file name for the load generator icon.
pub const LOADGEN_ICON: &str = "loadgen_logo.png";
/// Asset file name for the OpenTelemetry icon.
pub const OTEL_ICON: &str = "opentelemetry_logo.png";

/// Build the architecture diagram of the demo service and its
/// observability stack: load generator in front, metrics into Prometheus,
/// traces through the OpenTelemetry collector into Jaeger, both surfaced
/// in Grafana.
pub fn observability_stack(assets_dir: &Path) -> Diagram {
    Diagram::new("Go Application with Observability Stack", Direction::TopBottom)
        .node(
            "loadgen",
            "Load Generator",
            Icon::Custom(assets_dir.join(LOADGEN_ICON)),
        )
        .node("app", "Go Application", Icon::Go)
        .node(
            "otel",
            "OpenTelemetry",
            Icon::Custom(assets_dir.join(OTEL_ICON)),
        )
        .node("prometheus", "Prometheus", Icon::Prometheus)
        .node("jaeger", "Jaeger", Icon::Jaeger)
        .node("grafana", "Grafana", Icon::Grafana)
        .labeled_edge("loadgen", "app", "HTTP")
        .labeled_edge("app", "prometheus", "metrics")
        .labeled_edge("app", "otel", "traces")
        .edge("otel", "jaeger")
        .edge("prometheus", "grafana")
        .edge("jaeger", "grafana")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn stack_diagram_is_structurally_valid() {
        let diagram = observability_stack(Path::new("assets"));
        assert!(diagram.validate().is_ok());
        assert_eq!(diagram.nodes.len(), 6);
        assert_eq!(diagram.edges.len(), 6);
    }

    #[test]
    fn custom_icons_resolve_under_assets_dir() {
        let diagram = observability_stack(Path::new("/srv/icons"));
        let loadgen = diagram.find("loadgen").unwrap();
        assert_eq!(
            loadgen.icon,
            Icon::Custom(PathBuf::from("/srv/icons").join(LOADGEN_ICON))
        );
    }

    #[test]
    fn dashboard_receives_both_signal_paths() {
        let diagram = observability_stack(Path::new("assets"));
        let into_grafana: Vec<&str> = diagram
            .edges
            .iter()
            .filter(|e| e.to == "grafana")
            .map(|e| e.from.as_str())
            .collect();
        assert_eq!(into_grafana, vec!["prometheus", "jaeger"]);
    }
}
