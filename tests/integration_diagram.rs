/// Integration tests for diagram rendering.
use obsbench::diagram::render::{render_dot, write_diagram, ImageFormat};
use obsbench::diagram::stack::{observability_stack, LOADGEN_ICON, OTEL_ICON};
use obsbench::error::RenderError;
use std::fs;
use tempfile::TempDir;

fn create_asset_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let base = dir.path();

    // Any readable bytes work; the renderer embeds them verbatim.
    fs::write(base.join(LOADGEN_ICON), b"\x89PNG\r\n\x1a\nstub").unwrap();
    fs::write(base.join(OTEL_ICON), b"\x89PNG\r\n\x1a\nstub").unwrap();

    dir
}

#[test]
fn test_diagram_renders_to_single_svg_file() {
    let assets = create_asset_dir();
    let out = TempDir::new().unwrap();
    let output = out.path().join("architecture.svg");

    let diagram = observability_stack(assets.path());
    write_diagram(&diagram, &output, ImageFormat::Svg).expect("render should succeed");

    let entries: Vec<_> = fs::read_dir(out.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "exactly one output file");

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("<svg"));
    assert!(content.contains("Go Application"));
    assert!(content.contains("OpenTelemetry"));
    assert!(content.contains("Grafana"));
}

#[test]
fn test_missing_asset_fails_instead_of_panicking() {
    let assets = TempDir::new().unwrap();
    fs::write(assets.path().join(LOADGEN_ICON), b"stub").unwrap();
    // OTEL_ICON deliberately absent.

    let out = TempDir::new().unwrap();
    let output = out.path().join("architecture.svg");

    let diagram = observability_stack(assets.path());
    let err = write_diagram(&diagram, &output, ImageFormat::Svg)
        .expect_err("missing asset must fail the render");

    match err {
        RenderError::MissingAsset { path } => assert!(path.ends_with(OTEL_ICON)),
        other => panic!("expected MissingAsset, got {:?}", other),
    }
    assert!(!output.exists(), "no partial output on failure");
}

#[test]
fn test_dot_output_needs_no_assets() {
    let diagram = observability_stack(std::path::Path::new("/does/not/exist"));
    let dot = render_dot(&diagram).expect("dot render has no asset dependency");

    for edge in [
        "loadgen -> app",
        "app -> prometheus",
        "app -> otel",
        "otel -> jaeger",
        "prometheus -> grafana",
        "jaeger -> grafana",
    ] {
        assert!(dot.contains(edge), "missing edge: {}", edge);
    }
}

#[test]
fn test_dot_file_written_via_cli_path() {
    let out = TempDir::new().unwrap();
    let output = out.path().join("architecture.dot");

    let diagram = observability_stack(std::path::Path::new("unused"));
    write_diagram(&diagram, &output, ImageFormat::Dot).expect("write should succeed");

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("digraph"));
    assert!(content.ends_with("}\n"));
}
