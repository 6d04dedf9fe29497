/// SVG and DOT renderers for diagrams.
use crate::diagram::graph::{Diagram, Direction, Icon, Node};
use crate::error::RenderError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::collections::HashMap;
use std::path::Path;

const NODE_W: f64 = 130.0;
const NODE_H: f64 = 70.0;
const RANK_GAP: f64 = 90.0;
const PEER_GAP: f64 = 50.0;
const MARGIN: f64 = 40.0;
const TITLE_H: f64 = 40.0;

/// Output format for a rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Self-contained SVG with embedded icon assets
    Svg,
    /// Graphviz DOT text
    Dot,
}

/// Render the diagram and write it to a single output file.
pub fn write_diagram(
    diagram: &Diagram,
    path: &Path,
    format: ImageFormat,
) -> Result<(), RenderError> {
    let content = match format {
        ImageFormat::Svg => render_svg(diagram)?,
        ImageFormat::Dot => render_dot(diagram)?,
    };

    std::fs::write(path, content).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Assign each node a rank by longest path from the sources.
fn assign_ranks(diagram: &Diagram) -> HashMap<&str, usize> {
    let mut ranks: HashMap<&str, usize> = diagram
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), 0usize))
        .collect();

    // Relaxation passes; the graph is tiny and acyclic by construction.
    for _ in 0..diagram.nodes.len() {
        for edge in &diagram.edges {
            let from_rank = ranks.get(edge.from.as_str()).copied().unwrap_or(0);
            let entry = ranks.entry(edge.to.as_str()).or_insert(0);
            if *entry < from_rank + 1 {
                *entry = from_rank + 1;
            }
        }
    }

    ranks
}

/// Node center positions for the layered layout.
fn layout(diagram: &Diagram) -> HashMap<&str, (f64, f64)> {
    let ranks = assign_ranks(diagram);
    let max_rank = ranks.values().copied().max().unwrap_or(0);

    // Nodes per rank, in declaration order.
    let mut rows: Vec<Vec<&Node>> = vec![Vec::new(); max_rank + 1];
    for node in &diagram.nodes {
        let rank = ranks.get(node.id.as_str()).copied().unwrap_or(0);
        rows[rank].push(node);
    }

    let widest = rows.iter().map(|r| r.len()).max().unwrap_or(1) as f64;
    let span = widest * NODE_W + (widest - 1.0).max(0.0) * PEER_GAP;

    let mut positions = HashMap::new();
    for (rank, row) in rows.iter().enumerate() {
        let count = row.len() as f64;
        let row_span = count * NODE_W + (count - 1.0).max(0.0) * PEER_GAP;
        let offset = (span - row_span) / 2.0;

        for (slot, node) in row.iter().enumerate() {
            let along = MARGIN + offset + slot as f64 * (NODE_W + PEER_GAP) + NODE_W / 2.0;
            let across = MARGIN + TITLE_H + rank as f64 * (NODE_H + RANK_GAP) + NODE_H / 2.0;
            let center = match diagram.direction {
                Direction::TopBottom => (along, across),
                Direction::LeftRight => (across, along),
            };
            positions.insert(node.id.as_str(), center);
        }
    }

    positions
}

fn canvas_size(positions: &HashMap<&str, (f64, f64)>) -> (f64, f64) {
    let max_x = positions
        .values()
        .map(|(x, _)| *x)
        .fold(0.0f64, f64::max);
    let max_y = positions
        .values()
        .map(|(_, y)| *y)
        .fold(0.0f64, f64::max);
    (max_x + NODE_W / 2.0 + MARGIN, max_y + NODE_H / 2.0 + MARGIN)
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
        .as_str()
    {
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "image/png",
    }
}

/// Load a custom icon asset as a data URI.
fn embed_asset(path: &Path) -> Result<String, RenderError> {
    if !path.exists() {
        return Err(RenderError::MissingAsset {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| RenderError::AssetRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(format!(
        "data:{};base64,{}",
        mime_for(path),
        BASE64.encode(bytes)
    ))
}

/// Render a self-contained SVG document.
pub fn render_svg(diagram: &Diagram) -> Result<String, RenderError> {
    diagram.validate()?;

    let positions = layout(diagram);
    let (width, height) = canvas_size(&positions);

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {:.0} {:.0}">"#,
        width, height, width, height
    ));
    svg.push('\n');
    svg.push_str(
        r##"<defs><marker id="arrow" markerWidth="10" markerHeight="8" refX="9" refY="4" orient="auto"><path d="M0,0 L10,4 L0,8 z" fill="#444444"/></marker></defs>"##,
    );
    svg.push('\n');
    svg.push_str(&format!(
        r#"<text x="{:.0}" y="{:.0}" text-anchor="middle" font-family="sans-serif" font-size="18" font-weight="bold">{}</text>"#,
        width / 2.0,
        MARGIN,
        xml_escape(&diagram.title)
    ));
    svg.push('\n');

    // Edges first so nodes draw on top.
    for edge in &diagram.edges {
        let (fx, fy) = positions[edge.from.as_str()];
        let (tx, ty) = positions[edge.to.as_str()];

        let (x1, y1, x2, y2) = match diagram.direction {
            Direction::TopBottom => (fx, fy + NODE_H / 2.0, tx, ty - NODE_H / 2.0),
            Direction::LeftRight => (fx + NODE_W / 2.0, fy, tx - NODE_W / 2.0, ty),
        };

        svg.push_str(&format!(
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#444444" stroke-width="1.5" marker-end="url(#arrow)"/>"##,
            x1, y1, x2, y2
        ));
        svg.push('\n');

        if let Some(ref label) = edge.label {
            svg.push_str(&format!(
                r##"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="11" fill="#444444">{}</text>"##,
                (x1 + x2) / 2.0,
                (y1 + y2) / 2.0 - 4.0,
                xml_escape(label)
            ));
            svg.push('\n');
        }
    }

    for node in &diagram.nodes {
        let (cx, cy) = positions[node.id.as_str()];
        let x = cx - NODE_W / 2.0;
        let y = cy - NODE_H / 2.0;

        match &node.icon {
            Icon::Custom(asset) => {
                let data_uri = embed_asset(asset)?;
                svg.push_str(&format!(
                    r#"<image x="{:.1}" y="{:.1}" width="{:.0}" height="{:.0}" href="{}" preserveAspectRatio="xMidYMid meet"/>"#,
                    x,
                    y,
                    NODE_W,
                    NODE_H - 16.0,
                    data_uri
                ));
            }
            icon => {
                svg.push_str(&format!(
                    r##"<rect x="{:.1}" y="{:.1}" width="{:.0}" height="{:.0}" rx="8" fill="{}" stroke="#333333"/>"##,
                    x,
                    y,
                    NODE_W,
                    NODE_H - 16.0,
                    icon.color()
                ));
            }
        }
        svg.push('\n');

        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-family="sans-serif" font-size="12">{}</text>"#,
            cx,
            y + NODE_H - 2.0,
            xml_escape(&node.label)
        ));
        svg.push('\n');
    }

    svg.push_str("</svg>\n");
    Ok(svg)
}

fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Render Graphviz DOT text.
pub fn render_dot(diagram: &Diagram) -> Result<String, RenderError> {
    diagram.validate()?;

    let rankdir = match diagram.direction {
        Direction::TopBottom => "TB",
        Direction::LeftRight => "LR",
    };

    let mut dot = String::new();
    dot.push_str("digraph stack {\n");
    dot.push_str(&format!(
        "    label=\"{}\";\n    labelloc=t;\n    rankdir={};\n",
        dot_escape(&diagram.title),
        rankdir
    ));
    dot.push_str("    node [shape=box, style=\"rounded,filled\", fontname=\"sans-serif\"];\n");

    for node in &diagram.nodes {
        dot.push_str(&format!(
            "    {} [label=\"{}\", fillcolor=\"{}\"];\n",
            node.id,
            dot_escape(&node.label),
            node.icon.color()
        ));
    }

    for edge in &diagram.edges {
        match &edge.label {
            Some(label) => dot.push_str(&format!(
                "    {} -> {} [label=\"{}\"];\n",
                edge.from,
                edge.to,
                dot_escape(label)
            )),
            None => dot.push_str(&format!("    {} -> {};\n", edge.from, edge.to)),
        }
    }

    dot.push_str("}\n");
    Ok(dot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::stack::observability_stack;
    use tempfile::TempDir;

    fn assets_with_icons() -> TempDir {
        let dir = TempDir::new().unwrap();
        // Minimal single-pixel PNG header bytes are enough for embedding.
        std::fs::write(dir.path().join("loadgen_logo.png"), b"\x89PNG\r\n\x1a\n").unwrap();
        std::fs::write(dir.path().join("opentelemetry_logo.png"), b"\x89PNG\r\n\x1a\n").unwrap();
        dir
    }

    #[test]
    fn ranks_follow_edge_depth() {
        let diagram = observability_stack(Path::new("assets"));
        let ranks = assign_ranks(&diagram);
        assert_eq!(ranks["loadgen"], 0);
        assert_eq!(ranks["app"], 1);
        assert_eq!(ranks["prometheus"], 2);
        assert_eq!(ranks["otel"], 2);
        assert_eq!(ranks["jaeger"], 3);
        assert_eq!(ranks["grafana"], 4);
    }

    #[test]
    fn svg_render_succeeds_with_valid_assets() {
        let assets = assets_with_icons();
        let diagram = observability_stack(assets.path());
        let svg = render_svg(&diagram).expect("render should succeed");

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Go Application with Observability Stack"));
        assert!(svg.contains("data:image/png;base64,"));
        assert!(svg.contains("Prometheus"));
        assert!(svg.contains(">HTTP</text>"));
    }

    #[test]
    fn svg_render_fails_on_missing_asset() {
        let assets = TempDir::new().unwrap();
        let diagram = observability_stack(assets.path());

        match render_svg(&diagram) {
            Err(RenderError::MissingAsset { path }) => {
                assert!(path.ends_with("loadgen_logo.png"));
            }
            other => panic!("expected MissingAsset, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn dot_render_lists_all_edges() {
        let diagram = observability_stack(Path::new("assets"));
        let dot = render_dot(&diagram).expect("dot render should succeed");

        assert!(dot.starts_with("digraph"));
        assert!(dot.contains("rankdir=TB"));
        assert!(dot.contains("loadgen -> app [label=\"HTTP\"];"));
        assert!(dot.contains("jaeger -> grafana;"));
    }

    #[test]
    fn write_diagram_produces_single_file() {
        let assets = assets_with_icons();
        let out = TempDir::new().unwrap();
        let path = out.path().join("stack.svg");

        let diagram = observability_stack(assets.path());
        write_diagram(&diagram, &path, ImageFormat::Svg).expect("write should succeed");

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("</svg>"));
    }
}
