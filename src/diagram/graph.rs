/// Declarative node/edge diagram model.
use crate::error::RenderError;
use std::path::PathBuf;

/// Visual identity of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Icon {
    /// Go application (gopher blue)
    Go,
    /// Prometheus metrics collector
    Prometheus,
    /// Jaeger trace backend
    Jaeger,
    /// Grafana dashboard
    Grafana,
    /// Custom icon loaded from an image asset on disk
    Custom(PathBuf),
}

impl Icon {
    /// Fill color used when no image asset backs the node.
    pub fn color(&self) -> &'static str {
        match self {
            Icon::Go => "#00ADD8",
            Icon::Prometheus => "#E6522C",
            Icon::Jaeger => "#60D0E4",
            Icon::Grafana => "#F46800",
            Icon::Custom(_) => "#AAAAAA",
        }
    }
}

/// A node in the diagram.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub icon: Icon,
}

/// A directed edge, optionally labeled.
#[derive(Debug, Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
}

/// Flow direction of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TopBottom,
    LeftRight,
}

/// A fixed diagram description: title, direction, nodes, edges.
#[derive(Debug, Clone)]
pub struct Diagram {
    pub title: String,
    pub direction: Direction,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new(title: impl Into<String>, direction: Direction) -> Self {
        Self {
            title: title.into(),
            direction,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a node.
    pub fn node(mut self, id: impl Into<String>, label: impl Into<String>, icon: Icon) -> Self {
        self.nodes.push(Node {
            id: id.into(),
            label: label.into(),
            icon,
        });
        self
    }

    /// Add an unlabeled edge.
    pub fn edge(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edge_with(from, to, None)
    }

    /// Add a labeled edge.
    pub fn labeled_edge(
        self,
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        self.edge_with(from, to, Some(label.into()))
    }

    fn edge_with(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        label: Option<String>,
    ) -> Self {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            label,
        });
        self
    }

    /// Find a node by id.
    pub fn find(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Check structural consistency: unique node ids, edges between known nodes.
    pub fn validate(&self) -> Result<(), RenderError> {
        for (i, node) in self.nodes.iter().enumerate() {
            if self.nodes[..i].iter().any(|n| n.id == node.id) {
                return Err(RenderError::InvalidGraph(format!(
                    "duplicate node id '{}'",
                    node.id
                )));
            }
        }

        for edge in &self.edges {
            for endpoint in [&edge.from, &edge.to] {
                if self.find(endpoint).is_none() {
                    return Err(RenderError::InvalidGraph(format!(
                        "edge references unknown node '{}'",
                        endpoint
                    )));
                }
            }
        }

        Ok(())
    }
}
