//! Similarity graph construction and rendering.
//!
//! Edges come from the upper triangle of a [`SimilarityMatrix`]: every pair
//! `i < j` at or above the threshold, strongest first. Rendering produces
//! either a Mermaid flowchart or a Graphviz DOT graph.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;
use crate::nlp::SimilarityMatrix;

pub const DEFAULT_THRESHOLD: f64 = 0.25;
pub const DEFAULT_MAX_NODES: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: usize,
    pub label: String,
}

/// Undirected edge between matrix indices `a < b`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphFormat {
    #[default]
    Mermaid,
    Dot,
}

impl FromStr for GraphFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mermaid" => Ok(GraphFormat::Mermaid),
            "dot" => Ok(GraphFormat::Dot),
            _ => Err(AnalysisError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for GraphFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphFormat::Mermaid => f.write_str("mermaid"),
            GraphFormat::Dot => f.write_str("dot"),
        }
    }
}

pub fn build_edges(sim: &SimilarityMatrix, threshold: f64) -> Vec<Edge> {
    let n = sim.len();
    let mut edges = Vec::new();
    for a in 0..n {
        for b in (a + 1)..n {
            let weight = sim.get(a, b);
            if weight >= threshold {
                edges.push(Edge { a, b, weight });
            }
        }
    }
    // Stable: equal weights keep (a, b) order.
    edges.sort_by(|x, y| y.weight.partial_cmp(&x.weight).unwrap_or(Ordering::Equal));
    edges
}

pub fn render(nodes: &[Node], edges: &[Edge], format: GraphFormat) -> String {
    match format {
        GraphFormat::Mermaid => render_mermaid(nodes, edges),
        GraphFormat::Dot => render_dot(nodes, edges),
    }
}

fn render_mermaid(nodes: &[Node], edges: &[Edge]) -> String {
    let mut lines = vec!["```mermaid".to_string(), "graph TD".to_string()];
    for node in nodes {
        // Mermaid has no backslash escapes inside quoted labels.
        let label = node.label.replace('"', "#quot;");
        lines.push(format!("  D{}[\"{}\"]", node.id, label));
    }
    for e in edges {
        lines.push(format!("  D{} ---|{:.2}| D{}", e.a, e.weight, e.b));
    }
    lines.push("```".to_string());
    lines.join("\n")
}

fn escape_dot(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}

fn render_dot(nodes: &[Node], edges: &[Edge]) -> String {
    let mut lines = vec![
        "graph G {".to_string(),
        "  graph [overlap=false, splines=true];".to_string(),
        "  node [shape=box];".to_string(),
    ];
    for node in nodes {
        lines.push(format!(
            "  D{} [label=\"{}\"];",
            node.id,
            escape_dot(&node.label)
        ));
    }
    for e in edges {
        lines.push(format!(
            "  D{} -- D{} [label=\"{:.2}\", penwidth={:.2}];",
            e.a,
            e.b,
            e.weight,
            1.0 + 4.0 * e.weight
        ));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_matrix() -> SimilarityMatrix {
        SimilarityMatrix::new(vec![
            vec![1.0, 0.30, 0.80, 0.10],
            vec![0.30, 1.0, 0.50, 0.30],
            vec![0.80, 0.50, 1.0, 0.05],
            vec![0.10, 0.30, 0.05, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn identity_matrix_has_no_edges() {
        let edges = build_edges(&SimilarityMatrix::identity(3), 0.99);
        assert!(edges.is_empty());
    }

    #[test]
    fn diagonal_is_never_an_edge() {
        let edges = build_edges(&SimilarityMatrix::identity(3), 0.0);
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().all(|e| e.a < e.b));
    }

    #[test]
    fn edges_are_sorted_strongest_first() {
        let edges = build_edges(&sample_matrix(), 0.25);
        let weights: Vec<f64> = edges.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![0.80, 0.50, 0.30, 0.30]);
        assert_eq!((edges[0].a, edges[0].b), (0, 2));
        // Ties keep upper-triangle order.
        assert_eq!((edges[2].a, edges[2].b), (0, 1));
        assert_eq!((edges[3].a, edges[3].b), (1, 3));
    }

    #[test]
    fn threshold_is_inclusive_and_monotone() {
        let sim = sample_matrix();
        assert_eq!(build_edges(&sim, 0.5).len(), 2);
        let mut previous = usize::MAX;
        for step in 0..=20 {
            let count = build_edges(&sim, step as f64 / 20.0).len();
            assert!(count <= previous);
            previous = count;
        }
    }

    #[test]
    fn format_parsing() {
        assert_eq!("mermaid".parse::<GraphFormat>().unwrap(), GraphFormat::Mermaid);
        assert_eq!("DOT".parse::<GraphFormat>().unwrap(), GraphFormat::Dot);
        let err = "svg".parse::<GraphFormat>().unwrap_err();
        assert_eq!(err, AnalysisError::UnknownFormat("svg".to_string()));
    }

    #[test]
    fn mermaid_output() {
        let nodes = vec![
            Node {
                id: 0,
                label: "1: Alpha".to_string(),
            },
            Node {
                id: 1,
                label: "2: Beta".to_string(),
            },
        ];
        let edges = vec![Edge {
            a: 0,
            b: 1,
            weight: 0.4567,
        }];
        let out = render(&nodes, &edges, GraphFormat::Mermaid);
        assert_eq!(
            out,
            "```mermaid\ngraph TD\n  D0[\"1: Alpha\"]\n  D1[\"2: Beta\"]\n  D0 ---|0.46| D1\n```"
        );
    }

    #[test]
    fn dot_output_escapes_quotes_and_scales_penwidth() {
        let nodes = vec![
            Node {
                id: 0,
                label: "1: The \"Quoted\" Title".to_string(),
            },
            Node {
                id: 1,
                label: "2: Plain".to_string(),
            },
        ];
        let edges = vec![Edge {
            a: 0,
            b: 1,
            weight: 0.5,
        }];
        let out = render(&nodes, &edges, GraphFormat::Dot);
        let expected = [
            "graph G {",
            "  graph [overlap=false, splines=true];",
            "  node [shape=box];",
            "  D0 [label=\"1: The \\\"Quoted\\\" Title\"];",
            "  D1 [label=\"2: Plain\"];",
            "  D0 -- D1 [label=\"0.50\", penwidth=3.00];",
            "}",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }

    #[test]
    fn mermaid_labels_never_break_quoting() {
        let nodes = vec![Node {
            id: 0,
            label: "say \"hi\"".to_string(),
        }];
        let out = render(&nodes, &[], GraphFormat::Mermaid);
        assert!(out.contains("D0[\"say #quot;hi#quot;\"]"));
    }
}
