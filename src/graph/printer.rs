//! Tree and DOT rendering of a relationship graph
//!
//! Both renderers read the same [`GraphNode`] tree. The tree renderer prints
//! upper objects above the object they relate to and lower objects below it,
//! one tab of indentation per level:
//!
//! ```text
//!     ┌── [Ingress] ingress-foo
//! [Service] service-foo
//!     └── [Pod] pod-foo
//! ```
//!
//! The DOT renderer emits a strict digraph whose edges point from upper
//! objects down to lower ones, ready to be piped into `dot -Tsvg`.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::models::{GraphNode, Hierarchy};
use super::object::ObjectRecord;

/// Output format of the printer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Indented text tree
    #[default]
    Tree,
    /// Graphviz DOT digraph
    Dot,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Tree => "tree",
            OutputFormat::Dot => "dot",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(OutputFormat::Tree),
            "dot" => Ok(OutputFormat::Dot),
            _ => Err(format!("Unknown output format: {} (expected 'tree' or 'dot')", s)),
        }
    }
}

/// Renders a graph in one of the output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Printer {
    format: OutputFormat,
}

impl Printer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render the graph to a string
    pub fn render(&self, root: &GraphNode) -> String {
        match self.format {
            OutputFormat::Tree => render_tree(root),
            OutputFormat::Dot => render_dot(root),
        }
    }

    /// Render the graph and write it to `out`
    pub fn print<W: Write + ?Sized>(&self, root: &GraphNode, out: &mut W) -> io::Result<()> {
        out.write_all(self.render(root).as_bytes())?;
        out.flush()
    }
}

/// Render the graph as an indented tree
pub fn render_tree(root: &GraphNode) -> String {
    format!("\n{}\n\n", tree_block(root, ""))
}

/// Lines of `node` and its subtree, upper children stacked above it
fn tree_block(node: &GraphNode, indent: &str) -> String {
    let label = format!("[{}] {}", node.object.kind(), node.object.name());
    let mut block = match node.hierarchy {
        Hierarchy::Root => label,
        Hierarchy::Upper => format!("{}┌── {}", indent, label),
        Hierarchy::Lower => format!("{}└── {}", indent, label),
    };

    let child_indent = format!("{}\t", indent);
    for child in &node.children {
        let child_block = tree_block(child, &child_indent);
        block = match child.hierarchy {
            Hierarchy::Upper => format!("{}\n{}", child_block, block),
            _ => format!("{}\n{}", block, child_block),
        };
    }

    block
}

/// Render the graph as a strict DOT digraph
pub fn render_dot(root: &GraphNode) -> String {
    let mut graph = DotGraph::default();
    graph.add_subtree(root);
    graph.to_string()
}

/// Node id of an object: kind and name with dashes removed
///
/// Ids that are still not plain DOT identifiers (e.g. names with dots) are
/// quoted.
pub fn dot_node_id(object: &ObjectRecord) -> String {
    let id = format!("{}{}", object.kind(), object.name()).replace('-', "");
    if is_bare_id(&id) {
        id
    } else {
        format!("\"{}\"", escape(&id))
    }
}

fn is_bare_id(id: &str) -> bool {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Strict digraph: each edge is kept once, nodes are keyed by id
#[derive(Debug, Default)]
struct DotGraph {
    edges: Vec<(String, String)>,
    nodes: BTreeMap<String, String>,
}

impl DotGraph {
    /// Add `node` and its subtree, returning the id of `node`
    fn add_subtree(&mut self, node: &GraphNode) -> String {
        let id = dot_node_id(&node.object);
        self.nodes.entry(id.clone()).or_insert_with(|| {
            format!("{}: {}", node.object.kind(), node.object.name())
        });

        for child in &node.children {
            let child_id = self.add_subtree(child);
            match child.hierarchy {
                Hierarchy::Upper => self.add_edge(child_id, id.clone()),
                Hierarchy::Lower => self.add_edge(id.clone(), child_id),
                Hierarchy::Root => {}
            }
        }

        id
    }

    fn add_edge(&mut self, from: String, to: String) {
        let edge = (from, to);
        if !self.edges.contains(&edge) {
            self.edges.push(edge);
        }
    }
}

impl fmt::Display for DotGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "strict digraph W {{")?;
        for (from, to) in &self.edges {
            writeln!(f, "\t{}->{};", from, to)?;
        }
        for (id, label) in &self.nodes {
            writeln!(f, "\t{} [ label=\"{}\" ];", id, escape(label))?;
        }
        writeln!(f)?;
        writeln!(f, "}}")
    }
}
