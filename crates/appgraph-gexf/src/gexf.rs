//! GEXF 1.3 serialization
//!
//! Both output modes walk the graph through the same [`render`] pass and
//! differ only in whether the `quick-xml` writer indents, so they always
//! carry the same content.

use std::io::Write;

use appgraph_core::{Edge, Graph, Node};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::debug;

use crate::error::WriteError;
use crate::schema::{self, Schema};
use crate::viz;
use crate::writer::GraphWriter;

pub const GEXF_NAMESPACE: &str = "http://gexf.net/1.3";
pub const VIZ_NAMESPACE: &str = "http://gexf.net/1.3/viz";
pub const GEXF_VERSION: &str = "1.3";

const INDENT: usize = 2;

/// Writes graphs as GEXF 1.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GexfWriter {
    pretty: bool,
    visualization: bool,
}

impl Default for GexfWriter {
    fn default() -> Self {
        GexfWriter {
            pretty: true,
            visualization: true,
        }
    }
}

impl GexfWriter {
    /// Indented output with visualization hints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented (`true`) or compact streaming (`false`) output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Emit `viz:color`, `viz:size` and `viz:shape` per node.
    pub fn visualization(mut self, visualization: bool) -> Self {
        self.visualization = visualization;
        self
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }

    pub fn has_visualization(&self) -> bool {
        self.visualization
    }

    /// Render to an in-memory string.
    pub fn write_to_string(&self, graph: &Graph) -> Result<String, WriteError> {
        let mut buffer = Vec::new();
        self.write(graph, &mut buffer)?;
        // Every byte written came from `&str` input.
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl GraphWriter for GexfWriter {
    fn format_name(&self) -> &'static str {
        "GEXF"
    }

    fn file_extension(&self) -> &'static str {
        "gexf"
    }

    fn write(&self, graph: &Graph, out: &mut dyn Write) -> Result<(), WriteError> {
        debug!(
            graph = graph.name(),
            pretty = self.pretty,
            visualization = self.visualization,
            "writing GEXF"
        );
        let writer = if self.pretty {
            Writer::new_with_indent(&mut *out, b' ', INDENT)
        } else {
            Writer::new(&mut *out)
        };
        render(graph, self.visualization, &mut XmlSink { writer })?;
        if self.pretty {
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}

type Attrs<'a> = [(&'a str, &'a str)];

/// Element-level output primitives over a `quick-xml` writer. Escaping and
/// indentation are left to the writer.
struct XmlSink<'a, 'w> {
    writer: Writer<&'a mut (dyn Write + 'w)>,
}

fn start<'n>(name: &'n str, attrs: &Attrs<'_>) -> BytesStart<'n> {
    let mut element = BytesStart::new(name);
    for &(key, value) in attrs {
        element.push_attribute((key, value));
    }
    element
}

impl XmlSink<'_, '_> {
    fn declaration(&mut self) -> Result<(), WriteError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    fn open(&mut self, name: &str, attrs: &Attrs<'_>) -> Result<(), WriteError> {
        self.writer.write_event(Event::Start(start(name, attrs)))?;
        Ok(())
    }

    fn empty(&mut self, name: &str, attrs: &Attrs<'_>) -> Result<(), WriteError> {
        self.writer.write_event(Event::Empty(start(name, attrs)))?;
        Ok(())
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<(), WriteError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), WriteError> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

fn render(graph: &Graph, visualization: bool, sink: &mut XmlSink<'_, '_>) -> Result<(), WriteError> {
    sink.declaration()?;

    let mut root: Vec<(&str, &str)> = vec![("xmlns", GEXF_NAMESPACE)];
    if visualization {
        root.push(("xmlns:viz", VIZ_NAMESPACE));
    }
    root.push(("version", GEXF_VERSION));
    sink.open("gexf", &root)?;

    let modified = graph.metadata().created_at.format("%Y-%m-%d").to_string();
    sink.open("meta", &[("lastmodifieddate", modified.as_str())])?;
    sink.text_element("creator", &graph.metadata().creator)?;
    if !graph.metadata().description.is_empty() {
        sink.text_element("description", &graph.metadata().description)?;
    }
    sink.close("meta")?;

    let edge_type = if graph.directed() { "directed" } else { "undirected" };
    sink.open("graph", &[("mode", "static"), ("defaultedgetype", edge_type)])?;

    let schema = Schema::for_graph(graph);
    if !graph.nodes().is_empty() {
        declare_attributes(sink, "node", &schema.node)?;
    }
    if !graph.edges().is_empty() {
        declare_attributes(sink, "edge", &schema.edge)?;
    }

    sink.open("nodes", &[])?;
    let fixed_node = schema::node_attributes();
    for node in graph.nodes() {
        render_node(sink, node, visualization, &fixed_node)?;
    }
    sink.close("nodes")?;

    sink.open("edges", &[])?;
    let fixed_edge = schema::edge_attributes();
    for edge in graph.edges() {
        render_edge(sink, edge, &fixed_edge)?;
    }
    sink.close("edges")?;

    sink.close("graph")?;
    sink.close("gexf")
}

fn declare_attributes(
    sink: &mut XmlSink<'_, '_>,
    class: &str,
    columns: &[appgraph_core::AttributeDefinition],
) -> Result<(), WriteError> {
    sink.open("attributes", &[("class", class)])?;
    for column in columns {
        let attrs = [
            ("id", column.id.as_str()),
            ("title", column.title.as_str()),
            ("type", column.attr_type.as_str()),
        ];
        match &column.default_value {
            Some(default) => {
                sink.open("attribute", &attrs)?;
                sink.text_element("default", default)?;
                sink.close("attribute")?;
            }
            None => sink.empty("attribute", &attrs)?,
        }
    }
    sink.close("attributes")
}

fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

/// `(for, value)` pairs for the fixed columns that apply to `node`.
fn node_values(node: &Node) -> Vec<(&'static str, String)> {
    let mut values = vec![("nodeType", node.node_type().as_str().to_string())];
    match node {
        Node::Binding(b) => {
            values.push(("bindingKind", b.binding_kind.as_str().to_string()));
            if let Some(scope) = &b.scope {
                values.push(("scope", scope.clone()));
            }
            values.push(("qualifiedName", b.key.clone()));
            values.push(("isMultibinding", bool_str(b.is_multibinding).to_string()));
            if let Some(module) = &b.contributing_module {
                values.push(("contributingModule", module.clone()));
            }
            if let Some(path) = &b.component_path {
                values.push(("componentPath", path.clone()));
            }
            values.push(("isEntryPoint", bool_str(b.is_entry_point).to_string()));
        }
        Node::Component(c) => {
            values.push(("qualifiedName", c.qualified_name.clone()));
            if !c.scopes.is_empty() {
                values.push(("scope", c.scopes.join(",")));
            }
            values.push(("isSubcomponent", bool_str(c.is_subcomponent).to_string()));
            values.push(("componentPath", c.component_path.clone()));
        }
        Node::Module(m) => {
            values.push(("qualifiedName", m.qualified_name.clone()));
            values.push(("bindingCount", m.binding_count.to_string()));
            if !m.installed_in_components.is_empty() {
                values.push(("installedInComponents", m.installed_in_components.join(",")));
            }
        }
        Node::MissingBinding(m) => {
            values.push(("qualifiedName", m.key.clone()));
        }
    }
    values
}

fn render_node(
    sink: &mut XmlSink<'_, '_>,
    node: &Node,
    visualization: bool,
    fixed: &[appgraph_core::AttributeDefinition],
) -> Result<(), WriteError> {
    sink.open("node", &[("id", node.id().as_str()), ("label", node.label())])?;

    if visualization {
        let hints = viz::hints_for(node);
        let (r, g, b) = (
            hints.color.r.to_string(),
            hints.color.g.to_string(),
            hints.color.b.to_string(),
        );
        sink.empty(
            "viz:color",
            &[("r", r.as_str()), ("g", g.as_str()), ("b", b.as_str())],
        )?;
        let size = format!("{:.1}", hints.size);
        sink.empty("viz:size", &[("value", size.as_str())])?;
        sink.empty("viz:shape", &[("value", hints.shape)])?;
    }

    sink.open("attvalues", &[])?;
    for (column, value) in node_values(node) {
        sink.empty("attvalue", &[("for", column), ("value", value.as_str())])?;
    }
    for (key, value) in node.attributes() {
        if schema::is_fixed(fixed, key) {
            continue;
        }
        sink.empty("attvalue", &[("for", key.as_str()), ("value", value.as_str())])?;
    }
    sink.close("attvalues")?;
    sink.close("node")
}

fn render_edge(
    sink: &mut XmlSink<'_, '_>,
    edge: &Edge,
    fixed: &[appgraph_core::AttributeDefinition],
) -> Result<(), WriteError> {
    sink.open(
        "edge",
        &[
            ("id", edge.id.as_str()),
            ("source", edge.source.as_str()),
            ("target", edge.target.as_str()),
        ],
    )?;
    sink.open("attvalues", &[])?;
    sink.empty("attvalue", &[("for", "edgeType"), ("value", edge.edge_type().as_str())])?;
    if let Some(entry_point) = edge.is_entry_point() {
        sink.empty("attvalue", &[("for", "isEntryPoint"), ("value", bool_str(entry_point))])?;
    }
    for (key, value) in &edge.attributes {
        if schema::is_fixed(fixed, key) {
            continue;
        }
        sink.empty("attvalue", &[("for", key.as_str()), ("value", value.as_str())])?;
    }
    sink.close("attvalues")?;
    sink.close("edge")
}
