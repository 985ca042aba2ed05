//! Unit tests for appgraph-gexf

use std::collections::HashSet;

use appgraph_core::*;
use chrono::{TimeZone, Utc};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::*;

// ── Fixtures ────────────────────────────────────────────

fn metadata() -> GraphMetadata {
    GraphMetadata::new("test-creator", "Test description")
        .with_created_at(Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap())
}

fn binding(id: &str, key: &str, kind: BindingKind) -> BindingNode {
    BindingNode {
        id: NodeId::from(id),
        label: simplify_key(key),
        attributes: Attributes::new(),
        key: key.to_string(),
        binding_kind: kind,
        scope: None,
        contributing_module: None,
        is_multibinding: kind.is_multibinding(),
        component_path: Some("app.App".to_string()),
        is_entry_point: false,
    }
}

fn edge(id: &str, source: &str, target: &str, kind: EdgeKind) -> Edge {
    Edge::new(EdgeId::from(id), NodeId::from(source), NodeId::from(target), kind)
}

fn sample_graph() -> Graph {
    let component = ComponentNode {
        id: NodeId::from("n0"),
        label: "App".to_string(),
        attributes: Attributes::new(),
        qualified_name: "app.App".to_string(),
        is_subcomponent: false,
        scopes: vec!["Singleton".to_string(), "Other".to_string()],
        component_path: "app.App".to_string(),
    };

    let mut map = binding("n1", "java.util.Map<java.lang.String, Int>", BindingKind::Injection);
    map.is_entry_point = true;
    map.scope = Some("Singleton".to_string());
    map.attributes.insert("nameHint".to_string(), "provide \"Map\" & 'more'".to_string());
    // Shadows a fixed column and must not be emitted twice.
    map.attributes.insert("scope".to_string(), "ignored".to_string());

    let mut plugins = binding("n2", "app.Plugin", BindingKind::MultiboundSet);
    plugins.contributing_module = Some("app.PluginModule".to_string());

    let module = ModuleNode {
        id: NodeId::from("n3"),
        label: "app.PluginModule".to_string(),
        attributes: Attributes::new(),
        qualified_name: "app.PluginModule".to_string(),
        is_abstract: false,
        includes: Vec::new(),
        installed_in_components: vec!["app.App".to_string()],
        binding_count: 1,
    };

    let missing = MissingBindingNode {
        id: NodeId::from("n4"),
        label: "[MISSING] Clock".to_string(),
        attributes: Attributes::new(),
        key: "app.Clock".to_string(),
    };

    let entry = edge("e0", "n0", "n1", EdgeKind::Dependency { is_entry_point: true })
        .with_attributes(Attributes::from([("deferrable".to_string(), "true".to_string())]));

    Graph::new(
        "app_App",
        "app.App",
        vec![
            component.into(),
            map.into(),
            plugins.into(),
            module.into(),
            missing.into(),
        ],
        vec![
            entry,
            edge("e1", "n1", "n2", EdgeKind::Dependency { is_entry_point: false }),
            edge("e2", "n2", "n3", EdgeKind::BindingToModule),
            edge("e3", "n1", "n4", EdgeKind::Dependency { is_entry_point: false }),
            edge("e4", "n0", "n3", EdgeKind::ModuleInclusion),
            edge("e5", "n0", "n1", EdgeKind::BindingOwnership),
        ],
        metadata(),
    )
}

fn empty_graph() -> Graph {
    Graph::new("empty", "empty", vec![], vec![], metadata())
}

// ── XML tree for structural comparison ──────────────────

#[derive(Debug, Default, Clone, PartialEq)]
struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// `for` → `value` pairs under `<attvalues>`.
    fn attvalues(&self) -> Vec<(String, String)> {
        self.child("attvalues")
            .map(|values| {
                values
                    .children_named("attvalue")
                    .map(|v| {
                        (
                            v.attr("for").unwrap_or_default().to_string(),
                            v.attr("value").unwrap_or_default().to_string(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn element(start: &BytesStart<'_>) -> Element {
    Element {
        name: String::from_utf8(start.name().as_ref().to_vec()).unwrap(),
        attrs: start
            .attributes()
            .map(|attr| {
                let attr = attr.unwrap();
                (
                    String::from_utf8(attr.key.as_ref().to_vec()).unwrap(),
                    attr.unescape_value().unwrap().into_owned(),
                )
            })
            .collect(),
        ..Default::default()
    }
}

/// Parse `xml` and return its root element.
fn parse(xml: &str) -> Element {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut stack = vec![Element::default()];
    loop {
        match reader.read_event().unwrap() {
            Event::Start(start) => stack.push(element(&start)),
            Event::Empty(start) => {
                let leaf = element(&start);
                stack.last_mut().unwrap().children.push(leaf);
            }
            Event::End(_) => {
                let done = stack.pop().unwrap();
                stack.last_mut().unwrap().children.push(done);
            }
            Event::Text(text) => {
                stack.last_mut().unwrap().text.push_str(&text.unescape().unwrap());
            }
            Event::Eof => break,
            _ => {}
        }
    }
    assert_eq!(stack.len(), 1, "unbalanced document");
    let mut document = stack.pop().unwrap();
    assert_eq!(document.children.len(), 1, "expected a single root element");
    document.children.remove(0)
}

fn pretty(graph: &Graph) -> String {
    GexfWriter::new().write_to_string(graph).unwrap()
}

fn compact(graph: &Graph) -> String {
    GexfWriter::new().pretty(false).write_to_string(graph).unwrap()
}

// ── Tests ───────────────────────────────────────────────

#[test]
fn test_escape_xml() {
    assert_eq!(
        escape_xml(r#"a & <b> "c" 'd'"#),
        "a &amp; &lt;b&gt; &quot;c&quot; &apos;d&apos;"
    );
    // Existing entities are escaped again.
    assert_eq!(escape_xml("&lt;"), "&amp;lt;");
    assert!(matches!(escape_xml("plain"), std::borrow::Cow::Borrowed("plain")));
}

#[test]
fn test_writer_identity() {
    let writer = GexfWriter::new();
    assert_eq!(writer.format_name(), "GEXF");
    assert_eq!(writer.file_extension(), "gexf");
    assert!(writer.is_pretty());
    assert!(writer.has_visualization());
    assert!(!writer.pretty(false).is_pretty());
}

#[test]
fn test_empty_graph() {
    let xml = pretty(&empty_graph());
    insta::assert_snapshot!(xml, @r#"
<?xml version="1.0" encoding="UTF-8"?>
<gexf xmlns="http://gexf.net/1.3" xmlns:viz="http://gexf.net/1.3/viz" version="1.3">
  <meta lastmodifieddate="2024-01-15">
    <creator>test-creator</creator>
    <description>Test description</description>
  </meta>
  <graph mode="static" defaultedgetype="directed">
    <nodes>
    </nodes>
    <edges>
    </edges>
  </graph>
</gexf>
"#);

    let root = parse(&compact(&empty_graph()));
    let graph = root.child("graph").unwrap();
    assert!(graph.child("attributes").is_none());
    assert!(graph.child("nodes").unwrap().children.is_empty());
    assert!(graph.child("edges").unwrap().children.is_empty());
    assert!(compact(&empty_graph()).contains("<nodes></nodes>"));
}

#[test]
fn test_escapes_labels_and_values() {
    let graph = sample_graph();
    for xml in [pretty(&graph), compact(&graph)] {
        assert!(xml.contains("Map&lt;String, Int&gt;"));
        assert!(!xml.contains("Map<String"));
        assert!(!xml.contains("\"Map\""));
    }

    let root = parse(&pretty(&graph));
    let nodes = root.child("graph").unwrap().child("nodes").unwrap();
    let map = nodes.children_named("node").nth(1).unwrap();
    assert_eq!(map.attr("label"), Some("Map<String, Int>"));
    assert!(map
        .attvalues()
        .contains(&("nameHint".to_string(), "provide \"Map\" & 'more'".to_string())));
}

#[test]
fn test_both_modes_escape_identically() {
    let graph = sample_graph();
    let hint = "provide \"Map\" & 'more'";
    let expected = format!(r#"for="nameHint" value="{}""#, escape_xml(hint));
    assert_eq!(
        expected,
        r#"for="nameHint" value="provide &quot;Map&quot; &amp; &apos;more&apos;""#
    );

    for xml in [pretty(&graph), compact(&graph)] {
        assert!(xml.contains(&expected));
        assert!(xml.contains(r#"label="Map&lt;String, Int&gt;""#));
        assert!(xml.contains("<description>Test description</description>"));
    }
    assert!(pretty(&graph).contains("\n    <nodes>\n      <node id=\"n0\""));
}

#[test]
fn test_pretty_and_compact_are_equivalent() {
    for visualization in [true, false] {
        let graph = sample_graph();
        let writer = GexfWriter::new().visualization(visualization);
        let indented = writer.write_to_string(&graph).unwrap();
        let streamed = writer.pretty(false).write_to_string(&graph).unwrap();
        assert_ne!(indented, streamed);
        assert_eq!(parse(&indented), parse(&streamed));
    }
}

#[test]
fn test_structural_fidelity() {
    let graph = sample_graph();
    let root = parse(&compact(&graph));
    assert_eq!(root.name, "gexf");
    assert_eq!(root.attr("xmlns"), Some(GEXF_NAMESPACE));
    assert_eq!(root.attr("version"), Some("1.3"));

    let body = root.child("graph").unwrap();
    let nodes: Vec<_> = body.child("nodes").unwrap().children_named("node").collect();
    let edges: Vec<_> = body.child("edges").unwrap().children_named("edge").collect();
    assert_eq!(nodes.len(), graph.node_count());
    assert_eq!(edges.len(), graph.edge_count());

    let ids: HashSet<&str> = nodes.iter().filter_map(|n| n.attr("id")).collect();
    for edge in &edges {
        assert!(ids.contains(edge.attr("source").unwrap()));
        assert!(ids.contains(edge.attr("target").unwrap()));
    }

    // Graph order is preserved.
    let order: Vec<_> = edges.iter().filter_map(|e| e.attr("id")).collect();
    assert_eq!(order, vec!["e0", "e1", "e2", "e3", "e4", "e5"]);
}

#[test]
fn test_writing_is_idempotent() {
    let graph = sample_graph();
    assert_eq!(pretty(&graph), pretty(&graph));
    assert_eq!(compact(&graph), compact(&graph));
}

#[test]
fn test_attribute_declarations() {
    let root = parse(&pretty(&sample_graph()));
    let body = root.child("graph").unwrap();
    let classes: Vec<_> = body.children_named("attributes").collect();
    assert_eq!(classes.len(), 2);

    let node_columns: Vec<_> = classes[0]
        .children_named("attribute")
        .filter_map(|a| a.attr("id"))
        .collect();
    assert_eq!(classes[0].attr("class"), Some("node"));
    assert_eq!(
        node_columns,
        vec![
            "nodeType",
            "bindingKind",
            "scope",
            "qualifiedName",
            "isMultibinding",
            "contributingModule",
            "componentPath",
            "isEntryPoint",
            "isSubcomponent",
            "bindingCount",
            "installedInComponents",
            "nameHint",
        ]
    );
    let count = classes[0].children_named("attribute").find(|a| a.attr("id") == Some("bindingCount"));
    assert_eq!(count.and_then(|a| a.attr("type")), Some("integer"));

    let edge_columns: Vec<_> = classes[1]
        .children_named("attribute")
        .filter_map(|a| a.attr("id"))
        .collect();
    assert_eq!(classes[1].attr("class"), Some("edge"));
    assert_eq!(edge_columns, vec!["edgeType", "isEntryPoint", "deferrable"]);
}

#[test]
fn test_flag_columns_default_to_false() {
    let defaults: Vec<_> = schema::node_attributes()
        .into_iter()
        .filter_map(|c| c.default_value.map(|d| (c.id, d)))
        .collect();
    assert_eq!(
        defaults,
        vec![
            ("isMultibinding".to_string(), "false".to_string()),
            ("isEntryPoint".to_string(), "false".to_string()),
            ("isSubcomponent".to_string(), "false".to_string()),
        ]
    );

    for xml in [pretty(&sample_graph()), compact(&sample_graph())] {
        let root = parse(&xml);
        let edge_class = root
            .child("graph")
            .unwrap()
            .children_named("attributes")
            .find(|a| a.attr("class") == Some("edge"))
            .unwrap();
        let entry = edge_class
            .children_named("attribute")
            .find(|a| a.attr("id") == Some("isEntryPoint"))
            .unwrap();
        assert_eq!(entry.child("default").map(|d| d.text.as_str()), Some("false"));
        let edge_type = edge_class
            .children_named("attribute")
            .find(|a| a.attr("id") == Some("edgeType"))
            .unwrap();
        assert!(edge_type.children.is_empty());
    }
}

#[test]
fn test_edge_declarations_omitted_without_edges() {
    let component = ComponentNode {
        id: NodeId::from("n0"),
        label: "App".to_string(),
        attributes: Attributes::new(),
        qualified_name: "app.App".to_string(),
        is_subcomponent: false,
        scopes: vec![],
        component_path: "app.App".to_string(),
    };
    let graph = Graph::new("g", "g", vec![component.into()], vec![], metadata());
    let root = parse(&compact(&graph));
    let classes: Vec<_> = root
        .child("graph")
        .unwrap()
        .children_named("attributes")
        .filter_map(|a| a.attr("class"))
        .collect();
    assert_eq!(classes, vec!["node"]);
}

#[test]
fn test_node_attvalues_per_variant() {
    let root = parse(&pretty(&sample_graph()));
    let nodes: Vec<_> = root
        .child("graph")
        .unwrap()
        .child("nodes")
        .unwrap()
        .children_named("node")
        .collect();
    let columns = |i: usize| -> Vec<String> { nodes[i].attvalues().into_iter().map(|(k, _)| k).collect() };

    assert_eq!(
        columns(0),
        vec!["nodeType", "qualifiedName", "scope", "isSubcomponent", "componentPath"]
    );
    assert!(nodes[0].attvalues().contains(&("scope".to_string(), "Singleton,Other".to_string())));
    assert_eq!(
        columns(1),
        vec![
            "nodeType",
            "bindingKind",
            "scope",
            "qualifiedName",
            "isMultibinding",
            "componentPath",
            "isEntryPoint",
            "nameHint",
        ]
    );
    assert!(nodes[1].attvalues().contains(&("scope".to_string(), "Singleton".to_string())));
    assert_eq!(
        columns(3),
        vec!["nodeType", "qualifiedName", "bindingCount", "installedInComponents"]
    );
    assert_eq!(
        nodes[4].attvalues(),
        vec![
            ("nodeType".to_string(), "MISSING_BINDING".to_string()),
            ("qualifiedName".to_string(), "app.Clock".to_string()),
        ]
    );
}

#[test]
fn test_edge_attvalues() {
    let root = parse(&compact(&sample_graph()));
    let edges: Vec<_> = root
        .child("graph")
        .unwrap()
        .child("edges")
        .unwrap()
        .children_named("edge")
        .collect();

    assert_eq!(
        edges[0].attvalues(),
        vec![
            ("edgeType".to_string(), "DEPENDENCY".to_string()),
            ("isEntryPoint".to_string(), "true".to_string()),
            ("deferrable".to_string(), "true".to_string()),
        ]
    );
    assert_eq!(
        edges[2].attvalues(),
        vec![("edgeType".to_string(), "BINDING_TO_MODULE".to_string())]
    );
}

#[test]
fn test_visualization_hints() {
    let root = parse(&pretty(&sample_graph()));
    let nodes: Vec<_> = root
        .child("graph")
        .unwrap()
        .child("nodes")
        .unwrap()
        .children_named("node")
        .collect();
    let color = |i: usize| {
        let c = nodes[i].child("viz:color").unwrap();
        (c.attr("r").unwrap(), c.attr("g").unwrap(), c.attr("b").unwrap())
    };
    let size = |i: usize| nodes[i].child("viz:size").unwrap().attr("value").unwrap();
    let shape = |i: usize| nodes[i].child("viz:shape").unwrap().attr("value").unwrap();

    assert_eq!((color(0), size(0), shape(0)), (("66", "133", "244"), "30.0", "square"));
    assert_eq!((color(1), size(1), shape(1)), (("52", "168", "83"), "20.0", "star"));
    assert_eq!((color(2), size(2), shape(2)), (("255", "152", "0"), "15.0", "disc"));
    assert_eq!((color(3), size(3), shape(3)), (("251", "188", "4"), "25.0", "diamond"));
    assert_eq!((color(4), size(4), shape(4)), (("234", "67", "53"), "15.0", "triangle"));
}

#[test]
fn test_multibinding_color_wins_over_kind() {
    let mut contribution = binding("n0", "app.Interceptor", BindingKind::Delegate);
    contribution.is_multibinding = true;
    let node = Node::from(contribution);
    assert_eq!(viz::hints_for(&node).color, viz::MULTIBINDING_COLOR);

    let plain = Node::from(binding("n1", "app.Plain", BindingKind::Delegate));
    assert_eq!(viz::hints_for(&plain).color, viz::DELEGATE_COLOR);
    let other = Node::from(binding("n2", "app.Other", BindingKind::BoundInstance));
    assert_eq!(viz::hints_for(&other).color, viz::BINDING_COLOR);
}

#[test]
fn test_visualization_disabled() {
    let xml = GexfWriter::new()
        .visualization(false)
        .write_to_string(&sample_graph())
        .unwrap();
    assert!(!xml.contains("xmlns:viz"));
    assert!(!xml.contains("<viz:"));
}

#[test]
fn test_write_to_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("App.gexf");
    let graph = sample_graph();

    GexfWriter::new().write_to_path(&graph, &path).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, pretty(&graph));
}

#[test]
fn test_write_to_missing_directory_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("missing").join("App.gexf");
    let err = GexfWriter::new().write_to_path(&sample_graph(), &path).unwrap_err();
    assert!(matches!(err, WriteError::Io(_)));
}
