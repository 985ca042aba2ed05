//! Integration tests for AppGraph
//!
//! Metadata files on disk go through a source, the GEXF writer and back
//! through an XML parser.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::process::Command;

use appgraph_core::{Graph, GraphStats};
use appgraph_gexf::{GexfWriter, GraphWriter};
use appgraph_source::{GraphSourceInput, GraphSourceResult, create_source};
use quick_xml::Reader;
use quick_xml::events::Event;
use tempfile::TempDir;

const METRO: &str = r#"{
  "graph": "shop.ShopGraph",
  "scopes": ["AppScope"],
  "roots": {
    "accessors": [{ "key": "shop.Checkout", "isDeferrable": true }],
    "injectors": [{ "key": "shop.MainActivity" }]
  },
  "bindings": [
    {
      "key": "shop.Checkout",
      "bindingKind": "ConstructorInjected",
      "isScoped": true,
      "dependencies": [{ "key": "shop.Cart" }, { "key": "shop.Payments" }]
    },
    {
      "key": "shop.Cart",
      "bindingKind": "Provided",
      "origin": "ShopGraph.kt:12:3",
      "dependencies": [{ "key": "java.util.Set<shop.Discount>" }]
    },
    {
      "key": "java.util.Set<shop.Discount>",
      "bindingKind": "IntoSet",
      "origin": "DiscountModule.kt:4:1"
    },
    {
      "key": "shop.MainActivity",
      "bindingKind": "ConstructorInjected",
      "dependencies": [{ "key": "shop.Checkout" }]
    }
  ]
}"#;

const SNAPSHOT: &str = r#"{
  "root": { "path": ["shop.ShopComponent"], "scopes": ["Singleton"] },
  "subcomponents": [
    { "path": ["shop.ShopComponent", "shop.CartComponent"], "isSubcomponent": true }
  ],
  "bindings": [
    { "key": "shop.Store", "kind": "PROVISION", "scope": "Singleton", "contributingModule": "shop.StoreModule" },
    { "key": "shop.Cart", "kind": "INJECTION", "componentPath": ["shop.ShopComponent", "shop.CartComponent"] }
  ],
  "dependencies": [
    { "source": { "component": ["shop.ShopComponent"] }, "targetKey": "shop.Store" },
    { "source": { "binding": "shop.Cart" }, "targetKey": "shop.Store" }
  ]
}"#;

/// Counts of `<node>` and `<edge>` elements plus edge endpoint references.
struct Document {
    node_ids: HashSet<String>,
    edge_count: usize,
    endpoints: Vec<String>,
}

fn read_document(xml: &str) -> Document {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut doc = Document {
        node_ids: HashSet::new(),
        edge_count: 0,
        endpoints: Vec::new(),
    };
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => {
                let attr = |name: &str| {
                    e.attributes()
                        .map(|a| a.unwrap())
                        .find(|a| a.key.as_ref() == name.as_bytes())
                        .map(|a| a.unescape_value().unwrap().into_owned())
                };
                match e.name().as_ref() {
                    b"node" => {
                        doc.node_ids.insert(attr("id").unwrap());
                    }
                    b"edge" => {
                        doc.edge_count += 1;
                        doc.endpoints.push(attr("source").unwrap());
                        doc.endpoints.push(attr("target").unwrap());
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    doc
}

fn extract(source_type: &str, path: &Path) -> Vec<Graph> {
    let source = create_source(source_type).unwrap();
    match source.extract(&GraphSourceInput::new([path])) {
        GraphSourceResult::Success(graphs) => graphs,
        other => panic!("expected success, got {other:?}"),
    }
}

fn assert_round_trip(graph: &Graph, dir: &Path) {
    for writer in [GexfWriter::new(), GexfWriter::new().pretty(false)] {
        let path = dir.join(format!("{}.gexf", graph.id()));
        writer.write_to_path(graph, &path).unwrap();
        let doc = read_document(&fs::read_to_string(&path).unwrap());

        assert_eq!(doc.node_ids.len(), graph.node_count());
        assert_eq!(doc.edge_count, graph.edge_count());
        for endpoint in &doc.endpoints {
            assert!(doc.node_ids.contains(endpoint), "dangling endpoint {endpoint}");
        }
    }
}

#[test]
fn test_metro_metadata_to_gexf() {
    let dir = TempDir::new().unwrap();
    let reports = dir.path().join("reports/main/graph-metadata");
    fs::create_dir_all(&reports).unwrap();
    fs::write(reports.join("graph-ShopGraph.json"), METRO).unwrap();
    fs::write(reports.join("notes.txt"), "ignored").unwrap();

    let graphs = extract("metro", dir.path());
    assert_eq!(graphs.len(), 1);
    let graph = &graphs[0];
    assert_eq!(graph.validate(), Ok(()));

    let stats = GraphStats::from_graph(graph);
    assert_eq!(stats.entry_points, 2);
    assert_eq!(stats.missing_bindings, 1);
    assert!(!stats.has_cycles());

    assert_round_trip(graph, dir.path());
}

#[test]
fn test_binding_graph_snapshot_to_gexf() {
    let dir = TempDir::new().unwrap();
    let snapshots = dir.path().join("binding-graphs");
    fs::create_dir_all(&snapshots).unwrap();
    fs::write(snapshots.join("shop.json"), SNAPSHOT).unwrap();

    let graphs = extract("binding-graph", dir.path());
    assert_eq!(graphs.len(), 1);
    let graph = &graphs[0];
    assert_eq!(graph.name(), "shop.ShopComponent");
    assert_eq!(graph.validate(), Ok(()));
    assert_eq!(graph.components().count(), 2);
    assert_eq!(graph.modules().count(), 1);

    assert_round_trip(graph, dir.path());
}

#[test]
fn test_partial_batch_keeps_good_graphs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("graph-Good.json"), METRO).unwrap();
    fs::write(dir.path().join("graph-Bad.json"), "{ not json").unwrap();

    let source = create_source("metro").unwrap();
    match source.extract(&GraphSourceInput::new([dir.path()])) {
        GraphSourceResult::Partial { graphs, errors } => {
            assert_eq!(graphs.len(), 1);
            assert_eq!(errors.len(), 1);
            assert!(errors[0].contains("graph-Bad.json"));
        }
        other => panic!("expected partial result, got {other:?}"),
    }
}

#[test]
fn test_cli_convert() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("graph-ShopGraph.json"), METRO).unwrap();
    fs::write(
        dir.path().join("appgraph.toml"),
        "[output]\npath = \"out\"\nvisualization = false\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_appgraph"))
        .args(["convert", "--source", "metro", "graph-ShopGraph.json"])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );

    let xml = fs::read_to_string(dir.path().join("out/ShopGraph.gexf")).unwrap();
    assert!(!xml.contains("viz:"));
    assert_eq!(read_document(&xml).node_ids.len(), 8);
}

#[test]
fn test_cli_rejects_unknown_source() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_appgraph"))
        .args(["stats", "--source", "guice", "."])
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown graph source: guice"));
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_appgraph"))
        .arg("version")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("appgraph v"));
}
