//! Test helpers shared across stark-index unit tests.

use std::collections::BTreeMap;

use stark_kb::{AmazonKb, EdgeIndex, Entity, NodeInfo, ProcessedData, Product, SemiStructKb};

/// A product node.
fn product(title: &str, brand: Option<&str>, description: &str) -> NodeInfo {
    NodeInfo::Product(Product {
        title: title.into(),
        brand: brand.map(Into::into),
        description: vec![description.into()],
        ..Default::default()
    })
}

/// A brand entity node.
fn brand(name: &str) -> NodeInfo {
    NodeInfo::Entity(Entity {
        kind: "brand".into(),
        name: name.into(),
    })
}

/// Four outdoor products and two brands.
///
/// Products 0 (Dome Tent) and 1 (Camp Stove) share the brand Coleman (node 4); product 3
/// (Trekking Poles) is by Black Diamond (node 5); product 2 (LED Lantern) has no brand.
pub fn sample_kb() -> AmazonKb {
    let nodes = vec![
        product("Dome Tent", Some("Coleman"), "Waterproof dome tent for four campers."),
        product("Camp Stove", Some("Coleman"), "Two burner propane stove."),
        product("LED Lantern", None, "Bright battery lantern for the campsite."),
        product("Trekking Poles", Some("Black Diamond"), "Aluminum poles for hiking."),
        brand("Coleman"),
        brand("Black Diamond"),
    ];
    let mut edges = EdgeIndex::default();
    let mut edge_types = Vec::new();
    for (src, dst, rel) in [(0, 1, 0), (1, 2, 1), (0, 4, 2), (1, 4, 2), (3, 5, 2)] {
        edges.push(src, dst);
        edge_types.push(rel);
    }
    let data = ProcessedData {
        nodes,
        node_types: vec![0, 0, 0, 0, 1, 1],
        node_type_dict: BTreeMap::from([(0, "product".into()), (1, "brand".into())]),
        edges,
        edge_types,
        edge_type_dict: BTreeMap::from([
            (0, "also_buy".into()),
            (1, "also_view".into()),
            (2, "has_brand".into()),
        ]),
    };
    AmazonKb::from_graph(SemiStructKb::new(data, true).unwrap(), 25)
}
