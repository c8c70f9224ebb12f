//! Integration tests for hl-graph.

use hl_graph::{NameIndex, RearSide, TopologyBuilder};

#[test]
fn two_room_building_with_partition() {
    // Living -[partition]- Bedroom, air flows Living -> Bedroom
    let mut builder = TopologyBuilder::new();
    let living = builder.add_room("Living");
    let bed = builder.add_room("Bedroom");
    builder.add_surface("living-ext", living, RearSide::Outdoor);
    builder.add_surface("living-floor", living, RearSide::Ground);
    let p1 = builder.add_surface("living-part", living, RearSide::Room(bed));
    let p2 = builder.add_surface("bed-part", bed, RearSide::Room(living));
    builder.add_surface("bed-ext", bed, RearSide::Outdoor);
    let e = builder.add_ventilation("transfer", living, bed, 30.0 / 3600.0);

    let topo = builder.build().unwrap();

    assert_eq!(topo.rooms().len(), 2);
    assert_eq!(topo.surfaces().len(), 5);
    assert_eq!(topo.edges().len(), 1);

    assert_eq!(topo.room_surfaces(living).len(), 3);
    assert_eq!(topo.room_surfaces(bed).len(), 2);

    // Only the downstream room sees the inflow
    assert!(topo.inflows(living).is_empty());
    assert_eq!(topo.inflows(bed), &[e]);
    let edge = topo.edge(e).unwrap();
    assert_eq!(edge.from, living);
    assert!((edge.flow_m3_per_s * 3600.0 - 30.0).abs() < 1e-12);

    assert_eq!(topo.surface(p1).unwrap().rear, RearSide::Room(bed));
    assert_eq!(topo.surface(p2).unwrap().owner, bed);
}

#[test]
fn name_index_resolves_all_entities() {
    let mut builder = TopologyBuilder::new();
    let a = builder.add_room("A");
    let b = builder.add_room("B");
    builder.add_surface("a1", a, RearSide::Outdoor);
    builder.add_surface("b1", b, RearSide::Outdoor);
    let topo = builder.build().unwrap();

    let index = NameIndex::from_topology(&topo).unwrap();
    for room in topo.rooms() {
        assert_eq!(index.room(&room.name).unwrap(), room.id);
    }
    for surface in topo.surfaces() {
        assert_eq!(index.surface(&surface.name).unwrap(), surface.id);
    }
}

#[test]
fn edge_to_missing_room_is_rejected() {
    let mut builder = TopologyBuilder::new();
    let a = builder.add_room("A");
    builder.add_surface("a1", a, RearSide::Outdoor);
    builder.add_ventilation("bad", a, hl_core::Id::from_index(7), 0.01);
    assert!(builder.build().is_err());
}
