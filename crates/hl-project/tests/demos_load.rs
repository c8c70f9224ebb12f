use std::path::Path;

#[test]
fn demos_load_and_build() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos");
    let demos = ["two_rooms.yaml"];

    for name in demos {
        let path = root.join(name);
        let project = hl_project::load_yaml(&path)
            .unwrap_or_else(|e| panic!("Failed to load {}: {}", name, e));
        let built = hl_project::build_project(&project)
            .unwrap_or_else(|e| panic!("Failed to build {}: {}", name, e));
        assert_eq!(built.model.network.room_count(), project.rooms.len());
        assert_eq!(built.model.network.boundary_count(), project.boundaries.len());
    }
}
