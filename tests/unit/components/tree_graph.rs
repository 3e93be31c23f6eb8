use super::*;
use crate::animation::task::run_to_end;
use crate::components::box_node::BoxNode;
use crate::foundation::core::CubicBez;

fn opacity(scene: &Scene, id: NodeId) -> f64 {
    scene.get(Prop::Opacity(id)).unwrap()
}

// root at the top, two children below.
fn setup() -> (Scene, TreeGraph) {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let style = TextStyle {
        font_size: 10.0,
        ..TextStyle::default()
    };
    let nodes = [(0.0, -100.0), (-100.0, 100.0), (100.0, 100.0)]
        .into_iter()
        .enumerate()
        .map(|(i, at)| {
            BoxNode::tree_node(&mut scene, root, format!("n{i}"), style.clone(), at)
                .unwrap()
                .id()
        })
        .collect();
    let graph = TreeGraph::new(
        &mut scene,
        root,
        (0.0, 0.0),
        nodes,
        vec![Edge::new(0, 1, "a"), Edge::new(0, 2, "b")],
    )
    .unwrap();
    (scene, graph)
}

fn geometry(scene: &Scene, graph: &TreeGraph) -> Vec<CubicBez> {
    graph
        .joins()
        .iter()
        .map(|j| j.connector.geometry(scene).unwrap())
        .collect()
}

#[test]
fn joins_run_from_bottom_to_top() {
    let (scene, graph) = setup();
    assert_eq!(graph.joins().len(), 2);
    let j = graph.joins()[0];
    assert_eq!(j.from, graph.nodes()[0]);
    assert_eq!(j.to, graph.nodes()[1]);

    let from = scene.world_bounds(j.from).unwrap();
    let to = scene.world_bounds(j.to).unwrap();
    let g = j.connector.geometry(&scene).unwrap();
    assert_eq!(g.p0, Point::new(from.center().x, from.y1));
    assert_eq!(g.p3, Point::new(to.center().x, to.y0));
}

#[test]
fn text_label_sits_at_edge_midpoint() {
    let (scene, graph) = setup();
    let j = graph.joins()[1];
    assert_eq!(scene.text(j.label).unwrap(), "b");
    assert_eq!(
        scene.position(j.label).unwrap(),
        j.connector.midpoint(&scene).unwrap()
    );
}

#[test]
fn rebuild_with_same_input_is_idempotent() {
    let (mut scene, mut graph) = setup();
    let before = geometry(&scene, &graph);
    let old = graph.joins()[0].connector.id();
    let live = scene.len();

    let nodes = graph.nodes().to_vec();
    let edges = graph.edges().to_vec();
    graph.set_graph(&mut scene, nodes, edges).unwrap();

    assert_eq!(geometry(&scene, &graph), before);
    assert!(!scene.contains(old));
    assert_eq!(scene.len(), live);
}

#[test]
fn rebuild_discards_manual_changes() {
    let (mut scene, mut graph) = setup();
    graph.hide_all(&mut scene).unwrap();
    graph
        .set_edges(&mut scene, vec![Edge::new(0, 1, "a"), Edge::new(0, 2, "b")])
        .unwrap();
    let j = graph.joins()[0];
    assert_eq!(j.connector.progress(&scene).unwrap(), 1.0);
    assert_eq!(opacity(&scene, j.label), 1.0);
}

#[test]
fn invalid_edge_fails_before_any_change() {
    let (mut scene, mut graph) = setup();
    let joins = graph.joins().to_vec();
    let live = scene.len();

    let err = graph
        .set_edges(&mut scene, vec![Edge::new(0, 1, "a"), Edge::bare(2, 7)])
        .unwrap_err();
    assert!(matches!(err, LexvisError::Graph(_)), "{err}");
    assert!(err.to_string().contains("edge 1"), "{err}");
    assert_eq!(graph.joins(), joins.as_slice());
    assert_eq!(scene.len(), live);
}

#[test]
fn graph_inside_one_of_its_nodes_is_rejected() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let style = TextStyle::default();
    let a = BoxNode::tree_node(&mut scene, root, "a", style.clone(), (0.0, 0.0)).unwrap();
    let b = BoxNode::tree_node(&mut scene, root, "b", style, (0.0, 100.0)).unwrap();
    let live = scene.len();

    let err = TreeGraph::new(
        &mut scene,
        a.id(),
        (0.0, 0.0),
        vec![a.id(), b.id()],
        vec![Edge::new(0, 1, "x")],
    )
    .unwrap_err();
    assert!(matches!(err, LexvisError::Graph(_)), "{err}");
    assert_eq!(scene.len(), live);
    assert_eq!(scene.node(a.id()).unwrap().parent(), Some(root));
}

#[test]
fn rebuild_rejects_a_label_holding_the_container() {
    let (mut scene, mut graph) = setup();
    let root = scene.root();
    let holder = scene.add(root, Node::group()).unwrap();
    scene.attach(graph.id(), holder).unwrap();
    let joins = graph.joins().to_vec();

    let err = graph
        .set_edges(&mut scene, vec![Edge::new(0, 1, EdgeLabel::Node(holder))])
        .unwrap_err();
    assert!(matches!(err, LexvisError::Graph(_)), "{err}");
    assert_eq!(graph.joins(), joins.as_slice());
    assert!(graph.joins()[0].connector.geometry(&scene).is_ok());
}

#[test]
fn unlabelled_edges_get_a_placeholder() {
    let (mut scene, mut graph) = setup();
    graph.set_edges(&mut scene, vec![Edge::bare(0, 1)]).unwrap();
    let label = graph.joins()[0].label;
    assert!(matches!(scene.node(label).unwrap().kind, NodeKind::Group));
}

#[test]
fn node_label_tracks_midpoint_and_survives_rebuild() {
    let (mut scene, mut graph) = setup();
    let root = scene.root();
    let label = scene.add(root, Node::group()).unwrap();
    graph
        .set_edges(
            &mut scene,
            vec![Edge {
                from: 0,
                to: 1,
                label: EdgeLabel::Node(label),
            }],
        )
        .unwrap();

    let c = graph.joins()[0].connector;
    scene.set(Prop::X(graph.nodes()[1]), -300.0).unwrap();
    assert_eq!(scene.position(label).unwrap(), c.midpoint(&scene).unwrap());

    graph.set_edges(&mut scene, vec![Edge::bare(0, 2)]).unwrap();
    assert!(scene.contains(label));
    assert_eq!(scene.node(label).unwrap().parent(), None);
}

#[test]
fn focus_node_dims_visible_elements_only() {
    let (mut scene, graph) = setup();
    let hidden = graph.joins()[1].label;
    scene.set(Prop::Opacity(hidden), 0.0).unwrap();
    scene.set(Prop::Opacity(graph.nodes()[1]), 0.0).unwrap();

    run_to_end(&mut scene, graph.focus_node(1, 0.5).unwrap(), 0.1).unwrap();

    assert_eq!(opacity(&scene, graph.nodes()[1]), 1.0);
    assert_eq!(opacity(&scene, hidden), 0.0);
    assert_eq!(opacity(&scene, graph.nodes()[0]), DIM_OPACITY);
    assert_eq!(opacity(&scene, graph.joins()[0].connector.id()), DIM_OPACITY);
}

#[test]
fn focus_edge_leaves_only_its_parts_lit() {
    let (mut scene, graph) = setup();
    run_to_end(&mut scene, graph.focus_edge(0, 0.5).unwrap(), 0.1).unwrap();

    for id in graph.joins()[0].components() {
        assert_eq!(opacity(&scene, id), 1.0);
    }
    let other = graph.joins()[1];
    assert_eq!(opacity(&scene, other.to), DIM_OPACITY);
    assert_eq!(opacity(&scene, other.connector.id()), DIM_OPACITY);
    assert_eq!(opacity(&scene, other.label), DIM_OPACITY);

    run_to_end(&mut scene, graph.clear_focus(0.5), 0.1).unwrap();
    for j in graph.joins() {
        for id in j.components() {
            assert_eq!(opacity(&scene, id), 1.0);
        }
    }
}

#[test]
fn focus_rejects_bad_indices() {
    let (_, graph) = setup();
    assert!(matches!(graph.focus_node(3, 1.0), Err(LexvisError::Graph(_))));
    assert!(matches!(graph.focus_edge(2, 1.0), Err(LexvisError::Graph(_))));
    assert!(matches!(
        graph.reveal_edge(2, 1.0, DEFAULT_REVEAL_DELAY),
        Err(LexvisError::Graph(_))
    ));
}

#[test]
fn reveal_fades_hidden_source_first() {
    let (mut scene, graph) = setup();
    graph.hide_all(&mut scene).unwrap();
    let j = graph.joins()[0];

    let mut task = graph.reveal_edge(0, 1.0, 0.25).unwrap();
    task.advance(&mut scene, 1.0).unwrap();
    assert_eq!(opacity(&scene, j.from), 1.0);
    assert_eq!(j.connector.progress(&scene).unwrap(), 0.0);

    let rest = run_to_end(&mut scene, &mut task, 0.05).unwrap();
    assert!((rest - 2.5).abs() < 1e-9, "rest {rest}");
    assert_eq!(j.connector.progress(&scene).unwrap(), 1.0);
    assert_eq!(opacity(&scene, j.label), 1.0);
    assert_eq!(opacity(&scene, j.to), 1.0);
}

#[test]
fn reveal_with_visible_source_skips_its_fade() {
    let (mut scene, graph) = setup();
    graph.hide_all(&mut scene).unwrap();
    scene.set(Prop::Opacity(graph.nodes()[0]), 1.0).unwrap();

    let consumed = run_to_end(&mut scene, graph.reveal_edge(1, 1.0, 0.25).unwrap(), 0.05).unwrap();
    assert!((consumed - 2.25).abs() < 1e-9, "consumed {consumed}");
    assert_eq!(opacity(&scene, graph.nodes()[2]), 1.0);
    // The other edge is untouched.
    assert_eq!(graph.joins()[0].connector.progress(&scene).unwrap(), 0.0);
}
