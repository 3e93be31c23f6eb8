use super::*;
use crate::scene::node::RectNode;
use crate::scene::node::RectShape;

fn fixed(scene: &mut Scene, p0: (f64, f64), p3: (f64, f64)) -> Connector {
    let root = scene.root();
    Connector::between(
        scene,
        root,
        Endpoint::Fixed(p0.into()),
        Endpoint::Fixed(p3.into()),
        ConnectorStyle::GRAPH,
    )
    .unwrap()
}

#[test]
fn vertical_connector_stays_on_its_axis() {
    let mut scene = Scene::monospace();
    let c = fixed(&mut scene, (0.0, 0.0), (0.0, 100.0));
    let g = c.geometry(&scene).unwrap();
    assert_eq!(g.p1, Point::new(0.0, 50.0));
    assert_eq!(g.p2, Point::new(0.0, 50.0));
}

#[test]
fn control_points_push_toward_the_midpoint_height() {
    let mut scene = Scene::monospace();
    let c = fixed(&mut scene, (0.0, 0.0), (100.0, 100.0));
    let g = c.geometry(&scene).unwrap();
    assert_eq!(g.p1, Point::new(0.0, 50.0));
    assert_eq!(g.p2, Point::new(100.0, 50.0));
    assert_eq!(c.midpoint(&scene).unwrap(), Point::new(50.0, 50.0));
}

#[test]
fn connector_follows_moving_anchor() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let target = scene
        .add(
            root,
            Node::new(NodeKind::Rect(RectNode {
                shape: RectShape::Fixed(Size::new(20.0, 10.0)),
                fill: None,
                stroke: None,
                radius: 0.0,
                progress: 1.0,
            }))
            .at((0.0, 100.0)),
        )
        .unwrap();
    let c = Connector::between(
        &mut scene,
        root,
        Endpoint::Fixed(Point::ORIGIN),
        Endpoint::TopOf(target),
        ConnectorStyle::JOIN,
    )
    .unwrap();
    assert_eq!(c.geometry(&scene).unwrap().p3, Point::new(0.0, 95.0));

    scene.set(Prop::X(target), 40.0).unwrap();
    assert_eq!(c.geometry(&scene).unwrap().p3, Point::new(40.0, 95.0));
}

#[test]
fn reveal_draws_from_current_progress() {
    let mut scene = Scene::monospace();
    let c = fixed(&mut scene, (0.0, 0.0), (0.0, 10.0));
    c.set_progress(&mut scene, 0.0).unwrap();

    let mut t = c.reveal(1.0);
    crate::animation::task::Task::advance(&mut t, &mut scene, 0.5).unwrap();
    assert!((c.progress(&scene).unwrap() - 0.5).abs() < 1e-12);
}

#[test]
fn debug_markers_sit_on_control_points() {
    let mut scene = Scene::monospace();
    let c = fixed(&mut scene, (0.0, 0.0), (0.0, 100.0));
    c.set_debug(&mut scene, ConnectorStyle::GRAPH.with_debug().debug)
        .unwrap();

    let markers = c.debug_markers(&scene).unwrap();
    assert_eq!(markers[0], Rect::new(-7.5, -7.5, 7.5, 7.5));
    assert_eq!(markers[3].center(), Point::new(0.0, 100.0));
    let NodeKind::Curve(curve) = &scene.node(c.id()).unwrap().kind else {
        panic!("connector is not a curve");
    };
    assert_eq!(curve.debug, Some(Color::rgb(0xff, 0, 0)));
}

#[test]
fn from_node_rejects_other_kinds() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let g = scene.add(root, Node::group()).unwrap();
    assert!(Connector::from_node(&scene, g).is_err());

    let c = fixed(&mut scene, (0.0, 0.0), (1.0, 1.0));
    assert_eq!(Connector::from_node(&scene, c.id()).unwrap(), c);
}
