use super::*;
use crate::components::code::CodeView;

// 10px monospace: letters are 6 x 12.5.
fn style() -> TextStyle {
    TextStyle {
        font_size: 10.0,
        ..TextStyle::default()
    }
}

#[test]
fn tree_node_pads_its_label() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let b = BoxNode::tree_node(&mut scene, root, "abc", style(), (10.0, 20.0)).unwrap();

    assert_eq!(b.size(&scene).unwrap(), Size::new(68.0, 37.5));
    assert_eq!(scene.local_bounds(b.id()).unwrap().center(), Point::new(10.0, 20.0));
    assert_eq!(b.text(&scene).unwrap(), "abc");
}

#[test]
fn box_resizes_when_text_changes() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let b = BoxNode::token_box(&mut scene, root, "ab", CodeColor::Blue, style(), (0.0, 0.0))
        .unwrap();
    assert_eq!(b.size(&scene).unwrap(), Size::new(15.0, 12.5));

    b.set_text(&mut scene, "abcd").unwrap();
    assert_eq!(b.size(&scene).unwrap(), Size::new(27.0, 12.5));
}

#[test]
fn set_color_recolors_box_and_label() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let b = BoxNode::token_box(&mut scene, root, "1", CodeColor::Blue, style(), (0.0, 0.0))
        .unwrap();
    b.set_color(&mut scene, CodeColor::Orange).unwrap();

    let NodeKind::Rect(r) = &scene.node(b.id()).unwrap().kind else {
        panic!("box is not a rect");
    };
    assert_eq!(r.fill, Some(CodeColor::Orange.background()));
    let NodeKind::Text(t) = &scene.node(b.label()).unwrap().kind else {
        panic!("label is not text");
    };
    assert_eq!(t.fill, CodeColor::Orange.text());
}

#[test]
fn adopt_reuses_stamped_highlight_in_place() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let view = CodeView::new(&mut scene, root, "ab cd", style(), (0.0, 0.0)).unwrap();
    view.set_selection(&mut scene, 3.0, 5.0).unwrap();
    let token = view.stamp_highlight(&mut scene, CodeColor::Cyan).unwrap();
    let before = scene.local_bounds(token.container).unwrap().center();

    let b = BoxNode::adopt(&mut scene, token.container, TOKEN_BOX_PAD).unwrap();
    assert_eq!(b.text(&scene).unwrap(), "cd");
    assert_eq!(b.size(&scene).unwrap(), Size::new(15.0, 12.5));
    assert_eq!(scene.local_bounds(b.id()).unwrap().center(), before);
}

#[test]
fn adopt_requires_a_text_child() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let g = scene.add(root, Node::group()).unwrap();
    assert!(BoxNode::adopt(&mut scene, g, TOKEN_BOX_PAD).is_err());
}

#[test]
fn join_to_point_ends_on_box_top() {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let b = BoxNode::tree_node(&mut scene, root, "abc", style(), (0.0, 100.0)).unwrap();
    let c = b.join_to_point(&mut scene, root, (0.0, -100.0)).unwrap();

    let g = c.geometry(&scene).unwrap();
    assert_eq!(g.p0, Point::new(0.0, -100.0));
    assert_eq!(g.p3, Point::new(0.0, 100.0 - 37.5 / 2.0));
}
