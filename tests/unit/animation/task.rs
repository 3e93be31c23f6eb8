use super::*;
use crate::scene::node::Node;

fn scene_with_group() -> (Scene, crate::scene::node::NodeId) {
    let mut scene = Scene::monospace();
    let root = scene.root();
    let g = scene.add(root, Node::group().with_opacity(0.0)).unwrap();
    (scene, g)
}

#[test]
fn eased_tween_follows_its_curve() {
    let (mut scene, g) = scene_with_group();
    let mut t = tween(Prop::Opacity(g), 1.0, 1.0).with_ease(Ease::OutQuad);

    assert_eq!(t.advance(&mut scene, 0.5).unwrap(), Step::Running);
    assert!((scene.get(Prop::Opacity(g)).unwrap() - 0.75).abs() < 1e-12);
    assert!(matches!(t.advance(&mut scene, 0.5).unwrap(), Step::Done { .. }));
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 1.0);
}

#[test]
fn tween_interpolates_from_value_at_start() {
    let (mut scene, g) = scene_with_group();
    let mut t = tween(Prop::Opacity(g), 1.0, 1.0);

    scene.set(Prop::Opacity(g), 0.5).unwrap();
    assert_eq!(t.advance(&mut scene, 0.5).unwrap(), Step::Running);
    assert!((scene.get(Prop::Opacity(g)).unwrap() - 0.75).abs() < 1e-12);

    let step = t.advance(&mut scene, 0.75).unwrap();
    assert_eq!(step, Step::Done { leftover: 0.25 });
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 1.0);
}

#[test]
fn zero_duration_tween_completes_immediately() {
    let (mut scene, g) = scene_with_group();
    let step = tween(Prop::Opacity(g), 1.0, 0.0)
        .advance(&mut scene, 0.1)
        .unwrap();
    assert_eq!(step, Step::Done { leftover: 0.1 });
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 1.0);
}

#[test]
fn all_finishes_with_slowest_branch() {
    let (mut scene, g) = scene_with_group();
    let task = all(vec![
        tween(Prop::Opacity(g), 1.0, 0.5).boxed(),
        wait(2.0).boxed(),
    ]);
    let consumed = run_to_end(&mut scene, task, 0.25).unwrap();
    assert!((consumed - 2.0).abs() < 1e-9);
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 1.0);
}

#[test]
fn empty_all_is_instant() {
    let (mut scene, _) = scene_with_group();
    let consumed = run_to_end(&mut scene, all(Vec::new()), 0.1).unwrap();
    assert_eq!(consumed, 0.0);
}

#[test]
fn sequence_sums_durations_and_delays() {
    let (mut scene, g) = scene_with_group();
    let task = sequence(
        0.25,
        vec![
            wait(1.0).boxed(),
            tween(Prop::Opacity(g), 1.0, 0.5).boxed(),
            wait(0.5).boxed(),
        ],
    );
    let consumed = run_to_end(&mut scene, task, 0.1).unwrap();
    assert!((consumed - 2.5).abs() < 1e-9, "consumed {consumed}");
}

#[test]
fn sequence_runs_strictly_in_order() {
    let (mut scene, g) = scene_with_group();
    let mut task = sequence(
        0.5,
        vec![
            tween(Prop::Opacity(g), 1.0, 1.0).boxed(),
            tween(Prop::Opacity(g), 0.0, 1.0).boxed(),
        ],
    );
    task.advance(&mut scene, 1.0).unwrap();
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 1.0);
    // Inside the delay nothing moves.
    task.advance(&mut scene, 0.4).unwrap();
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 1.0);
    task.advance(&mut scene, 0.6).unwrap();
    assert!((scene.get(Prop::Opacity(g)).unwrap() - 0.5).abs() < 1e-9);
}

#[test]
fn lazy_reads_scene_at_first_step() {
    let (mut scene, g) = scene_with_group();
    let mut task = lazy(move |scene: &mut Scene| {
        let target = scene.get(Prop::Opacity(g))? + 0.5;
        Ok(tween(Prop::Opacity(g), target, 0.0).boxed())
    });
    scene.set(Prop::Opacity(g), 0.25).unwrap();
    assert!(task.advance(&mut scene, 0.0).unwrap().is_done());
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 0.75);
}

#[test]
fn delayed_waits_before_running() {
    let (mut scene, g) = scene_with_group();
    let mut task = delayed(1.0, tween(Prop::Opacity(g), 1.0, 1.0));
    task.advance(&mut scene, 1.0).unwrap();
    assert_eq!(scene.get(Prop::Opacity(g)).unwrap(), 0.0);
    task.advance(&mut scene, 0.5).unwrap();
    assert!((scene.get(Prop::Opacity(g)).unwrap() - 0.5).abs() < 1e-9);
}
