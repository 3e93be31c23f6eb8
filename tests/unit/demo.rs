use super::*;

fn last_frame_svg(demo: Demo) -> (u64, String) {
    let settings = RenderSettings::default();
    let mut last = None;
    let mut prev: Option<u64> = None;
    let frames = play(demo, Fps { num: 10, den: 1 }, &mut |scene: &Scene, idx: FrameIndex| {
        if let Some(p) = prev {
            assert_eq!(idx.0, p + 1);
        }
        prev = Some(idx.0);
        last = Some(scene_to_svg(scene, settings.canvas, settings.background)?);
        Ok(())
    })
    .unwrap();
    (frames, last.unwrap())
}

#[test]
fn demo_names_round_trip() {
    for demo in Demo::ALL {
        assert_eq!(demo.name().parse::<Demo>().unwrap(), demo);
    }
    assert!("lexer".parse::<Demo>().is_err());
}

#[test]
fn parser_graph_definition_parses() {
    let def = GraphDef::from_json(PARSER_GRAPH).unwrap();
    assert_eq!(def.nodes.len(), 6);
    assert_eq!(def.nodes[1].label, r#"Literal("Hi")"#);
    assert_eq!(def.edges[2], EdgeDef::Labeled(0, 3, "otherwise".to_owned()));
}

#[test]
fn edges_may_omit_their_label() {
    let def = GraphDef::from_json(
        r#"{"nodes":[{"label":"a"},{"label":"b","y":100}],"edges":[[0,1]]}"#,
    )
    .unwrap();
    assert_eq!(def.edges, vec![EdgeDef::Bare(0, 1)]);
    assert_eq!(def.nodes[1].y, 100.0);

    let mut scene = Scene::monospace();
    let root = scene.root();
    let graph = def.build(&mut scene, root, (0.0, 0.0)).unwrap();
    assert_eq!(graph.joins().len(), 1);
    let label = scene.node(graph.joins()[0].label).unwrap();
    assert!(matches!(label.kind, crate::scene::node::NodeKind::Group));
}

#[test]
fn bad_edge_fails_before_any_box_is_created() {
    let def = GraphDef::from_json(r#"{"nodes":[{"label":"a"}],"edges":[[0,3,"x"]]}"#).unwrap();
    let mut scene = Scene::monospace();
    let root = scene.root();
    let before = scene.len();
    let err = def.build(&mut scene, root, (0.0, 0.0)).unwrap_err();
    assert!(matches!(err, LexvisError::Graph(_)));
    assert_eq!(scene.len(), before);
}

#[test]
fn stamp_tokens_reports_spans_one_behind() {
    let list: TokenList = serde_json::from_str(r#"[[[0, 2], "BLUE"], [[1, 4], "GREEN"]]"#).unwrap();
    let tokens = stamp_tokens(EXAMPLE_CODE, list, Fps { num: 30, den: 1 }).unwrap();
    assert_eq!(
        tokens,
        vec![
            TokenReport {
                start: 0,
                end: 2,
                color: CodeColor::Blue,
                content: "if".to_owned(),
            },
            TokenReport {
                start: 3,
                end: 7,
                color: CodeColor::Green,
                content: r#""Hi""#.to_owned(),
            },
        ]
    );
}

#[test]
fn example_tokens_cover_the_example_code() {
    let end: usize = example_tokens()
        .iter()
        .map(|AnimatedToken(offset, _, _)| offset.0 + offset.1)
        .sum();
    assert_eq!(end, EXAMPLE_CODE.chars().count());
}

#[test]
fn parser_demo_ends_with_every_edge_drawn() {
    let (frames, svg) = last_frame_svg(Demo::Parser);
    assert!(frames > 0);
    assert_eq!(svg.matches("<path").count(), 5);
    assert!(svg.contains(">otherwise</text>"));
}

#[test]
fn tokens_demo_ends_with_one_join_per_token() {
    let (_, svg) = last_frame_svg(Demo::Tokens);
    assert_eq!(svg.matches("<path").count(), example_tokens().len());
}

#[test]
fn negative_frame_time_is_rejected() {
    let err = render_frame(
        Demo::Tokens,
        &RenderSettings::default(),
        &Rasterizer::new(),
        -1.0,
    )
    .unwrap_err();
    assert!(matches!(err, LexvisError::Validation(_)));
}
