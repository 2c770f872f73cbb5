use rune_transition::{
    Css, Direction, NodeId, RecordingDom, Status, Swap, SwapSnapshot, TransitionClasses,
};

fn css() -> Css {
    Css::new(
        TransitionClasses::new("enter-from", "enter-active", "enter-to"),
        TransitionClasses::new("leave-from", "leave-active", "leave-to"),
    )
}

/// A group whose members are all rendered and laid out, `shown` entered.
fn group(ids: &[&'static str], shown: &'static str) -> (RecordingDom, Vec<NodeId>, Swap<&'static str, NodeId>) {
    let mut dom = RecordingDom::new();
    let mut swap = Swap::new(ids.iter().copied(), shown, css());
    let mut nodes = Vec::new();
    for id in ids {
        let node = dom.create_node("block");
        swap.mount(&mut dom, id, node);
        nodes.push(node);
    }
    assert!(dom.fire_frame(&mut swap));
    dom.take_mutations();
    (dom, nodes, swap)
}

fn visible_count(snapshot: &SwapSnapshot<&'static str>) -> usize {
    snapshot
        .statuses
        .values()
        .filter(|s| s.is_visible())
        .count()
}

/// Renders only the member the group asks for, the way a caller would.
struct Page {
    mounted: Option<(&'static str, NodeId)>,
}

impl Page {
    fn render(&mut self, dom: &mut RecordingDom, swap: &mut Swap<&'static str, NodeId>) {
        let wanted = *swap.should_render();
        if let Some((id, node)) = self.mounted {
            if id == wanted {
                return;
            }
            swap.unmount(dom, &id);
            dom.remove_node(node);
        }
        let node = dom.create_node("flex");
        swap.mount(dom, &wanted, node);
        self.mounted = Some((wanted, node));
    }
}

#[test]
fn initial_member_is_entered() {
    let (_dom, nodes, swap) = group(&["a", "b"], "a");
    let snapshot = swap.snapshot();

    assert_eq!(snapshot.status(&"a"), Status::Entered);
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert_eq!(snapshot.should_render, "a");
    assert_eq!(swap.member(&"b").unwrap().natural_display(), Some("block"));
    assert!(nodes.len() == 2);
}

#[test]
fn handoff_leaves_before_entering() {
    let (mut dom, nodes, mut swap) = group(&["a", "b"], "a");

    let snapshot = swap.set_shown(&mut dom, "b");
    assert_eq!(snapshot.status(&"a"), Status::Leaving);
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert_eq!(snapshot.should_render, "a");

    let mut history = vec![snapshot];
    for _ in 0..10 {
        while dom.take_frame_request() {
            history.push(swap.frame(&mut dom));
        }
        for (_, run) in dom.armed() {
            history.push(swap.transition_end(&mut dom, run));
        }
    }

    for snapshot in &history {
        assert!(visible_count(snapshot) <= 1, "overlap in {snapshot:?}");
    }
    let first_entering = history
        .iter()
        .position(|s| s.status(&"b") == Status::Entering)
        .expect("b should enter");
    let first_a_left = history
        .iter()
        .position(|s| s.status(&"a") == Status::Left)
        .expect("a should leave");
    assert!(first_a_left <= first_entering);

    let last = history.last().unwrap();
    assert_eq!(last.status(&"a"), Status::Left);
    assert_eq!(last.status(&"b"), Status::Entered);
    assert_eq!(last.should_render, "b");
    assert_eq!(dom.display(nodes[0]), Some("none"));
    assert_eq!(dom.display(nodes[1]), Some("block"));
}

#[test]
fn rerequesting_leaving_member_snaps_back() {
    let (mut dom, nodes, mut swap) = group(&["a", "b"], "a");
    swap.set_shown(&mut dom, "b");
    assert!(dom.fire_frame(&mut swap));
    swap.drain_events().for_each(drop);

    let snapshot = swap.set_shown(&mut dom, "a");
    assert_eq!(snapshot.status(&"a"), Status::Entered);
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert!(dom.listeners(nodes[0]).is_empty());

    dom.settle(&mut swap);
    assert_eq!(swap.status(&"a"), Some(Status::Entered));
    assert_eq!(swap.status(&"b"), Some(Status::Left));
    assert!(swap.drain_events().all(|e| *e.key() == "a" && e.is_cancelled()));
}

#[test]
fn retargeting_during_enter_converges_to_latest() {
    let (mut dom, nodes, mut swap) = group(&["a", "b", "c"], "a");

    swap.set_shown(&mut dom, "b");
    // Let `a` finish leaving; `b` starts entering on the same frame.
    while dom.fire_frame(&mut swap) {}
    dom.fire_transition_ends(&mut swap);
    while swap.status(&"b") != Some(Status::Entering) {
        assert!(dom.fire_frame(&mut swap));
    }

    let snapshot = swap.set_shown(&mut dom, "c");
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert_eq!(snapshot.status(&"c"), Status::Entering);
    assert_eq!(visible_count(&snapshot), 1);
    assert_eq!(dom.display(nodes[1]), Some("none"));

    dom.settle(&mut swap);
    let snapshot = swap.snapshot();
    assert_eq!(snapshot.status(&"a"), Status::Left);
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert_eq!(snapshot.status(&"c"), Status::Entered);
}

#[test]
fn returning_to_previous_member_during_enter() {
    let (mut dom, _nodes, mut swap) = group(&["a", "b"], "a");
    swap.set_shown(&mut dom, "b");
    while swap.status(&"b") != Some(Status::Entering) {
        while dom.fire_frame(&mut swap) {}
        dom.fire_transition_ends(&mut swap);
    }

    let snapshot = swap.set_shown(&mut dom, "a");
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert_eq!(snapshot.status(&"a"), Status::Entering);

    dom.settle(&mut swap);
    assert_eq!(swap.status(&"a"), Some(Status::Entered));
    assert_eq!(swap.status(&"b"), Some(Status::Left));
}

#[test]
fn unknown_member_is_ignored() {
    let (mut dom, _nodes, mut swap) = group(&["a", "b"], "a");
    let snapshot = swap.set_shown(&mut dom, "missing");

    assert_eq!(swap.requested(), &"a");
    assert_eq!(snapshot.status(&"a"), Status::Entered);
    assert_eq!(snapshot.status(&"missing"), Status::Left);
    assert!(dom.mutations().is_empty());
}

#[test]
fn repeated_request_is_idempotent() {
    let (mut dom, _nodes, mut swap) = group(&["a", "b"], "a");
    swap.set_shown(&mut dom, "a");
    assert!(dom.mutations().is_empty());
    assert!(!dom.frame_requested());
}

#[test]
fn stale_completion_is_ignored() {
    let (mut dom, _nodes, mut swap) = group(&["a", "b"], "a");
    swap.set_shown(&mut dom, "b");
    let (_, stale) = dom.armed()[0];
    while dom.fire_frame(&mut swap) {}

    swap.set_shown(&mut dom, "a");
    while dom.fire_frame(&mut swap) {}
    dom.take_mutations();

    let snapshot = swap.transition_end(&mut dom, stale);
    assert_eq!(snapshot.status(&"a"), Status::Entered);
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert!(dom.mutations().is_empty());
}

#[test]
fn render_only_should_render_member() {
    let mut dom = RecordingDom::new();
    let mut swap: Swap<&'static str, NodeId> = Swap::new(["element1", "element2"], "element1", css());
    let mut page = Page { mounted: None };
    page.render(&mut dom, &mut swap);
    dom.settle(&mut swap);
    assert_eq!(swap.status(&"element1"), Some(Status::Entered));

    swap.set_shown(&mut dom, "element2");
    for _ in 0..20 {
        page.render(&mut dom, &mut swap);
        dom.settle(&mut swap);
    }

    let snapshot = swap.snapshot();
    assert_eq!(snapshot.status(&"element1"), Status::Left);
    assert_eq!(snapshot.status(&"element2"), Status::Entered);
    assert_eq!(snapshot.should_render, "element2");
    let (id, node) = page.mounted.unwrap();
    assert_eq!(id, "element2");
    assert_eq!(dom.display(node), Some("flex"));
}

#[test]
fn all_left_renders_requested_member() {
    let mut dom = RecordingDom::new();
    let mut swap: Swap<&'static str, NodeId> = Swap::new(["a", "b"], "a", css());
    let node = dom.create_node("block");
    swap.mount(&mut dom, &"a", node);
    dom.settle(&mut swap);

    // `b` is not rendered yet, so the leave of `a` ends with every member left.
    swap.set_shown(&mut dom, "b");
    dom.settle(&mut swap);

    let snapshot = swap.snapshot();
    assert_eq!(snapshot.status(&"a"), Status::Left);
    assert_eq!(snapshot.status(&"b"), Status::Left);
    assert_eq!(snapshot.should_render, "b");
}

#[test]
fn events_carry_member_keys() {
    let (mut dom, _nodes, mut swap) = group(&["a", "b"], "a");
    swap.set_shown(&mut dom, "b");
    dom.settle(&mut swap);

    let events: Vec<_> = swap
        .drain_events()
        .map(|e| (*e.key(), e.direction(), e.is_ended()))
        .collect();
    assert_eq!(
        events,
        vec![
            ("a", Direction::Leave, false),
            ("a", Direction::Leave, true),
            ("b", Direction::Enter, false),
            ("b", Direction::Enter, true),
        ]
    );
}

#[test]
fn unmounting_leaving_member_hands_off_immediately() {
    let (mut dom, nodes, mut swap) = group(&["a", "b"], "a");
    swap.set_shown(&mut dom, "b");
    assert!(dom.fire_frame(&mut swap));
    swap.drain_events().for_each(drop);

    let snapshot = swap.unmount(&mut dom, &"a");
    assert_eq!(snapshot.status(&"a"), Status::Left);
    assert_eq!(snapshot.status(&"b"), Status::Entering);
    assert_eq!(snapshot.should_render, "b");
    assert!(dom.listeners(nodes[0]).is_empty());
    assert!(dom.classes(nodes[0]).is_empty());

    let events: Vec<_> = swap
        .drain_events()
        .map(|e| (*e.key(), e.direction(), e.is_cancelled(), e.is_started()))
        .collect();
    assert_eq!(
        events,
        vec![
            ("a", Direction::Leave, true, false),
            ("b", Direction::Enter, false, true),
        ]
    );

    dom.settle(&mut swap);
    assert_eq!(swap.status(&"a"), Some(Status::Left));
    assert_eq!(swap.status(&"b"), Some(Status::Entered));
    assert_eq!(dom.transition_property(nodes[0]), None);
    assert_eq!(dom.display(nodes[1]), Some("block"));
}

#[test]
fn remounting_entering_member_restores_transitions() {
    let (mut dom, nodes, mut swap) = group(&["a", "b"], "a");
    swap.set_shown(&mut dom, "b");
    while swap.status(&"b") != Some(Status::Entering) {
        while dom.fire_frame(&mut swap) {}
        dom.fire_transition_ends(&mut swap);
    }

    swap.unmount(&mut dom, &"b");
    assert_eq!(swap.status(&"b"), Some(Status::Left));
    assert_eq!(dom.transition_property(nodes[1]), Some("none"));

    swap.mount(&mut dom, &"b", nodes[1]);
    dom.settle(&mut swap);

    assert_eq!(swap.status(&"a"), Some(Status::Left));
    assert_eq!(swap.status(&"b"), Some(Status::Entered));
    assert_eq!(dom.transition_property(nodes[1]), None);
    assert!(dom.classes(nodes[1]).is_empty());
}

#[test]
fn inserted_member_can_be_shown() {
    let mut dom = RecordingDom::new();
    let mut swap: Swap<&'static str, NodeId> = Swap::new(["a"], "a", css());
    let a = dom.create_node("block");
    swap.mount(&mut dom, &"a", a);
    dom.settle(&mut swap);

    swap.insert("b");
    swap.insert("b");
    swap.insert("a");
    assert_eq!(swap.ids().copied().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(swap.status(&"a"), Some(Status::Entered));
    assert_eq!(swap.status(&"b"), Some(Status::Left));

    swap.set_shown(&mut dom, "b");
    dom.settle(&mut swap);
    // `b` has no node yet, so the group waits with everything left.
    assert_eq!(swap.status(&"a"), Some(Status::Left));
    assert_eq!(swap.should_render(), &"b");

    let b = dom.create_node("grid");
    swap.mount(&mut dom, &"b", b);
    dom.settle(&mut swap);
    assert_eq!(swap.status(&"b"), Some(Status::Entered));
    assert_eq!(dom.display(b), Some("grid"));
    assert_eq!(dom.display(a), Some("none"));
}
