use anyhow::Error;

use super::*;

fn check_chain_for_error(
    err: Error,
    predicate: impl FnMut(&&(dyn std::error::Error + 'static)) -> bool,
) -> bool {
    err.chain().find(predicate).is_some()
}

fn is_internal_inconsistency(err: Error) -> bool {
    check_chain_for_error(err, |e| {
        matches!(
            e.downcast_ref(),
            Some(RrGraphError::InternalInconsistency(_))
        )
    })
}

fn reserve(kinds: &[(RrNodeKind, usize)]) -> NodeCountEstimate {
    let mut counts = NodeCountEstimate::default();
    for (kind, count) in kinds {
        counts[*kind] = *count;
    }
    counts
}

fn opin(x: u32, y: u32, ptc: u32) -> RrNode {
    RrNode::terminal(RrNodeKind::OutputPin, x, y, ptc, Side::Top)
}

#[test]
fn nodes_fill_their_reservation() -> Result<()> {
    let mut graph = RrGraph::with_capacity(reserve(&[(RrNodeKind::OutputPin, 2)]));

    let a = graph.add_node(opin(1, 1, 0))?;
    let b = graph.add_node(opin(1, 1, 1))?;
    assert_eq!((a, b), (RrNodeId(0), RrNodeId(1)));
    graph.verify_counts()?;

    let err = graph
        .add_node(opin(1, 1, 2))
        .expect_err("Node past the reservation unexpectedly accepted");
    assert!(is_internal_inconsistency(err));

    let err = graph
        .add_node(RrNode::terminal(RrNodeKind::Sink, 1, 1, 0, Side::Top))
        .expect_err("Unreserved kind unexpectedly accepted");
    assert!(is_internal_inconsistency(err));

    Ok(())
}

#[test]
fn missing_nodes_fail_verification() -> Result<()> {
    let mut graph = RrGraph::with_capacity(reserve(&[(RrNodeKind::OutputPin, 2)]));
    graph.add_node(opin(1, 1, 0))?;

    let err = graph.verify_counts().expect_err("Short graph unexpectedly verified");
    assert!(is_internal_inconsistency(err));

    Ok(())
}

#[test]
fn lookup_rejects_collisions() -> Result<()> {
    let mut graph = RrGraph::with_capacity(reserve(&[(RrNodeKind::ChanX, 2)]));
    let wire = |ptc| RrNode {
        kind: RrNodeKind::ChanX,
        xlow: 1,
        ylow: 0,
        xhigh: 2,
        yhigh: 0,
        ptc,
        capacity: 1,
        direction: Some(TrackDirection::Increasing),
        side: None,
        segment_id: Some(0),
        track_ids: vec![ptc, ptc + 2],
    };
    let a = graph.add_node(wire(0))?;
    let b = graph.add_node(wire(2))?;

    let key = NodeKey {
        kind: RrNodeKind::ChanX,
        x: 2,
        y: 0,
        ptc: 2,
        side: None,
    };
    graph.register(key, a)?;
    assert_eq!(graph.find_node(&key), Some(a));
    assert_eq!(graph.find_node(&NodeKey { x: 1, ..key }), None);

    let err = graph
        .register(key, b)
        .expect_err("Collision unexpectedly accepted");
    assert!(is_internal_inconsistency(err));

    Ok(())
}

#[test]
fn edges_need_existing_endpoints() -> Result<()> {
    let mut graph = RrGraph::with_capacity(reserve(&[(RrNodeKind::OutputPin, 2)]));
    let a = graph.add_node(opin(1, 1, 0))?;
    let b = graph.add_node(opin(1, 1, 1))?;

    graph.add_edge(a, b, SwitchId(0))?;
    assert_eq!(graph.num_edges(), 1);
    assert_eq!(graph.out_edges(a).count(), 1);
    assert_eq!(graph.out_edges(b).count(), 0);

    let err = graph
        .add_edge(a, RrNodeId(7), SwitchId(0))
        .expect_err("Dangling edge unexpectedly accepted");
    assert!(check_chain_for_error(err, |e| matches!(
        e.downcast_ref(),
        Some(RrGraphError::InvalidInput(_))
    )));

    Ok(())
}
