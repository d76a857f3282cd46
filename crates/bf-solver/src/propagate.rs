//! Breadth-first pressure propagation over a forest of segments.

use std::collections::VecDeque;

use bf_core::{NodeIdx, PRESSURE_EPS_KPA, Tolerances, nearly_equal};
use bf_graph::{Network, NetworkBuilder, TopologyError};
use tracing::{debug, error, info, warn};

use crate::error::{SolverError, SolverResult};
use crate::evaluate::evaluate_segment;
use crate::problem::{ConflictPolicy, PropagationProblem};
use crate::report::{PropagationReport, PropagationWarning, SegmentResult};

/// Propagate pressures from the sources of the network to every segment.
///
/// Fails with [`SolverError::InboundConflict`] before any computation when a
/// node is fed by more than one segment. Each segment is evaluated exactly
/// once, so cycles terminate; segments no source reaches are listed in
/// [`PropagationReport::unreachable`].
pub fn propagate(problem: &PropagationProblem<'_>) -> SolverResult<PropagationReport> {
    problem.validate()?;
    let network = NetworkBuilder::from_segments(problem.segments)?;

    let conflicts = network.inbound_conflicts();
    if let Some((node, segments)) = conflicts.first() {
        let node = node_name(&network, *node);
        let segments: Vec<String> = segments
            .iter()
            .map(|&s| problem.segments[s.index()].id.clone())
            .collect();
        error!(node = %node, segments = ?segments, conflicts = conflicts.len(), "node fed by more than one segment");
        return Err(SolverError::InboundConflict { node, segments });
    }

    run(problem, &network)
}

/// The traversal itself, without the single-inbound gate.
pub(crate) fn run(
    problem: &PropagationProblem<'_>,
    network: &Network,
) -> SolverResult<PropagationReport> {
    let policy = problem.params.conflict_policy;
    let same_pressure = Tolerances {
        abs: PRESSURE_EPS_KPA,
        rel: 0.0,
    };
    let mut warnings = Vec::new();

    for node in problem.boundaries.keys() {
        let is_source = network
            .node(node)
            .is_some_and(|idx| network.inbound(idx).is_empty());
        if !is_source {
            warn!(node = %node, "boundary on a node that is not a source; ignored");
            warnings.push(PropagationWarning::IgnoredBoundary {
                node: node.to_string(),
            });
        }
    }

    let mut pressures: Vec<Option<f64>> = vec![None; network.node_count()];
    let mut results: Vec<Option<SegmentResult>> = vec![None; network.segment_count()];
    let mut queue: VecDeque<(NodeIdx, f64)> = VecDeque::new();

    for source in network.sources() {
        let p = network
            .label(source)
            .map_or(problem.default_pressure_kpa, |l| problem.source_pressure_kpa(l));
        debug!(node = %node_name(network, source), p_kpa = p, "source seeded");
        pressures[source.index()] = Some(p);
        queue.push_back((source, p));
    }

    while let Some((node, p_in)) = queue.pop_front() {
        for &seg_idx in network.outgoing(node) {
            if results[seg_idx.index()].is_some() {
                continue;
            }
            let segment = &problem.segments[seg_idx.index()];
            let end = network
                .segment_end(seg_idx)
                .ok_or(TopologyError::InconsistentAdjacency {
                    segment: seg_idx,
                    node,
                })?;

            let result = evaluate_segment(segment, p_in, &problem.params);
            debug!(
                segment = %segment.id,
                q_lps = result.flow_lps,
                j_kpa_per_m = result.gradient_kpa_per_m,
                p_in_kpa = result.p_in_kpa,
                p_out_kpa = result.p_out_kpa,
                "segment evaluated"
            );
            let p_out = result.p_out_kpa;
            results[seg_idx.index()] = Some(result);

            match pressures[end.index()] {
                None => {
                    pressures[end.index()] = Some(p_out);
                    queue.push_back((end, p_out));
                }
                Some(existing) if !nearly_equal(existing, p_out, same_pressure) => {
                    let node = node_name(network, end);
                    match policy {
                        ConflictPolicy::Fail => {
                            error!(node = %node, segment = %segment.id, existing_kpa = existing, incoming_kpa = p_out, "pressure conflict");
                            return Err(SolverError::PressureConflict {
                                node,
                                segment: segment.id.clone(),
                                existing_kpa: existing,
                                incoming_kpa: p_out,
                            });
                        }
                        // The node may already be queued or expanded with
                        // `existing`, so that value stays authoritative.
                        ConflictPolicy::Warn => {
                            warn!(node = %node, segment = %segment.id, existing_kpa = existing, incoming_kpa = p_out, "pressure conflict; keeping the first value");
                            warnings.push(PropagationWarning::PressureConflict {
                                node,
                                segment: segment.id.clone(),
                                existing_kpa: existing,
                                incoming_kpa: p_out,
                            });
                        }
                    }
                }
                Some(_) => {}
            }
        }
    }

    let mut records = Vec::with_capacity(results.len());
    let mut unreachable = Vec::new();
    for (segment, result) in problem.segments.iter().zip(results) {
        match result {
            Some(r) => records.push(r),
            None => unreachable.push(segment.id.clone()),
        }
    }
    if !unreachable.is_empty() {
        warn!(count = unreachable.len(), segments = ?unreachable, "segments not reached from any source");
    }

    let node_pressures = pressures
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            let p = (*p)?;
            Some((node_name(network, NodeIdx::from_index(i)), p))
        })
        .collect();

    info!(
        segments = records.len(),
        unreachable = unreachable.len(),
        warnings = warnings.len(),
        "propagation complete"
    );

    Ok(PropagationReport {
        records,
        unreachable,
        node_pressures,
        warnings,
    })
}

fn node_name(network: &Network, node: NodeIdx) -> String {
    network
        .label(node)
        .map(|l| l.to_string())
        .unwrap_or_else(|| node.to_string())
}
