use sssp_delta::{
    compute_with, CancelToken, CsrGraph, DeltaStepping, Descriptor, EngineConfig, Error, ResultOptions, NO_PREDECESSOR,
};

fn worked_example() -> CsrGraph<f32> {
    CsrGraph::from_edges(4, &[(0, 1, 1.0), (0, 2, 4.0), (1, 2, 2.0), (1, 3, 6.0), (2, 3, 3.0)]).unwrap()
}

fn all(source: i64, delta: f64) -> Descriptor {
    Descriptor::new(source, delta).with_optional_results(ResultOptions::ALL)
}

#[test]
fn worked_example_delta_two() {
    let g = worked_example();
    for workers in [1, 2, 4] {
        let r = compute_with(&all(0, 2.0), &g, &EngineConfig::single_threaded().with_workers(workers)).unwrap();
        assert_eq!(r.distances().unwrap().as_slice(), &[0.0, 1.0, 3.0, 6.0]);
        assert_eq!(r.predecessors().unwrap().as_slice(), &[NO_PREDECESSOR, 0, 1, 2]);
        assert_eq!(r.path_to(3).unwrap(), Some(vec![0, 1, 2, 3]));
        let s = r.stats();
        assert_eq!(s.settled, 4);
        assert_eq!(s.buckets_visited, 3);
        assert_eq!(s.workers, workers);
    }
}

#[test]
fn self_loop_with_zero_weight_terminates() {
    let g = CsrGraph::from_edges(3, &[(0, 1, 1.0f32), (1, 1, 0.0), (1, 2, 5.0)]).unwrap();
    let r = compute_with(&all(0, 1.0), &g, &EngineConfig::single_threaded()).unwrap();
    assert_eq!(r.distances().unwrap().as_slice(), &[0.0, 1.0, 6.0]);
    assert_eq!(r.predecessors().unwrap().as_slice(), &[NO_PREDECESSOR, 0, 1]);
}

#[test]
fn unreachable_vertices_report_infinity_and_no_predecessor() {
    let g = CsrGraph::from_edges(5, &[(0, 1, 2i32), (3, 4, 1), (4, 0, 1)]).unwrap();
    let r = compute_with(&all(0, 1.0), &g, &EngineConfig::default()).unwrap();
    let d = r.distances().unwrap().as_slice();
    assert_eq!(d[..2], [0.0, 2.0]);
    assert!(d[2..].iter().all(|x| x.is_infinite()));
    assert_eq!(r.predecessors().unwrap().as_slice(), &[NO_PREDECESSOR, 0, -1, -1, -1]);
    assert_eq!(r.path_to(4).unwrap(), None);
}

#[test]
fn isolated_source() {
    let g = CsrGraph::<f64>::from_edges(3, &[]).unwrap();
    let r = compute_with(&all(2, 0.5), &g, &EngineConfig::single_threaded()).unwrap();
    assert_eq!(r.distances().unwrap().as_slice(), &[f64::INFINITY, f64::INFINITY, 0.0]);
    assert_eq!(r.stats().settled, 1);
}

#[test]
fn optional_results_mask() {
    let g = worked_example();
    let cfg = EngineConfig::single_threaded();

    let r = compute_with(&Descriptor::new(0, 2.0), &g, &cfg).unwrap();
    assert_eq!(r.options(), ResultOptions::DISTANCES);
    assert!(r.distances().is_ok());
    let err = r.predecessors().unwrap_err();
    assert!(matches!(err, Error::ResultNotComputed(_)));
    assert_eq!(err.to_string(), "Predecessors are not set as an optional result");

    let r = compute_with(&Descriptor::new(0, 2.0).with_optional_results(ResultOptions::PREDECESSORS), &g, &cfg).unwrap();
    assert_eq!(r.distances().unwrap_err().to_string(), "Distances are not set as an optional result");
    assert_eq!(r.path_to(3).unwrap(), Some(vec![0, 1, 2, 3]));

    let err = compute_with(&Descriptor::new(0, 2.0).with_optional_results(ResultOptions::NONE), &g, &cfg).unwrap_err();
    assert!(matches!(err, Error::NothingToCompute));
}

#[test]
fn invalid_inputs_fail_before_running() {
    let g = worked_example();
    let cfg = EngineConfig::single_threaded();
    let err = compute_with(&all(4, 2.0), &g, &cfg).unwrap_err();
    assert!(matches!(err, Error::InvalidSource { vertex: 4, vertex_count: 4 }));
    assert_eq!(err.code(), -2);
    let err = compute_with(&all(-3, 2.0), &g, &cfg).unwrap_err();
    assert!(matches!(err, Error::InvalidSource { vertex: -3, vertex_count: 4 }));
    assert_eq!(err.code(), -2);
    assert_eq!(err.to_string(), "Source vertex is lower than zero (source=-3)");
    assert!(matches!(compute_with(&all(0, 0.0), &g, &cfg), Err(Error::InvalidParameter(_))));
    assert!(matches!(compute_with(&all(0, 2.0), &g, &cfg.clone().with_chunk_size(0)), Err(Error::InvalidParameter(_))));
    let err = CsrGraph::from_edges(2, &[(0, 1, -0.5f32)]).unwrap_err();
    assert_eq!(err.code(), -4);
}

#[test]
fn cancellation_is_observed_between_buckets() {
    let g = worked_example();
    let token = CancelToken::new();
    token.cancel();
    let cfg = EngineConfig::single_threaded().with_cancel(token);
    let err = compute_with(&all(0, 2.0), &g, &cfg).unwrap_err();
    assert!(matches!(err, Error::Cancelled { bucket: 0 }));
    assert_eq!(err.code(), -8);
}

#[test]
fn descriptor_and_config_from_json() {
    let g = worked_example();
    let desc = Descriptor::from_json(r#"{"source": 1, "delta": 10.0, "optional_results": 3}"#).unwrap();
    let cfg = EngineConfig::from_json(r#"{"workers": 2, "chunk_size": 1}"#).unwrap();
    let r = compute_with(&desc, &g, &cfg).unwrap();
    assert_eq!(r.distances().unwrap().as_slice(), &[f64::INFINITY, 0.0, 2.0, 5.0]);
    assert_eq!(r.predecessors().unwrap().as_slice(), &[-1, -1, 1, 2]);
    let json = serde_json::to_value(r.stats()).unwrap();
    assert_eq!(json["buckets_visited"], 1);
}

#[test]
fn engine_can_be_driven_directly() {
    let g = worked_example();
    let engine = DeltaStepping::new(&g, 0, 2.0, EngineConfig::single_threaded()).unwrap();
    let (state, stats) = engine.run().unwrap();
    assert_eq!(state.dist(3), 6.0);
    assert_eq!(stats.max_bucket_index, 3);
    assert!(stats.heavy_relaxations >= 2);
}

#[test]
fn paths_through_zero_weight_cycle_reach_source() {
    let g = CsrGraph::from_edges(4, &[(0, 3, 1.0f32), (3, 1, 0.0), (1, 2, 0.0), (2, 1, 0.0)]).unwrap();
    for workers in [1, 4] {
        let cfg = EngineConfig::single_threaded().with_workers(workers).with_chunk_size(1);
        let r = compute_with(&all(0, 1.0), &g, &cfg).unwrap();
        assert_eq!(r.distances().unwrap().as_slice(), &[0.0, 1.0, 1.0, 1.0]);
        assert_eq!(r.predecessors().unwrap().as_slice(), &[NO_PREDECESSOR, 3, 1, 0]);
        assert_eq!(r.path_to(1).unwrap(), Some(vec![0, 3, 1]));
        assert_eq!(r.path_to(2).unwrap(), Some(vec![0, 3, 1, 2]));
    }
}
