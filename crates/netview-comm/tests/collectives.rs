use std::thread;

use netview_comm::{leader_step, Communicator, SelfComm, ThreadComm};
use netview_core::{ErrorInfo, NetError};

fn run_group<T, F>(size: usize, body: F) -> Vec<T>
where
    T: Send,
    F: Fn(ThreadComm) -> T + Sync,
{
    let members = ThreadComm::group(size);
    thread::scope(|scope| {
        let handles: Vec<_> = members
            .into_iter()
            .map(|comm| scope.spawn(|| body(comm)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("member panicked"))
            .collect()
    })
}

#[test]
fn broadcast_copies_root_buffer_everywhere() {
    let results = run_group(3, |comm| {
        let mut buffer = if comm.rank() == 1 { *b"from-one" } else { [0u8; 8] };
        comm.broadcast(&mut buffer, 1).expect("broadcast");
        buffer
    });
    assert!(results.iter().all(|buffer| buffer == b"from-one"));
}

#[test]
fn broadcast_rejects_mismatched_lengths() {
    let results = run_group(2, |comm| {
        let mut buffer = vec![7u8; if comm.rank() == 0 { 4 } else { 2 }];
        comm.broadcast(&mut buffer, 0)
    });
    assert!(results[0].is_ok());
    let err = results[1].clone().unwrap_err();
    assert_eq!(err.info().code, "broadcast");
}

#[test]
fn variable_payloads_reach_every_rank() {
    let results = run_group(4, |comm| {
        let payload = if comm.is_leader() {
            b"a longer leader payload".to_vec()
        } else {
            Vec::new()
        };
        comm.broadcast_bytes(payload, 0).expect("broadcast bytes")
    });
    assert!(results.iter().all(|bytes| bytes == b"a longer leader payload"));
}

#[test]
fn gather_orders_payloads_by_rank() {
    let results = run_group(3, |comm| {
        let payload = format!("rank {}", comm.rank()).into_bytes();
        comm.gather(&payload, 0).expect("gather")
    });
    let gathered = results[0].clone().expect("root receives");
    assert_eq!(gathered, vec![b"rank 0".to_vec(), b"rank 1".to_vec(), b"rank 2".to_vec()]);
    assert!(results[1].is_none());
    assert!(results[2].is_none());
}

#[test]
fn collectives_can_be_repeated() {
    let results = run_group(2, |comm| {
        let mut total = 0u64;
        for round in 0..16u64 {
            let mut buffer = (round * 10).to_le_bytes();
            comm.broadcast(&mut buffer, (round % 2) as usize).expect("broadcast");
            total += u64::from_le_bytes(buffer);
            comm.barrier().expect("barrier");
        }
        total
    });
    assert_eq!(results, vec![1200, 1200]);
}

#[test]
fn leader_step_success_runs_only_on_leader() {
    let results = run_group(3, |comm| {
        leader_step(&comm, "answer", || Ok(42)).expect("step")
    });
    assert_eq!(results, vec![Some(42), None, None]);
}

#[test]
fn leader_step_failure_reaches_every_rank() {
    let results = run_group(3, |comm| {
        leader_step(&comm, "fail", || -> Result<(), NetError> {
            Err(NetError::Resource(
                ErrorInfo::new("tmpfile-create", "could not acquire temporary file")
                    .with_context("dir", "/nowhere"),
            ))
        })
    });
    for result in results {
        let err = result.unwrap_err();
        assert!(matches!(&err, NetError::Resource(info) if info.code == "tmpfile-create"));
        assert_eq!(err.info().context.get("dir").map(String::as_str), Some("/nowhere"));
    }
}

#[test]
fn self_comm_is_a_group_of_one() {
    let comm = SelfComm;
    assert!(comm.is_leader());
    assert_eq!(comm.gather(b"x", 0).expect("gather"), Some(vec![b"x".to_vec()]));
    assert_eq!(comm.broadcast_bytes(b"abc".to_vec(), 0).expect("bytes"), b"abc");
    assert!(comm.broadcast(&mut [0u8; 1], 1).is_err());
}

#[test]
fn unanimous_reports_the_lowest_failing_rank() {
    let results = run_group(3, |comm| {
        let local = if comm.rank() == 0 {
            Ok(comm.rank())
        } else {
            Err(NetError::graph("invalid-vertex-handle", "bad handle").with_context("rank", comm.rank()))
        };
        netview_comm::unanimous(&comm, "render", local)
    });
    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.info().code, "invalid-vertex-handle");
        assert_eq!(err.info().context.get("rank").map(String::as_str), Some("1"));
    }
}

#[test]
fn unanimous_keeps_local_values_on_success() {
    let results = run_group(2, |comm| netview_comm::unanimous(&comm, "ok", Ok(comm.rank() * 10)));
    assert_eq!(results.into_iter().map(|r| r.expect("ok")).collect::<Vec<_>>(), vec![0, 10]);
}
