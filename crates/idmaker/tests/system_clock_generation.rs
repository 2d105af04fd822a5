use std::collections::HashSet;
use std::sync::{Arc, Barrier};

use idmaker::{first_id_for_unix_time, node_id_of, sequence_of, time_of, Error, IdMaker};
use jiff::{SignedDuration, Timestamp};

#[test]
fn sequential_ids_increase() {
    let maker = IdMaker::new(1).unwrap();
    let mut previous = maker.next_id().unwrap();

    for _ in 0..50_000 {
        let id = maker.next_id().unwrap();
        assert!(id > previous, "{id} should be greater than {previous}");
        previous = id;
    }
}

#[test]
fn ids_decode_to_mint_time_and_node() {
    let maker = IdMaker::new(2047).unwrap();

    let before = Timestamp::now();
    let id = maker.next_id().unwrap();
    let after = Timestamp::now();

    assert_eq!(node_id_of(id), 2047);
    assert!((0..=4095).contains(&sequence_of(id)));
    // time_of truncates to the millisecond
    assert!(time_of(id) >= before - SignedDuration::from_millis(1));
    assert!(time_of(id) <= after);
    assert!(id >= first_id_for_unix_time(before.as_second()));
    assert!(id < first_id_for_unix_time(after.as_second() + 1));
}

#[test]
fn shared_generator_never_repeats() {
    const THREADS: usize = 16;
    const PER_THREAD: usize = 5_000;

    let maker = Arc::new(IdMaker::new(77).unwrap());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let maker = Arc::clone(&maker);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                (0..PER_THREAD)
                    .map(|_| maker.next_id())
                    .collect::<Result<Vec<_>, Error>>()
            })
        })
        .collect();

    let mut seen = HashSet::with_capacity(THREADS * PER_THREAD);
    for handle in handles {
        for id in handle.join().unwrap().unwrap() {
            assert!(seen.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(seen.len(), THREADS * PER_THREAD);
}

#[test]
fn distinct_nodes_never_collide() {
    let a = IdMaker::new(0).unwrap();
    let b = IdMaker::new(1).unwrap();

    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        assert!(seen.insert(a.next_id().unwrap()));
        assert!(seen.insert(b.next_id().unwrap()));
    }
}

#[test]
fn out_of_range_node_ids_fail_construction() {
    assert!(matches!(
        IdMaker::new(-1),
        Err(Error::InvalidArgument { node_id: -1, .. })
    ));
    assert!(matches!(
        IdMaker::new(2048),
        Err(Error::InvalidArgument { node_id: 2048, .. })
    ));
}
