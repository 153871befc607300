//! Partition regression test
//!
//! Row ranges tile the output exactly, the coordinator absorbs the
//! remainder, degenerate heights leave most participants idle, and a full
//! broadcast/gather round over a thread group reassembles the canvas. A
//! participant that skips the gather disconnects instead of hanging it.

use rowscale_core::Pixel;
use rowscale_dist::{
    Communicator, DistError, DistResult, GatherPlan, LocalGroup, RowRange, collect, distribute,
    partition,
};
use rowscale_test::{RegParams, gradient_image};

#[test]
fn partition_reg() {
    let mut rp = RegParams::new("partition");

    // --- Test 1: exact tiling over a sweep of heights and group sizes ---
    let mut tiled = true;
    for height in 1..=80u32 {
        for n in 1..=16usize {
            let mut covered = vec![0u8; height as usize];
            let mut total = 0i64;
            for k in 0..n {
                let r = partition(height, n, k).expect("partition");
                total += r.count.max(0);
                for row in r.as_range() {
                    covered[row as usize] += 1;
                }
            }
            tiled &= total == i64::from(height) && covered.iter().all(|&c| c == 1);
        }
    }
    rp.compare_values(1.0, if tiled { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: coordinator count = H - (n - 1) * floor(H / n) ---
    for (height, n) in [(10u32, 3usize), (16, 5), (7, 7), (100, 9)] {
        let base = height as i64 / n as i64;
        let coord = partition(height, n, 0).expect("coordinator range");
        rp.compare_values(0.0, coord.start as f64, 0.0);
        rp.compare_values(
            (height as i64 - (n as i64 - 1) * base) as f64,
            coord.count as f64,
            0.0,
        );
        for k in 1..n {
            let r = partition(height, n, k).expect("range");
            rp.compare_values(base as f64, r.count as f64, 0.0);
            rp.compare_values((height as i64 - k as i64 * base) as f64, r.start as f64, 0.0);
        }
    }

    // --- Test 3: more participants than rows ---
    let idle: Vec<RowRange> = (0..5).map(|k| partition(3, 5, k).expect("range")).collect();
    rp.compare_values(3.0, idle[0].count as f64, 0.0);
    let rest_idle = idle[1..].iter().all(|r| r.is_empty());
    rp.compare_values(1.0, if rest_idle { 1.0 } else { 0.0 }, 0.0);

    // --- Test 4: gather plan offsets are start * width * 4 ---
    let plan = GatherPlan::new(4, 6, 18).expect("plan");
    for k in 0..4 {
        let r = partition(18, 4, k).expect("range");
        rp.compare_values(
            (r.start as usize * 6 * Pixel::BYTES) as f64,
            plan.byte_offsets[k] as f64,
            0.0,
        );
    }
    rp.compare_values(
        plan.total_bytes() as f64,
        plan.byte_counts.iter().sum::<usize>() as f64,
        0.0,
    );

    assert!(rp.cleanup(), "partition regression test failed");
}

#[test]
fn broadcast_gather_reg() {
    let mut rp = RegParams::new("broadcast_gather");

    // Every participant echoes its rows of the broadcast source; the
    // gathered canvas must equal the source.
    let source = gradient_image(13, 11);
    for n in [1usize, 2, 3, 5, 11, 15] {
        let plan = GatherPlan::new(n, source.width(), source.height()).expect("plan");
        let results = LocalGroup::run(n, |comm| -> DistResult<_> {
            let loaded = (comm.rank() == 0).then(|| source.clone());
            let copy = distribute(&comm, loaded)?.expect("coordinator loaded an image");
            let range = partition(copy.height(), comm.size(), comm.rank())?;
            let mut band = Vec::with_capacity(plan.byte_counts[comm.rank()]);
            for y in range.as_range() {
                for p in copy.row(y) {
                    band.extend_from_slice(&p.to_bytes());
                }
            }
            collect(&comm, &plan, &band)
        })
        .expect("group run");

        let mut results = results.into_iter();
        let gathered = results
            .next()
            .expect("coordinator result")
            .expect("coordinator gather")
            .expect("coordinator image");
        rp.compare_images(&source, &gathered);
        let others_empty = results.all(|r| matches!(r, Ok(None)));
        rp.compare_values(1.0, if others_empty { 1.0 } else { 0.0 }, 0.0);
    }

    assert!(rp.cleanup(), "broadcast/gather regression test failed");
}

#[test]
fn gather_disconnect_reg() {
    let mut rp = RegParams::new("gather_disconnect");

    // The last participant leaves before the gather. The coordinator has
    // already received every earlier band, so its receive from the missing
    // peer is the one that fails, and nobody blocks.
    let (w, h, n) = (3u32, 9u32, 3usize);
    let plan = GatherPlan::new(n, w, h).expect("plan");
    let results = LocalGroup::run(n, |comm| -> DistResult<Option<bool>> {
        if comm.rank() == n - 1 {
            return Ok(None);
        }
        let band = vec![7u8; plan.byte_counts[comm.rank()]];
        collect(&comm, &plan, &band).map(|image| Some(image.is_some()))
    })
    .expect("group run");

    let coordinator_disconnected = matches!(
        results[0],
        Err(DistError::Disconnected { rank: 0, peer }) if peer == n - 1
    );
    rp.compare_values(1.0, if coordinator_disconnected { 1.0 } else { 0.0 }, 0.0);
    let sender_done = matches!(results[1], Ok(Some(false)));
    rp.compare_values(1.0, if sender_done { 1.0 } else { 0.0 }, 0.0);
    let leaver_done = matches!(results[n - 1], Ok(None));
    rp.compare_values(1.0, if leaver_done { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "gather disconnect regression test failed");
}
