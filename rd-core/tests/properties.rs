use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use rd_core::seed::{HALF_EXTENT, MIN_SEED_DIMENSION, Patch, seed_initial_condition};
use rd_core::{Grid, Kernel, Parameters, Simulation, convolve};

fn arb_grid(max_side: usize) -> impl Strategy<Value = Grid> {
    (1..=max_side, 1..=max_side).prop_flat_map(|(h, w)| {
        prop::collection::vec(-2.0f64..2.0, h * w)
            .prop_map(move |cells| Grid::from_vec(h, w, cells).unwrap())
    })
}

proptest! {
    #[test]
    fn uniform_field_has_zero_interior_laplacian(
        h in 3usize..20,
        w in 3usize..20,
        v in -100.0f64..100.0,
    ) {
        let src = Grid::new(h, w, v).unwrap();
        let out = convolve(&src, &Kernel::laplacian());
        let tol = 1e-12 * v.abs().max(1.0);

        for i in 1..h - 1 {
            for j in 1..w - 1 {
                let x = out.get(i, j).unwrap();
                prop_assert!(x.abs() <= tol, "({}, {}) = {}", i, j, x);
            }
        }
    }

    #[test]
    fn convolve_preserves_dimensions(src in arb_grid(12)) {
        let out = convolve(&src, &Kernel::laplacian());
        prop_assert_eq!(out.dimensions(), src.dimensions());
    }

    #[test]
    fn step_preserves_dimensions_and_is_deterministic(
        a in arb_grid(10),
        fill_b in 0.0f64..1.0,
        feed in 0.002f64..0.12,
        kill in 0.01f64..0.07,
    ) {
        let (h, w) = a.dimensions();
        let b = Grid::new(h, w, fill_b).unwrap();
        let params = Parameters { feed, kill, ..Parameters::default() };

        let s1 = Simulation::from_fields(a.clone(), b.clone(), params).unwrap();
        let s2 = Simulation::from_fields(a, b, params).unwrap();
        let f1 = s1.step_n(4);
        let f2 = s2.step_n(4);

        prop_assert_eq!(f1.dimensions(), (h, w));
        prop_assert_eq!(f1.a().as_slice(), f2.a().as_slice());
        prop_assert_eq!(f1.b().as_slice(), f2.b().as_slice());
    }

    #[test]
    fn seeding_stays_inside_the_grid(
        h in MIN_SEED_DIMENSION..260,
        w in MIN_SEED_DIMENSION..260,
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (a, b) = seed_initial_condition(h, w, &mut rng).unwrap();

        prop_assert_eq!(a.dimensions(), (h, w));
        prop_assert_eq!(b.dimensions(), (h, w));
        prop_assert!(a.as_slice().iter().all(|&v| v == 1.0));
        prop_assert!(b.as_slice().iter().all(|&v| v == 0.0 || v == 1.0));
        prop_assert!(b.as_slice().iter().any(|&v| v == 1.0));

        let p = Patch::random(h, w, &mut rng).unwrap();
        prop_assert!(p.rows().end <= h);
        prop_assert!(p.cols().end <= w);
        prop_assert!(HALF_EXTENT.contains(&p.half_extents.x));
        prop_assert!(HALF_EXTENT.contains(&p.half_extents.y));
    }
}

#[test]
fn long_run_stays_bounded() {
    let (h, w) = (32, 32);
    let a = Grid::new(h, w, 1.0).unwrap();
    let mut b = Grid::new(h, w, 0.0).unwrap();
    for r in 12..20 {
        for c in 10..22 {
            b.set(r, c, 1.0).unwrap();
        }
    }
    let params = Parameters {
        dt: 0.5,
        ..Parameters::default()
    };
    let sim = Simulation::from_fields(a, b, params).unwrap();

    let f = sim.step_n(3000);

    assert_eq!(f.generation(), 3000);
    assert!(f.is_finite());
    for grid in [f.a(), f.b()] {
        let (lo, hi) = grid.min_max();
        assert!(lo >= -10.0 && hi <= 10.0, "range [{lo}, {hi}]");
    }
}

#[test]
fn readers_never_see_a_torn_pair() {
    // Every snapshot a reader observes must equal, field for field, the
    // serially computed state for the generation it reports.
    const STEPS: usize = 200;
    let a = Grid::new(40, 40, 1.0).unwrap();
    let mut b = Grid::new(40, 40, 0.0).unwrap();
    b.set(20, 20, 1.0).unwrap();

    let mirror = Simulation::from_fields(a.clone(), b.clone(), Parameters::default()).unwrap();
    let mut expected = vec![mirror.snapshot()];
    expected.extend((0..STEPS).map(|_| mirror.step()));
    let expected = Arc::new(expected);

    let sim = Arc::new(Simulation::from_fields(a, b, Parameters::default()).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let sim = Arc::clone(&sim);
        let done = Arc::clone(&done);
        let expected = Arc::clone(&expected);
        thread::spawn(move || {
            let mut last = 0;
            let mut reads = 0u64;
            loop {
                let finished = done.load(Ordering::Acquire);
                let f = sim.snapshot();
                assert!(f.generation() >= last, "generation went backwards");
                let want = &expected[f.generation() as usize];
                assert!(*f == **want, "generation {} differs", f.generation());
                last = f.generation();
                reads += 1;
                if finished {
                    break;
                }
            }
            reads
        })
    };

    for generation in 1..=STEPS {
        let published = sim.step();
        assert_eq!(*published, *expected[generation]);
    }
    done.store(true, Ordering::Release);

    let reads = reader.join().unwrap();
    assert!(reads > 0);
    assert_eq!(sim.generation(), STEPS as u64);
}

#[test]
fn concurrent_steppers_never_lose_a_generation() {
    let a = Grid::new(16, 16, 1.0).unwrap();
    let b = Grid::new(16, 16, 0.2).unwrap();
    let sim = Arc::new(Simulation::from_fields(a, b, Parameters::default()).unwrap());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let sim = Arc::clone(&sim);
            thread::spawn(move || {
                for _ in 0..25 {
                    sim.step();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(sim.generation(), 100);
}

#[test]
fn parameter_writer_during_steps_only_affects_whole_steps() {
    // Alternate dt between 0 and 1 from another thread. A step snapshotting
    // dt = 0 returns its input unchanged; any other result must equal a
    // full dt = 1 step from the same input.
    let a = Grid::new(12, 12, 1.0).unwrap();
    let mut b = Grid::new(12, 12, 0.0).unwrap();
    b.set(6, 6, 1.0).unwrap();
    let sim = Arc::new(Simulation::from_fields(a, b, Parameters::default()).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let sim = Arc::clone(&sim);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut zero = true;
            while !done.load(Ordering::Acquire) {
                sim.set_dt(if zero { 0.0 } else { 1.0 }).unwrap();
                zero = !zero;
            }
        })
    };

    for _ in 0..100 {
        let before = sim.snapshot();
        let after = sim.step();

        let reference = Simulation::from_fields(
            before.a().clone(),
            before.b().clone(),
            Parameters::default(),
        )
        .unwrap();
        let full = reference.step();

        let unchanged = after.a() == before.a() && after.b() == before.b();
        let full_step = after.a() == full.a() && after.b() == full.b();
        assert!(unchanged || full_step, "step mixed coefficients");
    }

    done.store(true, Ordering::Release);
    writer.join().unwrap();
}
