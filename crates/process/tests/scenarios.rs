use approx::assert_relative_eq;
use powderopt_observers::Recorder;
use powderopt_process::{
    CoefficientTable, Event, ImpactCategory, Region, Request, SearchSpace, Settings, optimize,
};
use powderopt_solvers::optimization::sqp::{Action, Status};
use uom::si::{
    f64::{Length, Mass},
    length::micrometer,
    mass::kilogram,
};

fn request(category: ImpactCategory, region: Region) -> Request {
    Request::new(
        Mass::new::<kilogram>(1.0),
        Length::new::<micrometer>(45.0),
        category,
        region,
    )
    .unwrap()
}

#[test]
fn global_warming_in_europe() {
    let table = CoefficientTable::bundled().unwrap();
    let request = request(ImpactCategory::GlobalWarming, Region::Europe);

    let outcome = optimize(&request, &table, &Settings::default(), ()).unwrap();

    assert_eq!(outcome.status, Status::Converged);
    assert!(outcome.residuals.inequalities.iter().all(|&g| g <= 1e-6));
    assert!(outcome.total() < outcome.initial.total());
    assert_relative_eq!(outcome.initial.total(), 23.913_592_21, max_relative = 1e-9);

    // Finest pressure and richest slag, with the diameter chosen so the
    // median size lands on the target.
    let [phi, p, beta] = outcome.variables.to_array();
    assert!(phi > 0.09 && phi < 0.1);
    assert_relative_eq!(p, 7.0, epsilon = 1e-6);
    assert_relative_eq!(beta, 0.9, epsilon = 1e-6);
    assert_relative_eq!(outcome.derived.d50, 45.0, epsilon = 1e-2);
    assert_relative_eq!(outcome.total(), 20.401_15, max_relative = 1e-5);
}

#[test]
fn every_category_and_region_improves_on_the_initial_guess() {
    let table = CoefficientTable::bundled().unwrap();

    for category in ImpactCategory::ALL {
        for region in Region::ALL {
            let outcome =
                optimize(&request(category, region), &table, &Settings::default(), ()).unwrap();

            assert_eq!(outcome.status, Status::Converged, "{category}/{region}");
            assert!(outcome.residuals.is_feasible(1e-6), "{category}/{region}");
            assert!(
                outcome.total() <= outcome.initial.total(),
                "{category}/{region}"
            );
        }
    }
}

#[test]
fn start_on_a_bound_stays_in_the_box() {
    let table = CoefficientTable::bundled().unwrap();
    let settings = Settings {
        space: SearchSpace {
            initial: [0.05, 6.0, 0.86],
            ..SearchSpace::default()
        },
        ..Settings::default()
    };
    let bounds = settings.space.bounds().unwrap();

    let mut recorder = Recorder::new();
    let mut outside = 0;
    let check = |event: &Event<'_>| -> Option<Action> {
        if !bounds.contains(&event.x()) {
            outside += 1;
        }
        None
    };

    let outcome = optimize(
        &request(ImpactCategory::GlobalWarming, Region::Europe),
        &table,
        &settings,
        (&mut recorder, check),
    )
    .unwrap();

    assert_eq!(outcome.status, Status::Converged);
    assert_eq!(outside, 0);
    assert_relative_eq!(recorder.iterates()[0].point.x[0], 0.05);
    assert!(recorder.iterates().iter().all(|r| bounds.contains(&r.point.x)));
}

#[test]
fn on_target_powder_has_peak_yield_and_least_waste() {
    use powderopt_process::{DecisionVariables, PlantConstants, ProcessModel};

    let initial = DecisionVariables::from_array(SearchSpace::default().initial);
    let waste_for = |target: f64| {
        ProcessModel::new(
            PlantConstants::default(),
            Mass::new::<kilogram>(1.0),
            Length::new::<micrometer>(target),
        )
        .evaluate(&initial)
    };

    let d50 = waste_for(45.0).d50;
    let on_target = waste_for(d50);
    assert_relative_eq!(on_target.efficiency, 0.8, max_relative = 1e-12);

    for offset in [-10.0, -1.0, -0.1, 0.1, 1.0, 10.0] {
        assert!(waste_for(d50 + offset).waste_powder > on_target.waste_powder);
    }
}

#[test]
fn observer_can_stop_the_search() {
    let table = CoefficientTable::bundled().unwrap();
    let stop = |event: &Event<'_>| match event {
        Event::Iterate { iter: 1, .. } => Some(Action::StopEarly),
        _ => None,
    };

    let outcome = optimize(
        &request(ImpactCategory::WaterConsumption, Region::China),
        &table,
        &Settings::default(),
        stop,
    )
    .unwrap();

    assert_eq!(outcome.status, Status::StoppedByObserver);
    assert_eq!(outcome.iters, 1);
    assert!(outcome.residuals.is_feasible(1e-6));
}
