use autofish_core::speed::{
    accel_budget, aim_position, anticipation_offset, compute_speed_detailed, hook_step,
};
use autofish_core::{
    compute_target_speed, select_target, AutoFishConfig, BobberController, ControllerState,
    HookVariant, MinigameState, SpeedRequest,
};

fn treasure_state(progress: f32) -> MinigameState {
    MinigameState {
        fish_position: 300.0,
        treasure_position: 90.0,
        treasure_present: true,
        treasure_caught: false,
        is_boss_fish: false,
        distance_from_catching: progress,
        ..MinigameState::default()
    }
}

#[test]
fn scenario_a_unset_fish_target_at_rest() {
    let state = MinigameState {
        bar_position: 100.0,
        bar_height: 56.0,
        bar_speed: 0.0,
        fish_position: 200.0,
        fish_target_position: -1.0,
        ..MinigameState::default()
    };
    assert_eq!(state.track_max(), 512.0);

    let (selection, _) = select_target(&state, ControllerState::default(), true);
    assert_eq!(selection.target_pos, 200.0);
    assert_eq!(selection.other_pos, 200.0);
    assert_eq!(
        anticipation_offset(selection.target_pos, selection.other_pos, 56.0),
        0.0
    );

    let aim = aim_position(selection.target_pos, selection.other_pos, 56.0, 512.0);
    assert_eq!(aim, 192.0);

    let request = SpeedRequest::new(100.0, 56.0, 0.0, 200.0, 200.0, 0.15, false);
    let outcome = compute_speed_detailed(&request);
    assert_eq!(outcome.aim, 192.0);
    assert_eq!(outcome.displacement, 92.0);
    assert!((outcome.target_speed - 27.6f32.sqrt()).abs() < 1e-4);
    assert!((outcome.target_speed - 5.255).abs() < 5e-3);
    // Release step and one correction cancel out from rest.
    assert!(outcome.new_speed.abs() < 1e-6);
}

#[test]
fn scenario_b_enters_diversion_above_threshold() {
    let state = treasure_state(0.76);
    let (selection, ctrl) = select_target(&state, ControllerState::default(), true);
    assert!(ctrl.diverting_to_treasure);
    assert_eq!(selection.target_pos, state.treasure_position);
    assert_eq!(selection.other_pos, state.fish_position);
}

#[test]
fn scenario_c_boss_fish_never_diverts() {
    for progress in [0.0f32, 0.5, 0.76, 0.9, 1.0] {
        let state = MinigameState {
            is_boss_fish: true,
            ..treasure_state(progress)
        };
        for held in [false, true] {
            let ctrl = ControllerState {
                diverting_to_treasure: held,
            };
            let (selection, next) = select_target(&state, ctrl, true);
            assert!(!next.diverting_to_treasure, "progress={progress} held={held}");
            assert_eq!(selection.target_pos, state.fish_position);
        }
    }
}

#[test]
fn scenario_d_budget_by_hook_and_faster_flag() {
    assert!((accel_budget(HookVariant::Barbed, false) - 0.075).abs() < 1e-6);
    assert_eq!(accel_budget(HookVariant::Barbed, true), 0.6);
    assert_eq!(accel_budget(HookVariant::Normal, true), 0.6);
}

#[test]
fn hysteresis_holds_until_progress_drops_low() {
    let mut ctrl = ControllerState::default();
    let (_, next) = select_target(&treasure_state(0.8), ctrl, true);
    assert!(next.diverting_to_treasure);
    ctrl = next;

    for step in 1..=64 {
        let progress = 0.8 - step as f32 * 0.01;
        let (selection, next) = select_target(&treasure_state(progress), ctrl, true);
        assert!(next.diverting_to_treasure, "dropped at progress={progress}");
        assert_eq!(selection.target_pos, 90.0);
        ctrl = next;
    }

    let (_, next) = select_target(&treasure_state(0.15), ctrl, true);
    assert!(!next.diverting_to_treasure);

    // Once released, mid-range progress does not re-enter.
    let (_, again) = select_target(&treasure_state(0.6), next, true);
    assert!(!again.diverting_to_treasure);
}

#[test]
fn hysteresis_ends_when_treasure_is_caught() {
    let (_, ctrl) = select_target(&treasure_state(0.8), ControllerState::default(), true);
    let caught = MinigameState {
        treasure_caught: true,
        ..treasure_state(0.5)
    };
    let (selection, next) = select_target(&caught, ctrl, true);
    assert!(!next.diverting_to_treasure);
    assert_eq!(selection.target_pos, caught.fish_position);
}

#[test]
fn selection_is_idempotent() {
    let states = [
        treasure_state(0.1),
        treasure_state(0.5),
        treasure_state(0.8),
        MinigameState {
            fish_target_position: 412.0,
            ..treasure_state(0.3)
        },
    ];
    for state in states {
        for held in [false, true] {
            let ctrl = ControllerState {
                diverting_to_treasure: held,
            };
            assert_eq!(
                select_target(&state, ctrl, true),
                select_target(&state, ctrl, true)
            );
        }
    }
}

#[test]
fn speed_formula_properties_over_a_sweep() {
    let mut d = -600.0f32;
    while d <= 600.0 {
        for a in [0.075f32, 0.15, 0.6] {
            let v = compute_target_speed(a, d);
            if d == 0.0 {
                assert_eq!(v, 0.0);
            } else {
                assert_eq!(v.signum(), d.signum());
                let expected = 2.0 * a * d.abs();
                assert!((v * v - expected).abs() <= expected * 1e-5 + 1e-6);
            }
        }
        d += 12.5;
    }
}

#[test]
fn controller_output_converges_on_a_still_target() {
    let mut controller = BobberController::new(AutoFishConfig::default());
    let mut state = MinigameState {
        bar_position: 0.0,
        bar_height: 96.0,
        fish_position: 300.0,
        ..MinigameState::default()
    };
    let aim = aim_position(300.0, 300.0, 96.0, state.track_max());

    // Host side: released-button response, integrate, clamp; then the controller.
    for _ in 0..600 {
        state.bar_speed += hook_step(state.hook_variant);
        state.bar_position = (state.bar_position + state.bar_speed).clamp(0.0, state.track_max());
        controller.tick(&mut state);
    }
    assert!(
        (state.bar_position - aim).abs() < 6.0,
        "bar={} aim={aim}",
        state.bar_position
    );
    assert!(state.bar_speed.abs() < 1.0);
}
