use crate::battle::board::{cell_key, Battlefield};
use crate::battle::collector::collect_actions;
use crate::battle::engine::run_battle;
use crate::battle::mirror::{mirror_frame, mirror_timeline};
use crate::battle::orchestrator::{
    normalize_armies, run_match_with_start, synthesize_demo_army, validate_army,
};
use crate::battle::resolver::{resolve_actions, resolve_damage};
use crate::battle::types::{Action, ArmyConfig, ArmyUnit, AttackType, Position, Team, Unit};
use crate::battle::victory::evaluate_winner;
use crate::config::battle::{GRID_COLS, GRID_ROWS, HOME_BAND_DEPTH, MAX_TICKS};
use crate::config::demo::{DEMO_MAX_UNITS, DEMO_MIN_UNITS};

fn knight(id: u32, team: Team, row: usize, col: usize) -> Unit {
    Unit {
        instance_id: id,
        kind: "knight".to_string(),
        team,
        damage: 3,
        defense: 1,
        attack_range: 1,
        pos: Position { row, col },
        hp: 10,
        shield: 0,
    }
}

fn archer(id: u32, team: Team, row: usize, col: usize) -> Unit {
    Unit {
        kind: "archer".to_string(),
        damage: 2,
        attack_range: 3,
        ..knight(id, team, row, col)
    }
}

fn field(units: Vec<Unit>) -> Battlefield {
    Battlefield::new(GRID_ROWS, GRID_COLS, units)
}

fn army_unit(kind: &str, row: usize, col: usize) -> ArmyUnit {
    ArmyUnit {
        kind: kind.to_string(),
        row,
        col,
        damage: 3,
        defense: 1,
        attack_range: if kind == "archer" { 3 } else { 1 },
        hp: 8,
        shield: if kind == "knight" { 2 } else { 0 },
    }
}

fn sample_armies() -> (ArmyConfig, ArmyConfig) {
    let side_a = ArmyConfig {
        units: vec![
            army_unit("knight", 5, 1),
            army_unit("archer", 6, 2),
            army_unit("beast", 5, 4),
        ],
    };
    let side_b = ArmyConfig {
        units: vec![
            army_unit("knight", 5, 2),
            army_unit("beast", 6, 1),
            army_unit("archer", 6, 4),
        ],
    };
    (side_a, side_b)
}

// ---- Attack resolution formula ----

#[test]
fn test_shield_absorbs_everything_when_large_enough() {
    // damage 3 vs shield 5, defense 50: shield 2 left, hp untouched.
    let (hp, shield) = resolve_damage(3, 10, 5, 50);
    assert_eq!(hp, 10);
    assert_eq!(shield, 2);
}

#[test]
fn test_shield_overflow_discounted_by_defense() {
    // damage 5 vs shield 2, defense 3: overflow 3 fully absorbed by defense.
    let (hp, shield) = resolve_damage(5, 10, 2, 3);
    assert_eq!(hp, 10);
    assert_eq!(shield, 0);
}

#[test]
fn test_knight_hits_beast() {
    // Knight (damage 3) vs Beast (hp 6, defense 1, no shield): 2 to hp.
    let (hp, shield) = resolve_damage(3, 6, 0, 1);
    assert_eq!(hp, 4);
    assert_eq!(shield, 0);
}

#[test]
fn test_unshielded_damage_is_at_least_one() {
    let (hp, _) = resolve_damage(1, 10, 0, 99);
    assert_eq!(hp, 9);
}

#[test]
fn test_shielded_hp_never_drops_when_damage_within_shield() {
    for damage in 0..=5 {
        let (hp, _) = resolve_damage(damage, 7, 5, 0);
        assert_eq!(hp, 7);
    }
}

// ---- Action collection ----

#[test]
fn test_unit_steps_forward_into_empty_cell() {
    let f = field(vec![knight(1, Team::A, 4, 2)]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(actions, vec![Action::Move { actor: 1, to: Position { row: 3, col: 2 } }]);
}

#[test]
fn test_unit_attacks_enemy_ahead() {
    let f = field(vec![knight(1, Team::A, 4, 2), knight(2, Team::B, 3, 2)]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(
        actions,
        vec![Action::Attack { actor: 1, target: 2, attack_type: AttackType::Melee }]
    );
}

#[test]
fn test_chain_move_both_allies_advance() {
    let f = field(vec![knight(1, Team::A, 4, 2), knight(2, Team::A, 5, 2)]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(actions.len(), 2);

    let (next, resolution) = resolve_actions(&f, &actions, 1);
    assert_eq!(next.unit_by_id(1).unwrap().pos, Position { row: 3, col: 2 });
    assert_eq!(next.unit_by_id(2).unwrap().pos, Position { row: 4, col: 2 });
    assert_eq!(resolution.move_cell_keys.len(), 4);
}

#[test]
fn test_blocked_unit_idles_when_ally_ahead_fights() {
    // The lead knight melees the enemy ahead, so it does not vacate its cell;
    // the knight behind has no enemy in range and idles.
    let f = field(vec![
        knight(1, Team::A, 4, 2),
        knight(2, Team::A, 5, 2),
        knight(3, Team::B, 3, 2),
    ]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(
        actions,
        vec![Action::Attack { actor: 1, target: 3, attack_type: AttackType::Melee }]
    );
}

#[test]
fn test_archer_volleys_lane_target_instead_of_moving() {
    let f = field(vec![archer(1, Team::A, 5, 2), knight(2, Team::B, 2, 2)]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(
        actions,
        vec![Action::Attack { actor: 1, target: 2, attack_type: AttackType::Ranged }]
    );
}

#[test]
fn test_archer_lane_tie_breaks_by_scan_order() {
    // Both enemies sit two rows ahead at equal Manhattan distance; the lane
    // scan visits column offset -1 before +1.
    let f = field(vec![
        archer(1, Team::A, 5, 2),
        knight(2, Team::B, 3, 3),
        knight(3, Team::B, 3, 1),
    ]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(
        actions,
        vec![Action::Attack { actor: 1, target: 3, attack_type: AttackType::Ranged }]
    );
}

#[test]
fn test_archer_without_lane_target_moves_like_any_unit() {
    let f = field(vec![archer(1, Team::A, 5, 2)]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(actions, vec![Action::Move { actor: 1, to: Position { row: 4, col: 2 } }]);
}

#[test]
fn test_archer_ally_with_target_blocks_the_chain() {
    // The archer shoots instead of moving, so the knight behind cannot chain
    // into its cell and has nothing in melee range: only one action comes out.
    let f = field(vec![
        archer(1, Team::A, 5, 2),
        knight(2, Team::A, 6, 2),
        knight(3, Team::B, 2, 2),
    ]);
    let actions = collect_actions(&f, Team::A);
    assert_eq!(
        actions,
        vec![Action::Attack { actor: 1, target: 3, attack_type: AttackType::Ranged }]
    );
}

#[test]
fn test_melee_unit_cannot_strike_sideways() {
    // Forward is off the board and the adjacent enemy is in another column.
    let f = field(vec![knight(1, Team::B, 7, 2), knight(2, Team::A, 7, 3)]);
    let actions = collect_actions(&f, Team::B);
    assert!(actions.is_empty());
}

#[test]
fn test_melee_fallback_hits_same_column_neighbor() {
    let f = field(vec![knight(1, Team::B, 7, 2), knight(2, Team::A, 6, 2)]);
    let actions = collect_actions(&f, Team::B);
    assert_eq!(
        actions,
        vec![Action::Attack { actor: 1, target: 2, attack_type: AttackType::Melee }]
    );
}

#[test]
fn test_ranged_fallback_ignores_column_rule() {
    let f = field(vec![archer(1, Team::B, 7, 2), knight(2, Team::A, 6, 4)]);
    let actions = collect_actions(&f, Team::B);
    assert_eq!(
        actions,
        vec![Action::Attack { actor: 1, target: 2, attack_type: AttackType::Ranged }]
    );
}

// ---- Action resolution ----

#[test]
fn test_simultaneous_damage_is_applied_as_one_total() {
    // Two attackers of damage 3 against defense 1: a single application of
    // the 6-point total loses 5 hp. Sequential application would lose 4.
    let mut target = knight(9, Team::B, 2, 2);
    target.hp = 8;
    let f = field(vec![knight(1, Team::A, 3, 2), knight(2, Team::A, 2, 3), target]);
    let actions = vec![
        Action::Attack { actor: 1, target: 9, attack_type: AttackType::Melee },
        Action::Attack { actor: 2, target: 9, attack_type: AttackType::Melee },
    ];
    let (next, resolution) = resolve_actions(&f, &actions, 4);

    assert_eq!(next.unit_by_id(9).unwrap().hp, 3);
    assert_eq!(resolution.hit_events.len(), 2);
    assert!(resolution.hit_events.iter().all(|e| !e.did_kill));
    assert_ne!(resolution.hit_events[0].id, resolution.hit_events[1].id);
}

#[test]
fn test_all_killers_get_the_kill_flag() {
    let mut target = knight(9, Team::B, 2, 2);
    target.hp = 5;
    let f = field(vec![knight(1, Team::A, 3, 2), knight(2, Team::A, 2, 3), target]);
    let actions = vec![
        Action::Attack { actor: 1, target: 9, attack_type: AttackType::Melee },
        Action::Attack { actor: 2, target: 9, attack_type: AttackType::Melee },
    ];
    let (next, resolution) = resolve_actions(&f, &actions, 4);

    assert_eq!(next.unit_by_id(9).unwrap().hp, 0);
    assert!(resolution.hit_events.iter().all(|e| e.did_kill));
}

#[test]
fn test_death_does_not_free_the_cell_this_tick() {
    let mut victim = knight(9, Team::B, 2, 2);
    victim.hp = 1;
    let mut heavy = knight(1, Team::A, 2, 1);
    heavy.damage = 99;
    let f = field(vec![heavy, knight(2, Team::A, 3, 2), victim]);
    let actions = vec![
        Action::Attack { actor: 1, target: 9, attack_type: AttackType::Melee },
        Action::Move { actor: 2, to: Position { row: 2, col: 2 } },
    ];
    let (next, resolution) = resolve_actions(&f, &actions, 7);

    assert_eq!(next.unit_by_id(9).unwrap().hp, 0);
    // The mover stays put; the corpse only clears the cell next tick.
    assert_eq!(next.unit_by_id(2).unwrap().pos, Position { row: 3, col: 2 });
    assert!(resolution.move_cell_keys.is_empty());
}

#[test]
fn test_colliding_moves_are_both_dropped() {
    let f = field(vec![knight(1, Team::A, 4, 1), knight(2, Team::A, 2, 1)]);
    let actions = vec![
        Action::Move { actor: 1, to: Position { row: 3, col: 1 } },
        Action::Move { actor: 2, to: Position { row: 3, col: 1 } },
    ];
    let (next, resolution) = resolve_actions(&f, &actions, 1);

    assert_eq!(next.unit_by_id(1).unwrap().pos, Position { row: 4, col: 1 });
    assert_eq!(next.unit_by_id(2).unwrap().pos, Position { row: 2, col: 1 });
    assert!(resolution.move_cell_keys.is_empty());
}

#[test]
fn test_move_records_vacated_then_occupied() {
    let f = field(vec![knight(1, Team::A, 4, 2)]);
    let actions = vec![Action::Move { actor: 1, to: Position { row: 3, col: 2 } }];
    let (_, resolution) = resolve_actions(&f, &actions, 1);
    assert_eq!(
        resolution.move_cell_keys,
        vec![
            cell_key(Position { row: 4, col: 2 }),
            cell_key(Position { row: 3, col: 2 })
        ]
    );
}

// ---- Win evaluation ----

#[test]
fn test_double_breach_reports_team_a() {
    // Check order settles the same-tick double breach in A's favor.
    let f = field(vec![knight(1, Team::A, 0, 0), knight(2, Team::B, 7, 5)]);
    assert_eq!(evaluate_winner(&f), Some(Team::A));
}

#[test]
fn test_dead_unit_on_breach_row_does_not_win() {
    let mut fallen = knight(1, Team::A, 0, 0);
    fallen.hp = 0;
    let f = field(vec![fallen, knight(2, Team::B, 4, 3)]);
    assert_eq!(evaluate_winner(&f), None);
}

// ---- Engine and battle loop ----

#[test]
fn test_unopposed_unit_breaches_and_wins() {
    let f = field(vec![knight(1, Team::A, 3, 0), knight(2, Team::B, 0, 5)]);
    let outcome = run_battle(f, Team::A);

    assert_eq!(outcome.winner, Some(Team::A));
    let last = outcome.timeline.last().unwrap();
    assert_eq!(last.winner, Some(Team::A));
    assert_eq!(last.units.iter().find(|u| u.instance_id == 1).unwrap().pos.row, 0);
}

#[test]
fn test_stalemate_ends_in_draw_at_tick_limit() {
    // Two tanks trading minimum damage forever: nobody breaches, nobody dies.
    let mut a = knight(1, Team::A, 4, 0);
    let mut b = knight(2, Team::B, 3, 0);
    for unit in [&mut a, &mut b] {
        unit.damage = 1;
        unit.defense = 5;
        unit.hp = 500;
    }
    let outcome = run_battle(field(vec![a, b]), Team::A);

    assert_eq!(outcome.winner, None);
    assert_eq!(outcome.timeline.len(), MAX_TICKS as usize + 1);
    assert!(outcome.timeline.iter().all(|f| f.winner.is_none()));
}

#[test]
fn test_frame_zero_is_a_no_op_snapshot() {
    let (side_a, side_b) = sample_armies();
    let report = run_match_with_start(&side_a, &side_b, Team::B);
    let first = &report.canonical[0];

    assert_eq!(first.turn, 0);
    assert!(first.hit_events.is_empty());
    assert!(first.move_cell_keys.is_empty());
    assert_eq!(first.next_acting_team, Team::B);
    assert_eq!(first.units.len(), 6);
}

#[test]
fn test_same_start_produces_identical_timelines() {
    let (side_a, side_b) = sample_armies();
    let first = run_match_with_start(&side_a, &side_b, Team::A);
    let second = run_match_with_start(&side_a, &side_b, Team::A);

    assert_eq!(first.winner, second.winner);
    assert_eq!(first.canonical, second.canonical);
    assert_eq!(first.mirrored, second.mirrored);
}

#[test]
fn test_battle_invariants_hold_on_every_frame() {
    let (side_a, side_b) = sample_armies();
    let report = run_match_with_start(&side_a, &side_b, Team::A);

    let mut dead: Vec<u32> = Vec::new();
    for frame in &report.canonical {
        // No two living units on one cell.
        let mut occupied = std::collections::HashSet::new();
        for unit in frame.units.iter().filter(|u| u.hp > 0) {
            assert!(occupied.insert(unit.pos), "two living units on {:?}", unit.pos);
        }
        // A unit dead in an earlier frame never attacks afterwards.
        for event in &frame.hit_events {
            assert!(!dead.contains(&event.attacker_instance_id));
        }
        for unit in frame.units.iter().filter(|u| u.hp == 0) {
            if !dead.contains(&unit.instance_id) {
                dead.push(unit.instance_id);
            }
        }
    }
}

// ---- Mirroring ----

#[test]
fn test_mirror_round_trip_restores_canonical_timeline() {
    let (side_a, side_b) = sample_armies();
    let report = run_match_with_start(&side_a, &side_b, Team::B);

    let back = mirror_timeline(&report.mirrored, GRID_ROWS);
    assert_eq!(back, report.canonical);
}

#[test]
fn test_mirrored_frame_flips_rows_and_teams() {
    let f = field(vec![knight(1, Team::A, 6, 3), knight(2, Team::B, 1, 0)]);
    let outcome = run_battle(f, Team::A);
    let mirrored = mirror_frame(&outcome.timeline[0], GRID_ROWS);

    let one = mirrored.units.iter().find(|u| u.instance_id == 1).unwrap();
    assert_eq!(one.team, Team::B);
    assert_eq!(one.pos, Position { row: 1, col: 3 });
    let two = mirrored.units.iter().find(|u| u.instance_id == 2).unwrap();
    assert_eq!(two.team, Team::A);
    assert_eq!(two.pos, Position { row: 6, col: 0 });
}

// ---- Orchestration ----

#[test]
fn test_normalize_mirrors_side_b_into_the_shared_frame() {
    let side_a = ArmyConfig { units: vec![army_unit("knight", 6, 1)] };
    let side_b = ArmyConfig { units: vec![army_unit("beast", 6, 2)] };
    let f = normalize_armies(&side_a, &side_b);

    assert_eq!(f.units.len(), 2);
    assert_eq!(f.units[0].instance_id, 1);
    assert_eq!(f.units[0].team, Team::A);
    assert_eq!(f.units[0].pos, Position { row: 6, col: 1 });
    assert_eq!(f.units[1].instance_id, 2);
    assert_eq!(f.units[1].team, Team::B);
    assert_eq!(f.units[1].pos, Position { row: 1, col: 2 });
}

#[test]
fn test_demo_army_respects_bounds_and_home_band() {
    for _ in 0..20 {
        let army = synthesize_demo_army();
        assert!(army.units.len() >= DEMO_MIN_UNITS);
        assert!(army.units.len() <= DEMO_MAX_UNITS);
        assert!(validate_army(&army).is_ok());
        for unit in &army.units {
            assert!(unit.row >= GRID_ROWS - HOME_BAND_DEPTH);
            assert!(unit.row < GRID_ROWS);
            assert!(unit.col < GRID_COLS);
        }
    }
}

#[test]
fn test_validate_army_rejects_bad_configurations() {
    assert!(validate_army(&ArmyConfig { units: vec![] }).is_err());

    let off_board = ArmyConfig { units: vec![army_unit("knight", GRID_ROWS, 0)] };
    assert!(validate_army(&off_board).is_err());

    let stacked = ArmyConfig {
        units: vec![army_unit("knight", 5, 1), army_unit("beast", 5, 1)],
    };
    assert!(validate_army(&stacked).is_err());
}
