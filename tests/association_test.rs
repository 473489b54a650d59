//! End-to-end checks of the association through its public API

use chrono::NaiveDate;
use mutual_aid::config::PolicyConfig;
use mutual_aid::members::Creditable;
use mutual_aid::{Association, DifficultyTier, ErrorKind, FixedClock, Product, TaskId};

fn association() -> Association {
    Association::new().with_clock(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()))
}

/// Association without the authoring gate, for tests that author many tasks
fn ungated() -> Association {
    let policy = PolicyConfig {
        credit_floor: i64::MIN,
        ..PolicyConfig::default()
    };
    Association::with_policy(policy)
        .with_clock(FixedClock(NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()))
}

#[test]
fn test_plumber_and_painter_task_earns_four_credits() {
    let mut amx = association();
    amx.add_producer("Requester", "00000000001").unwrap();
    amx.add_provider("Worker", "00000000002").unwrap();
    let plumber = amx.add_skill("plumber", 2).unwrap();
    let painter = amx.add_skill("painter", 2).unwrap();
    amx.assign_skill("00000000002", plumber).unwrap();
    amx.assign_skill("00000000002", painter).unwrap();

    let task = amx.create_task("00000000001", "bathroom", 12, 10).unwrap();
    amx.tag_task_skill(task, plumber).unwrap();
    assert_eq!(amx.tag_task_skill(task, painter).unwrap(), DifficultyTier::Simple);
    assert_eq!(amx.find_task(task).unwrap().credits(), 4);

    amx.accept_task("00000000002", task).unwrap();
    assert_eq!(amx.credit_balance("00000000002").unwrap(), 4);
    assert_eq!(amx.credit_balance("00000000001").unwrap(), -6);

    // Tagging after completion is rejected and the value stays put
    let extra = amx.add_skill("welder", 3).unwrap();
    assert_eq!(amx.tag_task_skill(task, extra).unwrap_err().kind(), ErrorKind::Conflict);
    assert_eq!(amx.find_task(task).unwrap().credits(), 4);
}

#[test]
fn test_four_one_point_skills_make_a_hard_task() {
    let mut amx = association();
    amx.add_producer("Requester", "1").unwrap();
    let task = amx.create_task("1", "renovation", 12, 10).unwrap();

    let mut tier = DifficultyTier::Simple;
    for name in ["a", "b", "c", "d"] {
        let skill = amx.add_skill(name, 1).unwrap();
        tier = amx.tag_task_skill(task, skill).unwrap();
    }

    assert_eq!(tier, DifficultyTier::Hard);
    assert_eq!(tier.multiplier(), 2);
    assert_eq!(amx.find_task(task).unwrap().credits(), 8);
}

#[test]
fn test_three_skills_tier_depends_on_points() {
    let mut amx = association();
    amx.add_producer("Requester", "1").unwrap();
    let heavy = amx.create_task("1", "heavy", 6, 10).unwrap();
    let light = amx.create_task("1", "light", 6, 10).unwrap();
    let empty = amx.create_task("1", "empty", 6, 10).unwrap();

    let a = amx.add_skill("a", 3).unwrap();
    let b = amx.add_skill("b", 1).unwrap();
    let c = amx.add_skill("c", 1).unwrap();
    let d = amx.add_skill("d", 2).unwrap();
    for skill in [a, b, c] {
        amx.tag_task_skill(heavy, skill).unwrap();
    }
    for skill in [b, c, d] {
        amx.tag_task_skill(light, skill).unwrap();
    }

    assert_eq!(amx.find_task(heavy).unwrap().tier(), DifficultyTier::Hard);
    assert_eq!(amx.find_task(light).unwrap().tier(), DifficultyTier::Simple);
    assert_eq!(amx.find_task(empty).unwrap().tier(), DifficultyTier::Simple);
}

#[test]
fn test_producer_earns_one_credit_for_ten_points() {
    let mut amx = association();
    amx.add_producer("Farmer", "1").unwrap();
    for (name, points) in [("eggs", 3), ("honey", 5), ("bread", 2)] {
        amx.register_product("1", Product::new(name, points).unwrap()).unwrap();
    }

    let member = amx.find_member("1").unwrap();
    let producer = member.as_producer().unwrap();
    assert_eq!(producer.earned(amx.task_book()), 1);
    assert_eq!(amx.credit_balance("1").unwrap(), 1);
}

#[test]
fn test_matcher_prefers_idle_provider_over_richer_one() {
    let mut amx = ungated();
    amx.add_producer("Requester", "100").unwrap();
    let plumber = amx.add_skill("plumber", 1).unwrap();
    amx.add_provider("Busy", "1").unwrap();
    amx.add_provider("Idle", "2").unwrap();
    amx.assign_skill("1", plumber).unwrap();
    amx.assign_skill("2", plumber).unwrap();

    for _ in 0..3 {
        let task = amx.create_task("100", "pipe", 12, 10).unwrap();
        amx.tag_task_skill(task, plumber).unwrap();
        amx.accept_task("1", task).unwrap();
    }
    assert!(amx.credit_balance("1").unwrap() > amx.credit_balance("2").unwrap());

    let task = amx.create_task("100", "pipe", 12, 10).unwrap();
    amx.tag_task_skill(task, plumber).unwrap();
    let best = amx.find_best_provider(amx.find_task(task).unwrap()).unwrap();
    assert_eq!(best.cpf(), "2");
    assert_eq!(best.as_provider().unwrap().completed_count(), 0);
}

#[test]
fn test_author_gate_boundary() {
    let mut amx = association();
    amx.add_producer("At floor", "1").unwrap();
    amx.add_producer("Below floor", "2").unwrap();
    amx.create_task("1", "setup", 20, 5).unwrap();
    amx.create_task("2", "setup", 22, 5).unwrap();
    assert_eq!(amx.credit_balance("1").unwrap(), -10);
    assert_eq!(amx.credit_balance("2").unwrap(), -11);

    assert!(amx.create_task("1", "allowed", 6, 5).is_ok());
    let err = amx.create_task("2", "blocked", 6, 5).unwrap_err();
    assert!(err.is_insufficient_credit());
    assert_eq!(amx.find_member("2").unwrap().authored_tasks().count(), 1);
}

#[test]
fn test_double_accept_leaves_history_alone() {
    let mut amx = association();
    amx.add_producer("Requester", "1").unwrap();
    amx.add_provider("Worker", "2").unwrap();
    let task = amx.create_task("1", "job", 6, 5).unwrap();

    let member = amx.find_member("2").unwrap();
    let first = member.has_required_skills(amx.find_task(task).unwrap());
    let second = member.has_required_skills(amx.find_task(task).unwrap());
    assert_eq!(first, second);

    amx.accept_task("2", task).unwrap();
    let err = amx.accept_task("2", task).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let provider = amx.find_member("2").unwrap().as_provider().unwrap();
    assert_eq!(provider.completed_tasks().collect::<Vec<_>>(), vec![task]);
}

#[test]
fn test_lookups_round_trip() {
    let mut amx = association();
    let skill = amx.add_skill("gardener", 3).unwrap();
    let found = amx.find_skill(skill).unwrap().clone();
    assert_eq!(&found, amx.find_skill_by_name("Gardener").unwrap());
    assert_eq!(found.points(), 3);

    let id = amx.add_provider("Ana", "00000000001").unwrap();
    let member = amx.find_member("00000000001").unwrap();
    assert_eq!(member.id(), id);
    assert_eq!(member.name(), "Ana");
    assert!(amx.find_task(TaskId(1)).is_none());
}

#[test]
fn test_producer_cannot_accept_or_hold_skills() {
    let mut amx = association();
    amx.add_producer("Farmer", "1").unwrap();
    amx.add_provider("Fixer", "2").unwrap();
    let skill = amx.add_skill("plumber", 1).unwrap();
    let task = amx.create_task("2", "job", 6, 5).unwrap();

    assert_eq!(amx.assign_skill("1", skill).unwrap_err().kind(), ErrorKind::Policy);
    assert_eq!(amx.accept_task("1", task).unwrap_err().kind(), ErrorKind::Policy);
    let product = Product::new("jam", 2).unwrap();
    assert_eq!(amx.register_product("2", product).unwrap_err().kind(), ErrorKind::Policy);
}
