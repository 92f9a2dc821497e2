//! Database-backed tests for the contest lifecycle and scoring engine.
//!
//! Run with `cargo test -- --ignored` on a machine with Docker.

mod common;

use common::{
    advance_to, codes, join, join_as, seed_contest, seed_event, seed_named_contest, start_db,
};
use serde_json::json;

use medalpool::{
    error::AppError,
    handlers::admin::{EntityInput, ImportEntitiesRequest, UpdateContestRequest},
    models::{Action, ContestState},
    scoring::Tally,
    services::{
        ContestService, EntityService, EventService, LeaderboardService, OutcomeService,
        PickService,
    },
};

const ENTITIES: &[(&str, i32)] = &[
    ("USA", 120),
    ("CHN", 90),
    ("GBR", 60),
    ("NOR", 40),
    ("JAM", 25),
    ("KEN", 20),
];

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_over_budget_selection_is_rejected_and_echoed() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;
    let user_id = join(&db.pool, &contest_id, "Podium Hunters").await;
    advance_to(&db.pool, &contest_id, ContestState::Open).await;

    let err = PickService::submit_picks(&db.pool, &contest_id, &user_id, codes(&["usa", "CHN"]))
        .await
        .unwrap_err();

    assert!(
        matches!(&err.error, AppError::Validation(msg) if msg.contains("exceeds budget by 10"))
    );
    let details = err.details.unwrap();
    assert_eq!(details["entity_codes"], json!(["usa", "CHN"]));
    assert_eq!(details["rule"], "over_budget");
    assert_eq!(details["value"], 210);

    let picks = PickService::get_my_picks(&db.pool, &contest_id, &user_id)
        .await
        .unwrap();
    assert!(picks.entities.is_empty());
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_second_submission_replaces_the_first() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;
    let user_id = join(&db.pool, &contest_id, "Podium Hunters").await;
    advance_to(&db.pool, &contest_id, ContestState::Open).await;

    PickService::submit_picks(&db.pool, &contest_id, &user_id, codes(&["USA", "NOR"]))
        .await
        .unwrap();
    let saved = PickService::submit_picks(&db.pool, &contest_id, &user_id, codes(&["CHN", "KEN"]))
        .await
        .unwrap();
    assert_eq!(saved.total_cost, 110);
    assert_eq!(saved.remaining_budget, 90);

    let picks = PickService::get_my_picks(&db.pool, &contest_id, &user_id)
        .await
        .unwrap();
    let mut stored: Vec<&str> = picks.entities.iter().map(|e| e.code.as_str()).collect();
    stored.sort_unstable();
    assert_eq!(stored, vec!["CHN", "KEN"]);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_picks_only_accepted_while_open() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;
    let user_id = join(&db.pool, &contest_id, "Podium Hunters").await;

    let err = PickService::submit_picks(&db.pool, &contest_id, &user_id, codes(&["NOR"]))
        .await
        .unwrap_err();
    assert_eq!(err.error.error_code(), "STATE_ERROR");

    advance_to(&db.pool, &contest_id, ContestState::Locked).await;

    let err = PickService::submit_picks(&db.pool, &contest_id, &user_id, codes(&["NOR"]))
        .await
        .unwrap_err();
    assert_eq!(
        err.error.to_string(),
        "submit picks: action not allowed in state 'locked'"
    );
    assert_eq!(err.details.unwrap()["entity_codes"], json!(["NOR"]));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_membership_and_active_entities_required() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    EntityService::import_entities(
        &db.pool,
        &event_id,
        ImportEntitiesRequest {
            entities: vec![EntityInput {
                code: "RUS".to_string(),
                name: "Withdrawn".to_string(),
                cost: 10,
                reference_score: None,
                is_active: Some(false),
            }],
        },
    )
    .await
    .unwrap();
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;
    let member = join(&db.pool, &contest_id, "Members Only").await;
    advance_to(&db.pool, &contest_id, ContestState::Open).await;

    let outsider = uuid::Uuid::new_v4();
    let err = PickService::submit_picks(&db.pool, &contest_id, &outsider, codes(&["NOR"]))
        .await
        .unwrap_err();
    assert!(matches!(err.error, AppError::Forbidden(_)));

    let err = PickService::submit_picks(&db.pool, &contest_id, &member, codes(&["NOR", "RUS"]))
        .await
        .unwrap_err();
    let details = err.details.unwrap();
    assert_eq!(details["rule"], "unknown_entity");
    assert_eq!(details["value"], "RUS");
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_outcome_points_are_derived_and_gated() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;
    let tally = Tally::new(5, 3, 2).unwrap();

    let err = OutcomeService::update_outcome(&db.pool, &event_id, "NOR", tally)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidState {
            state: ContestState::Setup,
            ..
        }
    ));

    advance_to(&db.pool, &contest_id, ContestState::Open).await;
    let err = OutcomeService::update_outcome(&db.pool, &event_id, "NOR", tally)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidState {
            state: ContestState::Open,
            action: Action::WriteOutcome
        }
    ));

    advance_to(&db.pool, &contest_id, ContestState::Locked).await;
    let record = OutcomeService::update_outcome(&db.pool, &event_id, "nor", tally)
        .await
        .unwrap();
    assert_eq!(record.points, 23);

    let record =
        OutcomeService::update_outcome(&db.pool, &event_id, "NOR", Tally::new(1, 0, 0).unwrap())
            .await
            .unwrap();
    assert_eq!((record.gold, record.silver, record.bronze, record.points), (1, 0, 0, 3));

    let err = OutcomeService::update_outcome(&db.pool, &event_id, "XYZ", tally)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_leaderboard_masks_then_ranks_with_shared_places() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;

    let err = LeaderboardService::get_leaderboard(&db.pool, &contest_id, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState { .. }));

    let alpha = join(&db.pool, &contest_id, "Alpha").await;
    let bravo = join(&db.pool, &contest_id, "Bravo").await;
    let charlie = join(&db.pool, &contest_id, "Charlie").await;
    advance_to(&db.pool, &contest_id, ContestState::Open).await;

    for (user, picks) in [
        (alpha, codes(&["NOR", "KEN"])),
        (bravo, codes(&["GBR"])),
        (charlie, codes(&["JAM"])),
    ] {
        PickService::submit_picks(&db.pool, &contest_id, &user, picks)
            .await
            .unwrap();
    }

    let open = LeaderboardService::get_leaderboard(&db.pool, &contest_id, None, None)
        .await
        .unwrap();
    assert!(open.masked);
    assert_eq!(open.teams.len(), 3);
    assert!(open.teams.iter().all(|t| t.rank == 1 && t.points == 0 && t.entities.is_none()));

    let own = LeaderboardService::get_team_detail(&db.pool, &contest_id, &alpha, &alpha)
        .await
        .unwrap();
    assert_eq!(own.team.entities.map(|e| e.len()), Some(2));
    let other = LeaderboardService::get_team_detail(&db.pool, &contest_id, &alpha, &bravo)
        .await
        .unwrap();
    assert!(other.team.entities.is_none());

    advance_to(&db.pool, &contest_id, ContestState::Locked).await;
    for (code, g, s, b) in [("NOR", 5, 3, 2), ("GBR", 5, 3, 2), ("JAM", 1, 0, 0)] {
        OutcomeService::update_outcome(&db.pool, &event_id, code, Tally::new(g, s, b).unwrap())
            .await
            .unwrap();
    }

    let by_name = LeaderboardService::get_leaderboard(&db.pool, &contest_id, Some("name"), None)
        .await
        .unwrap();
    let rows: Vec<(&str, u32, i64)> = by_name
        .teams
        .iter()
        .map(|t| (t.team_name.as_str(), t.rank, t.points))
        .collect();
    assert_eq!(
        rows,
        vec![("Alpha", 1, 23), ("Bravo", 1, 23), ("Charlie", 3, 3)]
    );

    let ascending =
        LeaderboardService::get_leaderboard(&db.pool, &contest_id, Some("points"), Some("asc"))
            .await
            .unwrap();
    assert_eq!(ascending.teams[0].team_name, "Charlie");
    assert_eq!(ascending.teams[0].rank, 3);

    let detail = LeaderboardService::get_team_detail(&db.pool, &contest_id, &charlie, &alpha)
        .await
        .unwrap();
    assert_eq!(detail.team.rank, 3);
    let entities = detail.team.entities.unwrap();
    assert_eq!(entities[0].code, "JAM");
    assert_eq!(entities[0].points, 3);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_transitions_are_forward_only_and_versioned() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;

    let opened = ContestService::transition_state(&db.pool, &contest_id, ContestState::Open, Some(0))
        .await
        .unwrap();
    assert_eq!(opened.previous_state, ContestState::Setup);
    assert_eq!(opened.contest.state_version, 1);

    let err =
        ContestService::transition_state(&db.pool, &contest_id, ContestState::Locked, Some(0))
            .await
            .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = ContestService::transition_state(&db.pool, &contest_id, ContestState::Complete, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState { state: ContestState::Open, .. }));

    let err = ContestService::transition_state(&db.pool, &contest_id, ContestState::Setup, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidState { .. }));

    let contest = ContestService::get_contest(&db.pool, &contest_id).await.unwrap();
    assert_eq!(contest.state, ContestState::Open);
    assert_eq!(contest.state_version, 1);
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_config_edits_keep_existing_selections_valid() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;
    let user_id = join(&db.pool, &contest_id, "Big Spender").await;
    advance_to(&db.pool, &contest_id, ContestState::Open).await;
    PickService::submit_picks(&db.pool, &contest_id, &user_id, codes(&["USA", "GBR"]))
        .await
        .unwrap();

    let lower_budget = UpdateContestRequest {
        slug: None,
        name: None,
        description: None,
        budget: Some(150),
        max_entities: None,
        deadline: None,
    };
    let err = ContestService::update_contest(&db.pool, &contest_id, lower_budget)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let raise_budget = UpdateContestRequest {
        slug: None,
        name: None,
        description: None,
        budget: Some(250),
        max_entities: Some(2),
        deadline: Some("2024-07-27T09:00:00Z".to_string()),
    };
    let updated = ContestService::update_contest(&db.pool, &contest_id, raise_budget)
        .await
        .unwrap();
    assert_eq!((updated.budget, updated.max_entities), (250, 2));

    advance_to(&db.pool, &contest_id, ContestState::Complete).await;
    let rename = UpdateContestRequest {
        slug: None,
        name: Some("Renamed".to_string()),
        description: None,
        budget: None,
        max_entities: None,
        deadline: None,
    };
    let err = ContestService::update_contest(&db.pool, &contest_id, rename)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "STATE_ERROR");
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_import_locked_after_open_and_delete_cascades() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let contest_id = seed_contest(&db.pool, &event_id, 200, 10).await;
    let user_id = join(&db.pool, &contest_id, "Early Bird").await;
    advance_to(&db.pool, &contest_id, ContestState::Open).await;
    PickService::submit_picks(&db.pool, &contest_id, &user_id, codes(&["NOR", "JAM", "KEN"]))
        .await
        .unwrap();

    let reprice = ImportEntitiesRequest {
        entities: vec![EntityInput {
            code: "NOR".to_string(),
            name: "Norway".to_string(),
            cost: 5,
            reference_score: None,
            is_active: None,
        }],
    };
    let err = EntityService::import_entities(&db.pool, &event_id, reprice)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidState {
            state: ContestState::Open,
            ..
        }
    ));

    let counts = EventService::delete_event(&db.pool, &event_id).await.unwrap();
    assert_eq!(counts.contests, 1);
    assert_eq!(counts.memberships, 1);
    assert_eq!(counts.picks, 3);
    assert_eq!(counts.entities, ENTITIES.len() as i64);

    let err = ContestService::get_contest(&db.pool, &contest_id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_concurrent_submissions_of_one_team_never_merge() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", &[("AAA", 60), ("BBB", 60)]).await;
    let contest_id = seed_contest(&db.pool, &event_id, 100, 2).await;

    let mut members = Vec::new();
    for i in 0..20 {
        members.push(join(&db.pool, &contest_id, &format!("Team {}", i)).await);
    }
    advance_to(&db.pool, &contest_id, ContestState::Open).await;

    let mut handles = Vec::new();
    for user_id in &members {
        for code in ["AAA", "BBB"] {
            let pool = db.pool.clone();
            let user_id = *user_id;
            handles.push(tokio::spawn(async move {
                PickService::submit_picks(&pool, &contest_id, &user_id, codes(&[code])).await
            }));
        }
    }
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    for user_id in &members {
        let picks = PickService::get_my_picks(&db.pool, &contest_id, user_id)
            .await
            .unwrap();
        assert_eq!(picks.entities.len(), 1, "selections merged for {}", user_id);
        assert!(picks.total_cost <= 100);
    }
}

#[tokio::test]
#[ignore = "requires a Docker daemon"]
async fn test_contests_on_one_event_are_isolated() {
    let db = start_db().await;
    let event_id = seed_event(&db.pool, "paris-2024", ENTITIES).await;
    let sprint = seed_named_contest(&db.pool, &event_id, "sprint", 200, 10).await;
    let marathon = seed_named_contest(&db.pool, &event_id, "marathon", 100, 2).await;

    let shared = uuid::Uuid::new_v4();
    join_as(&db.pool, &sprint, &shared, "Double Entry").await;
    join_as(&db.pool, &marathon, &shared, "Double Entry").await;
    let sprinter = join(&db.pool, &sprint, "Sprint Only").await;
    advance_to(&db.pool, &sprint, ContestState::Open).await;
    advance_to(&db.pool, &marathon, ContestState::Open).await;

    PickService::submit_picks(&db.pool, &sprint, &shared, codes(&["USA", "NOR"]))
        .await
        .unwrap();
    PickService::submit_picks(&db.pool, &marathon, &shared, codes(&["JAM"]))
        .await
        .unwrap();
    PickService::submit_picks(&db.pool, &sprint, &sprinter, codes(&["GBR"]))
        .await
        .unwrap();

    // replacing one contest's selection leaves the other untouched
    PickService::submit_picks(&db.pool, &marathon, &shared, codes(&["KEN", "JAM"]))
        .await
        .unwrap();
    let in_sprint = PickService::get_my_picks(&db.pool, &sprint, &shared)
        .await
        .unwrap();
    let mut sprint_codes: Vec<&str> = in_sprint.entities.iter().map(|e| e.code.as_str()).collect();
    sprint_codes.sort_unstable();
    assert_eq!(sprint_codes, vec!["NOR", "USA"]);
    let in_marathon = PickService::get_my_picks(&db.pool, &marathon, &shared)
        .await
        .unwrap();
    assert_eq!(in_marathon.total_cost, 45);

    // the sprint budget does not apply to the marathon
    let err = PickService::submit_picks(&db.pool, &marathon, &shared, codes(&["USA"]))
        .await
        .unwrap_err();
    assert_eq!(err.details.unwrap()["rule"], "over_budget");

    advance_to(&db.pool, &sprint, ContestState::Locked).await;
    OutcomeService::update_outcome(&db.pool, &event_id, "NOR", Tally::new(5, 3, 2).unwrap())
        .await
        .unwrap();
    OutcomeService::update_outcome(&db.pool, &event_id, "JAM", Tally::new(1, 0, 0).unwrap())
        .await
        .unwrap();

    let sprint_board = LeaderboardService::get_leaderboard(&db.pool, &sprint, None, None)
        .await
        .unwrap();
    assert!(!sprint_board.masked);
    let rows: Vec<(&str, i64)> = sprint_board
        .teams
        .iter()
        .map(|t| (t.team_name.as_str(), t.points))
        .collect();
    assert_eq!(rows, vec![("Double Entry", 23), ("Sprint Only", 0)]);

    let marathon_board = LeaderboardService::get_leaderboard(&db.pool, &marathon, None, None)
        .await
        .unwrap();
    assert_eq!(marathon_board.state, ContestState::Open);
    assert!(marathon_board.masked);
    assert_eq!(marathon_board.teams.len(), 1);
    assert!(
        marathon_board
            .teams
            .iter()
            .all(|t| t.rank == 1 && t.points == 0 && t.entities.is_none())
    );

    let err = PickService::submit_picks(&db.pool, &sprint, &shared, codes(&["CHN"]))
        .await
        .unwrap_err();
    assert_eq!(err.error.error_code(), "STATE_ERROR");
    PickService::submit_picks(&db.pool, &marathon, &shared, codes(&["KEN"]))
        .await
        .unwrap();
}
