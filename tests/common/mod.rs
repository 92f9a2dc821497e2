//! Shared fixtures for database-backed tests
//!
//! Each test gets its own PostgreSQL container so tests never share rows.

#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use uuid::Uuid;

use medalpool::{
    handlers::admin::{CreateContestRequest, CreateEventRequest, EntityInput, ImportEntitiesRequest},
    models::ContestState,
    services::{ContestService, EntityService, EventService},
};

pub struct TestDb {
    pub pool: PgPool,
    _container: ContainerAsync<Postgres>,
}

/// Start PostgreSQL and apply migrations
pub async fn start_db() -> TestDb {
    let container = Postgres::default()
        .with_user("medalpool")
        .with_password("medalpool_test")
        .with_db_name("medalpool_test")
        .with_tag("16-alpine")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!(
        "postgres://medalpool:medalpool_test@{}:{}/medalpool_test",
        host, port
    );

    let pool = PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    TestDb {
        pool,
        _container: container,
    }
}

/// Create an event with the given `(code, cost)` entities
pub async fn seed_event(pool: &PgPool, slug: &str, entities: &[(&str, i32)]) -> Uuid {
    let event = EventService::create_event(
        pool,
        CreateEventRequest {
            name: format!("Games {}", slug),
            slug: slug.to_string(),
            description: None,
            start_date: NaiveDate::from_ymd_opt(2024, 7, 26).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 8, 11).unwrap(),
            is_active: Some(true),
        },
    )
    .await
    .unwrap();

    let rows = entities
        .iter()
        .map(|(code, cost)| EntityInput {
            code: code.to_string(),
            name: format!("Country {}", code),
            cost: *cost,
            reference_score: Some(0),
            is_active: Some(true),
        })
        .collect();
    EntityService::import_entities(pool, &event.id, ImportEntitiesRequest { entities: rows })
        .await
        .unwrap();

    event.id
}

/// Create the event's `main` contest in `setup`
pub async fn seed_contest(pool: &PgPool, event_id: &Uuid, budget: i32, max_entities: i32) -> Uuid {
    seed_named_contest(pool, event_id, "main", budget, max_entities).await
}

/// Create a contest with the given slug in `setup`
pub async fn seed_named_contest(
    pool: &PgPool,
    event_id: &Uuid,
    slug: &str,
    budget: i32,
    max_entities: i32,
) -> Uuid {
    let contest = ContestService::create_contest(
        pool,
        event_id,
        CreateContestRequest {
            slug: slug.to_string(),
            name: format!("Pool {}", slug),
            description: None,
            budget: Some(budget),
            max_entities: Some(max_entities),
            deadline: "2024-07-26T17:30".to_string(),
        },
    )
    .await
    .unwrap();

    assert_eq!(contest.state, ContestState::Setup);
    assert_eq!(contest.state_version, 0);
    contest.id
}

/// Walk a contest forward until it reaches `target`
pub async fn advance_to(pool: &PgPool, contest_id: &Uuid, target: ContestState) {
    let mut current = ContestService::get_contest(pool, contest_id).await.unwrap().state;
    while current != target {
        let next = current.successor().expect("target is behind current state");
        ContestService::transition_state(pool, contest_id, next, None)
            .await
            .unwrap();
        current = next;
    }
}

/// Join a contest as a fresh user
pub async fn join(pool: &PgPool, contest_id: &Uuid, team_name: &str) -> Uuid {
    let user_id = Uuid::new_v4();
    join_as(pool, contest_id, &user_id, team_name).await;
    user_id
}

/// Join a contest as an existing user
pub async fn join_as(pool: &PgPool, contest_id: &Uuid, user_id: &Uuid, team_name: &str) {
    ContestService::join_contest(pool, contest_id, user_id, team_name)
        .await
        .unwrap();
}

pub fn codes(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|c| c.to_string()).collect()
}
