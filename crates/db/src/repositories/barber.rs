use crate::models::DbBarber;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn list_barbers(pool: &Pool<Postgres>) -> Result<Vec<DbBarber>> {
    let barbers = sqlx::query_as::<_, DbBarber>(
        r#"
        SELECT id, name, display_order, created_at
        FROM barbers
        ORDER BY display_order ASC NULLS LAST, name ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(barbers)
}

pub async fn get_barber_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBarber>> {
    let barber = sqlx::query_as::<_, DbBarber>(
        r#"
        SELECT id, name, display_order, created_at
        FROM barbers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(barber)
}

/// Appends a barber after the current last one.
pub async fn create_barber(pool: &Pool<Postgres>, name: &str) -> Result<DbBarber> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating barber: id={}, name={}", id, name);

    let barber = sqlx::query_as::<_, DbBarber>(
        r#"
        INSERT INTO barbers (id, name, display_order, created_at)
        VALUES ($1, $2, (SELECT COALESCE(MAX(display_order), 0) + 1 FROM barbers), $3)
        RETURNING id, name, display_order, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(barber)
}

/// Returns `None` when no barber has this id.
pub async fn update_barber(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    display_order: Option<i32>,
) -> Result<Option<DbBarber>> {
    let barber = sqlx::query_as::<_, DbBarber>(
        r#"
        UPDATE barbers
        SET name = COALESCE($2, name), display_order = COALESCE($3, display_order)
        WHERE id = $1
        RETURNING id, name, display_order, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(display_order)
    .fetch_optional(pool)
    .await?;

    Ok(barber)
}

/// Returns whether a row was deleted.
pub async fn delete_barber(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM barbers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Replaces the services offered by a barber in one transaction.
pub async fn set_barber_services(
    pool: &Pool<Postgres>,
    barber_id: Uuid,
    service_ids: &[Uuid],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM barber_services
        WHERE barber_id = $1
        "#,
    )
    .bind(barber_id)
    .execute(&mut *tx)
    .await?;

    for service_id in service_ids {
        sqlx::query(
            r#"
            INSERT INTO barber_services (barber_id, service_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(barber_id)
        .bind(service_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}
