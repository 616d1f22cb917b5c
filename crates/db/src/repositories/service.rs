use crate::models::DbService;
use barbershop_core::models::service::ServiceDraft;
use chrono::Utc;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Lists the catalog in display order, optionally only what one barber offers.
pub async fn list_services(pool: &Pool<Postgres>, barber_id: Option<Uuid>) -> Result<Vec<DbService>> {
    let services = match barber_id {
        Some(barber_id) => {
            sqlx::query_as::<_, DbService>(
                r#"
                SELECT s.id, s.name, s.price, s.description, s.duration_slots, s.duration_minutes,
                       s.is_combined, s.display_order, s.created_at, s.updated_at
                FROM services s
                JOIN barber_services bs ON bs.service_id = s.id
                WHERE bs.barber_id = $1
                ORDER BY s.display_order ASC NULLS LAST, s.name ASC
                "#,
            )
            .bind(barber_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, DbService>(
                r#"
                SELECT id, name, price, description, duration_slots, duration_minutes,
                       is_combined, display_order, created_at, updated_at
                FROM services
                ORDER BY display_order ASC NULLS LAST, name ASC
                "#,
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(services)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, name, price, description, duration_slots, duration_minutes,
               is_combined, display_order, created_at, updated_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn create_service(pool: &Pool<Postgres>, draft: &ServiceDraft) -> Result<DbService> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating service: id={}, name={}, slots={}",
        id, draft.name, draft.duration.slots
    );

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, name, price, description, duration_slots, duration_minutes,
                              is_combined, display_order, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7,
                (SELECT COALESCE(MAX(display_order), 0) + 1 FROM services), $8, $8)
        RETURNING id, name, price, description, duration_slots, duration_minutes,
                  is_combined, display_order, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.price)
    .bind(&draft.description)
    .bind(draft.duration.slots as i32)
    .bind(draft.duration.minutes as i32)
    .bind(draft.is_combined)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

/// Returns `None` when no service has this id.
pub async fn update_service(
    pool: &Pool<Postgres>,
    id: Uuid,
    draft: &ServiceDraft,
) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        UPDATE services
        SET name = $2, price = $3, description = $4, duration_slots = $5,
            duration_minutes = $6, is_combined = $7, updated_at = $8
        WHERE id = $1
        RETURNING id, name, price, description, duration_slots, duration_minutes,
                  is_combined, display_order, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(&draft.name)
    .bind(&draft.price)
    .bind(&draft.description)
    .bind(draft.duration.slots as i32)
    .bind(draft.duration.minutes as i32)
    .bind(draft.is_combined)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

/// Returns whether a row was deleted.
pub async fn delete_service(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
