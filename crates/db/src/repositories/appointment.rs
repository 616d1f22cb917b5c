//! Appointment queries.
//!
//! Writes that place an appointment on the grid run inside a transaction that
//! first takes [`lock_day`], so the availability re-check and the write happen
//! with no other writer for the same barber and date in between.

use crate::models::DbAppointment;
use barbershop_core::models::appointment::{AppointmentChanges, AppointmentStatus, NewAppointment};
use barbershop_core::scheduling::grid::SlotLabel;
use chrono::{DateTime, NaiveDate, Utc};
use eyre::Result;
use sqlx::{PgConnection, PgExecutor, Pool, Postgres};
use uuid::Uuid;

const COLUMNS: &str = "id, barber_id, service_id, service_name, date, time, duration_slots, \
                       status, customer_name, customer_phone, created_at, canceled_at";

/// Takes the transaction-scoped advisory lock for one barber's day. Released
/// on commit or rollback.
pub async fn lock_day(conn: &mut PgConnection, barber_id: Uuid, date: NaiveDate) -> Result<()> {
    let key = format!("{}:{}", barber_id, date);
    tracing::debug!("Locking day {}", key);

    sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
        .bind(key)
        .execute(conn)
        .await?;

    Ok(())
}

/// Every appointment of a barber on a date, canceled ones included.
pub async fn list_for_day<'e, E>(executor: E, barber_id: Uuid, date: NaiveDate) -> Result<Vec<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE barber_id = $1 AND date = $2
        ORDER BY time ASC
        "#
    ))
    .bind(barber_id)
    .bind(date)
    .fetch_all(executor)
    .await?;

    Ok(appointments)
}

pub async fn get_appointment_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<DbAppointment>>
where
    E: PgExecutor<'e>,
{
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE id = $1
        "#
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?;

    Ok(appointment)
}

pub async fn insert_appointment(conn: &mut PgConnection, new: &NewAppointment) -> Result<DbAppointment> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Inserting appointment: id={}, barber={}, date={}, time={}, slots={}, status={}",
        id, new.barber_id, new.date, new.time, new.duration_slots, new.status
    );

    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        INSERT INTO appointments (id, barber_id, service_id, service_name, date, time,
                                  duration_slots, status, customer_name, customer_phone, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(new.barber_id)
    .bind(new.service_id)
    .bind(&new.service_name)
    .bind(new.date)
    .bind(new.time.time())
    .bind(new.duration_slots as i32)
    .bind(new.status.as_str())
    .bind(&new.customer_name)
    .bind(&new.customer_phone)
    .bind(now)
    .fetch_one(conn)
    .await?;

    Ok(appointment)
}

/// Returns `None` when no appointment has this id. Status is left untouched.
pub async fn update_appointment(
    conn: &mut PgConnection,
    id: Uuid,
    changes: &AppointmentChanges,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET barber_id = $2, service_id = $3, service_name = $4, date = $5, time = $6,
            duration_slots = $7, customer_name = $8, customer_phone = $9
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(changes.barber_id)
    .bind(changes.service_id)
    .bind(&changes.service_name)
    .bind(changes.date)
    .bind(changes.time.time())
    .bind(changes.duration_slots as i32)
    .bind(&changes.customer_name)
    .bind(&changes.customer_phone)
    .fetch_optional(conn)
    .await?;

    Ok(appointment)
}

/// Returns `None` when no appointment has this id.
pub async fn cancel_appointment(
    pool: &Pool<Postgres>,
    id: Uuid,
    canceled_at: DateTime<Utc>,
) -> Result<Option<DbAppointment>> {
    let appointment = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        UPDATE appointments
        SET status = $2, canceled_at = $3
        WHERE id = $1
        RETURNING {COLUMNS}
        "#
    ))
    .bind(id)
    .bind(AppointmentStatus::Canceled.as_str())
    .bind(canceled_at)
    .fetch_optional(pool)
    .await?;

    Ok(appointment)
}

/// Cancels every active block that starts at `time`, returning their ids.
pub async fn cancel_blocks_at(
    pool: &Pool<Postgres>,
    barber_id: Uuid,
    date: NaiveDate,
    time: SlotLabel,
    canceled_at: DateTime<Utc>,
) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE appointments
        SET status = $5, canceled_at = $6
        WHERE barber_id = $1 AND date = $2 AND time = $3 AND status = $4
        RETURNING id
        "#,
    )
    .bind(barber_id)
    .bind(date)
    .bind(time.time())
    .bind(AppointmentStatus::Blocked.as_str())
    .bind(AppointmentStatus::Canceled.as_str())
    .bind(canceled_at)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Booked appointments for a normalized phone number, soonest first.
pub async fn find_booked_by_phone(pool: &Pool<Postgres>, phone: &str) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(&format!(
        r#"
        SELECT {COLUMNS}
        FROM appointments
        WHERE customer_phone = $1 AND (status = 'booked' OR status IS NULL)
        ORDER BY date ASC, time ASC
        "#
    ))
    .bind(phone)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}
