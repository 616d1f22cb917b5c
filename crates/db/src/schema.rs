use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create barbers table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS barbers (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            display_order INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            price VARCHAR(64) NOT NULL,
            description TEXT NULL,
            duration_slots INTEGER NOT NULL DEFAULT 1,
            duration_minutes INTEGER NULL,
            is_combined BOOLEAN NULL DEFAULT FALSE,
            display_order INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_slots >= 1)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create barber_services table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS barber_services (
            barber_id UUID NOT NULL REFERENCES barbers(id) ON DELETE CASCADE,
            service_id UUID NOT NULL REFERENCES services(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            PRIMARY KEY (barber_id, service_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table. Status and duration stay nullable so rows
    // from before those columns existed remain readable.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            barber_id UUID NOT NULL REFERENCES barbers(id) ON DELETE CASCADE,
            service_id UUID NULL REFERENCES services(id) ON DELETE SET NULL,
            service_name VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            time TIME NOT NULL,
            duration_slots INTEGER NULL,
            status VARCHAR(16) NULL,
            customer_name VARCHAR(255) NULL,
            customer_phone VARCHAR(32) NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            canceled_at TIMESTAMP WITH TIME ZONE NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_appointments_barber_date ON appointments(barber_id, date);
        CREATE INDEX IF NOT EXISTS idx_appointments_customer_phone ON appointments(customer_phone);
        CREATE INDEX IF NOT EXISTS idx_barber_services_service_id ON barber_services(service_id);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
