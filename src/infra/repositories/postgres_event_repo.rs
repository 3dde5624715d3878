use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, organizer_id, title, description, location,
                starts_at, sales_open_at, sales_close_at,
                ticket_price, max_tickets, per_user_limit, tickets_booked,
                promo_codes, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.organizer_id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.starts_at)
            .bind(event.sales_open_at)
            .bind(event.sales_close_at)
            .bind(event.ticket_price)
            .bind(event.max_tickets)
            .bind(event.per_user_limit)
            .bind(event.tickets_booked)
            .bind(&event.promo_codes)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events ORDER BY starts_at ASC",
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    // tickets_booked is owned by the reservation path and never written here.
    // The WHERE guard rejects capacity edits that would undercut seats
    // already sold.
    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title=$1, description=$2, location=$3,
                starts_at=$4, sales_open_at=$5, sales_close_at=$6,
                ticket_price=$7, max_tickets=$8, per_user_limit=$9, promo_codes=$10
               WHERE id=$11 AND $8 >= tickets_booked RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.starts_at)
            .bind(event.sales_open_at)
            .bind(event.sales_close_at)
            .bind(event.ticket_price)
            .bind(event.max_tickets)
            .bind(event.per_user_limit)
            .bind(&event.promo_codes)
            .bind(&event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or_else(|| AppError::Conflict("Event update rejected: capacity cannot drop below tickets already booked".into()))
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::EventNotFound("Event not found".into()));
        }
        Ok(())
    }
}
