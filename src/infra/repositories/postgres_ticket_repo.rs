use crate::domain::{models::ticket::Ticket, ports::TicketRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresTicketRepo {
    pool: PgPool,
}

impl PostgresTicketRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepo {
    async fn create_reserving(&self, ticket: &Ticket) -> Result<Ticket, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // The conditional increment enforces the capacity ceiling and takes
        // the event row lock, serializing concurrent purchases per event.
        // It also reads back `per_user_limit`, so the limit enforced below
        // is the stored one, not a caller snapshot.
        let reserved: Option<i32> = sqlx::query_scalar(
            "UPDATE events SET tickets_booked = tickets_booked + $1
             WHERE id = $2 AND tickets_booked + $1 <= max_tickets
             RETURNING per_user_limit"
        )
            .bind(ticket.quantity)
            .bind(&ticket.event_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        let Some(per_user_limit) = reserved else {
            let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM events WHERE id = $1)")
                .bind(&ticket.event_id)
                .fetch_one(&mut *tx)
                .await
                .map_err(AppError::Database)?;

            if !exists {
                return Err(AppError::EventNotFound(format!("Event '{}' not found", ticket.event_id)));
            }
            return Err(AppError::InvalidQuantity("Requested quantity exceeds remaining capacity".into()));
        };

        // Re-check the buyer's running total under the lock. Everything
        // rolls back on failure, including the increment above.
        let already_booked: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0) FROM tickets WHERE event_id = $1 AND user_id = $2"
        )
            .bind(&ticket.event_id)
            .bind(&ticket.user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if already_booked + ticket.quantity as i64 > per_user_limit as i64 {
            return Err(AppError::PerUserLimitExceeded(format!(
                "Already holding {} of {} allowed tickets for this event",
                already_booked, per_user_limit
            )));
        }

        let created = sqlx::query_as::<_, Ticket>(
            r#"INSERT INTO tickets (
                id, event_id, user_id, quantity, purchased_at,
                promo_code, discount, total_price, validations
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *"#
        )
            .bind(&ticket.id)
            .bind(&ticket.event_id)
            .bind(&ticket.user_id)
            .bind(ticket.quantity)
            .bind(ticket.purchased_at)
            .bind(&ticket.promo_code)
            .bind(ticket.discount)
            .bind(ticket.total_price)
            .bind(&ticket.validations)
            .fetch_one(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE event_id = $1 ORDER BY purchased_at ASC",
        )
            .bind(event_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Ticket>, AppError> {
        sqlx::query_as::<_, Ticket>(
            "SELECT * FROM tickets WHERE user_id = $1 ORDER BY purchased_at DESC",
        )
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    // Only the validation map is mutable after purchase, and only while
    // it is still empty. The guard makes concurrent scans race for a
    // single admission instead of overwriting each other's entries.
    async fn update_redeeming(&self, ticket: &Ticket) -> Result<Ticket, AppError> {
        let updated = sqlx::query_as::<_, Ticket>(
            "UPDATE tickets SET validations = $1 WHERE id = $2 AND validations = '{}'::jsonb RETURNING *",
        )
            .bind(&ticket.validations)
            .bind(&ticket.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?;

        match updated {
            Some(t) => Ok(t),
            None => Err(redeem_conflict(self.find_by_id(&ticket.id).await?, &ticket.id)),
        }
    }
}

fn redeem_conflict(current: Option<Ticket>, ticket_id: &str) -> AppError {
    let Some(current) = current else {
        return AppError::TicketNotFound(format!("Ticket '{}' not found", ticket_id));
    };
    match current.earliest_validation() {
        Some(prior) => AppError::AlreadyRedeemed(format!(
            "Ticket was already validated by {} at {}",
            prior.validated_by,
            prior.validated_at.to_rfc3339()
        )),
        None => AppError::AlreadyRedeemed("Ticket was already validated".into()),
    }
}
