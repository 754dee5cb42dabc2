/// Notification model and database operations
///
/// Notifications are written by the reminder worker and consumed through the
/// API. Rows are immutable except for the read flag.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE notification_type AS ENUM ('insurance', 'puc', 'service');
///
/// CREATE TABLE notifications (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     vehicle_id UUID NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
///     notification_type notification_type NOT NULL,
///     title VARCHAR(100) NOT NULL,
///     message TEXT NOT NULL,
///     is_read BOOLEAN NOT NULL DEFAULT FALSE,
///     scheduled_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Category of reminder a notification carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    /// Insurance policy expiring
    Insurance,
    /// PUC certificate expiring
    Puc,
    /// Service due by odometer or date
    Service,
}

impl NotificationType {
    /// Returns the string representation used in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Insurance => "insurance",
            NotificationType::Puc => "puc",
            NotificationType::Service => "service",
        }
    }
}

/// A reminder notification delivered to a user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    /// Unique notification ID
    pub id: Uuid,

    /// User the notification belongs to
    pub user_id: Uuid,

    /// Vehicle the reminder concerns
    pub vehicle_id: Uuid,

    /// Category of reminder
    pub notification_type: NotificationType,

    /// Short headline
    pub title: String,

    /// Full reminder text
    pub message: String,

    /// Whether the user has read it
    pub is_read: bool,

    /// When the reminder was meant to fire
    pub scheduled_date: DateTime<Utc>,

    /// When the row was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNotification {
    /// User the notification belongs to
    pub user_id: Uuid,

    /// Vehicle the reminder concerns
    pub vehicle_id: Uuid,

    /// Category of reminder
    pub notification_type: NotificationType,

    /// Short headline
    pub title: String,

    /// Full reminder text
    pub message: String,

    /// When the reminder was meant to fire
    pub scheduled_date: DateTime<Utc>,
}

impl Notification {
    /// Creates a new notification
    pub async fn create(pool: &PgPool, data: CreateNotification) -> Result<Self, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (
                user_id, vehicle_id, notification_type, title, message, scheduled_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, vehicle_id, notification_type, title, message,
                      is_read, scheduled_date, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.vehicle_id)
        .bind(data.notification_type)
        .bind(data.title)
        .bind(data.message)
        .bind(data.scheduled_date)
        .fetch_one(pool)
        .await?;

        Ok(notification)
    }

    /// Lists a user's notifications, newest first, with pagination
    ///
    /// When `unread_only` is set, read notifications are filtered out.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, vehicle_id, notification_type, title, message,
                   is_read, scheduled_date, created_at
            FROM notifications
            WHERE user_id = $1
              AND (NOT $2 OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(notifications)
    }

    /// Counts a user's notifications, optionally unread only
    pub async fn count_by_user(
        pool: &PgPool,
        user_id: Uuid,
        unread_only: bool,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE user_id = $1
              AND (NOT $2 OR is_read = FALSE)
            "#,
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Marks a notification as read, scoped to its owner
    ///
    /// # Returns
    ///
    /// The updated notification if found, None otherwise
    pub async fn mark_read(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, vehicle_id, notification_type, title, message,
                      is_read, scheduled_date, created_at
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(notification)
    }

    /// Deletes a notification, scoped to its owner
    ///
    /// # Returns
    ///
    /// True if the notification was deleted, false if it wasn't found
    pub async fn delete(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM notifications
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_type_as_str() {
        assert_eq!(NotificationType::Insurance.as_str(), "insurance");
        assert_eq!(NotificationType::Puc.as_str(), "puc");
        assert_eq!(NotificationType::Service.as_str(), "service");
    }

    #[test]
    fn test_notification_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&NotificationType::Puc).unwrap(),
            "\"puc\""
        );

        let nt: NotificationType = serde_json::from_str("\"service\"").unwrap();
        assert_eq!(nt, NotificationType::Service);
    }

    #[test]
    fn test_create_notification_struct() {
        let create = CreateNotification {
            user_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            notification_type: NotificationType::Insurance,
            title: "Insurance Renewal Reminder".to_string(),
            message: "Your vehicle insurance expires soon.".to_string(),
            scheduled_date: Utc::now(),
        };

        assert_eq!(create.title, "Insurance Renewal Reminder");
        assert_eq!(create.notification_type, NotificationType::Insurance);
    }

    // Integration tests for database operations are in motolog-api/tests/
}
