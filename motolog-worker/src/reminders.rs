/// Reminder scans
///
/// One cycle runs the three scans in order: insurance, PUC, service. Each
/// scan is independent; a failing scan is logged and the remaining ones
/// still run. The 7-day dedup window lives in the scan queries themselves,
/// so a rerun after a crash never double-notifies.

use chrono::{NaiveDate, Utc};
use motolog_shared::models::{
    insurance::{ExpiringInsurance, Insurance},
    notification::{CreateNotification, Notification, NotificationType},
    puc::{ExpiringPuc, PucCertificate},
    service_record::{DueService, ServiceRecord},
};
use sqlx::PgPool;

/// Notifications written by one reminder cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub insurance: usize,
    pub puc: usize,
    pub service: usize,
}

/// Runs one full reminder cycle
///
/// Never fails; scan errors are logged and reported as zero counts.
pub async fn run_cycle(pool: &PgPool, days_before: i32) -> CycleSummary {
    tracing::info!(days_before, "Running reminder cycle");

    let mut summary = CycleSummary::default();

    match scan_insurance(pool, days_before).await {
        Ok(count) => summary.insurance = count,
        Err(error) => tracing::error!(%error, "Insurance reminder scan failed"),
    }

    match scan_puc(pool, days_before).await {
        Ok(count) => summary.puc = count,
        Err(error) => tracing::error!(%error, "PUC reminder scan failed"),
    }

    match scan_service(pool).await {
        Ok(count) => summary.service = count,
        Err(error) => tracing::error!(%error, "Service reminder scan failed"),
    }

    tracing::info!(
        insurance = summary.insurance,
        puc = summary.puc,
        service = summary.service,
        "Reminder cycle completed"
    );

    summary
}

/// Notifies owners of active policies expiring within the window
async fn scan_insurance(pool: &PgPool, days_before: i32) -> Result<usize, sqlx::Error> {
    let expiring = Insurance::expiring_unnotified(pool, days_before).await?;
    let today = Utc::now().date_naive();
    let mut created = 0;

    for policy in expiring {
        let result = Notification::create(
            pool,
            CreateNotification {
                user_id: policy.user_id,
                vehicle_id: policy.vehicle_id,
                notification_type: NotificationType::Insurance,
                title: "Insurance Renewal Reminder".to_string(),
                message: insurance_message(&policy, today),
                scheduled_date: Utc::now(),
            },
        )
        .await;

        match result {
            Ok(_) => created += 1,
            Err(error) => tracing::error!(
                %error,
                vehicle_id = %policy.vehicle_id,
                "Failed to create insurance notification"
            ),
        }
    }

    Ok(created)
}

/// Notifies owners of valid certificates expiring within the window
async fn scan_puc(pool: &PgPool, days_before: i32) -> Result<usize, sqlx::Error> {
    let expiring = PucCertificate::expiring_unnotified(pool, days_before).await?;
    let today = Utc::now().date_naive();
    let mut created = 0;

    for cert in expiring {
        let result = Notification::create(
            pool,
            CreateNotification {
                user_id: cert.user_id,
                vehicle_id: cert.vehicle_id,
                notification_type: NotificationType::Puc,
                title: "PUC Certificate Expiry".to_string(),
                message: puc_message(&cert, today),
                scheduled_date: Utc::now(),
            },
        )
        .await;

        match result {
            Ok(_) => created += 1,
            Err(error) => tracing::error!(
                %error,
                vehicle_id = %cert.vehicle_id,
                "Failed to create PUC notification"
            ),
        }
    }

    Ok(created)
}

/// Notifies owners of vehicles past either service-due threshold
async fn scan_service(pool: &PgPool) -> Result<usize, sqlx::Error> {
    let due = ServiceRecord::due_unnotified(pool).await?;
    let mut created = 0;

    for item in due {
        let result = Notification::create(
            pool,
            CreateNotification {
                user_id: item.user_id,
                vehicle_id: item.vehicle_id,
                notification_type: NotificationType::Service,
                title: "Service Due Reminder".to_string(),
                message: service_message(&item),
                scheduled_date: Utc::now(),
            },
        )
        .await;

        match result {
            Ok(_) => created += 1,
            Err(error) => tracing::error!(
                %error,
                vehicle_id = %item.vehicle_id,
                "Failed to create service notification"
            ),
        }
    }

    Ok(created)
}

fn insurance_message(policy: &ExpiringInsurance, today: NaiveDate) -> String {
    let days = (policy.expiry_date - today).num_days();
    format!(
        "Your vehicle insurance ({}) for {} {} expires in {} days on {}. Policy: {} with {}.",
        policy.registration_number,
        policy.make,
        policy.model,
        days,
        policy.expiry_date,
        policy.policy_number,
        policy.insurance_company
    )
}

fn puc_message(cert: &ExpiringPuc, today: NaiveDate) -> String {
    let days = (cert.expiry_date - today).num_days();
    format!(
        "Your PUC certificate ({}) for {} {} ({}) expires in {} days on {}. Tested at: {}.",
        cert.certificate_number,
        cert.make,
        cert.model,
        cert.registration_number,
        days,
        cert.expiry_date,
        cert.testing_center.as_deref().unwrap_or("N/A")
    )
}

/// Odometer threshold wins when both are due
fn service_message(due: &DueService) -> String {
    let odometer_due = due
        .next_service_odometer
        .is_some_and(|next| due.current_odometer >= next - 500);

    if odometer_due {
        // The threshold just matched, so the reading is present
        let next = due.next_service_odometer.unwrap_or_default();
        format!(
            "Your {} {} ({}) is due for service at odometer reading {} km. Current reading: {} km.",
            due.make, due.model, due.registration_number, next, due.current_odometer
        )
    } else if let Some(date) = due.next_service_date {
        format!(
            "Your {} {} ({}) is due for service on {}.",
            due.make, due.model, due.registration_number, date
        )
    } else {
        format!(
            "Your {} {} ({}) is due for service.",
            due.make, due.model, due.registration_number
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_insurance_message() {
        let policy = ExpiringInsurance {
            id: Uuid::new_v4(),
            policy_number: "POL-2024-001".to_string(),
            insurance_company: "Acme Insurance".to_string(),
            expiry_date: date(2025, 3, 15),
            vehicle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            make: "Honda".to_string(),
            model: "City".to_string(),
            registration_number: "MH12AB1234".to_string(),
        };

        assert_eq!(
            insurance_message(&policy, date(2025, 3, 1)),
            "Your vehicle insurance (MH12AB1234) for Honda City expires in 14 days on \
             2025-03-15. Policy: POL-2024-001 with Acme Insurance."
        );
    }

    #[test]
    fn test_puc_message_without_testing_center() {
        let cert = ExpiringPuc {
            id: Uuid::new_v4(),
            certificate_number: "PUC-99".to_string(),
            testing_center: None,
            expiry_date: date(2025, 6, 10),
            vehicle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            make: "Maruti".to_string(),
            model: "Swift".to_string(),
            registration_number: "KA01CD5678".to_string(),
        };

        assert_eq!(
            puc_message(&cert, date(2025, 6, 3)),
            "Your PUC certificate (PUC-99) for Maruti Swift (KA01CD5678) expires in 7 days \
             on 2025-06-10. Tested at: N/A."
        );
    }

    #[test]
    fn test_service_message_prefers_odometer() {
        let due = DueService {
            vehicle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            make: "Honda".to_string(),
            model: "City".to_string(),
            registration_number: "MH12AB1234".to_string(),
            current_odometer: 14_700,
            service_type: "oil change".to_string(),
            next_service_date: Some(date(2025, 9, 1)),
            next_service_odometer: Some(15_000),
        };

        assert_eq!(
            service_message(&due),
            "Your Honda City (MH12AB1234) is due for service at odometer reading 15000 km. \
             Current reading: 14700 km."
        );
    }

    #[test]
    fn test_service_message_by_date() {
        let due = DueService {
            vehicle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            make: "Tata".to_string(),
            model: "Nexon".to_string(),
            registration_number: "DL8CX0001".to_string(),
            current_odometer: 8_000,
            service_type: "general service".to_string(),
            next_service_date: Some(date(2025, 1, 20)),
            next_service_odometer: None,
        };

        assert_eq!(
            service_message(&due),
            "Your Tata Nexon (DL8CX0001) is due for service on 2025-01-20."
        );
    }

    #[test]
    fn test_service_message_odometer_outside_threshold_falls_back_to_date() {
        let due = DueService {
            vehicle_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            make: "Tata".to_string(),
            model: "Nexon".to_string(),
            registration_number: "DL8CX0001".to_string(),
            current_odometer: 10_000,
            service_type: "general service".to_string(),
            next_service_date: Some(date(2025, 1, 20)),
            next_service_odometer: Some(20_000),
        };

        assert_eq!(
            service_message(&due),
            "Your Tata Nexon (DL8CX0001) is due for service on 2025-01-20."
        );
    }

    // Integration tests with a real database are in tests/reminder_tests.rs
}
