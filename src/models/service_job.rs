//! Modelo de ServiceJob
//!
//! Invariante: `end_time` es `None` si y solo si el estado no es Completed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::JobStatus;

/// ServiceJob principal - mapea exactamente a la tabla service_jobs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceJob {
    pub job_id: i32,
    pub request_id: i32,
    pub employee_id: Option<i32>,
    #[sqlx(try_from = "String")]
    pub job_status: JobStatus,
    pub labor_charge: Decimal,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl ServiceJob {
    pub fn is_completed(&self) -> bool {
        self.job_status == JobStatus::Completed
    }

    /// Marca el trabajo como completado. Llamarlo dos veces sobrescribe
    /// `end_time`.
    pub fn complete(&mut self, end_time: DateTime<Utc>) {
        self.job_status = JobStatus::Completed;
        self.end_time = Some(end_time);
    }
}

/// Filtros para listar trabajos
#[derive(Debug, Clone, Copy, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    /// Solo trabajos completados que todavía no tienen factura
    pub completed_without_bill: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_sets_end_time_and_can_be_repeated() {
        let mut job = ServiceJob {
            job_id: 1,
            request_id: 1,
            employee_id: None,
            job_status: JobStatus::InProgress,
            labor_charge: Decimal::ZERO,
            start_time: Utc::now(),
            end_time: None,
        };
        assert!(!job.is_completed());

        let first = Utc::now();
        job.complete(first);
        assert!(job.is_completed());
        assert_eq!(job.end_time, Some(first));

        let second = first + chrono::Duration::minutes(5);
        job.complete(second);
        assert_eq!(job.end_time, Some(second));
    }
}
