//! Modelo de ServiceRequest
//!
//! Toda solicitud nace junto con su trabajo (ServiceJob) en la misma
//! transacción; no puede existir una solicitud sin trabajo.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::RequestStatus;

pub const DEFAULT_PRIORITY: &str = "Normal";

/// ServiceRequest principal - mapea exactamente a la tabla service_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub request_id: i32,
    pub vehicle_id: i32,
    pub service_type: String,
    pub problem_note: Option<String>,
    pub priority: String,
    #[sqlx(try_from = "String")]
    pub status: RequestStatus,
    pub request_date: NaiveDate,
}

/// Datos para insertar una solicitud (y su trabajo)
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub vehicle_id: i32,
    pub service_type: String,
    pub problem_note: Option<String>,
    pub priority: String,
    pub status: RequestStatus,
    pub assigned_employee_id: Option<i32>,
}

/// Actualización parcial de campos: `None` deja el valor actual
#[derive(Debug, Clone, Default)]
pub struct RequestChanges {
    pub service_type: Option<String>,
    pub problem_note: Option<String>,
    pub priority: Option<String>,
    pub status: Option<RequestStatus>,
    pub vehicle_id: Option<i32>,
}

impl RequestChanges {
    pub fn is_empty(&self) -> bool {
        self.service_type.is_none()
            && self.problem_note.is_none()
            && self.priority.is_none()
            && self.status.is_none()
            && self.vehicle_id.is_none()
    }

    pub fn apply_to(&self, request: &ServiceRequest) -> ServiceRequest {
        let mut updated = request.clone();
        if let Some(ref v) = self.service_type {
            updated.service_type = v.clone();
        }
        if let Some(ref v) = self.problem_note {
            updated.problem_note = Some(v.clone());
        }
        if let Some(ref v) = self.priority {
            updated.priority = v.clone();
        }
        if let Some(v) = self.status {
            updated.status = v;
        }
        if let Some(v) = self.vehicle_id {
            updated.vehicle_id = v;
        }
        updated
    }
}

/// Filtros de listado; los presentes se combinan con AND
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    /// Coincidencia parcial sin mayúsculas sobre nombre de cliente,
    /// matrícula o tipo de servicio
    pub search: Option<String>,
    pub customer_id: Option<i32>,
    pub vehicle_id: Option<i32>,
}

/// Solicitud con datos del vehículo, cliente y último trabajo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRequestSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub request: ServiceRequest,
    pub plate_no: Option<String>,
    pub customer_id: Option<i32>,
    pub customer_name: Option<String>,
    pub job_id: Option<i32>,
    pub assigned_employee_id: Option<i32>,
}

impl ServiceRequestSummary {
    /// Subcadena literal sin mayúsculas; `%` y `_` no son comodines
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let contains = |value: Option<&str>| {
            value
                .map(|v| v.to_lowercase().contains(&needle))
                .unwrap_or(false)
        };
        contains(self.customer_name.as_deref())
            || contains(self.plate_no.as_deref())
            || contains(Some(self.request.service_type.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ServiceRequestSummary {
        ServiceRequestSummary {
            request: ServiceRequest {
                request_id: 1,
                vehicle_id: 7,
                service_type: "Oil Change".to_string(),
                problem_note: None,
                priority: DEFAULT_PRIORITY.to_string(),
                status: RequestStatus::Pending,
                request_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
            },
            plate_no: Some("AB-123".to_string()),
            customer_id: Some(4),
            customer_name: Some("Jane Doe".to_string()),
            job_id: Some(1),
            assigned_employee_id: None,
        }
    }

    #[test]
    fn test_search_matches_any_field_case_insensitively() {
        let s = summary();
        assert!(s.matches_search("jane"));
        assert!(s.matches_search("ab-1"));
        assert!(s.matches_search("OIL"));
        assert!(!s.matches_search("brake"));
    }

    #[test]
    fn test_changes_apply_status_and_keep_rest() {
        let s = summary();
        let changes = RequestChanges {
            status: Some(RequestStatus::InProgress),
            ..Default::default()
        };
        let updated = changes.apply_to(&s.request);
        assert_eq!(updated.status, RequestStatus::InProgress);
        assert_eq!(updated.service_type, "Oil Change");
    }
}
