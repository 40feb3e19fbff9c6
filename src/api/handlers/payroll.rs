//! Payroll generation, history and payslip download.

use std::time::Instant;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use tracing::{debug, info, warn};

use crate::api::extract::CurrentUser;
use crate::api::request::GeneratePayrollRequest;
use crate::api::response::ApiResult;
use crate::api::state::AppState;
use crate::error::{HrError, HrResult};
use crate::models::{PayPeriod, PayrollComputation, PayrollRecord};
use crate::payslip::render_payslip;

use super::parse_body;

/// Handler for POST /payroll.
pub(super) async fn generate_payroll(
    caller: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<GeneratePayrollRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PayrollRecord>)> {
    caller.require_admin()?;
    let request = parse_body(payload, caller.correlation_id)?.to_payroll_request()?;

    let start_time = Instant::now();
    match state
        .store()
        .generate_payroll(request, &state.config().payroll)
        .await
    {
        Ok(record) => {
            info!(
                correlation_id = %caller.correlation_id,
                emp_id = record.emp_id,
                payroll_id = record.payroll_id,
                net_pay = %record.totals.net_pay,
                duration_us = start_time.elapsed().as_micros(),
                "Payroll generated"
            );
            Ok((StatusCode::CREATED, Json(record)))
        }
        Err(err) => {
            warn!(
                correlation_id = %caller.correlation_id,
                emp_id = request.emp_id,
                error = %err,
                "Payroll generation failed"
            );
            Err(err.into())
        }
    }
}

/// Handler for POST /payroll/preview.
pub(super) async fn preview_payroll(
    caller: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<GeneratePayrollRequest>, JsonRejection>,
) -> ApiResult<Json<PayrollComputation>> {
    caller.require_admin()?;
    let request = parse_body(payload, caller.correlation_id)?.to_payroll_request()?;
    let computation = state
        .store()
        .preview_payroll(request, &state.config().payroll)
        .await?;
    Ok(Json(computation))
}

/// Loads a payroll record the caller may see. Records of other employees
/// are reported as missing so ids cannot be enumerated.
async fn visible_payroll(
    caller: &CurrentUser,
    state: &AppState,
    payroll_id: i64,
) -> HrResult<PayrollRecord> {
    let record = state.store().get_payroll(payroll_id).await?;
    if caller.require_access(record.emp_id).is_err() {
        debug!(
            correlation_id = %caller.correlation_id,
            payroll_id,
            "Payroll record hidden from caller"
        );
        return Err(HrError::not_found("payroll", payroll_id));
    }
    Ok(record)
}

/// Handler for GET /payroll/:id.
pub(super) async fn get_payroll(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(payroll_id): Path<i64>,
) -> ApiResult<Json<PayrollRecord>> {
    Ok(Json(visible_payroll(&caller, &state, payroll_id).await?))
}

/// Handler for GET /employees/:id/payroll.
pub(super) async fn employee_payroll(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
) -> ApiResult<Json<Vec<PayrollRecord>>> {
    caller.require_access(emp_id)?;
    state.store().get_employee(emp_id).await?;
    Ok(Json(state.store().list_payroll(emp_id).await?))
}

/// Handler for DELETE /payroll/:id.
pub(super) async fn delete_payroll(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(payroll_id): Path<i64>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    state.store().delete_payroll(payroll_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /payroll/:id/payslip.
///
/// Responds with the payslip PDF as an attachment. The month's attendance
/// is included when any was recorded.
pub(super) async fn download_payslip(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(payroll_id): Path<i64>,
) -> ApiResult<impl IntoResponse> {
    let record = visible_payroll(&caller, &state, payroll_id).await?;

    let employee = state.store().get_employee(record.emp_id).await?;
    let period = PayPeriod::from_month_name(record.year, &record.month)?;
    let summary = state
        .store()
        .attendance_summary(record.emp_id, &period)
        .await?;
    let attendance = (summary.total() > 0).then_some(&summary);

    let pdf = render_payslip(&record, &employee, attendance, &state.config().payslip);
    info!(
        correlation_id = %caller.correlation_id,
        payroll_id,
        bytes = pdf.len(),
        "Payslip rendered"
    );

    let filename = format!(
        "payslip_{}_{}_{}.pdf",
        record.emp_id, record.month, record.year
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        pdf,
    ))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::json;
    use tower::ServiceExt;

    use crate::api::handlers::test_support::*;

    async fn generate(router: &axum::Router, admin: &str, emp_id: i64) -> serde_json::Value {
        let (status, body) = send(
            router,
            "POST",
            "/payroll",
            Some(admin),
            Some(json!({
                "emp_id": emp_id,
                "month": "March",
                "year": 2025,
                "allowances": "1000",
                "deductions": "500",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body
    }

    #[tokio::test]
    async fn test_generate_payroll_with_unpaid_leave() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let emp_id = create_employee(&router, &admin, "Farah", "31000").await;
        send(
            &router,
            "POST",
            &format!("/employees/{}/leaves", emp_id),
            Some(&admin),
            Some(json!({ "leave_type": "unpaid", "days": 2, "date": "2025-03-30" })),
        )
        .await;

        let body = generate(&router, &admin, emp_id).await;
        assert_eq!(body["month"], "March");
        assert_eq!(body["hra"], "6200.00");
        // Two unpaid days in March: 31000 / 31 * 2
        assert_eq!(body["deductions"], "2500.00");
        assert_eq!(body["net_pay"], "35700.00");
        assert_eq!(body["components"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_duplicate_payroll_returns_409() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let emp_id = create_employee(&router, &admin, "Farah", "31000").await;
        generate(&router, &admin, emp_id).await;

        let (status, body) = send(
            &router,
            "POST",
            "/payroll",
            Some(&admin),
            Some(json!({ "emp_id": emp_id, "month": 3, "year": 2025 })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_negative_net_pay_rejected() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let emp_id = create_employee(&router, &admin, "Farah", "1000").await;

        let (status, body) = send(
            &router,
            "POST",
            "/payroll/preview",
            Some(&admin),
            Some(json!({ "emp_id": emp_id, "month": 1, "year": 2025, "deductions": "5000" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CALCULATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_allowance_is_calculation_error() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let emp_id = create_employee(&router, &admin, "Farah", "31000").await;

        let (status, body) = send(
            &router,
            "POST",
            "/payroll/preview",
            Some(&admin),
            Some(json!({
                "emp_id": emp_id,
                "month": 3,
                "year": 2025,
                "allowances": "79228162514264337593543950335",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CALCULATION_ERROR");
    }

    #[tokio::test]
    async fn test_preview_does_not_persist() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let emp_id = create_employee(&router, &admin, "Farah", "20000").await;

        let (status, body) = send(
            &router,
            "POST",
            "/payroll/preview",
            Some(&admin),
            Some(json!({ "emp_id": emp_id, "month": "jan", "year": 2025 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totals"]["net_pay"], "24000.00");

        let (_, history) = send(
            &router,
            "GET",
            &format!("/employees/{}/payroll", emp_id),
            Some(&admin),
            None,
        )
        .await;
        assert!(history.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_employee_cannot_read_other_payroll() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let own = create_employee(&router, &admin, "Asha", "30000").await;
        let other = create_employee(&router, &admin, "Ravi", "20000").await;
        let token = employee_token(&router, &admin, "asha", own).await;

        let own_payroll = generate(&router, &admin, own).await;
        let other_payroll = generate(&router, &admin, other).await;

        let (status, _) = send(
            &router,
            "GET",
            &format!("/payroll/{}", own_payroll["payroll_id"]),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &router,
            "GET",
            &format!("/payroll/{}", other_payroll["payroll_id"]),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        // Another employee's record looks the same as an unused id.
        let (status, _) = send(&router, "GET", "/payroll/9999", Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &router,
            "GET",
            &format!("/payroll/{}/payslip", other_payroll["payroll_id"]),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &router,
            "POST",
            "/payroll",
            Some(&token),
            Some(json!({ "emp_id": own, "month": 4, "year": 2025 })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_download_payslip() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let emp_id = create_employee(&router, &admin, "Farah Khan", "31000").await;
        send(
            &router,
            "POST",
            &format!("/employees/{}/attendance", emp_id),
            Some(&admin),
            Some(json!({ "date": "2025-03-03", "status": "half_day" })),
        )
        .await;
        let payroll = generate(&router, &admin, emp_id).await;

        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/payroll/{}/payslip", payroll["payroll_id"]))
                    .header("Authorization", format!("Bearer {}", admin))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains(&format!("payslip_{}_March_2025.pdf", emp_id)));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let pdf = String::from_utf8_lossy(&bytes);
        assert!(pdf.starts_with("%PDF-"));
        assert!(pdf.contains("Farah Khan"));
        assert!(pdf.contains("Net Pay"));
        assert!(pdf.contains("(Attendance)"));
    }

    #[tokio::test]
    async fn test_delete_payroll_allows_regeneration() {
        let router = test_router().await;
        let admin = admin_token(&router).await;
        let emp_id = create_employee(&router, &admin, "Farah", "31000").await;
        let payroll = generate(&router, &admin, emp_id).await;

        let (status, _) = send(
            &router,
            "DELETE",
            &format!("/payroll/{}", payroll["payroll_id"]),
            Some(&admin),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        generate(&router, &admin, emp_id).await;
    }
}
