use crate::api::payslip::SubmitPayslipResponse;
use crate::error::ErrorResponse;
use crate::model::payslip::{LineItem, PayslipRequest, PayslipView};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Payslip Service API",
        version = "1.0.0",
        description = r#"
## Payslip Service

HR submits a monthly payslip for an employee; the employee fetches it back by
employee id, month and year.

### 🔹 Operations
- **Submit payslip** — validates the submission, computes gross pay, total deductions
  and net pay, then creates the payslip or overwrites the existing one for the same
  employee and period. Earnings and deductions are replaced as a whole.
- **Fetch payslip** — returns the stored payslip with its earnings, deductions and a
  formatted `monthYearFormatted` label.

### 📦 Response Format
- JSON bodies; every failure carries an `error` field
- `400` validation or constraint failure, `404` unknown payslip, `500` unexpected failure

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::payslip::create_payslip,
        crate::api::payslip::get_payslip
    ),
    components(
        schemas(
            PayslipRequest,
            PayslipView,
            LineItem,
            SubmitPayslipResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Payslip", description = "Payslip submission and lookup APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_both_payslip_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        assert!(paths.contains(&"/api/payslips".to_string()));
        assert!(paths.contains(&"/api/payslips/{employee_id}/{month}/{year}".to_string()));
    }

    #[test]
    fn response_bodies_point_at_registered_schemas() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        for name in ["ErrorResponse", "PayslipView", "SubmitPayslipResponse"] {
            assert!(schemas.contains_key(name), "{name} missing");
        }

        let json = serde_json::to_value(&doc).unwrap();
        let get = &json["paths"]["/api/payslips/{employee_id}/{month}/{year}"]["get"];
        assert_eq!(
            get["responses"]["200"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/PayslipView"
        );
        assert_eq!(
            get["responses"]["404"]["content"]["application/json"]["schema"]["$ref"],
            "#/components/schemas/ErrorResponse"
        );
    }
}
