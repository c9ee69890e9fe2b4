use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{EnumString, IntoStaticStr};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, EnumString, IntoStaticStr)]
pub enum EmployeeType {
    Permanent,
    Contract,
    Temporary,
}

impl EmployeeType {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

/// One earning or deduction row owned by a payslip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LineItem {
    #[schema(example = "Basic")]
    pub component: String,

    #[schema(example = 30000.0)]
    pub amount: f64,
}

/// Raw `POST /payslips` body. Every field is optional here so that missing and `null`
/// values are reported by the validator in a fixed order instead of by serde.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayslipRequest {
    #[schema(example = "Asha Rao", value_type = String)]
    pub employee_name: Option<Value>,
    #[schema(example = "Permanent", value_type = String)]
    pub employee_type: Option<Value>,
    #[schema(example = "ATS0012", value_type = String)]
    pub employee_id: Option<Value>,
    #[schema(example = "Engineer", value_type = String)]
    pub designation: Option<Value>,
    #[schema(example = "04", value_type = String)]
    pub month: Option<Value>,
    #[schema(example = "April", value_type = String)]
    pub month_name: Option<Value>,
    #[schema(example = "2024", value_type = String)]
    pub year: Option<Value>,
    #[schema(example = "2021-06-15", value_type = String)]
    pub date_joining: Option<Value>,
    #[schema(example = "Hyderabad", value_type = String)]
    pub location: Option<Value>,
    #[schema(example = 30, value_type = f64)]
    pub days_in_month: Option<Value>,
    #[schema(example = 22, value_type = f64)]
    pub working_days: Option<Value>,
    #[schema(example = 0, value_type = f64)]
    pub arrear_days: Option<Value>,
    #[schema(example = 0, value_type = f64)]
    pub lop: Option<Value>,
    #[schema(example = "HDFC Bank", value_type = String)]
    pub bank_name: Option<Value>,
    #[schema(example = "123456789012", value_type = String)]
    pub account_no: Option<Value>,
    #[schema(example = "ABCDE1234F", value_type = String)]
    pub pan: Option<Value>,
    #[schema(example = "APHYD12345678", value_type = String)]
    pub provident_fund: Option<Value>,
    #[schema(example = "1234567890", value_type = String)]
    pub esic: Option<Value>,
    #[schema(example = "10012345678", value_type = String)]
    pub uan: Option<Value>,
    #[schema(value_type = Vec<LineItem>)]
    pub earnings: Option<Value>,
    #[schema(value_type = Vec<LineItem>)]
    pub deductions: Option<Value>,
}

/// A payslip submission that passed every validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct PayslipSubmission {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_type: EmployeeType,
    pub designation: String,
    pub month: String,
    pub month_name: String,
    pub year: String,
    pub date_joining: String,
    pub location: String,
    pub days_in_month: f64,
    pub working_days: f64,
    pub arrear_days: f64,
    pub lop: f64,
    pub bank_name: String,
    pub account_no: String,
    pub pan: String,
    pub provident_fund: String,
    pub esic: String,
    pub uan: String,
    pub earnings: Vec<LineItem>,
    pub deductions: Vec<LineItem>,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PayslipTotals {
    pub gross_pay: f64,
    pub total_deductions: f64,
    /// Not clamped at zero; deductions may exceed earnings.
    pub net_pay: f64,
}

impl PayslipTotals {
    pub fn from_items(earnings: &[LineItem], deductions: &[LineItem]) -> Self {
        let gross_pay: f64 = earnings.iter().map(|e| e.amount).sum();
        let total_deductions: f64 = deductions.iter().map(|d| d.amount).sum();

        Self {
            gross_pay,
            total_deductions,
            net_pay: gross_pay - total_deductions,
        }
    }
}

impl PayslipSubmission {
    pub fn totals(&self) -> PayslipTotals {
        PayslipTotals::from_items(&self.earnings, &self.deductions)
    }
}

/// Header row of the `payslips` table.
#[derive(Debug, sqlx::FromRow)]
pub struct PayslipRow {
    pub id: i64,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_type: String,
    pub designation: String,
    pub month: String,
    pub month_name: String,
    pub year: String,
    pub date_joining: String,
    pub location: String,
    pub days_in_month: f64,
    pub working_days: f64,
    pub arrear_days: f64,
    pub lop: f64,
    pub bank_name: String,
    pub account_no: String,
    pub pan: String,
    pub provident_fund: String,
    pub esic: String,
    pub uan: String,
    pub gross_pay: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
    pub duration: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "employeeId": "ATS0012",
    "employeeName": "Asha Rao",
    "employeeType": "Permanent",
    "designation": "Engineer",
    "month": "04",
    "monthName": "April",
    "year": "2024",
    "monthYearFormatted": "April 2024",
    "dateJoining": "2021-06-15",
    "location": "Hyderabad",
    "daysInMonth": 30.0,
    "workingDays": 22.0,
    "arrearDays": 0.0,
    "lop": 0.0,
    "bankName": "HDFC Bank",
    "accountNo": "123456789012",
    "pan": "ABCDE1234F",
    "providentFund": "APHYD12345678",
    "esic": "1234567890",
    "uan": "10012345678",
    "grossPay": 30000.0,
    "totalDeductions": 2000.0,
    "netPay": 28000.0,
    "duration": "2 Years 9 Months",
    "earnings": [{ "component": "Basic", "amount": 30000.0 }],
    "deductions": [{ "component": "TDS", "amount": 2000.0 }]
}))]
pub struct PayslipView {
    pub employee_id: String,
    pub employee_name: String,
    pub employee_type: String,
    pub designation: String,
    pub month: String,
    pub month_name: String,
    pub year: String,
    pub month_year_formatted: String,
    pub date_joining: String,
    pub location: String,
    pub days_in_month: f64,
    pub working_days: f64,
    pub arrear_days: f64,
    pub lop: f64,
    pub bank_name: String,
    pub account_no: String,
    pub pan: String,
    pub provident_fund: String,
    pub esic: String,
    pub uan: String,
    pub gross_pay: f64,
    pub total_deductions: f64,
    pub net_pay: f64,
    pub duration: String,
    pub earnings: Vec<LineItem>,
    pub deductions: Vec<LineItem>,
}

impl PayslipView {
    pub fn from_parts(row: PayslipRow, earnings: Vec<LineItem>, deductions: Vec<LineItem>) -> Self {
        let month_year_formatted = format!("{} {}", row.month_name, row.year);

        Self {
            employee_id: row.employee_id,
            employee_name: row.employee_name,
            employee_type: row.employee_type,
            designation: row.designation,
            month: row.month,
            month_name: row.month_name,
            year: row.year,
            month_year_formatted,
            date_joining: row.date_joining,
            location: row.location,
            days_in_month: row.days_in_month,
            working_days: row.working_days,
            arrear_days: row.arrear_days,
            lop: row.lop,
            bank_name: row.bank_name,
            account_no: row.account_no,
            pan: row.pan,
            provident_fund: row.provident_fund,
            esic: row.esic,
            uan: row.uan,
            gross_pay: row.gross_pay,
            total_deductions: row.total_deductions,
            net_pay: row.net_pay,
            duration: row.duration,
            earnings,
            deductions,
        }
    }
}
