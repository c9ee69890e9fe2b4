use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::PayslipError;
use crate::model::payslip::{EmployeeType, LineItem, PayslipRequest, PayslipSubmission};

// ASCII classes only; `\d` would also accept non-latin digits.
static EMPLOYEE_ID: Lazy<Regex> = Lazy::new(|| compile(r"^ATS0[0-9]{3}$"));
static MONTH: Lazy<Regex> = Lazy::new(|| compile(r"^(0[1-9]|1[0-2])$"));
static YEAR: Lazy<Regex> = Lazy::new(|| compile(r"^20[0-9]{2}$"));
static PAN: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z]{5}[0-9]{4}[A-Z]$"));
static ACCOUNT_NO: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{8,18}$"));
static PROVIDENT_FUND: Lazy<Regex> = Lazy::new(|| compile(r"^[A-Z]{5}[0-9]{8,18}$"));
static ESIC: Lazy<Regex> = Lazy::new(|| compile(r"^[0-9]{10}$"));
static UAN: Lazy<Regex> = Lazy::new(|| compile(r"^1[0-9]{10}$"));

const RESERVED_EMPLOYEE_ID: &str = "ATS0000";

pub const INVALID_MONTH: &str = "Invalid month (must be 01-12)";
pub const INVALID_YEAR: &str = "Invalid year (must be 20XX)";

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static pattern must compile")
}

pub fn is_valid_employee_id(employee_id: &str) -> bool {
    EMPLOYEE_ID.is_match(employee_id) && employee_id != RESERVED_EMPLOYEE_ID
}

pub fn is_valid_month(month: &str) -> bool {
    MONTH.is_match(month)
}

pub fn is_valid_year(year: &str) -> bool {
    YEAR.is_match(year)
}

/// Checks the `(employeeId, month, year)` key used to look a payslip up.
pub fn validate_period_key(employee_id: &str, month: &str, year: &str) -> Result<(), PayslipError> {
    if !is_valid_employee_id(employee_id) {
        return Err(PayslipError::validation("Invalid employeeId format"));
    }
    if !is_valid_month(month) {
        return Err(PayslipError::validation(INVALID_MONTH));
    }
    if !is_valid_year(year) {
        return Err(PayslipError::validation(INVALID_YEAR));
    }
    Ok(())
}

/// Validates a submission and converts it into its typed form.
///
/// Rules run in a fixed order and the first violation is returned. Presence of every
/// field is checked before any format rule.
pub fn validate_payslip(req: &PayslipRequest) -> Result<PayslipSubmission, PayslipError> {
    let employee_name = required("employeeName", &req.employee_name)?;
    let employee_type = required("employeeType", &req.employee_type)?;
    let employee_id = required("employeeId", &req.employee_id)?;
    let designation = required("designation", &req.designation)?;
    let month = required("month", &req.month)?;
    let month_name = required("monthName", &req.month_name)?;
    let year = required("year", &req.year)?;
    let date_joining = required("dateJoining", &req.date_joining)?;
    let location = required("location", &req.location)?;
    let days_in_month = required("daysInMonth", &req.days_in_month)?;
    let working_days = required("workingDays", &req.working_days)?;
    let arrear_days = required("arrearDays", &req.arrear_days)?;
    let lop = required("lop", &req.lop)?;
    let bank_name = required("bankName", &req.bank_name)?;
    let account_no = required("accountNo", &req.account_no)?;
    let pan = required("pan", &req.pan)?;
    let provident_fund = required("providentFund", &req.provident_fund)?;
    let esic = required("esic", &req.esic)?;
    let uan = required("uan", &req.uan)?;
    let earnings = required("earnings", &req.earnings)?;
    let deductions = required("deductions", &req.deductions)?;

    let employee_id = employee_id
        .as_str()
        .filter(|id| is_valid_employee_id(id))
        .ok_or_else(|| {
            PayslipError::validation("Invalid employeeId format (must be ATS0XXX, XXX from 001-999)")
        })?;
    let employee_type = employee_type
        .as_str()
        .and_then(|t| EmployeeType::from_str(t).ok())
        .ok_or_else(|| {
            PayslipError::validation("Invalid employeeType (must be Permanent, Contract, or Temporary)")
        })?;
    let month = matching(month, &MONTH, INVALID_MONTH)?;
    let year = matching(year, &YEAR, INVALID_YEAR)?;
    let pan = matching(pan, &PAN, "Invalid PAN format")?;
    let account_no = matching(account_no, &ACCOUNT_NO, "Invalid account number (8-18 digits)")?;
    let provident_fund = matching(
        provident_fund,
        &PROVIDENT_FUND,
        "Invalid provident fund number format",
    )?;
    let esic = matching(esic, &ESIC, "Invalid ESIC number (10 digits)")?;
    let uan = matching(uan, &UAN, "Invalid UAN number (starts with 1, 11 digits)")?;

    let earnings = non_empty_array(earnings, "Earnings must be a non-empty array")?;
    let deductions = non_empty_array(deductions, "Deductions must be a non-empty array")?;

    let days_in_month = non_negative("daysInMonth", days_in_month)?;
    let working_days = non_negative("workingDays", working_days)?;
    let arrear_days = non_negative("arrearDays", arrear_days)?;
    let lop = non_negative("lop", lop)?;

    if !(28.0..=31.0).contains(&days_in_month) {
        return Err(PayslipError::validation("Days in month must be between 28 and 31"));
    }
    if working_days > days_in_month {
        return Err(PayslipError::validation("Working days cannot exceed days in month"));
    }

    let earnings = earnings
        .iter()
        .map(|e| {
            line_item(e, |amount| amount > 0.0).ok_or_else(|| {
                PayslipError::validation("Invalid earning entry (must have component and positive amount)")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let deductions = deductions
        .iter()
        .map(|d| {
            line_item(d, |amount| amount >= 0.0).ok_or_else(|| {
                PayslipError::validation(
                    "Invalid deduction entry (must have component and non-negative amount)",
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PayslipSubmission {
        employee_id: employee_id.to_string(),
        employee_name: text("employeeName", employee_name)?,
        employee_type,
        designation: text("designation", designation)?,
        month,
        month_name: text("monthName", month_name)?,
        year,
        date_joining: text("dateJoining", date_joining)?,
        location: text("location", location)?,
        days_in_month,
        working_days,
        arrear_days,
        lop,
        bank_name: text("bankName", bank_name)?,
        account_no,
        pan,
        provident_fund,
        esic,
        uan,
        earnings,
        deductions,
    })
}

fn required<'a>(field: &str, value: &'a Option<Value>) -> Result<&'a Value, PayslipError> {
    value
        .as_ref()
        .ok_or_else(|| PayslipError::validation(format!("Missing required field: {field}")))
}

fn matching(value: &Value, pattern: &Regex, message: &str) -> Result<String, PayslipError> {
    value
        .as_str()
        .filter(|s| pattern.is_match(s))
        .map(str::to_string)
        .ok_or_else(|| PayslipError::validation(message))
}

fn non_empty_array<'a>(value: &'a Value, message: &str) -> Result<&'a Vec<Value>, PayslipError> {
    value
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or_else(|| PayslipError::validation(message))
}

fn non_negative(field: &str, value: &Value) -> Result<f64, PayslipError> {
    as_number(value).filter(|n| *n >= 0.0).ok_or_else(|| {
        PayslipError::validation(format!("Invalid {field} (must be a non-negative number)"))
    })
}

/// Free-text columns take strings as-is; scalars are stored in their JSON spelling.
fn text(field: &str, value: &Value) -> Result<String, PayslipError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(PayslipError::validation(format!("Invalid {field} (must be text)"))),
    }
}

/// Reads a JSON number or a numeric string.
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn line_item(value: &Value, accept: impl Fn(f64) -> bool) -> Option<LineItem> {
    let component = value
        .get("component")?
        .as_str()
        .filter(|c| !c.is_empty())?;
    let amount = value.get("amount").and_then(as_number).filter(|a| accept(*a))?;

    Some(LineItem {
        component: component.to_string(),
        amount,
    })
}
