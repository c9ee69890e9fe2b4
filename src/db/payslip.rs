use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, instrument};

use crate::error::PayslipError;
use crate::model::payslip::{LineItem, PayslipRow, PayslipSubmission, PayslipView};
use crate::utils::duration::calculate_duration;

const UPSERT_PAYSLIP: &str = r#"
    INSERT INTO payslips (
        employee_id, employee_name, employee_type, designation, month, month_name, year,
        date_joining, location, days_in_month, working_days, arrear_days, lop,
        bank_name, account_no, pan, provident_fund, esic, uan,
        gross_pay, total_deductions, net_pay, duration
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23)
    ON CONFLICT (employee_id, month, year) DO UPDATE SET
        employee_name = EXCLUDED.employee_name,
        employee_type = EXCLUDED.employee_type,
        designation = EXCLUDED.designation,
        month_name = EXCLUDED.month_name,
        date_joining = EXCLUDED.date_joining,
        location = EXCLUDED.location,
        days_in_month = EXCLUDED.days_in_month,
        working_days = EXCLUDED.working_days,
        arrear_days = EXCLUDED.arrear_days,
        lop = EXCLUDED.lop,
        bank_name = EXCLUDED.bank_name,
        account_no = EXCLUDED.account_no,
        pan = EXCLUDED.pan,
        provident_fund = EXCLUDED.provident_fund,
        esic = EXCLUDED.esic,
        uan = EXCLUDED.uan,
        gross_pay = EXCLUDED.gross_pay,
        total_deductions = EXCLUDED.total_deductions,
        net_pay = EXCLUDED.net_pay,
        duration = EXCLUDED.duration,
        updated_at = CURRENT_TIMESTAMP
    RETURNING id
"#;

const SELECT_PAYSLIP: &str = r#"
    SELECT id, employee_id, employee_name, employee_type, designation, month, month_name, year,
           date_joining, location, days_in_month, working_days, arrear_days, lop,
           bank_name, account_no, pan, provident_fund, esic, uan,
           gross_pay, total_deductions, net_pay, duration
    FROM payslips
    WHERE employee_id = $1 AND month = $2 AND year = $3
"#;

/// Earnings and deductions share a shape but live in separate tables.
#[derive(Debug, Clone, Copy)]
enum LineItemTable {
    Earnings,
    Deductions,
}

impl LineItemTable {
    fn delete_sql(self) -> &'static str {
        match self {
            LineItemTable::Earnings => "DELETE FROM earnings WHERE payslip_id = $1",
            LineItemTable::Deductions => "DELETE FROM deductions WHERE payslip_id = $1",
        }
    }

    // UNNEST keeps the submitted order, so ids follow it.
    fn insert_sql(self) -> &'static str {
        match self {
            LineItemTable::Earnings => {
                "INSERT INTO earnings (payslip_id, component, amount) \
                 SELECT $1, component, amount FROM UNNEST($2::text[], $3::float8[]) AS t(component, amount)"
            }
            LineItemTable::Deductions => {
                "INSERT INTO deductions (payslip_id, component, amount) \
                 SELECT $1, component, amount FROM UNNEST($2::text[], $3::float8[]) AS t(component, amount)"
            }
        }
    }

    fn select_sql(self) -> &'static str {
        match self {
            LineItemTable::Earnings => {
                "SELECT component, amount FROM earnings WHERE payslip_id = $1 ORDER BY id"
            }
            LineItemTable::Deductions => {
                "SELECT component, amount FROM deductions WHERE payslip_id = $1 ORDER BY id"
            }
        }
    }
}

/// Creates or overwrites the payslip for `(employee_id, month, year)` and returns its id.
///
/// The header is written with a single `INSERT ... ON CONFLICT DO UPDATE`, so concurrent
/// submissions for the same key cannot both insert. Line items are replaced wholesale.
/// Everything happens in one transaction; an error drops it, which rolls it back.
#[instrument(
    skip(pool, submission),
    fields(
        employee_id = %submission.employee_id,
        month = %submission.month,
        year = %submission.year
    )
)]
pub async fn submit_payslip(
    pool: &PgPool,
    submission: &PayslipSubmission,
) -> Result<i64, PayslipError> {
    let totals = submission.totals();
    let duration = calculate_duration(&submission.date_joining, &submission.year, &submission.month);

    let mut tx = pool.begin().await?;

    let payslip_id: i64 = sqlx::query_scalar(UPSERT_PAYSLIP)
        .bind(&submission.employee_id)
        .bind(&submission.employee_name)
        .bind(submission.employee_type.as_str())
        .bind(&submission.designation)
        .bind(&submission.month)
        .bind(&submission.month_name)
        .bind(&submission.year)
        .bind(&submission.date_joining)
        .bind(&submission.location)
        .bind(submission.days_in_month)
        .bind(submission.working_days)
        .bind(submission.arrear_days)
        .bind(submission.lop)
        .bind(&submission.bank_name)
        .bind(&submission.account_no)
        .bind(&submission.pan)
        .bind(&submission.provident_fund)
        .bind(&submission.esic)
        .bind(&submission.uan)
        .bind(totals.gross_pay)
        .bind(totals.total_deductions)
        .bind(totals.net_pay)
        .bind(&duration)
        .fetch_one(&mut *tx)
        .await?;

    debug!(payslip_id, "Payslip header upserted");

    replace_line_items(&mut tx, LineItemTable::Earnings, payslip_id, &submission.earnings).await?;
    replace_line_items(&mut tx, LineItemTable::Deductions, payslip_id, &submission.deductions)
        .await?;

    tx.commit().await?;

    info!(
        payslip_id,
        gross_pay = totals.gross_pay,
        net_pay = totals.net_pay,
        "Payslip stored"
    );

    Ok(payslip_id)
}

async fn replace_line_items(
    tx: &mut Transaction<'_, Postgres>,
    table: LineItemTable,
    payslip_id: i64,
    items: &[LineItem],
) -> Result<(), PayslipError> {
    let removed = sqlx::query(table.delete_sql())
        .bind(payslip_id)
        .execute(&mut **tx)
        .await?
        .rows_affected();

    let (components, amounts): (Vec<String>, Vec<f64>) = items
        .iter()
        .map(|item| (item.component.clone(), item.amount))
        .unzip();

    sqlx::query(table.insert_sql())
        .bind(payslip_id)
        .bind(components)
        .bind(amounts)
        .execute(&mut **tx)
        .await?;

    debug!(?table, removed, inserted = items.len(), "Line items replaced");

    Ok(())
}

/// Loads a payslip with its line items, or `None` when no record matches the key.
#[instrument(skip(pool))]
pub async fn fetch_payslip(
    pool: &PgPool,
    employee_id: &str,
    month: &str,
    year: &str,
) -> Result<Option<PayslipView>, PayslipError> {
    let Some(row) = sqlx::query_as::<_, PayslipRow>(SELECT_PAYSLIP)
        .bind(employee_id)
        .bind(month)
        .bind(year)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };

    let earnings = fetch_line_items(pool, LineItemTable::Earnings, row.id).await?;
    let deductions = fetch_line_items(pool, LineItemTable::Deductions, row.id).await?;

    Ok(Some(PayslipView::from_parts(row, earnings, deductions)))
}

async fn fetch_line_items(
    pool: &PgPool,
    table: LineItemTable,
    payslip_id: i64,
) -> Result<Vec<LineItem>, PayslipError> {
    let items = sqlx::query_as::<_, LineItem>(table.select_sql())
        .bind(payslip_id)
        .fetch_all(pool)
        .await?;

    Ok(items)
}
