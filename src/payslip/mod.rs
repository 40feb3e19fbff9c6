//! PDF payslip rendering.
//!
//! A payslip is a single A4 page drawn with the built-in Helvetica fonts:
//! a company header, the employee's details, the earnings and deductions
//! tables, net pay and, when available, the month's attendance.
//!
//! Content streams are left uncompressed.

mod canvas;

use pdf_writer::{Finish, Name, Pdf, Rect, Ref};
use rust_decimal::Decimal;

use crate::config::PayslipSettings;
use crate::models::{AttendanceSummary, Employee, PayComponent, PayrollRecord};
use crate::payroll::round_currency;

use canvas::{BOLD, Canvas, REGULAR, Weight};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const LEFT: f32 = 50.0;
const RIGHT: f32 = PAGE_WIDTH - 50.0;
const VALUE_COLUMN: f32 = 160.0;
const SECOND_LABEL_COLUMN: f32 = 320.0;
const SECOND_VALUE_COLUMN: f32 = 420.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const LINE: f32 = 16.0;

/// Formats an amount with two decimals and thousands separators.
///
/// ```
/// use hr_system::payslip::format_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_amount(Decimal::new(123456789, 2)), "1,234,567.89");
/// assert_eq!(format_amount(Decimal::new(5, 0)), "5.00");
/// ```
pub fn format_amount(amount: Decimal) -> String {
    let mut value = round_currency(amount);
    value.rescale(2);
    let text = value.abs().to_string();
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < Decimal::ZERO { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

/// Renders a payroll record as a one-page PDF.
///
/// `attendance` adds an attendance section for the payroll month.
pub fn render_payslip(
    record: &PayrollRecord,
    employee: &Employee,
    attendance: Option<&AttendanceSummary>,
    settings: &PayslipSettings,
) -> Vec<u8> {
    let mut canvas = Canvas::new(PAGE_HEIGHT - 60.0);
    let period = format!("{} {}", record.month, record.year);

    canvas.text(LEFT, &settings.company_name, TITLE_SIZE, Weight::Bold);
    canvas.advance(22.0);
    canvas.text(LEFT, &format!("Payslip for {}", period), HEADING_SIZE, Weight::Regular);
    canvas.rule(LEFT, RIGHT);
    canvas.advance(30.0);

    let details = [
        ("Employee ID", record.emp_id.to_string(), "Pay Period", period.clone()),
        (
            "Name",
            employee.name.clone(),
            "Generated On",
            record.generated_on.format("%d %b %Y").to_string(),
        ),
        (
            "Department",
            or_dash(&employee.department),
            "Payroll ID",
            record.payroll_id.to_string(),
        ),
        (
            "Designation",
            or_dash(&employee.designation),
            "Currency",
            settings.currency.clone(),
        ),
    ];
    for (label, value, second_label, second_value) in &details {
        canvas.text(LEFT, label, BODY_SIZE, Weight::Bold);
        canvas.text(VALUE_COLUMN, value, BODY_SIZE, Weight::Regular);
        canvas.text(SECOND_LABEL_COLUMN, second_label, BODY_SIZE, Weight::Bold);
        canvas.text(SECOND_VALUE_COLUMN, second_value, BODY_SIZE, Weight::Regular);
        canvas.advance(LINE);
    }
    canvas.advance(LINE);

    let amount_heading = format!("Amount ({})", settings.currency);
    component_table(
        &mut canvas,
        "Earnings",
        &amount_heading,
        record.earnings(),
        ("Gross Earnings", record.totals.gross()),
    );
    canvas.advance(LINE);
    component_table(
        &mut canvas,
        "Deductions",
        &amount_heading,
        record.deductions(),
        ("Total Deductions", record.totals.deductions),
    );
    canvas.advance(LINE * 1.5);

    canvas.text(LEFT, "Net Pay", 14.0, Weight::Bold);
    canvas.text_right(
        RIGHT,
        &format!("{} {}", settings.currency, format_amount(record.totals.net_pay)),
        14.0,
        Weight::Bold,
    );
    canvas.rule(LEFT, RIGHT);
    canvas.advance(LINE * 2.0);

    if let Some(summary) = attendance {
        canvas.text(LEFT, "Attendance", HEADING_SIZE, Weight::Bold);
        canvas.rule(LEFT, RIGHT);
        canvas.advance(LINE + 4.0);
        for (label, days) in [
            ("Present", summary.present),
            ("Absent", summary.absent),
            ("Half Day", summary.half_day),
            ("Leave", summary.leave),
        ] {
            canvas.text(LEFT, label, BODY_SIZE, Weight::Regular);
            canvas.text_right(RIGHT, &days.to_string(), BODY_SIZE, Weight::Regular);
            canvas.advance(LINE);
        }
    }

    // Footer sits at a fixed position unless the body ran into it.
    let footer = canvas.y().min(60.0);
    canvas.advance(canvas.y() - footer);
    canvas.text(
        LEFT,
        "This is a computer-generated payslip and does not require a signature.",
        8.0,
        Weight::Regular,
    );

    write_document(canvas.finish())
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn component_table<'a>(
    canvas: &mut Canvas,
    heading: &str,
    amount_heading: &str,
    components: impl Iterator<Item = &'a PayComponent>,
    total: (&str, Decimal),
) {
    canvas.text(LEFT, heading, HEADING_SIZE, Weight::Bold);
    canvas.text_right(RIGHT, amount_heading, BODY_SIZE, Weight::Bold);
    canvas.rule(LEFT, RIGHT);
    canvas.advance(LINE + 4.0);

    let mut rows = 0;
    for component in components {
        canvas.text(LEFT, &component.description, BODY_SIZE, Weight::Regular);
        canvas.text_right(RIGHT, &format_amount(component.amount), BODY_SIZE, Weight::Regular);
        canvas.advance(LINE);
        rows += 1;
    }
    if rows == 0 {
        canvas.text(LEFT, "None", BODY_SIZE, Weight::Regular);
        canvas.advance(LINE);
    }

    canvas.text(LEFT, total.0, BODY_SIZE, Weight::Bold);
    canvas.text_right(RIGHT, &format_amount(total.1), BODY_SIZE, Weight::Bold);
    canvas.advance(LINE);
}

fn write_document(content: Vec<u8>) -> Vec<u8> {
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let regular_id = Ref::new(4);
    let bold_id = Ref::new(5);
    let content_id = Ref::new(6);

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources()
        .fonts()
        .pair(REGULAR, regular_id)
        .pair(BOLD, bold_id);
    page.finish();

    pdf.type1_font(regular_id).base_font(Name(b"Helvetica"));
    pdf.type1_font(bold_id).base_font(Name(b"Helvetica-Bold"));
    pdf.stream(content_id, &content);
    pdf.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComponentKind;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn component(kind: ComponentKind, code: &str, description: &str, amount: &str) -> PayComponent {
        PayComponent {
            kind,
            code: code.to_string(),
            description: description.to_string(),
            amount: dec(amount),
        }
    }

    fn sample() -> (PayrollRecord, Employee) {
        let employee = Employee {
            emp_id: 7,
            name: "Meera Iyer".to_string(),
            department: "Engineering".to_string(),
            designation: String::new(),
            basic_salary: dec("31000"),
        };
        let record = PayrollRecord {
            payroll_id: 3,
            emp_id: 7,
            month: "March".to_string(),
            year: 2025,
            totals: crate::models::PayrollTotals {
                basic: dec("31000.00"),
                hra: dec("6200.00"),
                allowances: dec("1000.00"),
                deductions: dec("1500.00"),
                net_pay: dec("36700.00"),
            },
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            components: vec![
                component(ComponentKind::Earning, "basic", "Basic salary", "31000.00"),
                component(ComponentKind::Earning, "hra", "House rent allowance (20% of basic)", "6200.00"),
                component(ComponentKind::Earning, "allowances", "Allowances", "1000.00"),
                component(ComponentKind::Deduction, "unpaid_leave", "Unpaid leave (1 day)", "1000.00"),
                component(ComponentKind::Deduction, "other_deductions", "Other deductions", "500.00"),
            ],
        };
        (record, employee)
    }

    fn render(attendance: Option<&AttendanceSummary>) -> String {
        let (record, employee) = sample();
        let bytes = render_payslip(&record, &employee, attendance, &PayslipSettings::default());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[test]
    fn test_payslip_is_a_pdf_with_key_fields() {
        let pdf = render(None);
        assert!(pdf.starts_with("%PDF-"));
        assert!(pdf.contains("(Meera Iyer)"));
        assert!(pdf.contains("(Net Pay)"));
        assert!(pdf.contains("(INR 36,700.00)"));
        assert!(pdf.contains("(Payslip for March 2025)"));
        assert!(pdf.contains("/Helvetica-Bold"));
        assert!(!pdf.contains("(Attendance)"));
    }

    #[test]
    fn test_payslip_lists_components_and_totals() {
        let pdf = render(None);
        assert!(pdf.contains("Unpaid leave"));
        assert!(pdf.contains("(Gross Earnings)"));
        assert!(pdf.contains("(38,200.00)"));
        assert!(pdf.contains("(1,500.00)"));
    }

    #[test]
    fn test_payslip_with_attendance() {
        let summary = AttendanceSummary {
            present: 20,
            absent: 1,
            half_day: 2,
            leave: 1,
        };
        let pdf = render(Some(&summary));
        assert!(pdf.contains("(Attendance)"));
        assert!(pdf.contains("(Half Day)"));
        assert!(pdf.contains("(20)"));
    }

    #[test]
    fn test_blank_fields_render_as_dash_and_non_ascii_replaced() {
        let (record, mut employee) = sample();
        employee.name = "Zoë Müller".to_string();
        let bytes = render_payslip(&record, &employee, None, &PayslipSettings::default());
        let pdf = String::from_utf8_lossy(&bytes);
        assert!(pdf.contains("(Zo? M?ller)"));
        assert!(pdf.contains("(-)"));
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(dec("0")), "0.00");
        assert_eq!(format_amount(dec("999.995")), "1,000.00");
        assert_eq!(format_amount(dec("123456")), "123,456.00");
        assert_eq!(format_amount(dec("-1234.5")), "-1,234.50");
    }
}
