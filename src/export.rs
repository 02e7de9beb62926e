//! Excel export functionality.

use crate::error::Result;
use crate::models::{OvertimePolicyApplication, ReferenceData};
use chrono::Local;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};
use std::path::{Path, PathBuf};

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0x4472C4))
        .set_font_color(Color::White)
        .set_border(FormatBorder::Thin)
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

fn write_headers(worksheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

/// Export overtime policies to an Excel file.
///
/// The first sheet holds one row per policy; the second lists every rounding rule
/// keyed by policy code.
pub fn export_policies_to_excel(
    policies: &[OvertimePolicyApplication],
    reference: &ReferenceData,
    path: &Path,
) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = header_format();
    let number_format = Format::new().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("OT Policies")?;

    let headers = [
        "Policy Code",
        "Policy Name",
        "Subsidiary",
        "Location",
        "Employee Categories",
        "Working Day x",
        "National Holiday x",
        "Holiday x",
        "Weekly Off x",
        "Max/Day",
        "Max/Week",
        "Max/Month",
        "Max/Quarter",
        "Max/Year",
        "Max Holiday",
        "Max Weekend",
        "Max Weekday",
        "Min Extra Min",
        "Min Fixed Min",
        "Rounding",
        "Before Rounding Off",
        "After Rounding Off",
        "Over Limit",
        "On Holiday",
        "On National Holiday",
        "On Weekly Off",
        "On Working Day",
        "Before Shift",
        "After Shift",
        "Approval",
        "Status",
        "Remark",
    ];
    write_headers(worksheet, &headers, &header_format)?;

    worksheet.set_column_width(0, 14)?; // Policy Code
    worksheet.set_column_width(1, 28)?; // Policy Name
    worksheet.set_column_width(2, 28)?; // Subsidiary
    worksheet.set_column_width(3, 24)?; // Location
    worksheet.set_column_width(4, 30)?; // Employee Categories
    worksheet.set_column_width(31, 30)?; // Remark

    for (idx, record) in policies.iter().enumerate() {
        let row = (idx + 1) as u32;
        let policy = &record.ot_policy;

        worksheet.write_string(row, 0, &policy.ot_policy_code)?;
        worksheet.write_string(row, 1, &policy.ot_policy_name)?;
        worksheet.write_string(row, 2, record.subsidiary.as_ref().map(|r| r.label()).unwrap_or_default())?;
        worksheet.write_string(row, 3, record.location.as_ref().map(|r| r.label()).unwrap_or_default())?;

        let categories = record
            .employee_category
            .iter()
            .map(|code| reference.category_name(code))
            .collect::<Vec<_>>()
            .join(", ");
        worksheet.write_string(row, 4, categories)?;

        let numbers = [
            policy.working_day_multiplier,
            policy.national_holiday_multiplier,
            policy.holiday_multiplier,
            policy.weekly_off_multiplier,
            policy.max_ot_hours_per_day,
            policy.max_ot_hours_per_week,
            policy.max_ot_hours_per_month,
            policy.max_ot_hours_per_quarter,
            policy.max_ot_hours_per_year,
            policy.max_holiday_ot_hours,
            policy.max_weekend_ot_hours,
            policy.max_weekday_ot_hours,
            policy.min_extra_minutes,
            policy.min_fixed_minutes,
        ];
        for (offset, value) in numbers.into_iter().enumerate() {
            worksheet.write_number_with_format(row, 5 + offset as u16, value, &number_format)?;
        }

        let rounding_flags = [
            policy.rounding_enabled,
            policy.before_rounding_off,
            policy.after_rounding_off,
        ];
        for (offset, value) in rounding_flags.into_iter().enumerate() {
            worksheet.write_string(row, 19 + offset as u16, yes_no(value))?;
        }
        worksheet.write_string(row, 22, policy.do_this_when_crossed_allocated_limit.name())?;

        let applicability = [
            policy.applicable_on_holiday,
            policy.applicable_on_national_holiday,
            policy.applicable_on_weekly_off,
            policy.applicable_on_working_day,
            policy.applicable_before_shift,
            policy.applicable_after_shift,
        ];
        for (offset, value) in applicability.into_iter().enumerate() {
            worksheet.write_string(row, 23 + offset as u16, yes_no(value))?;
        }

        worksheet.write_string(row, 29, yes_no(policy.approval_required))?;
        worksheet.write_string(row, 30, policy.status.name())?;
        worksheet.write_string(row, 31, &policy.remark)?;
    }

    if !policies.is_empty() {
        worksheet.autofilter(0, 0, policies.len() as u32, headers.len() as u16 - 1)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    // Rounding rules
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Rounding")?;
    write_headers(worksheet, &["Policy Code", "From", "To", "Round Off To"], &header_format)?;
    worksheet.set_column_width(0, 14)?;

    let mut row = 1u32;
    for record in policies {
        for rule in record.ot_policy.rounding() {
            worksheet.write_string(row, 0, &record.ot_policy.ot_policy_code)?;
            worksheet.write_number_with_format(row, 1, rule.from(), &number_format)?;
            worksheet.write_number_with_format(row, 2, rule.to(), &number_format)?;
            worksheet.write_number_with_format(row, 3, rule.round_off_to(), &number_format)?;
            row += 1;
        }
    }
    worksheet.set_freeze_panes(1, 0)?;

    workbook.save(path)?;
    Ok(())
}

/// Open save file dialog and return selected path.
pub fn show_save_dialog(default_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_file_name(default_name)
        .add_filter("Excel Files", &["xlsx"])
        .save_file()
}

/// Generate default filename for export.
pub fn generate_export_filename(prefix: &str) -> String {
    let now = Local::now();
    format!("{prefix}_{ts}.xlsx", ts = now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Reference, RoundingRule};

    #[test]
    fn test_generate_export_filename() {
        let name = generate_export_filename("ot_policies");
        assert!(name.starts_with("ot_policies_"));
        assert!(name.ends_with(".xlsx"));
    }

    #[test]
    fn test_export_writes_file() {
        let mut record = OvertimePolicyApplication::for_tenant("ORG1", "TEN1");
        record.subsidiary = Some(Reference::new("SUB001", "Subsidiary One"));
        record.employee_category.insert("WKM".to_string());
        record.ot_policy.ot_policy_code = "OT1".to_string();
        record.ot_policy.rounding.push(RoundingRule::try_new(1.0, 30.0, 30.0).unwrap());

        let reference = ReferenceData {
            employee_categories: vec![Reference::new("WKM", "Workman")],
            ..Default::default()
        };

        let path = std::env::temp_dir().join(format!("ot-policy-export-{}.xlsx", std::process::id()));
        export_policies_to_excel(&[record], &reference, &path).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_export_with_every_flag_set() {
        let mut record = OvertimePolicyApplication::for_tenant("ORG1", "TEN1");
        let policy = &mut record.ot_policy;
        policy.ot_policy_code = "OT2".to_string();
        policy.max_holiday_ot_hours = 8.0;
        policy.max_weekend_ot_hours = 6.0;
        policy.max_weekday_ot_hours = 2.0;
        policy.before_rounding_off = true;
        policy.after_rounding_off = true;
        policy.applicable_on_holiday = true;
        policy.applicable_after_shift = true;

        let path = std::env::temp_dir().join(format!("ot-policy-export-flags-{}.xlsx", std::process::id()));
        export_policies_to_excel(&[record], &ReferenceData::default(), &path).unwrap();

        assert!(std::fs::metadata(&path).unwrap().len() > 0);
        std::fs::remove_file(&path).ok();
    }
}
