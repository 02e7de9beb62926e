//! Read-only detail dialog for one overtime policy.

use eframe::egui::{self, Grid, ScrollArea, Ui};

use super::app::App;
use super::components::section_header;
use crate::form::{FieldValue, PolicyField};
use crate::models::{OvertimePolicyApplication, ReferenceData};

/// Show the detail dialog.
pub fn show(app: &mut App, ctx: &egui::Context) {
    let mut open = true;
    let mut close = false;
    let mut edit = None;

    egui::Window::new("OT Policy Details")
        .collapsible(false)
        .resizable(true)
        .default_width(520.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            match &app.detail {
                Some(record) => {
                    ScrollArea::vertical().max_height(520.0).show(ui, |ui| {
                        show_record(ui, record, &app.config.reference);
                    });
                }
                None => {
                    ui.label("This policy no longer exists.");
                }
            }

            ui.add_space(10.0);
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Close").clicked() {
                    close = true;
                }
                if let Some(record) = &app.detail
                    && ui.button("Edit").clicked()
                {
                    edit = Some(record.clone());
                }
            });
        });

    if !open || close {
        app.close_detail();
    } else if let Some(record) = edit {
        app.close_detail();
        app.open_edit_form(record);
    }
}

fn show_record(ui: &mut Ui, record: &OvertimePolicyApplication, reference: &ReferenceData) {
    section_header(ui, "Scope");
    Grid::new("detail_scope").num_columns(2).spacing([20.0, 6.0]).show(ui, |ui| {
        let none = "-".to_string();

        ui.label("Organization / Tenant:");
        ui.label(format!("{} / {}", record.organization_code, record.tenant_code));
        ui.end_row();

        ui.label("Subsidiary:");
        ui.label(record.subsidiary.as_ref().map(|r| r.label()).unwrap_or_else(|| none.clone()));
        ui.end_row();

        ui.label("Location:");
        ui.label(record.location.as_ref().map(|r| r.label()).unwrap_or_else(|| none.clone()));
        ui.end_row();

        ui.label("Employee Categories:");
        let names: Vec<&str> = record
            .employee_category
            .iter()
            .map(|code| reference.category_name(code))
            .collect();
        ui.label(names.join(", "));
        ui.end_row();
    });

    section_header(ui, "Policy");
    Grid::new("detail_policy").num_columns(2).striped(true).spacing([20.0, 6.0]).show(ui, |ui| {
        for field in PolicyField::ALL {
            ui.label(format!("{}:", field.label()));
            match field.get(&record.ot_policy) {
                FieldValue::Text(text) => ui.label(text),
                FieldValue::Number(number) => ui.label(number.to_string()),
                FieldValue::Checked(checked) => ui.label(if checked { "Yes" } else { "No" }),
                _ => ui.label("-"),
            };
            ui.end_row();
        }
    });

    section_header(ui, "Rounding Rules");
    let rules = record.ot_policy.rounding();
    if rules.is_empty() {
        ui.weak("No rounding rules");
        return;
    }
    Grid::new("detail_rounding").num_columns(3).striped(true).spacing([20.0, 6.0]).show(ui, |ui| {
        ui.strong("From");
        ui.strong("To");
        ui.strong("Round Off To");
        ui.end_row();

        for rule in rules {
            ui.label(rule.from().to_string());
            ui.label(rule.to().to_string());
            ui.label(rule.round_off_to().to_string());
            ui.end_row();
        }
    });
}
