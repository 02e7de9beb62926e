//! Add/edit dialog for one overtime policy.

use eframe::egui::{self, DragValue, Grid, ScrollArea, Ui};
use egui_phosphor::regular::{FLOPPY_DISK, PLUS, TRASH};
use tracing::{debug, warn};

use super::app::App;
use super::components::{
    colors, danger_action_button, field_error, primary_button_with_icon, section_header, styled_button,
    styled_button_with_icon,
};
use crate::form::{FieldKind, FieldPath, FieldValue, PolicyField, PolicyForm, RootField};
use crate::models::{LimitAction, PolicyStatus, Reference, ReferenceData};

const MULTIPLIERS: &[PolicyField] = &[
    PolicyField::WorkingDayMultiplier,
    PolicyField::NationalHolidayMultiplier,
    PolicyField::HolidayMultiplier,
    PolicyField::WeeklyOffMultiplier,
];

const HOUR_LIMITS: &[PolicyField] = &[
    PolicyField::MaxOtHoursPerDay,
    PolicyField::MaxOtHoursPerWeek,
    PolicyField::MaxOtHoursPerMonth,
    PolicyField::MaxOtHoursPerQuarter,
    PolicyField::MaxOtHoursPerYear,
    PolicyField::MaxHolidayOtHours,
    PolicyField::MaxWeekendOtHours,
    PolicyField::MaxWeekdayOtHours,
    PolicyField::DoThisWhenCrossedAllocatedLimit,
];

const THRESHOLDS: &[PolicyField] = &[PolicyField::MinExtraMinutes, PolicyField::MinFixedMinutes];

const ROUNDING_FLAGS: &[PolicyField] = &[
    PolicyField::RoundingEnabled,
    PolicyField::BeforeRoundingOff,
    PolicyField::AfterRoundingOff,
];

const APPLICABILITY: &[PolicyField] = &[
    PolicyField::ApplicableOnWorkingDay,
    PolicyField::ApplicableOnHoliday,
    PolicyField::ApplicableOnNationalHoliday,
    PolicyField::ApplicableOnWeeklyOff,
    PolicyField::ApplicableBeforeShift,
    PolicyField::ApplicableAfterShift,
];

const APPROVAL_AND_STATUS: &[PolicyField] = &[
    PolicyField::ApprovalRequired,
    PolicyField::Status,
    PolicyField::Remark,
];

/// Show the form dialog.
pub fn show(app: &mut App, ctx: &egui::Context) {
    let title = if app.form.is_editing() {
        "Edit OT Policy"
    } else {
        "Add OT Policy"
    };
    let reference = app.config.reference.clone();
    let saving = app.is_saving;

    let mut open = true;
    let mut cancel = false;
    let mut save = false;

    egui::Window::new(title)
        .collapsible(false)
        .resizable(true)
        .default_width(620.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .open(&mut open)
        .show(ctx, |ui| {
            let form = &mut app.form;

            ScrollArea::vertical().max_height(560.0).show(ui, |ui| {
                scope_section(ui, form, &reference);

                let enabled = form.policy_fields_enabled();
                if !enabled {
                    ui.add_space(6.0);
                    ui.weak("Select a subsidiary and location to edit the policy.");
                }

                ui.add_enabled_ui(enabled, |ui| {
                    field_section(ui, form, "Multipliers", MULTIPLIERS);
                    field_section(ui, form, "Hour Limits", HOUR_LIMITS);
                    field_section(ui, form, "Thresholds", THRESHOLDS);
                    rounding_section(ui, form);
                    field_section(ui, form, "Applicability", APPLICABILITY);
                    field_section(ui, form, "Approval & Status", APPROVAL_AND_STATUS);
                });
            });

            ui.add_space(15.0);
            ui.separator();
            ui.add_space(10.0);

            if !form.errors().is_empty() {
                ui.colored_label(colors::ERROR, "Please fix the highlighted fields.");
                ui.add_space(6.0);
            }

            ui.horizontal(|ui| {
                if styled_button(ui, "Cancel").clicked() {
                    cancel = true;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_enabled_ui(!saving, |ui| {
                        if primary_button_with_icon(ui, FLOPPY_DISK, "Save").clicked() {
                            save = true;
                        }
                    });
                    if saving {
                        ui.spinner();
                    }
                });
            });
        });

    if !open || cancel {
        app.close_form();
    } else if save {
        app.submit_form();
    }
}

fn apply(form: &mut PolicyForm, path: FieldPath, value: FieldValue) {
    if let Err(e) = form.set(path, value) {
        warn!("Form input ignored: {}", e);
    }
}

fn scope_section(ui: &mut Ui, form: &mut PolicyForm, reference: &ReferenceData) {
    section_header(ui, "Scope");

    Grid::new("policy_scope_grid")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            let subsidiary = form.record().subsidiary.clone();
            ui.label("Subsidiary:");
            reference_select(ui, form, RootField::Subsidiary, subsidiary, &reference.subsidiaries);
            ui.end_row();

            let location = form.record().location.clone();
            ui.label("Location:");
            reference_select(ui, form, RootField::Location, location, &reference.locations);
            ui.end_row();

            let enabled = form.policy_fields_enabled();

            ui.label("Employee Categories:");
            ui.vertical(|ui| {
                if reference.employee_categories.is_empty() {
                    ui.weak("No employee categories configured");
                }
                ui.add_enabled_ui(enabled, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for category in &reference.employee_categories {
                            let mut checked = form.record().employee_category.contains(&category.code);
                            if ui.checkbox(&mut checked, &category.name).changed() {
                                form.toggle_employee_category(&category.code);
                            }
                        }
                    });
                });
                field_error(ui, form.errors().get(RootField::EmployeeCategory.name()));
            });
            ui.end_row();

            ui.add_enabled_ui(enabled, |ui| {
                ui.label("OT Policy Code:");
            });
            ui.add_enabled_ui(enabled, |ui| field_input(ui, form, PolicyField::OtPolicyCode));
            ui.end_row();

            ui.add_enabled_ui(enabled, |ui| {
                ui.label("OT Policy Name:");
            });
            ui.add_enabled_ui(enabled, |ui| field_input(ui, form, PolicyField::OtPolicyName));
            ui.end_row();
        });
}

fn reference_select(
    ui: &mut Ui,
    form: &mut PolicyForm,
    field: RootField,
    current: Option<Reference>,
    options: &[Reference],
) {
    let mut picked = None;

    ui.vertical(|ui| {
        egui::ComboBox::from_id_salt(field.name())
            .width(280.0)
            .selected_text(current.as_ref().map(Reference::label).unwrap_or_else(|| "Select...".to_string()))
            .show_ui(ui, |ui| {
                for option in options {
                    if ui
                        .selectable_label(current.as_ref() == Some(option), option.label())
                        .clicked()
                    {
                        picked = Some(option.clone());
                    }
                }
            });
        field_error(ui, form.errors().get(field.name()));
    });

    if let Some(option) = picked
        && current.as_ref() != Some(&option)
    {
        apply(form, FieldPath::Root(field), FieldValue::Reference(Some(option)));
    }
}

fn field_section(ui: &mut Ui, form: &mut PolicyForm, title: &str, fields: &[PolicyField]) {
    section_header(ui, title);

    Grid::new(title)
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            for &field in fields {
                ui.label(format!("{}:", field.label()));
                field_input(ui, form, field);
                ui.end_row();
            }
        });
}

/// Input widget for one policy field, chosen by the field's kind.
fn field_input(ui: &mut Ui, form: &mut PolicyForm, field: PolicyField) {
    ui.vertical(|ui| {
        let next = match (field.kind(), field.get(&form.record().ot_policy)) {
            (FieldKind::Text, FieldValue::Text(mut text)) => {
                let width = if field == PolicyField::Remark { 320.0 } else { 220.0 };
                ui.add(egui::TextEdit::singleline(&mut text).desired_width(width))
                    .changed()
                    .then(|| FieldValue::Text(text))
            }
            (FieldKind::Number, FieldValue::Number(mut number)) => ui
                .add(DragValue::new(&mut number).speed(0.1).max_decimals(2))
                .changed()
                .then_some(FieldValue::Number(number)),
            (FieldKind::Flag, FieldValue::Checked(mut checked)) => ui
                .checkbox(&mut checked, "")
                .changed()
                .then_some(FieldValue::Checked(checked)),
            (FieldKind::Limit, FieldValue::Text(current)) => {
                option_select(ui, field, &current, &LimitAction::ALL.map(|a| a.name()))
            }
            (FieldKind::Status, FieldValue::Text(current)) => {
                option_select(ui, field, &current, &PolicyStatus::ALL.map(|s| s.name()))
            }
            _ => None,
        };

        if let Some(value) = next {
            apply(form, FieldPath::Policy(field), value);
        }
        field_error(ui, form.errors().get(field.name()));
    });
}

fn option_select(ui: &mut Ui, field: PolicyField, current: &str, options: &[&'static str]) -> Option<FieldValue> {
    let mut picked = None;
    egui::ComboBox::from_id_salt(field.name())
        .width(150.0)
        .selected_text(current)
        .show_ui(ui, |ui| {
            for &option in options {
                if ui.selectable_label(current == option, option).clicked() && current != option {
                    picked = Some(FieldValue::Text(option.to_string()));
                }
            }
        });
    picked
}

fn rounding_section(ui: &mut Ui, form: &mut PolicyForm) {
    section_header(ui, "Rounding");

    Grid::new("rounding_flags")
        .num_columns(2)
        .spacing([20.0, 8.0])
        .show(ui, |ui| {
            for &field in ROUNDING_FLAGS {
                ui.label(format!("{}:", field.label()));
                field_input(ui, form, field);
                ui.end_row();
            }
        });

    ui.add_space(8.0);

    let mut remove = None;
    if form.record().ot_policy.rounding().is_empty() {
        ui.weak("No rounding rules");
    } else {
        Grid::new("rounding_rules")
            .num_columns(4)
            .striped(true)
            .spacing([20.0, 6.0])
            .show(ui, |ui| {
                ui.strong("From");
                ui.strong("To");
                ui.strong("Round Off To");
                ui.label("");
                ui.end_row();

                for (index, rule) in form.record().ot_policy.rounding().iter().enumerate() {
                    ui.label(rule.from().to_string());
                    ui.label(rule.to().to_string());
                    ui.label(rule.round_off_to().to_string());
                    if danger_action_button(ui, TRASH, "Remove").clicked() {
                        remove = Some(index);
                    }
                    ui.end_row();
                }
            });
    }
    if let Some(index) = remove {
        form.remove_rounding_rule(index);
    }

    ui.add_space(8.0);

    let mut input = form.rounding_input();
    let mut changed = false;
    let mut add = false;

    Grid::new("rounding_input")
        .num_columns(4)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for (label, value, key) in [
                ("From", &mut input.from, "from"),
                ("To", &mut input.to, "to"),
                ("Round Off To", &mut input.round_off_to, "roundOffTo"),
            ] {
                ui.vertical(|ui| {
                    ui.label(label);
                    changed |= ui.add(DragValue::new(value).speed(1.0).max_decimals(2)).changed();
                    field_error(ui, form.errors().get(key));
                });
            }
            ui.vertical(|ui| {
                ui.label("");
                if styled_button_with_icon(ui, PLUS, "Add Rule").clicked() {
                    add = true;
                }
            });
            ui.end_row();
        });

    if changed {
        form.set_rounding_input(input);
    }
    if add && let Err(errors) = form.add_rounding_rule() {
        debug!("Rounding rule rejected: {}", errors);
    }
}
