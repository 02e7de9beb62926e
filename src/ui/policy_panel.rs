//! Overtime policy list with add, edit, delete and detail actions.

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};
use egui_phosphor::regular::{ARROWS_CLOCKWISE, EYE, FILE_XLS, PENCIL, PLUS, TRASH};

use super::app::{App, DeleteTarget};
use super::components::{
    action_button, colors, danger_action_button, panel_header, primary_button_with_icon, styled_button_with_icon,
};
use crate::models::{OvertimePolicyApplication, PolicyStatus};

/// Row action picked while the table borrows the policy list.
enum RowAction {
    Edit(OvertimePolicyApplication),
    Delete(DeleteTarget),
    Detail(i32),
}

/// Show the policy panel.
pub fn show(app: &mut App, ui: &mut Ui) {
    panel_header(ui, "Overtime Policies");

    ui.horizontal(|ui| {
        if primary_button_with_icon(ui, PLUS, "Add Policy").clicked() {
            app.open_new_form();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, ARROWS_CLOCKWISE, "Refresh").clicked() {
            app.load_policies();
        }

        ui.add_space(10.0);

        if styled_button_with_icon(ui, FILE_XLS, "Export to Excel").clicked() {
            app.export_policies();
        }
    });

    ui.add_space(15.0);

    if app.policies.is_empty() {
        ui.label(if app.is_loading {
            "Loading policies..."
        } else {
            "No overtime policies yet"
        });
        return;
    }

    ui.label(format!("{} policies", app.policies.len()));
    ui.add_space(10.0);

    if let Some(action) = show_table(app, ui) {
        match action {
            RowAction::Edit(record) => app.open_edit_form(record),
            RowAction::Delete(target) => {
                app.delete_target = Some(target);
                app.show_delete_confirm = true;
            }
            RowAction::Detail(id) => app.open_detail(id),
        }
    }
}

fn show_table(app: &App, ui: &mut Ui) -> Option<RowAction> {
    let mut action = None;
    let reference = &app.config.reference;

    TableBuilder::new(ui)
        .id_salt("policy_table")
        .striped(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder().at_least(140.0).clip(true))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder().at_least(120.0).clip(true))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(90.0))
        .header(24.0, |mut header| {
            for title in ["Code", "Name", "Subsidiary", "Location", "Categories", "Status", "Actions"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for policy in &app.policies {
                let Some(id) = policy.id else {
                    continue;
                };

                body.row(26.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&policy.ot_policy.ot_policy_code);
                    });
                    row.col(|ui| {
                        ui.label(&policy.ot_policy.ot_policy_name);
                    });
                    row.col(|ui| {
                        ui.label(policy.subsidiary.as_ref().map(|r| r.name.as_str()).unwrap_or("-"));
                    });
                    row.col(|ui| {
                        ui.label(policy.location.as_ref().map(|r| r.name.as_str()).unwrap_or("-"));
                    });
                    row.col(|ui| {
                        let names: Vec<&str> = policy
                            .employee_category
                            .iter()
                            .map(|code| reference.category_name(code))
                            .collect();
                        ui.label(names.join(", "));
                    });
                    row.col(|ui| {
                        let color = match policy.ot_policy.status {
                            PolicyStatus::Active => colors::SUCCESS,
                            PolicyStatus::Inactive => colors::NEUTRAL,
                        };
                        ui.colored_label(color, policy.ot_policy.status.name());
                    });
                    row.col(|ui| {
                        if action_button(ui, EYE, "Read More").clicked() {
                            action = Some(RowAction::Detail(id));
                        }
                        if action_button(ui, PENCIL, "Edit").clicked() {
                            action = Some(RowAction::Edit(policy.clone()));
                        }
                        if danger_action_button(ui, TRASH, "Delete").clicked() {
                            action = Some(RowAction::Delete(DeleteTarget {
                                id,
                                label: format!(
                                    "{} - {}",
                                    policy.ot_policy.ot_policy_code, policy.ot_policy.ot_policy_name
                                ),
                            }));
                        }
                    });
                });
            }
        });

    action
}
