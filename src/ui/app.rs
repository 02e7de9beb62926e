//! Main application UI.

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::export;
use crate::form::PolicyForm;
use crate::models::OvertimePolicyApplication;
use crate::service;
use crate::store::PolicyStore;

use super::components::colors;
use super::{policy_detail, policy_form, policy_panel};

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Data loading
    PoliciesLoaded(Vec<OvertimePolicyApplication>),
    DetailLoaded(i32, Option<OvertimePolicyApplication>),
    LoadError(String),

    // CRUD operations
    PolicySaved(String, Vec<OvertimePolicyApplication>),
    PolicyDeleted(String, Vec<OvertimePolicyApplication>),
    OperationFailed(String),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Policy awaiting delete confirmation.
#[derive(Clone)]
pub struct DeleteTarget {
    pub id: i32,
    pub label: String,
}

/// Main application state.
pub struct App {
    // Runtime and store
    pub rt: tokio::runtime::Runtime,
    pub store: PolicyStore,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Cached data
    pub policies: Vec<OvertimePolicyApplication>,

    // Loading states
    pub is_loading: bool,
    pub is_saving: bool,

    // Form dialog
    pub form: PolicyForm,
    pub form_open: bool,

    // Detail dialog
    pub detail: Option<OvertimePolicyApplication>,
    pub detail_open: bool,

    // Log messages
    pub log_messages: Vec<LogEntry>,
    pub show_log: bool,

    // Configuration
    pub config: AppConfig,

    // Dialogs
    pub show_delete_confirm: bool,
    pub delete_target: Option<DeleteTarget>,
    pub error_message: Option<String>,
    pub success_message: Option<String>,
}

impl App {
    pub fn new(
        store: PolicyStore,
        config: AppConfig,
        rt: tokio::runtime::Runtime,
        startup_error: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let form = PolicyForm::new(OvertimePolicyApplication::for_tenant(
            &config.tenant.organization_code,
            &config.tenant.tenant_code,
        ));

        let mut app = Self {
            rt,
            store,
            tx,
            rx,
            policies: Vec::new(),
            is_loading: false,
            is_saving: false,
            form,
            form_open: false,
            detail: None,
            detail_open: false,
            log_messages: Vec::new(),
            show_log: false,
            config,
            show_delete_confirm: false,
            delete_target: None,
            error_message: None,
            success_message: None,
        };

        if let Some(e) = startup_error {
            app.log_warning(format!("Using default config: {}", e));
            app.error_message = Some(e);
        }

        // Load initial data
        app.load_policies();

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        // Keep only last 100 messages
        if self.log_messages.len() > 100 {
            self.log_messages.remove(0);
        }
    }

    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Blank record scoped to the configured tenant.
    fn tenant_defaults(&self) -> OvertimePolicyApplication {
        OvertimePolicyApplication::for_tenant(
            &self.config.tenant.organization_code,
            &self.config.tenant.tenant_code,
        )
    }

    /// Open the form for a new policy.
    pub fn open_new_form(&mut self) {
        self.form = PolicyForm::new(self.tenant_defaults());
        self.form_open = true;
    }

    /// Open the form pre-filled with a stored policy.
    pub fn open_edit_form(&mut self, record: OvertimePolicyApplication) {
        self.form = PolicyForm::edit(self.tenant_defaults(), record);
        self.form_open = true;
    }

    pub fn close_form(&mut self) {
        self.form_open = false;
        self.form = PolicyForm::new(self.tenant_defaults());
    }

    /// Show the detail dialog and refresh that record from the store.
    pub fn open_detail(&mut self, id: i32) {
        self.detail = self.policies.iter().find(|p| p.id == Some(id)).cloned();
        self.detail_open = true;

        let store = self.store.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match store.get(id).await {
                Ok(record) => {
                    let _ = tx.send(UiMessage::DetailLoaded(id, record));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e.to_string()));
                }
            }
        });
    }

    pub fn close_detail(&mut self) {
        self.detail_open = false;
        self.detail = None;
    }

    /// Load all policies from the store.
    pub fn load_policies(&mut self) {
        self.is_loading = true;
        let store = self.store.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match store.list_all().await {
                Ok(policies) => {
                    let _ = tx.send(UiMessage::PoliciesLoaded(policies));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::LoadError(e.to_string()));
                }
            }
        });
    }

    /// Validate the open form and, if it passes, save it in the background.
    pub fn submit_form(&mut self) {
        let record = match service::prepare(&mut self.form) {
            Ok(record) => record,
            Err(errors) => {
                self.log_warning(format!("Form has {} error(s)", errors.len()));
                return;
            }
        };

        self.is_saving = true;
        let label = record.ot_policy.ot_policy_code.clone();
        let store = self.store.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match service::save_and_reload(&store, record).await {
                Ok(policies) => {
                    let _ = tx.send(UiMessage::PolicySaved(label, policies));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e.to_string()));
                }
            }
        });
    }

    /// Delete a policy in the background.
    pub fn delete_policy(&mut self, target: DeleteTarget) {
        self.log_info(format!("Deleting policy: {}", target.label));
        let store = self.store.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            match service::remove(&store, target.id).await {
                Ok(policies) => {
                    let _ = tx.send(UiMessage::PolicyDeleted(target.label, policies));
                }
                Err(e) => {
                    let _ = tx.send(UiMessage::OperationFailed(e.to_string()));
                }
            }
        });
    }

    /// Export the loaded policies to an Excel file chosen by the user.
    pub fn export_policies(&mut self) {
        if self.policies.is_empty() {
            self.error_message = Some("No policies to export".to_string());
            return;
        }

        let filename = export::generate_export_filename("ot_policies");
        let Some(path) = export::show_save_dialog(&filename) else {
            return;
        };

        match export::export_policies_to_excel(&self.policies, &self.config.reference, &path) {
            Ok(()) => {
                self.success_message = Some(format!("Exported to: {}", path.display()));
                self.log_success(format!("Exported policies: {}", path.display()));
            }
            Err(e) => {
                self.error_message = Some(format!("Export failed: {}", e));
                self.log_error(format!("Export failed: {}", e));
            }
        }
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::PoliciesLoaded(policies) => {
                    self.log_info(format!("Loaded {} policies", policies.len()));
                    self.policies = policies;
                    self.is_loading = false;
                }
                UiMessage::DetailLoaded(id, record) => {
                    // Ignore late replies for a dialog that was closed or switched
                    if self.detail_open && self.detail.as_ref().is_none_or(|d| d.id == Some(id)) {
                        self.detail = record;
                    }
                }
                UiMessage::LoadError(e) => {
                    self.error_message = Some(e.clone());
                    self.log_error(e);
                    self.is_loading = false;
                }
                UiMessage::PolicySaved(code, policies) => {
                    self.is_saving = false;
                    self.policies = policies;
                    self.close_form();
                    self.success_message = Some(format!("Policy '{}' saved", code));
                    self.log_success(format!("Policy saved: {}", code));
                }
                UiMessage::PolicyDeleted(label, policies) => {
                    self.policies = policies;
                    self.success_message = Some("Policy deleted".to_string());
                    self.log_success(format!("Policy deleted: {}", label));
                }
                UiMessage::OperationFailed(e) => {
                    self.is_saving = false;
                    self.error_message = Some(e.clone());
                    self.log_error(e);
                }
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Policy").clicked() {
                        self.open_new_form();
                        ui.close();
                    }
                    if ui.button("Export to Excel").clicked() {
                        self.export_policies();
                        ui.close();
                    }
                });
                ui.menu_button("View", |ui| {
                    if ui.button("Refresh").clicked() {
                        self.load_policies();
                        ui.close();
                    }
                    ui.checkbox(&mut self.show_log, "Activity Log");
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    ui.colored_label(colors::NEUTRAL, format!("Store: {}", self.store.backend_name()));
                    ui.separator();
                    ui.label(format!(
                        "Tenant: {} / {}",
                        self.config.tenant.organization_code, self.config.tenant.tenant_code
                    ));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if self.is_loading || self.is_saving {
                            ui.spinner();
                            ui.label(if self.is_saving { "Saving..." } else { "Loading..." });
                        } else {
                            ui.label(format!("{} policies", self.policies.len()));
                        }
                    });
                });
            });
    }

    /// Render the activity log window.
    fn show_log_window(&mut self, ctx: &egui::Context) {
        if !self.show_log {
            return;
        }

        let mut open = true;
        let mut clear = false;
        egui::Window::new("Activity Log")
            .default_width(500.0)
            .default_height(300.0)
            .open(&mut open)
            .show(ctx, |ui| {
                if ui.button("Clear").clicked() {
                    clear = true;
                }
                ui.separator();
                egui::ScrollArea::vertical().stick_to_bottom(true).show(ui, |ui| {
                    for entry in &self.log_messages {
                        let color = match entry.level {
                            LogLevel::Info => ui.visuals().text_color(),
                            LogLevel::Success => colors::SUCCESS,
                            LogLevel::Warning => colors::WARNING,
                            LogLevel::Error => colors::ERROR,
                        };
                        ui.colored_label(
                            color,
                            format!("[{}] {}", entry.timestamp.format("%H:%M:%S"), entry.message),
                        );
                    }
                });
            });

        if clear {
            self.log_messages.clear();
        }
        if !open {
            self.show_log = false;
        }
    }

    /// Render modal dialogs (error, success, delete confirmation).
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        // Error dialog
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }

        // Success dialog
        if let Some(ref msg) = self.success_message.clone() {
            egui::Window::new("Success")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::SUCCESS, msg);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.success_message = None;
                    }
                });
        }

        // Delete confirmation dialog
        if self.show_delete_confirm
            && let Some(target) = self.delete_target.clone()
        {
            egui::Window::new("Delete Policy")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(format!("Delete policy '{}'?", target.label));
                    ui.add_space(10.0);
                    ui.horizontal(|ui| {
                        if ui.button("Cancel").clicked() {
                            self.show_delete_confirm = false;
                            self.delete_target = None;
                        }
                        if ui.button("Delete").clicked() {
                            self.confirm_delete();
                            self.show_delete_confirm = false;
                        }
                    });
                });
        }
    }

    /// Execute the confirmed delete operation.
    fn confirm_delete(&mut self) {
        if let Some(target) = self.delete_target.take() {
            self.delete_policy(target);
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.is_loading || self.is_saving {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            policy_panel::show(self, ui);
        });

        if self.form_open {
            policy_form::show(self, ctx);
        }
        if self.detail_open {
            policy_detail::show(self, ctx);
        }

        self.show_log_window(ctx);

        // Modal dialogs (error, success, delete confirmation)
        self.show_dialogs(ctx);
    }
}
