//! Submit and delete flows tying the form, validator and store together.

use tracing::{info, warn};

use crate::error::{FieldErrors, Result};
use crate::form::{PolicyForm, validate};
use crate::models::OvertimePolicyApplication;
use crate::store::PolicyStore;

#[cfg(test)]
mod tests;

/// Outcome of a form submission.
#[derive(Debug)]
pub enum Submission {
    /// Validation failed; the store was not touched.
    Rejected(FieldErrors),
    /// Saved; the refreshed record list.
    Saved(Vec<OvertimePolicyApplication>),
}

/// Validate the form. Errors are recorded on the form and returned; otherwise the
/// record to save is returned.
pub fn prepare(form: &mut PolicyForm) -> std::result::Result<OvertimePolicyApplication, FieldErrors> {
    let errors = validate(form.record());
    if !errors.is_empty() {
        warn!("Policy form rejected: {}", errors);
        form.set_errors(errors.clone());
        return Err(errors);
    }

    form.set_errors(FieldErrors::default());
    Ok(form.record().clone())
}

/// Save a validated record and reload the full list.
pub async fn save_and_reload(
    store: &PolicyStore,
    record: OvertimePolicyApplication,
) -> Result<Vec<OvertimePolicyApplication>> {
    store.save(record).await?;
    store.list_all().await
}

/// Validate, then save and reload.
pub async fn submit(store: &PolicyStore, form: &mut PolicyForm) -> Result<Submission> {
    match prepare(form) {
        Err(errors) => Ok(Submission::Rejected(errors)),
        Ok(record) => Ok(Submission::Saved(save_and_reload(store, record).await?)),
    }
}

/// Delete one record and reload the full list.
pub async fn remove(store: &PolicyStore, id: i32) -> Result<Vec<OvertimePolicyApplication>> {
    if !store.delete(id).await? {
        info!("Overtime policy {} was already gone", id);
    }
    store.list_all().await
}
