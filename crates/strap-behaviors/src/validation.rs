//! Form constraint checking on submit.
//!
//! The check itself is pluggable through [`ConstraintValidator`]; the
//! behavior only marks the form and decides what happens to the native
//! submit event.

use strap_core::dom::{Document, ElementId};
use strap_core::EventOutcome;

/// Class added to a form after its first validation attempt.
pub const WAS_VALIDATED: &str = "was-validated";

/// Decides whether a form's fields satisfy their constraints.
pub trait ConstraintValidator: Send + Sync {
    fn check(&self, doc: &Document, form: ElementId) -> bool;
}

impl<F> ConstraintValidator for F
where
    F: Fn(&Document, ElementId) -> bool + Send + Sync,
{
    fn check(&self, doc: &Document, form: ElementId) -> bool {
        self(doc, form)
    }
}

/// Attribute-based checks: `required` and `minlength` on enabled fields.
///
/// Text-like fields need a non-empty `value` at least `minlength`
/// characters long. A required checkbox must be `checked`; a required
/// radio needs some radio of the same name in the form to be checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFields;

impl ConstraintValidator for RequiredFields {
    fn check(&self, doc: &Document, form: ElementId) -> bool {
        fields(doc, form).all(|field| field_ok(doc, form, field))
    }
}

fn fields(doc: &Document, form: ElementId) -> impl Iterator<Item = ElementId> + '_ {
    doc.descendants(form).into_iter().filter(move |&el| {
        matches!(doc.tag(el), Some("input" | "select" | "textarea"))
            && !doc.has_attribute(el, "disabled")
    })
}

fn field_ok(doc: &Document, form: ElementId, field: ElementId) -> bool {
    let value = doc.attribute(field, "value").unwrap_or("");
    if let Some(min) = doc
        .attribute(field, "minlength")
        .and_then(|m| m.trim().parse::<usize>().ok())
    {
        // An empty optional field is not too short.
        if !value.is_empty() && value.chars().count() < min {
            return false;
        }
    }
    if !doc.has_attribute(field, "required") {
        return true;
    }
    match doc.attribute(field, "type") {
        Some("checkbox") => doc.has_attribute(field, "checked"),
        Some("radio") => {
            let name = doc.attribute(field, "name");
            fields(doc, form).any(|other| {
                doc.attribute(other, "type") == Some("radio")
                    && doc.attribute(other, "name") == name
                    && doc.has_attribute(other, "checked")
            })
        }
        _ => !value.is_empty(),
    }
}

/// Validate `form` on submit.
///
/// The form always gains [`WAS_VALIDATED`]. An invalid form blocks the
/// submission and stops the event.
pub fn validate(doc: &mut Document, form: ElementId, validator: &dyn ConstraintValidator) -> EventOutcome {
    let valid = validator.check(doc, form);
    doc.add_class(form, WAS_VALIDATED);
    let mut outcome = EventOutcome::default();
    if !valid {
        outcome.prevent_default();
        outcome.stop_propagation();
    }
    tracing::debug!(form = form.to_bits(), valid, "form validated");
    outcome
}
