//! Interactive terminal form: contract type selector and one input per field

use chrono::NaiveDate;
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::core::TemplateRegistry;
use crate::error::DraftError;
use crate::models::{ContractTypeDefinition, FieldDefinition, FieldKind, FieldValue, DATE_FORMAT};

/// Ask the user which contract type to draft
pub fn select_contract_type(
    registry: &TemplateRegistry,
) -> Result<&ContractTypeDefinition, DraftError> {
    let items = registry.ids();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select Contract Type")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| DraftError::Input(e.to_string()))?;

    Ok(&registry.definitions()[selection])
}

/// Ask for one field, pre-filled with its default (today for dates).
///
/// An empty answer leaves the field unset.
pub fn ask_field(field: &FieldDefinition, today: NaiveDate) -> Result<Option<FieldValue>, DraftError> {
    let theme = ColorfulTheme::default();

    if field.kind == FieldKind::Choice {
        let default = field
            .default
            .as_deref()
            .and_then(|d| field.options.iter().position(|o| o.eq_ignore_ascii_case(d)))
            .unwrap_or(0);
        let selection = Select::with_theme(&theme)
            .with_prompt(&field.label)
            .items(&field.options)
            .default(default)
            .interact()
            .map_err(|e| DraftError::Input(e.to_string()))?;
        return Ok(Some(FieldValue::Text(field.options[selection].clone())));
    }

    let default = match (&field.default, field.kind) {
        (Some(d), _) => Some(d.clone()),
        (None, FieldKind::Date) => Some(today.format(DATE_FORMAT).to_string()),
        (None, _) => None,
    };

    let prompt = match field.kind {
        FieldKind::Date => format!("{} (YYYY-MM-DD)", field.label),
        _ => field.label.clone(),
    };

    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .validate_with(|answer: &String| -> Result<(), String> {
            if answer.trim().is_empty() {
                return Ok(());
            }
            field.parse_value(answer).map(|_| ()).map_err(|e| e.to_string())
        });
    if let Some(d) = default {
        input = input.default(d);
    }

    let answer = input
        .interact_text()
        .map_err(|e| DraftError::Input(e.to_string()))?;

    if answer.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(field.parse_value(&answer)?))
}
