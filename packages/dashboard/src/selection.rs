//! Selection validation and resolution.

use community_safety_crime_models::{CrimeCategory, DataYear};
use community_safety_dashboard_models::{MAX_SELECTED_AREAS, Selection, SelectionRequest};

use crate::DashboardError;

/// Rejects selections with more than two areas.
///
/// Zero or one area is valid; visuals that need a second area degrade on
/// their own.
///
/// # Errors
///
/// Returns [`DashboardError::TooManyAreas`] if more than
/// [`MAX_SELECTED_AREAS`] names are supplied.
pub fn validate_selection<S: AsRef<str>>(areas: &[S]) -> Result<(), DashboardError> {
    if areas.len() > MAX_SELECTED_AREAS {
        return Err(DashboardError::TooManyAreas { count: areas.len() });
    }
    Ok(())
}

/// Validates a raw request and fills the explicit area slots.
///
/// Every supplied area name counts toward the limit, blank ones included;
/// blank names are then left out of the slots. A year outside the observed
/// range becomes `None`. Unknown comparison categories are
/// skipped.
///
/// # Errors
///
/// Returns [`DashboardError::TooManyAreas`] if more than two areas remain.
pub fn resolve_selection(request: &SelectionRequest) -> Result<Selection, DashboardError> {
    validate_selection(&request.areas)?;

    let areas: Vec<&str> = request
        .areas
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();

    let year = request
        .year
        .as_deref()
        .map(str::trim)
        .filter(|y| !y.is_empty())
        .and_then(|y| match y.parse::<DataYear>() {
            Ok(year) => Some(year),
            Err(_) => {
                log::debug!("Ignoring unknown year '{y}'");
                None
            }
        });

    let mut compare = Vec::new();
    for raw in &request.compare {
        match raw.trim().parse::<CrimeCategory>() {
            Ok(category) if !compare.contains(&category) => compare.push(category),
            Ok(_) => {}
            Err(_) => log::debug!("Ignoring unknown comparison category '{raw}'"),
        }
    }

    Ok(Selection {
        primary: areas.first().map(ToString::to_string),
        secondary: areas.get(1).map(ToString::to_string),
        year,
        crime_type: request
            .crime_type
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string),
        compare,
    })
}

/// Resolves the single-select crime type. Empty or unknown falls back to
/// [`CrimeCategory::Theft`].
#[must_use]
pub fn resolve_category(crime_type: Option<&str>) -> CrimeCategory {
    crime_type
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| c.parse().ok())
        .unwrap_or_else(CrimeCategory::fallback)
}
