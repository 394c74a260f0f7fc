use crate::traits::MealPlanError;

const MIN_DIGITS: usize = 8;
const MAX_DIGITS: usize = 15;

/// Normalizes a messaging address to the digits-only form used as the customer key.
///
/// Spaces, dashes, dots and parentheses are dropped, along with a single leading `+`. What is left must be 8 to 15
/// digits (E.164 without the plus), otherwise a [`MealPlanError::ValidationError`] is returned.
///
/// ```rust
/// # use meal_plan_engine::helpers::normalize_whatsapp_number;
/// assert_eq!(normalize_whatsapp_number("+91 98765-43210").unwrap(), "919876543210");
/// assert!(normalize_whatsapp_number("12 34").is_err());
/// ```
pub fn normalize_whatsapp_number(raw: &str) -> Result<String, MealPlanError> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = trimmed.chars().filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')')).collect::<String>();
    if digits.is_empty() {
        return Err(MealPlanError::ValidationError("A WhatsApp number is required".into()));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) || !(MIN_DIGITS..=MAX_DIGITS).contains(&digits.len()) {
        return Err(MealPlanError::ValidationError(format!(
            "{raw} is not a valid WhatsApp number. Use the international format with {MIN_DIGITS} to {MAX_DIGITS} \
             digits"
        )));
    }
    Ok(digits)
}
