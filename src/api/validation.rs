use super::ApiError;

pub fn validate_username(name: &str) -> Result<&str, ApiError> {
    if name.is_empty() {
        return Err(ApiError::validation("Username cannot be empty"));
    }

    if name.len() > 150 {
        return Err(ApiError::validation(
            "Username must be 150 characters or less",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '_' || c == '-')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, underscores, and hyphens",
        ));
    }

    Ok(name)
}

pub fn validate_password(password: &str) -> Result<&str, ApiError> {
    if password.len() < 8 {
        return Err(ApiError::validation(
            "Password must be at least 8 characters",
        ));
    }
    Ok(password)
}

pub fn validate_cell_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid cell ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_card_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid card ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}
