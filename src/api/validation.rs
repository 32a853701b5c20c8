use super::ApiError;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_expires_in(expires_in: u64) -> Result<u64, ApiError> {
    const MAX_EXPIRY: u64 = 7 * 24 * 3600;

    if !(1..=MAX_EXPIRY).contains(&expires_in) {
        return Err(ApiError::validation(format!(
            "Invalid expiry: {expires_in}. Must be between 1 and {MAX_EXPIRY} seconds"
        )));
    }
    Ok(expires_in)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("observatory", 1).is_ok());
        assert!(validate_id("observatory", 12345).is_ok());
        assert!(validate_id("observatory", 0).is_err());
        assert!(validate_id("observatory", -1).is_err());
    }

    #[test]
    fn test_validate_expires_in() {
        assert!(validate_expires_in(1).is_ok());
        assert!(validate_expires_in(3600).is_ok());
        assert!(validate_expires_in(0).is_err());
        assert!(validate_expires_in(8 * 24 * 3600).is_err());
    }
}
