use super::pagination::PageRequest;

/// Outcome recorded for an API call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failure,
}

impl RequestOutcome {
    pub fn from_status(status_code: u16) -> Self {
        if status_code < 400 {
            RequestOutcome::Success
        } else {
            RequestOutcome::Failure
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Success => "success",
            RequestOutcome::Failure => "failure",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "success" => Some(RequestOutcome::Success),
            "failure" => Some(RequestOutcome::Failure),
            _ => None,
        }
    }
}

/// One captured API call, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub actor: String,
    pub endpoint: String,
    pub method: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status_code: u16,
    pub request: String,
    pub duration_ms: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLogQuery {
    pub actor: Option<String>,
    pub outcome: Option<RequestOutcome>,
    pub page: PageRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_status() {
        assert_eq!(RequestOutcome::from_status(204), RequestOutcome::Success);
        assert_eq!(RequestOutcome::from_status(302), RequestOutcome::Success);
        assert_eq!(RequestOutcome::from_status(404), RequestOutcome::Failure);
    }
}
