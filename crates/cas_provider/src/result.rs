#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(tag = "type")]
pub enum Error {
    /// Not all required parameters were sent
    InvalidRequest,
    /// Ticket is unknown, consumed, expired or not accepted by this endpoint
    InvalidTicket,
    /// Service does not match the one the ticket was issued for
    InvalidService,
    InternalError,
    DatabaseError {
        operation: &'static str,
        with: &'static str,
    },

    /// Proxy callback refused or could not be reached
    ProxyCallbackFailed,
}

impl Error {
    /// CAS failure code reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidRequest => "INVALID_REQUEST",
            Error::InvalidTicket => "INVALID_TICKET",
            Error::InvalidService => "INVALID_SERVICE",
            Error::InternalError | Error::DatabaseError { .. } | Error::ProxyCallbackFailed => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Human readable failure message
    pub fn message(&self) -> &'static str {
        match self {
            Error::InvalidRequest => "Not all required parameters were sent.",
            Error::InvalidTicket => "The provided ticket is invalid.",
            Error::InvalidService => "Service is invalid",
            Error::InternalError | Error::DatabaseError { .. } | Error::ProxyCallbackFailed => {
                "An internal error occurred during ticket validation"
            }
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
pub type Success = Result<()>;

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn store_failures_are_internal_errors() {
        let err = Error::DatabaseError {
            operation: "find_one",
            with: "service_ticket",
        };

        assert_eq!(err.code(), "INTERNAL_ERROR");
        assert_ne!(err.code(), Error::InvalidTicket.code());
    }
}
